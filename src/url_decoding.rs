//! Percent-decoding of url encoded text.

use crate::{error::ParseError, settings::Settings};

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match *byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode `encoded` with the default `Settings`.
pub fn decode(encoded: &str) -> Result<String, ParseError> {
    decode_with(encoded.as_bytes(), &Settings::default())
}

/// Decode raw bytes, such as a request body, with the default `Settings`.
pub fn decode_bytes(encoded: &[u8]) -> Result<String, ParseError> {
    decode_with(encoded, &Settings::default())
}

/// Resolve every `%XX` escape in `encoded` and interpret the result as utf-8.
///
/// A `%` not followed by two hex digits is kept as is and scanning resumes right after it, so
/// partial escapes are never consumed. `+` is only turned into a space when
/// `Settings::plus_as_space` is set.
pub fn decode_with(encoded: &[u8], settings: &Settings) -> Result<String, ParseError> {
    let mut decoded = Vec::with_capacity(encoded.len());
    let mut idx = 0;

    while idx < encoded.len() {
        match encoded[idx] {
            b'%' => {
                let high = hex_value(encoded.get(idx + 1));
                let low = hex_value(encoded.get(idx + 2));

                if let (Some(high), Some(low)) = (high, low) {
                    decoded.push((high << 4) | low);
                    idx += 3;

                    continue;
                }

                decoded.push(b'%');
            }

            b'+' if settings.decodes_plus_as_space() => decoded.push(b' '),

            b'[' | b']' if settings.decodes_brackets_as_space() => decoded.push(b' '),

            byte => decoded.push(byte),
        }

        idx += 1;
    }

    String::from_utf8(decoded).map_err(|e| ParseError::InvalidEncoding {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}
