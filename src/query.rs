//! Splitting decoded query text into ordered key/value pairs.

use std::collections::HashMap;

use crate::{error::ParseError, settings::Settings, url_decoding};

/// A single `key=value` entry. A segment without `=` has an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn from_segment(segment: &str) -> Self {
        match segment.split_once('=') {
            Some((key, value)) => Pair::new(key, value),
            None => Pair::new(segment, ""),
        }
    }

    /// `true` for the placeholder produced by an empty segment, ex. the middle of `a=1&&b=2`.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

impl<K, V> From<(K, V)> for Pair
where
    K: Into<String>,
    V: Into<String>,
{
    fn from((key, value): (K, V)) -> Self {
        Pair::new(key, value)
    }
}

impl From<Pair> for (String, String) {
    fn from(pair: Pair) -> Self {
        (pair.key, pair.value)
    }
}

/// Ordered pairs in the order they occur in the query. Duplicate keys are kept, as multi-select
/// form fields submit one pair per selected option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    pairs: Vec<Pair>,
}

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn push(&mut self, pair: impl Into<Pair>) {
        self.pairs.push(pair.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Every value stored under `key`, in input order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|pair| pair.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|pair| pair.key.as_str())
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn into_vec(self) -> Vec<Pair> {
        self.pairs
    }

    /// Collapse into a map. When a key repeats, the last value wins.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.pairs
            .iter()
            .map(|pair| (pair.key.clone(), pair.value.clone()))
            .collect()
    }
}

impl IntoIterator for QueryResult {
    type Item = Pair;
    type IntoIter = std::vec::IntoIter<Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl<P> FromIterator<P> for QueryResult
where
    P: Into<Pair>,
{
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Pair {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&(&self.key, &self.value), serializer)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for QueryResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(&self.pairs)
    }
}

/// Parse `raw` with the default `Settings`.
pub fn parse(raw: &str) -> Result<QueryResult, ParseError> {
    parse_with(raw.as_bytes(), &Settings::default())
}

/// Parse a raw request body with the default `Settings`.
pub fn parse_bytes(raw: &[u8]) -> Result<QueryResult, ParseError> {
    parse_with(raw, &Settings::default())
}

/// Decode `raw` as a whole, then split it on `&` and `;` into pairs.
///
/// Decoding runs before splitting, so escaped delimiters such as `%26` separate pairs as well.
/// Empty segments become empty pairs unless `Settings::skip_empty_pairs` is set.
pub fn parse_with(raw: &[u8], settings: &Settings) -> Result<QueryResult, ParseError> {
    if raw.is_empty() {
        return Ok(QueryResult::new());
    }

    let decoded = url_decoding::decode_with(raw, settings)?;

    let pairs = decoded
        .split(|c: char| c == '&' || c == ';')
        .filter(|segment| !(settings.skips_empty_pairs() && segment.is_empty()))
        .map(Pair::from_segment)
        .collect();

    Ok(QueryResult { pairs })
}
