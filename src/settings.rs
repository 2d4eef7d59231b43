//! Configuration shared by the decoder, the parser and the request adapter.

/// Default upper bound for a POST body, 1 MiB.
pub const DEFAULT_MAX_BODY_LEN: usize = 1024 * 1024;

/// Builder style settings. `Settings::default()` gives plain percent-decoding with `+` and
/// brackets passed through, empty pairs kept and bodies capped at [`DEFAULT_MAX_BODY_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    plus_as_space: bool,
    brackets_as_space: bool,
    skip_empty_pairs: bool,
    max_body_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plus_as_space: false,
            brackets_as_space: false,
            skip_empty_pairs: false,
            max_body_len: DEFAULT_MAX_BODY_LEN,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `+` as a space, as html forms encode it.
    pub fn plus_as_space(mut self, enabled: bool) -> Self {
        self.plus_as_space = enabled;

        self
    }

    /// Map literal `[` and `]` to a space before escapes are resolved. Only brackets present in
    /// the raw input are affected, `%5B` and `%5D` still decode to brackets.
    pub fn brackets_as_space(mut self, enabled: bool) -> Self {
        self.brackets_as_space = enabled;

        self
    }

    /// Drop the empty segments produced by consecutive, leading or trailing delimiters.
    pub fn skip_empty_pairs(mut self, enabled: bool) -> Self {
        self.skip_empty_pairs = enabled;

        self
    }

    /// Largest `Content-Length` accepted for a POST body.
    pub fn max_body_len(mut self, len: usize) -> Self {
        self.max_body_len = len;

        self
    }

    pub fn decodes_plus_as_space(&self) -> bool {
        self.plus_as_space
    }

    pub fn decodes_brackets_as_space(&self) -> bool {
        self.brackets_as_space
    }

    pub fn skips_empty_pairs(&self) -> bool {
        self.skip_empty_pairs
    }

    pub fn body_limit(&self) -> usize {
        self.max_body_len
    }
}

#[cfg(test)]
mod test {
    use super::{Settings, DEFAULT_MAX_BODY_LEN};

    #[test]
    fn test_defaults() {
        let settings = Settings::new();

        assert!(!settings.decodes_plus_as_space());
        assert!(!settings.decodes_brackets_as_space());
        assert!(!settings.skips_empty_pairs());
        assert_eq!(settings.body_limit(), DEFAULT_MAX_BODY_LEN);
    }

    #[test]
    fn test_builder() {
        let settings = Settings::new()
            .plus_as_space(true)
            .skip_empty_pairs(true)
            .max_body_len(16);

        assert!(settings.decodes_plus_as_space());
        assert!(!settings.decodes_brackets_as_space());
        assert!(settings.skips_empty_pairs());
        assert_eq!(settings.body_limit(), 16);
    }
}
