//! Credential resolution: caller-supplied values over configured fallbacks.

/// Pick the effective credential for one upstream call.
///
/// A non-blank caller-supplied value always wins; otherwise the configured
/// fallback is used. Returns `None` when neither is present, which the search
/// handlers translate into a `noKey` empty result rather than an error.
pub fn resolve<'a>(caller: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    caller
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
}

/// An explicit, ordered ring of fallback API keys.
///
/// Replaces the old shared-global rotation scheme: the rotation index is held
/// by the caller (typically a `keyIndex` query parameter) and selection wraps
/// modulo the ring length, so concurrent requests never race on shared state.
#[derive(Clone, Debug, Default)]
pub struct KeyRing {
    keys: Vec<String>,
}

impl KeyRing {
    /// Build a ring from an explicit key list; blank entries are dropped.
    pub fn new(keys: Vec<String>) -> Self {
        let keys = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    /// Parse a comma-separated environment value into a ring.
    pub fn from_delimited(raw: &str) -> Self {
        Self::new(raw.split(',').map(String::from).collect())
    }

    /// Number of keys in the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Select a key by a caller-held rotation index, wrapping modulo length.
    pub fn select(&self, index: usize) -> Option<&str> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys[index % self.keys.len()].as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_value_beats_fallback() {
        assert_eq!(resolve(Some("caller"), Some("env")), Some("caller"));
    }

    #[test]
    fn blank_caller_value_falls_through() {
        assert_eq!(resolve(Some("  "), Some("env")), Some("env"));
        assert_eq!(resolve(Some(""), None), None);
    }

    #[test]
    fn absent_both_resolves_to_none() {
        assert_eq!(resolve(None, None), None);
    }

    #[test]
    fn ring_selection_wraps() {
        let ring = KeyRing::from_delimited("a, b ,c");
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.select(0), Some("a"));
        assert_eq!(ring.select(4), Some("b"));
        assert_eq!(ring.select(5), Some("c"));
    }

    #[test]
    fn empty_ring_selects_nothing() {
        let ring = KeyRing::default();
        assert!(ring.is_empty());
        assert_eq!(ring.select(7), None);
    }
}
