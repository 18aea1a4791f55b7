//! OSC 8 hyperlink state attached to a cell (§3 `Hyperlink`).

/// A hyperlink's URI and OSC 8 parameter string (e.g. `id=...`). Both may
/// be empty; an empty `uri` disables the link on the cell it's attached
/// to, regardless of `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    pub uri: String,
    pub params: String,
}

impl Hyperlink {
    #[must_use]
    pub fn new(uri: impl Into<String>, params: impl Into<String>) -> Self {
        Self { uri: uri.into(), params: params.into() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Hyperlink::default().is_empty());
    }

    #[test]
    fn empty_uri_counts_as_disabled_even_with_params() {
        let link = Hyperlink::new("", "id=1");
        assert!(link.is_empty());
    }

    #[test]
    fn nonempty_uri_is_not_empty() {
        let link = Hyperlink::new("https://example.com", "");
        assert!(!link.is_empty());
    }
}
