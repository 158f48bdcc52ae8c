//! Hyperlink (OSC 8) data carried by a cell.

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Link {
    pub url: String,
    pub params: String,
}

impl Link {
    pub fn new(url: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: params.into(),
        }
    }

    /// An empty link (no URL) is equivalent to "no link" regardless of
    /// whatever was in `params`.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_empty_link_even_with_params() {
        let link = Link::new("", "id=123");
        assert!(link.is_empty());
    }

    #[test]
    fn nonempty_url_is_not_empty() {
        assert!(!Link::new("https://example.com", "").is_empty());
    }
}
