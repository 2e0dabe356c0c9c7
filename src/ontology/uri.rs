/// Percent-encode every byte of the label's UTF-8 form outside
/// `A-Z a-z 0-9 - . _ ~`. `None` for labels that are empty after trimming.
///
/// Pure and case-preserving: `"Foo"` and `"foo"` mint different URIs.
pub fn sanitize(label: &str) -> Option<String> {
    if label.trim().is_empty() {
        return None;
    }
    Some(urlencoding::encode(label).into_owned())
}

/// Base namespace entity and vocabulary URIs are minted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    base: String,
}

impl Namespace {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') && !base.ends_with('#') {
            base.push('/');
        }
        Namespace { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Class or property IRI.
    pub fn term(&self, local: &str) -> String {
        format!("{}{}", self.base, local)
    }

    /// Individual IRI for `label` under an optional path prefix such as
    /// `"paradigm/"`.
    pub fn entity(&self, path_prefix: &str, label: &str) -> Option<String> {
        sanitize(label).map(|s| format!("{}{}{}", self.base, path_prefix, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_is_deterministic() {
        let a = sanitize("Bradley's Language").unwrap();
        let b = sanitize("Bradley's Language").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "Bradley%27s%20Language");
    }

    #[test]
    fn sanitize_encodes_reserved_and_unicode() {
        assert_eq!(sanitize("a/b?c#d").unwrap(), "a%2Fb%3Fc%23d");
        assert_eq!(sanitize("P′′").unwrap(), "P%E2%80%B2%E2%80%B2");
        assert_eq!(sanitize("!!!Batch").unwrap(), "%21%21%21Batch");
    }

    #[test]
    fn case_is_preserved() {
        assert_ne!(sanitize("Brainfuck"), sanitize("brainfuck"));
    }

    #[test]
    fn blank_labels_are_rejected() {
        assert_eq!(sanitize(""), None);
        assert_eq!(sanitize("   "), None);
    }

    #[test]
    fn entities_nest_under_prefix() {
        let ns = Namespace::new("http://localhost:5173/esolangs");
        assert_eq!(ns.base(), "http://localhost:5173/esolangs/");
        assert_eq!(
            ns.entity("category/", "Stack-based").unwrap(),
            "http://localhost:5173/esolangs/category/Stack-based"
        );
        assert_eq!(ns.term("Paradigm"), "http://localhost:5173/esolangs/Paradigm");
        assert_eq!(ns.entity("", "Foo").unwrap(), "http://localhost:5173/esolangs/Foo");
    }
}
