use core::fmt;

/// Expanded name of a data node: namespace URI plus local name.
///
/// The derived ordering compares the namespace first, with "no namespace"
/// sorting before any namespace, then the local name. Result trees and filter
/// siblings share this canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    pub ns_uri: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(ns_uri: impl Into<String>, local: impl Into<String>) -> Self {
        let ns_uri = ns_uri.into();
        Self { ns_uri: (!ns_uri.is_empty()).then_some(ns_uri), local: local.into() }
    }

    /// Name without a namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self { ns_uri: None, local: local.into() }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.ns_uri.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns_uri {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl From<&str> for QName {
    fn from(local: &str) -> Self {
        QName::unqualified(local)
    }
}

impl From<(&str, &str)> for QName {
    fn from((ns_uri, local): (&str, &str)) -> Self {
        QName::new(ns_uri, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_namespace_is_no_namespace() {
        assert_eq!(QName::new("", "top"), QName::unqualified("top"));
    }

    #[test]
    fn unqualified_names_sort_first() {
        let mut names = vec![
            QName::new("urn:b", "a"),
            QName::unqualified("z"),
            QName::new("urn:a", "z"),
            QName::new("urn:a", "b"),
        ];
        names.sort();
        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["z", "{urn:a}b", "{urn:a}z", "{urn:b}a"]);
    }
}
