use core::cmp::Ordering;
use core::fmt;
use netconf_datatree::QName;
use std::sync::Arc;

/// Identity test for one element or attribute of a subtree filter.
///
/// `Exact` requires both the local name and the namespace to match, while
/// `Wildcard` matches the local name in any namespace. Selections order by
/// namespace first ("no namespace" before any namespace), then by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamespaceSelection {
    Exact { namespace: Arc<str>, name: Arc<str> },
    Wildcard { name: Arc<str> },
}

impl NamespaceSelection {
    /// # Panics
    /// If `namespace` or `name` is empty.
    pub fn exact(namespace: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        assert!(!namespace.is_empty(), "exact selection of '{name}' requires a namespace");
        assert!(!name.is_empty(), "selection requires a local name");
        NamespaceSelection::Exact { namespace, name }
    }

    /// # Panics
    /// If `name` is empty.
    pub fn wildcard(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "selection requires a local name");
        NamespaceSelection::Wildcard { name }
    }

    /// Selection matching exactly `qname`; names without a namespace become wildcards.
    pub fn of(qname: &QName) -> Self {
        match qname.namespace() {
            Some(ns) => NamespaceSelection::exact(ns, qname.local_name()),
            None => NamespaceSelection::wildcard(qname.local_name()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NamespaceSelection::Exact { name, .. } | NamespaceSelection::Wildcard { name } => name,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            NamespaceSelection::Exact { namespace, .. } => Some(namespace),
            NamespaceSelection::Wildcard { .. } => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, NamespaceSelection::Wildcard { .. })
    }

    pub fn matches(&self, qname: &QName) -> bool {
        match self {
            NamespaceSelection::Exact { namespace, name } => {
                qname.local_name() == &**name && qname.namespace() == Some(&**namespace)
            }
            NamespaceSelection::Wildcard { name } => qname.local_name() == &**name,
        }
    }

    fn sort_key(&self) -> (Option<&str>, &str) {
        (self.namespace(), self.name())
    }
}

impl Ord for NamespaceSelection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for NamespaceSelection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NamespaceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceSelection::Exact { namespace, name } => write!(f, "{{{namespace}}}{name}"),
            NamespaceSelection::Wildcard { name } => write!(f, "*:{name}"),
        }
    }
}
