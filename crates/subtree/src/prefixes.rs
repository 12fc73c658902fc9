use crate::sibling::SiblingSet;
use netconf_datatree::Value;
use std::collections::BTreeSet;

/// Deterministic namespace-to-prefix assignment for serialized filters.
///
/// Namespaces are collected from every exact selection (attribute matches
/// included) and every identity value, sorted, and assigned `a`, `b`, ..., `z`, `aa`, `ab`, ... in
/// that order. Candidates starting with `xml` are reserved and skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixTable {
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    pub fn from_siblings(siblings: &impl SiblingSet) -> Self {
        let mut namespaces = BTreeSet::new();
        collect_namespaces(siblings, &mut namespaces);
        Self::from_namespaces(namespaces)
    }

    fn from_namespaces(namespaces: BTreeSet<&str>) -> Self {
        let candidates = (0usize..).map(prefix_for_index).filter(|p| !p.starts_with("xml"));
        let entries = namespaces
            .into_iter()
            .zip(candidates)
            .map(|(ns, prefix)| (ns.to_owned(), prefix))
            .collect();
        Self { entries }
    }

    /// Prefix bound to `namespace`, if the filter uses it.
    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|(ns, _)| ns.as_str().cmp(namespace))
            .ok()
            .map(|index| self.entries[index].1.as_str())
    }

    /// `(namespace, prefix)` pairs in namespace order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(ns, prefix)| (ns.as_str(), prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_namespaces<'a>(set: &'a impl SiblingSet, out: &mut BTreeSet<&'a str>) {
    for node in set.content_matches() {
        out.extend(node.selection().namespace());
        if let Value::IdentityRef(identity) = node.value() {
            out.extend(identity.namespace());
        }
    }
    for node in set.selections() {
        out.extend(node.selection().namespace());
        for attribute in node.attribute_matches() {
            out.extend(attribute.selection().namespace());
        }
    }
    for node in set.containments() {
        out.extend(node.selection().namespace());
        collect_namespaces(node, out);
    }
}

/// Bijective base-26: 0 -> a, 25 -> z, 26 -> aa, 27 -> ab.
fn prefix_for_index(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "a")]
    #[case(25, "z")]
    #[case(26, "aa")]
    #[case(27, "ab")]
    #[case(51, "az")]
    #[case(52, "ba")]
    #[case(701, "zz")]
    #[case(702, "aaa")]
    fn bijective_base_26(#[case] index: usize, #[case] expected: &str) {
        assert_eq!(prefix_for_index(index), expected);
    }

    #[test]
    fn assignment_follows_namespace_order() {
        let table = PrefixTable::from_namespaces(BTreeSet::from(["urn:z", "urn:a", "urn:m"]));
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, [("urn:a", "a"), ("urn:m", "b"), ("urn:z", "c")]);
        assert_eq!(table.prefix("urn:m"), Some("b"));
        assert_eq!(table.prefix("urn:unknown"), None);
    }

    #[test]
    fn reserved_prefixes_are_skipped() {
        assert_eq!(prefix_for_index(16_573), "xml");
        let namespaces: Vec<String> = (0..16_600).map(|i| format!("urn:ns:{i:05}")).collect();
        let table = PrefixTable::from_namespaces(namespaces.iter().map(String::as_str).collect());
        assert_eq!(table.len(), 16_600);
        assert!(table.iter().all(|(_, prefix)| !prefix.starts_with("xml")));
        assert_eq!(table.prefix("urn:ns:16572"), Some("xmk"));
        assert_eq!(table.prefix("urn:ns:16573"), Some("xmm"));
    }
}
