use super::writer::{content_text, qualified};
use crate::filter::SubtreeFilter;
use crate::prefixes::PrefixTable;
use crate::sibling::SiblingSet;
use std::fmt::Write as _;

/// Human-readable outline of a filter for logs and diagnostics.
///
/// ```text
/// filter [a=urn:example:users]
///   a:users/
///     a:user/
///       a:name = "fred"
///       a:company-info
/// ```
///
/// Containments end in `/`, and attribute matches follow their selection in brackets.
pub fn pretty_tree(filter: &SubtreeFilter) -> String {
    let prefixes = filter.prefixes();
    let mut out = String::from("filter");
    if !prefixes.is_empty() {
        let bindings: Vec<String> = prefixes.iter().map(|(ns, prefix)| format!("{prefix}={ns}")).collect();
        let _ = write!(out, " [{}]", bindings.join(", "));
    }
    if filter.is_empty() {
        out.push_str(" (empty)");
    }
    out.push('\n');
    render(filter, prefixes, 1, &mut out);
    out
}

fn render(set: &impl SiblingSet, prefixes: &PrefixTable, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    for node in set.content_matches() {
        let name = qualified(node.selection(), prefixes);
        let _ = writeln!(out, "{indent}{name} = {:?}", content_text(node.value(), prefixes));
    }
    for node in set.selections() {
        let _ = write!(out, "{indent}{}", qualified(node.selection(), prefixes));
        if !node.attribute_matches().is_empty() {
            let keys: Vec<String> = node
                .attribute_matches()
                .iter()
                .map(|key| format!("@{}={:?}", qualified(key.selection(), prefixes), key.value()))
                .collect();
            let _ = write!(out, " [{}]", keys.join(" "));
        }
        out.push('\n');
    }
    for node in set.containments() {
        let _ = writeln!(out, "{indent}{}/", qualified(node.selection(), prefixes));
        render(node, prefixes, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::NamespaceSelection;
    use crate::sibling::{AttributeMatch, ContainmentNode, ContentMatchNode, SelectionNode};
    use netconf_datatree::{QName, Untyped};
    use std::sync::Arc;

    #[test]
    fn outline_shows_every_kind() {
        let ns = "urn:example:users";
        let filter = SubtreeFilter::builder(Arc::new(Untyped))
            .add(
                ContainmentNode::builder(NamespaceSelection::exact(ns, "users")).add(
                    ContainmentNode::builder(NamespaceSelection::exact(ns, "user"))
                        .add(ContentMatchNode::new(NamespaceSelection::exact(ns, "name"), "fred"))
                        .add(
                            SelectionNode::builder(NamespaceSelection::exact(ns, "group"))
                                .add(AttributeMatch::new(NamespaceSelection::exact(ns, "id"), "7")),
                        ),
                ),
            )
            .add(SelectionNode::new(NamespaceSelection::wildcard("system")))
            .build();

        let expected = "filter [a=urn:example:users]\n\
                        \x20 system\n\
                        \x20 a:users/\n\
                        \x20   a:user/\n\
                        \x20     a:name = \"fred\"\n\
                        \x20     a:group [@a:id=\"7\"]\n";
        assert_eq!(filter.pretty_tree(), expected);
        assert_eq!(filter.to_string(), expected);
    }

    #[test]
    fn identities_use_filter_prefixes() {
        let filter = SubtreeFilter::builder(Arc::new(Untyped))
            .add(ContentMatchNode::new(
                NamespaceSelection::exact("urn:example:if", "type"),
                QName::new("urn:example:iana", "ethernetCsmacd"),
            ))
            .build();
        assert_eq!(
            pretty_tree(&filter),
            "filter [a=urn:example:iana, b=urn:example:if]\n  b:type = \"a:ethernetCsmacd\"\n"
        );
    }

    #[test]
    fn empty_filter_is_marked() {
        let filter = SubtreeFilter::builder(Arc::new(Untyped)).build();
        assert_eq!(pretty_tree(&filter), "filter (empty)\n");
    }
}
