use crate::sibling::{ContainmentNode, ContentMatchNode, SelectionNode, Sibling, SiblingSet};

/// A finished sibling set: each sequence sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Siblings {
    content_matches: Vec<ContentMatchNode>,
    selections: Vec<SelectionNode>,
    containments: Vec<ContainmentNode>,
}

impl SiblingSet for Siblings {
    fn content_matches(&self) -> &[ContentMatchNode] {
        &self.content_matches
    }

    fn selections(&self) -> &[SelectionNode] {
        &self.selections
    }

    fn containments(&self) -> &[ContainmentNode] {
        &self.containments
    }
}

/// Accumulates siblings in insertion order and normalizes them on `build`.
///
/// Content matches are unique per selection, and the first one added wins.
/// Selections and containments only collapse when they are identical.
#[derive(Debug, Default)]
pub struct SiblingSetBuilder {
    content_matches: Vec<ContentMatchNode>,
    selections: Vec<SelectionNode>,
    containments: Vec<ContainmentNode>,
}

impl SiblingSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, sibling: impl Into<Sibling>) -> Self {
        self.push(sibling);
        self
    }

    pub fn push(&mut self, sibling: impl Into<Sibling>) {
        match sibling.into() {
            Sibling::ContentMatch(node) => self.content_matches.push(node),
            Sibling::Selection(node) => self.selections.push(node),
            Sibling::Containment(node) => self.containments.push(node),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content_matches.is_empty() && self.selections.is_empty() && self.containments.is_empty()
    }

    pub fn build(self) -> Siblings {
        let SiblingSetBuilder { mut content_matches, mut selections, mut containments } = self;

        // stable: among equal selections the first added stays in front
        content_matches.sort_by(|a, b| a.selection().cmp(b.selection()));
        content_matches.dedup_by(|later, earlier| later.selection() == earlier.selection());

        selections.sort();
        selections.dedup();
        containments.sort();
        containments.dedup();

        Siblings { content_matches, selections, containments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::NamespaceSelection;
    use crate::sibling::AttributeMatch;
    use netconf_datatree::Value;

    const NS: &str = "http://example.com/schema/1.2/config";

    #[test]
    fn first_content_match_wins() {
        let siblings = SiblingSetBuilder::new()
            .add(ContentMatchNode::new(NamespaceSelection::exact(NS, "name"), "fred"))
            .add(ContentMatchNode::new(NamespaceSelection::exact(NS, "name"), "barney"))
            .build();

        assert_eq!(siblings.content_matches().len(), 1);
        assert_eq!(siblings.content_matches()[0].value(), &Value::from("fred"));
    }

    #[test]
    fn distinct_containments_with_same_name_survive() {
        let user = |name: &str| {
            ContainmentNode::builder(NamespaceSelection::exact(NS, "user"))
                .add(ContentMatchNode::new(NamespaceSelection::exact(NS, "name"), name))
                .build()
        };
        let siblings = SiblingSetBuilder::new().add(user("root")).add(user("fred")).add(user("root")).build();

        let names: Vec<String> = siblings
            .containments()
            .iter()
            .map(|c| c.content_matches()[0].value().to_string())
            .collect();
        assert_eq!(names, ["fred", "root"]);
    }

    #[test]
    fn selections_sort_by_namespace_then_name() {
        let siblings = SiblingSetBuilder::new()
            .add(SelectionNode::new(NamespaceSelection::exact("urn:b", "a")))
            .add(SelectionNode::new(NamespaceSelection::exact("urn:a", "z")))
            .add(SelectionNode::new(NamespaceSelection::wildcard("m")))
            .add(SelectionNode::new(NamespaceSelection::exact("urn:a", "z")))
            .build();

        let rendered: Vec<String> = siblings.selections().iter().map(|s| s.selection().to_string()).collect();
        assert_eq!(rendered, ["*:m", "{urn:a}z", "{urn:b}a"]);
    }

    #[test]
    fn selections_differing_in_attribute_matches_are_distinct() {
        let keyed = SelectionNode::builder(NamespaceSelection::exact(NS, "interface"))
            .add(AttributeMatch::new(NamespaceSelection::exact(NS, "ifName"), "eth0"))
            .build();
        let siblings = SiblingSetBuilder::new()
            .add(keyed)
            .add(SelectionNode::new(NamespaceSelection::exact(NS, "interface")))
            .build();

        assert_eq!(siblings.len(), 2);
        assert!(siblings.selections()[0].attribute_matches().is_empty());
    }

    #[test]
    fn empty_builder_yields_empty_set() {
        let builder = SiblingSetBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }
}
