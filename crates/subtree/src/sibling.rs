//! The three kinds of subtree filter nodes.

use crate::builder::{SiblingSetBuilder, Siblings};
use crate::selection::NamespaceSelection;
use netconf_datatree::Value;

/// Three canonically ordered, de-duplicated sibling sequences.
///
/// Realised by [`ContainmentNode`] and [`crate::SubtreeFilter`].
pub trait SiblingSet {
    fn content_matches(&self) -> &[ContentMatchNode];
    fn selections(&self) -> &[SelectionNode];
    fn containments(&self) -> &[ContainmentNode];

    fn is_empty(&self) -> bool {
        self.content_matches().is_empty() && self.selections().is_empty() && self.containments().is_empty()
    }

    /// Number of direct siblings.
    fn len(&self) -> usize {
        self.content_matches().len() + self.selections().len() + self.containments().len()
    }
}

/// Leaf equality predicate: `<name>value</name>`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentMatchNode {
    selection: NamespaceSelection,
    value: Value,
}

impl ContentMatchNode {
    /// # Panics
    /// If the lexical form of `value` is blank, such as `""` or empty bits.
    /// `<name></name>` is a selection node, not a content match.
    pub fn new(selection: NamespaceSelection, value: impl Into<Value>) -> Self {
        let value = value.into();
        assert!(
            !value.to_string().trim().is_empty(),
            "content match '{}' requires a non-blank value",
            selection.name()
        );
        Self { selection, value }
    }

    pub fn selection(&self) -> &NamespaceSelection {
        &self.selection
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Attribute predicate of a selection node, typically a list key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeMatch {
    selection: NamespaceSelection,
    value: String,
}

impl AttributeMatch {
    /// # Panics
    /// If `selection` is a wildcard; attributes are always namespace-qualified.
    pub fn new(selection: NamespaceSelection, value: impl Into<String>) -> Self {
        assert!(
            !selection.is_wildcard(),
            "attribute match '{}' requires an exact selection",
            selection.name()
        );
        Self { selection, value: value.into() }
    }

    pub fn selection(&self) -> &NamespaceSelection {
        &self.selection
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Selects a whole subtree, optionally narrowed by attribute matches.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionNode {
    selection: NamespaceSelection,
    attribute_matches: Vec<AttributeMatch>,
}

impl SelectionNode {
    pub fn new(selection: NamespaceSelection) -> Self {
        Self { selection, attribute_matches: Vec::new() }
    }

    pub fn builder(selection: NamespaceSelection) -> SelectionNodeBuilder {
        SelectionNodeBuilder { selection, attribute_matches: Vec::new() }
    }

    pub fn selection(&self) -> &NamespaceSelection {
        &self.selection
    }

    pub fn attribute_matches(&self) -> &[AttributeMatch] {
        &self.attribute_matches
    }
}

pub struct SelectionNodeBuilder {
    selection: NamespaceSelection,
    attribute_matches: Vec<AttributeMatch>,
}

impl SelectionNodeBuilder {
    pub fn add(mut self, attribute_match: AttributeMatch) -> Self {
        self.push(attribute_match);
        self
    }

    pub fn push(&mut self, attribute_match: AttributeMatch) {
        self.attribute_matches.push(attribute_match);
    }

    /// Attribute matches are unique per attribute name; the first one added wins.
    pub fn build(self) -> SelectionNode {
        let mut attribute_matches = self.attribute_matches;
        attribute_matches.sort_by(|a, b| a.selection.cmp(&b.selection));
        attribute_matches.dedup_by(|later, earlier| later.selection == earlier.selection);
        SelectionNode { selection: self.selection, attribute_matches }
    }
}

/// One level of nesting holding its own sibling set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainmentNode {
    selection: NamespaceSelection,
    siblings: Siblings,
}

impl ContainmentNode {
    pub fn builder(selection: NamespaceSelection) -> ContainmentNodeBuilder {
        ContainmentNodeBuilder { selection, siblings: SiblingSetBuilder::new() }
    }

    pub fn selection(&self) -> &NamespaceSelection {
        &self.selection
    }

    pub fn siblings(&self) -> &Siblings {
        &self.siblings
    }
}

impl SiblingSet for ContainmentNode {
    fn content_matches(&self) -> &[ContentMatchNode] {
        self.siblings.content_matches()
    }

    fn selections(&self) -> &[SelectionNode] {
        self.siblings.selections()
    }

    fn containments(&self) -> &[ContainmentNode] {
        self.siblings.containments()
    }
}

pub struct ContainmentNodeBuilder {
    selection: NamespaceSelection,
    siblings: SiblingSetBuilder,
}

impl ContainmentNodeBuilder {
    pub fn add(mut self, sibling: impl Into<Sibling>) -> Self {
        self.siblings.push(sibling);
        self
    }

    pub fn push(&mut self, sibling: impl Into<Sibling>) {
        self.siblings.push(sibling);
    }

    pub fn build(self) -> ContainmentNode {
        ContainmentNode { selection: self.selection, siblings: self.siblings.build() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sibling {
    ContentMatch(ContentMatchNode),
    Selection(SelectionNode),
    Containment(ContainmentNode),
}

impl Sibling {
    pub fn selection(&self) -> &NamespaceSelection {
        match self {
            Sibling::ContentMatch(node) => node.selection(),
            Sibling::Selection(node) => node.selection(),
            Sibling::Containment(node) => node.selection(),
        }
    }
}

impl From<ContentMatchNode> for Sibling {
    fn from(node: ContentMatchNode) -> Self {
        Sibling::ContentMatch(node)
    }
}

impl From<SelectionNode> for Sibling {
    fn from(node: SelectionNode) -> Self {
        Sibling::Selection(node)
    }
}

impl From<ContainmentNode> for Sibling {
    fn from(node: ContainmentNode) -> Self {
        Sibling::Containment(node)
    }
}

impl From<SelectionNodeBuilder> for Sibling {
    fn from(builder: SelectionNodeBuilder) -> Self {
        Sibling::Selection(builder.build())
    }
}

impl From<ContainmentNodeBuilder> for Sibling {
    fn from(builder: ContainmentNodeBuilder) -> Self {
        Sibling::Containment(builder.build())
    }
}
