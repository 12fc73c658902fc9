use crate::builder::{SiblingSetBuilder, Siblings};
use crate::matcher::SubtreeMatcher;
use crate::prefixes::PrefixTable;
use crate::sibling::{ContainmentNode, ContentMatchNode, SelectionNode, Sibling, SiblingSet};
use netconf_datatree::{DataNode, ValueContext};

/// An immutable RFC 6241 subtree filter.
///
/// A filter is the top-level sibling set of the `<filter type="subtree">`
/// element together with the value context used to compare leaf values.
/// It is cheap to share across threads; all matching state lives in the
/// [`SubtreeMatcher`] created per data tree.
#[derive(Clone, Debug)]
pub struct SubtreeFilter {
    siblings: Siblings,
    context: ValueContext,
    prefixes: PrefixTable,
}

impl SubtreeFilter {
    pub fn builder(context: ValueContext) -> SubtreeFilterBuilder {
        SubtreeFilterBuilder { context, siblings: SiblingSetBuilder::new() }
    }

    pub fn from_siblings(context: ValueContext, siblings: Siblings) -> Self {
        let prefixes = PrefixTable::from_siblings(&siblings);
        Self { siblings, context, prefixes }
    }

    pub fn siblings(&self) -> &Siblings {
        &self.siblings
    }

    pub fn context(&self) -> &ValueContext {
        &self.context
    }

    /// Namespace prefixes used when serializing this filter.
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Evaluates the filter against `root`.
    pub fn matcher<'a>(&'a self, root: &'a DataNode) -> SubtreeMatcher<'a> {
        SubtreeMatcher::new(self, root)
    }
}

impl SiblingSet for SubtreeFilter {
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

/// Filters are equal when their sibling sets are; the value context is not compared.
impl PartialEq for SubtreeFilter {
    fn eq(&self, other: &Self) -> bool {
        self.siblings == other.siblings
    }
}

impl Eq for SubtreeFilter {}

pub struct SubtreeFilterBuilder {
    context: ValueContext,
    siblings: SiblingSetBuilder,
}

impl SubtreeFilterBuilder {
    pub fn add(mut self, sibling: impl Into<Sibling>) -> Self {
        self.siblings.push(sibling);
        self
    }

    pub fn push(&mut self, sibling: impl Into<Sibling>) {
        self.siblings.push(sibling);
    }

    pub fn build(self) -> SubtreeFilter {
        SubtreeFilter::from_siblings(self.context, self.siblings.build())
    }
}
