//! Evaluation of a subtree filter against one data tree.
//!
//! Evaluation runs in two passes. The first walks the filter and the data
//! side by side and records which children survive as a [`Mask`], without
//! copying any data. The second materializes the mask into a pruned
//! [`DataNode`]. Several selections or containments may reach the same data
//! child; their masks are merged, so the output is their union.

use crate::filter::SubtreeFilter;
use crate::sibling::{AttributeMatch, ContainmentNode, SelectionNode, SiblingSet};
use netconf_datatree::{DataChild, DataNode, ListNode, QName, Value, ValueCanonicalizer};
use std::collections::BTreeMap;
use tracing::trace;

/// Selected part of one data node.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mask {
    /// The node with all its descendants.
    Full,
    /// Only the listed children, keyed by child index.
    Partial(BTreeMap<usize, ChildMask>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ChildMask {
    Whole,
    Node(Mask),
    /// Surviving list entries, keyed by entry index.
    Entries(BTreeMap<usize, Mask>),
}

impl Mask {
    fn merge(self, other: Mask) -> Mask {
        match (self, other) {
            (Mask::Full, _) | (_, Mask::Full) => Mask::Full,
            (Mask::Partial(mut left), Mask::Partial(right)) => {
                for (index, child) in right {
                    insert_child(&mut left, index, child);
                }
                Mask::Partial(left)
            }
        }
    }
}

impl ChildMask {
    fn merge(self, other: ChildMask) -> ChildMask {
        match (self, other) {
            (ChildMask::Whole, _) | (_, ChildMask::Whole) => ChildMask::Whole,
            (ChildMask::Node(left), ChildMask::Node(right)) => ChildMask::Node(left.merge(right)),
            (ChildMask::Entries(mut left), ChildMask::Entries(right)) => {
                for (index, entry) in right {
                    insert_entry(&mut left, index, entry);
                }
                ChildMask::Entries(left)
            }
            // a child index is either a container or a list, never both
            (left, _) => left,
        }
    }
}

fn insert_child(children: &mut BTreeMap<usize, ChildMask>, index: usize, child: ChildMask) {
    let merged = match children.remove(&index) {
        Some(existing) => existing.merge(child),
        None => child,
    };
    children.insert(index, merged);
}

fn insert_entry(entries: &mut BTreeMap<usize, Mask>, index: usize, entry: Mask) {
    let merged = match entries.remove(&index) {
        Some(existing) => existing.merge(entry),
        None => entry,
    };
    entries.insert(index, merged);
}

/// A [`SubtreeFilter`] bound to one data tree.
///
/// The top-level siblings of the filter are evaluated against the children
/// of `root`; the result, if any, is a copy of `root` holding only the
/// selected descendants.
#[derive(Debug)]
pub struct SubtreeMatcher<'a> {
    filter: &'a SubtreeFilter,
    root: &'a DataNode,
    mask: Option<Mask>,
}

impl<'a> SubtreeMatcher<'a> {
    pub(crate) fn new(filter: &'a SubtreeFilter, root: &'a DataNode) -> Self {
        let mask = if filter.is_empty() {
            trace!(node = %root.name(), "empty filter selects nothing");
            None
        } else {
            Evaluator { context: &**filter.context() }.evaluate(filter, root)
        };
        Self { filter, root, mask }
    }

    pub fn filter(&self) -> &'a SubtreeFilter {
        self.filter
    }

    /// Whether the filter selects anything under the root.
    pub fn matches(&self) -> bool {
        self.mask.is_some()
    }

    /// The pruned copy of the root, or `None` when nothing matched.
    pub fn result(&self) -> Option<DataNode> {
        self.mask.as_ref().map(|mask| materialize(self.root, mask))
    }
}

struct Evaluator<'c> {
    context: &'c dyn ValueCanonicalizer,
}

impl Evaluator<'_> {
    /// Evaluates `set` against the children of `node`. `None` means the
    /// node does not match and must be dropped from the parent's output.
    fn evaluate(&self, set: &impl SiblingSet, node: &DataNode) -> Option<Mask> {
        if set.is_empty() {
            return Some(Mask::Partial(BTreeMap::new()));
        }
        if !self.content_matches_hold(set, node) {
            return None;
        }
        if set.selections().is_empty() && set.containments().is_empty() {
            trace!(node = %node.name(), "content matches hold, selecting node in full");
            return Some(Mask::Full);
        }

        let mut children = BTreeMap::new();
        for selection in set.selections() {
            self.apply_selection(selection, node, &mut children);
        }
        for containment in set.containments() {
            self.apply_containment(containment, node, &mut children);
        }

        if children.is_empty() {
            trace!(node = %node.name(), "no sibling selected anything");
            None
        } else {
            Some(Mask::Partial(children))
        }
    }

    fn content_matches_hold(&self, set: &impl SiblingSet, node: &DataNode) -> bool {
        set.content_matches().iter().all(|content_match| {
            let holds = node.children().iter().any(|child| match child {
                DataChild::Leaf(leaf) if content_match.selection().matches(leaf.name()) => {
                    self.context.values_equal(leaf.name(), leaf.value(), content_match.value())
                }
                _ => false,
            });
            if !holds {
                trace!(node = %node.name(), selection = %content_match.selection(), "content match failed");
            }
            holds
        })
    }

    fn apply_selection(&self, selection: &SelectionNode, node: &DataNode, out: &mut BTreeMap<usize, ChildMask>) {
        let keys = selection.attribute_matches();
        for (index, child) in matching_children(node, |name| selection.selection().matches(name)) {
            if keys.is_empty() {
                insert_child(out, index, ChildMask::Whole);
                continue;
            }
            match child {
                DataChild::Container(entry) if self.attributes_hold(keys, entry) => {
                    insert_child(out, index, ChildMask::Whole);
                }
                DataChild::List(list) => {
                    let entries: BTreeMap<usize, Mask> = list
                        .entries()
                        .iter()
                        .enumerate()
                        .filter(|(_, entry)| self.attributes_hold(keys, entry))
                        .map(|(position, _)| (position, Mask::Full))
                        .collect();
                    trace!(list = %list.name(), selected = entries.len(), "keyed selection");
                    if !entries.is_empty() {
                        insert_child(out, index, ChildMask::Entries(entries));
                    }
                }
                _ => {}
            }
        }
    }

    fn apply_containment(
        &self,
        containment: &ContainmentNode,
        node: &DataNode,
        out: &mut BTreeMap<usize, ChildMask>,
    ) {
        for (index, child) in matching_children(node, |name| containment.selection().matches(name)) {
            match child {
                DataChild::Container(inner) => {
                    if let Some(mask) = self.evaluate(containment, inner) {
                        insert_child(out, index, ChildMask::Node(mask));
                    }
                }
                DataChild::List(list) => {
                    let entries: BTreeMap<usize, Mask> = list
                        .entries()
                        .iter()
                        .enumerate()
                        .filter_map(|(position, entry)| Some((position, self.evaluate(containment, entry)?)))
                        .collect();
                    trace!(list = %list.name(), selected = entries.len(), "containment over list");
                    if !entries.is_empty() {
                        insert_child(out, index, ChildMask::Entries(entries));
                    }
                }
                DataChild::Leaf(leaf) => {
                    trace!(leaf = %leaf.name(), "containment cannot match a leaf");
                }
            }
        }
    }

    /// Every attribute match must hold on `entry`, either through a leaf
    /// child of that name or through a metadata attribute.
    fn attributes_hold(&self, keys: &[AttributeMatch], entry: &DataNode) -> bool {
        keys.iter().all(|key| {
            let expected = Value::from(key.value());
            let leaf_holds = entry.children().iter().any(|child| match child {
                DataChild::Leaf(leaf) if key.selection().matches(leaf.name()) => {
                    self.context.values_equal(leaf.name(), leaf.value(), &expected)
                }
                _ => false,
            });
            leaf_holds
                || entry.attributes().iter().any(|(name, value)| {
                    key.selection().matches(name) && self.context.values_equal(name, value, &expected)
                })
        })
    }
}

fn matching_children<'n>(
    node: &'n DataNode,
    predicate: impl Fn(&QName) -> bool + 'n,
) -> impl Iterator<Item = (usize, &'n DataChild)> + 'n {
    node.children().iter().enumerate().filter(move |(_, child)| predicate(child.name()))
}

fn materialize(node: &DataNode, mask: &Mask) -> DataNode {
    let Mask::Partial(selected) = mask else {
        return node.clone();
    };
    let mut children: Vec<DataChild> = selected
        .iter()
        .filter_map(|(&index, child_mask)| {
            let child = node.children().get(index)?;
            Some(match (child, child_mask) {
                (DataChild::Container(inner), ChildMask::Node(inner_mask)) => {
                    DataChild::Container(materialize(inner, inner_mask))
                }
                (DataChild::List(list), ChildMask::Entries(entries)) => DataChild::List(materialize_list(list, entries)),
                _ => child.clone(),
            })
        })
        .collect();
    children.sort_by(|a, b| a.name().cmp(b.name()));
    DataNode::from_parts(node.name().clone(), node.attributes().to_vec(), children)
}

fn materialize_list(list: &ListNode, entries: &BTreeMap<usize, Mask>) -> ListNode {
    let kept = entries
        .iter()
        .filter_map(|(&position, mask)| list.entries().get(position).map(|entry| materialize(entry, mask)))
        .collect();
    ListNode::new(list.name().clone(), kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(children: impl IntoIterator<Item = (usize, ChildMask)>) -> Mask {
        Mask::Partial(children.into_iter().collect())
    }

    #[test]
    fn full_absorbs_partial() {
        let merged = partial([(0, ChildMask::Whole)]).merge(Mask::Full);
        assert_eq!(merged, Mask::Full);
    }

    #[test]
    fn partial_masks_union_recursively() {
        let left = partial([(0, ChildMask::Node(partial([(1, ChildMask::Whole)])))]);
        let right = partial([
            (0, ChildMask::Node(partial([(2, ChildMask::Whole)]))),
            (3, ChildMask::Whole),
        ]);
        let expected = partial([
            (0, ChildMask::Node(partial([(1, ChildMask::Whole), (2, ChildMask::Whole)]))),
            (3, ChildMask::Whole),
        ]);
        assert_eq!(left.merge(right), expected);
    }

    #[test]
    fn whole_child_absorbs_entries() {
        let entries = ChildMask::Entries(BTreeMap::from([(0, Mask::Full)]));
        assert_eq!(entries.merge(ChildMask::Whole), ChildMask::Whole);
    }

    #[test]
    fn list_entries_union_by_position() {
        let left = ChildMask::Entries(BTreeMap::from([(0, Mask::Full)]));
        let right = ChildMask::Entries(BTreeMap::from([(0, Mask::Partial(BTreeMap::new())), (2, Mask::Full)]));
        assert_eq!(left.merge(right), ChildMask::Entries(BTreeMap::from([(0, Mask::Full), (2, Mask::Full)])));
    }
}
