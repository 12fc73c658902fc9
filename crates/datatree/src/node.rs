//! Hierarchical data tree consumed by the subtree matcher.
//!
//! The model is closed: a [`DataNode`] is a container whose
//! children are leaves, nested containers, or keyed lists of containers.
//!
//! ```
//! use netconf_datatree::{container, leaf, list, DataChild, Value};
//!
//! // <top><interfaces><interface><name>eth0</name><mtu>1500</mtu></interface></interfaces></top>
//! let top = container(("urn:example", "top"))
//!     .child(
//!         container(("urn:example", "interfaces")).child(
//!             list(("urn:example", "interface")).entry(
//!                 container(("urn:example", "interface"))
//!                     .child(leaf(("urn:example", "name"), "eth0"))
//!                     .child(leaf(("urn:example", "mtu"), 1500u16)),
//!             ),
//!         ),
//!     )
//!     .build();
//!
//! let DataChild::Container(interfaces) = &top.children()[0] else { unreachable!() };
//! assert_eq!(interfaces.name().local, "interfaces");
//! ```

use crate::name::QName;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    name: QName,
    value: Value,
}

impl LeafNode {
    pub fn new(name: impl Into<QName>, value: impl Into<Value>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Ordered collection of entries sharing one name (a YANG list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    name: QName,
    entries: Vec<DataNode>,
}

impl ListNode {
    /// # Panics
    /// If an entry is not named like the list.
    pub fn new(name: impl Into<QName>, entries: Vec<DataNode>) -> Self {
        let name = name.into();
        for entry in &entries {
            assert!(entry.name == name, "list entry {} does not belong to list {name}", entry.name);
        }
        Self { name, entries }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn entries(&self) -> &[DataNode] {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataChild {
    Leaf(LeafNode),
    Container(DataNode),
    List(ListNode),
}

impl DataChild {
    pub fn name(&self) -> &QName {
        match self {
            DataChild::Leaf(leaf) => leaf.name(),
            DataChild::Container(node) => node.name(),
            DataChild::List(list) => list.name(),
        }
    }
}

impl From<LeafNode> for DataChild {
    fn from(leaf: LeafNode) -> Self {
        DataChild::Leaf(leaf)
    }
}

impl From<DataNode> for DataChild {
    fn from(node: DataNode) -> Self {
        DataChild::Container(node)
    }
}

impl From<ListNode> for DataChild {
    fn from(list: ListNode) -> Self {
        DataChild::List(list)
    }
}

impl From<DataNodeBuilder> for DataChild {
    fn from(builder: DataNodeBuilder) -> Self {
        DataChild::Container(builder.build())
    }
}

impl From<ListNodeBuilder> for DataChild {
    fn from(builder: ListNodeBuilder) -> Self {
        DataChild::List(builder.build())
    }
}

/// A container node: a name, metadata attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataNode {
    name: QName,
    attributes: Vec<(QName, Value)>,
    children: Vec<DataChild>,
}

impl DataNode {
    pub fn builder(name: impl Into<QName>) -> DataNodeBuilder {
        DataNodeBuilder {
            node: DataNode { name: name.into(), attributes: Vec::new(), children: Vec::new() },
        }
    }

    /// Assembles a node from parts; used when deriving pruned copies.
    pub fn from_parts(name: QName, attributes: Vec<(QName, Value)>, children: Vec<DataChild>) -> Self {
        Self { name, attributes, children }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn attributes(&self) -> &[(QName, Value)] {
        &self.attributes
    }

    pub fn children(&self) -> &[DataChild] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn attribute(&self, name: &QName) -> Option<&Value> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// First leaf child named `name`.
    pub fn leaf(&self, name: &QName) -> Option<&Value> {
        self.children.iter().find_map(|child| match child {
            DataChild::Leaf(leaf) if leaf.name() == name => Some(leaf.value()),
            _ => None,
        })
    }

    /// First container child named `name`.
    pub fn container(&self, name: &QName) -> Option<&DataNode> {
        self.children.iter().find_map(|child| match child {
            DataChild::Container(node) if node.name() == name => Some(node),
            _ => None,
        })
    }

    /// First list child named `name`.
    pub fn list(&self, name: &QName) -> Option<&ListNode> {
        self.children.iter().find_map(|child| match child {
            DataChild::List(list) if list.name() == name => Some(list),
            _ => None,
        })
    }
}

pub struct DataNodeBuilder {
    node: DataNode,
}

impl DataNodeBuilder {
    pub fn attribute(mut self, name: impl Into<QName>, value: impl Into<Value>) -> Self {
        self.node.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<DataChild>) -> Self {
        self.node.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DataChild>,
    {
        self.node.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> DataNode {
        self.node
    }
}

pub struct ListNodeBuilder {
    name: QName,
    entries: Vec<DataNode>,
}

impl ListNodeBuilder {
    pub fn entry(mut self, entry: impl Into<DataNode>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn build(self) -> ListNode {
        ListNode::new(self.name, self.entries)
    }
}

impl From<DataNodeBuilder> for DataNode {
    fn from(builder: DataNodeBuilder) -> Self {
        builder.build()
    }
}

// Convenience helpers for concise tree construction
pub fn container(name: impl Into<QName>) -> DataNodeBuilder {
    DataNode::builder(name)
}

pub fn leaf(name: impl Into<QName>, value: impl Into<Value>) -> LeafNode {
    LeafNode::new(name, value)
}

pub fn list(name: impl Into<QName>) -> ListNodeBuilder {
    ListNodeBuilder { name: name.into(), entries: Vec::new() }
}
