//! Typed hierarchical data for NETCONF subtree filtering.
//!
//! This crate provides the collaborators a subtree filter is evaluated
//! against: qualified names, typed scalar values, the value canonicalizer
//! that reconciles XML text with typed values, and an immutable data tree.

pub mod canonical;
pub mod name;
pub mod node;
pub mod value;

pub use canonical::{LeafTypes, LeafTypesBuilder, Untyped, ValueCanonicalizer, ValueContext};
pub use name::QName;
pub use node::{
    DataChild, DataNode, DataNodeBuilder, LeafNode, ListNode, ListNodeBuilder, container, leaf, list,
};
pub use value::{Decimal, ScalarKind, Value, ValueError};
