//! RFC 6241 subtree filtering.
//!
//! A [`SubtreeFilter`] is a small declarative tree of selection, content-match
//! and containment nodes. Filters are built with builders or parsed from XML,
//! matched against a [`netconf_datatree::DataNode`] to obtain a pruned copy,
//! and written back to XML with a deterministic namespace-prefix assignment.
//!
//! ```
//! use netconf_datatree::{container, leaf, list, Untyped};
//! use netconf_subtree::SubtreeFilter;
//! use std::sync::Arc;
//!
//! let filter = SubtreeFilter::from_xml(
//!     Arc::new(Untyped),
//!     r#"<filter type="subtree">
//!          <users xmlns="urn:example:users">
//!            <user><name>fred</name><type/></user>
//!          </users>
//!        </filter>"#,
//! )
//! .unwrap();
//!
//! let ns = "urn:example:users";
//! let user = |name: &str, kind: &str| {
//!     container((ns, "user")).child(leaf((ns, "name"), name)).child(leaf((ns, "type"), kind))
//! };
//! let data = container((ns, "top"))
//!     .child(container((ns, "users")).child(list((ns, "user")).entry(user("root", "superuser")).entry(user("fred", "admin"))))
//!     .build();
//!
//! let result = filter.matcher(&data).result().unwrap();
//! let users = result.container(&(ns, "users").into()).unwrap();
//! let fred = &users.list(&(ns, "user").into()).unwrap().entries()[0];
//! assert_eq!(fred.leaf(&(ns, "type").into()).map(ToString::to_string).as_deref(), Some("admin"));
//! assert!(fred.leaf(&(ns, "name").into()).is_none());
//! ```

pub mod builder;
pub mod codec;
pub mod error;
pub mod event;
pub mod filter;
pub mod matcher;
pub mod prefixes;
pub mod selection;
pub mod sibling;

#[cfg(test)]
use criterion as _;

pub use builder::{SiblingSetBuilder, Siblings};
pub use codec::{ReadOptions, WriteOptions, pretty_tree, read_filter, read_filter_with, write_filter, write_filter_with};
pub use error::{ParseError, WriteError};
pub use event::{EventStreamFilter, SubtreeEventStreamFilter};
pub use filter::{SubtreeFilter, SubtreeFilterBuilder};
pub use matcher::SubtreeMatcher;
pub use prefixes::PrefixTable;
pub use selection::NamespaceSelection;
pub use sibling::{
    AttributeMatch, ContainmentNode, ContainmentNodeBuilder, ContentMatchNode, SelectionNode, SelectionNodeBuilder,
    Sibling, SiblingSet,
};
