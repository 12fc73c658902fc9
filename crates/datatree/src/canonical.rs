//! Value canonicalization: bridging XML text and typed leaf values.
//!
//! Filters arrive as XML text while data trees carry typed values, so neither
//! side can be compared byte-for-byte. A [`ValueCanonicalizer`] knows the
//! schema kind of each leaf and brings both sides into the same form.

use crate::name::QName;
use crate::value::{ScalarKind, Value, ValueError};
use std::collections::HashMap;
use std::sync::Arc;

pub trait ValueCanonicalizer: core::fmt::Debug + Send + Sync {
    /// Schema kind of the leaf named `name`, if known.
    fn leaf_kind(&self, name: &QName) -> Option<ScalarKind>;

    /// Schema kind shared by every leaf with this local name, regardless of
    /// namespace. Used for wildcard selections.
    fn kind_by_local_name(&self, _local: &str) -> Option<ScalarKind> {
        None
    }

    /// Parses filter text for a leaf. Unknown leaves keep the text as a string.
    fn parse_text(&self, kind: Option<ScalarKind>, text: &str) -> Result<Value, ValueError> {
        match kind {
            Some(kind) => Value::parse(kind, text),
            None => Ok(Value::String(text.to_owned())),
        }
    }

    /// Brings `value` into the schema kind of leaf `name`. Values that cannot
    /// be represented in that kind are returned unchanged.
    fn canonicalize(&self, name: &QName, value: &Value) -> Value {
        match self.leaf_kind(name) {
            Some(kind) if kind != value.kind() => value.coerce(kind).unwrap_or_else(|_| value.clone()),
            _ => value.clone(),
        }
    }

    /// Compares a data leaf value with a filter value.
    fn values_equal(&self, name: &QName, data: &Value, filter: &Value) -> bool {
        let data = self.canonicalize(name, data);
        let filter = self.canonicalize(name, filter);
        if data.kind() == filter.kind() {
            data == filter
        } else {
            data.to_string() == filter.to_string()
        }
    }
}

/// Shared handle to a canonicalizer, held by filters for their whole lifetime.
pub type ValueContext = Arc<dyn ValueCanonicalizer>;

/// Canonicalizer without schema knowledge; values compare by lexical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untyped;

impl ValueCanonicalizer for Untyped {
    fn leaf_kind(&self, _name: &QName) -> Option<ScalarKind> {
        None
    }
}

/// Schema-backed canonicalizer mapping leaf names to their scalar kinds.
#[derive(Debug, Clone, Default)]
pub struct LeafTypes {
    kinds: HashMap<QName, ScalarKind>,
}

impl LeafTypes {
    pub fn builder() -> LeafTypesBuilder {
        LeafTypesBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn into_context(self) -> ValueContext {
        Arc::new(self)
    }
}

impl ValueCanonicalizer for LeafTypes {
    fn leaf_kind(&self, name: &QName) -> Option<ScalarKind> {
        self.kinds.get(name).copied()
    }

    fn kind_by_local_name(&self, local: &str) -> Option<ScalarKind> {
        let mut kinds = self.kinds.iter().filter(|(name, _)| name.local == local).map(|(_, kind)| *kind);
        let first = kinds.next()?;
        kinds.all(|kind| kind == first).then_some(first)
    }
}

#[derive(Debug, Default)]
pub struct LeafTypesBuilder {
    kinds: HashMap<QName, ScalarKind>,
}

impl LeafTypesBuilder {
    pub fn leaf(mut self, name: impl Into<QName>, kind: ScalarKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    pub fn build(self) -> LeafTypes {
        LeafTypes { kinds: self.kinds }
    }
}
