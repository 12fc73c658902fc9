//! XML form of subtree filters.
//!
//! [`read_filter`] consumes a `<filter type="subtree">` element from a
//! namespace-aware [`quick_xml::reader::NsReader`]; [`write_filter`] emits the
//! same shape through a [`quick_xml::Writer`]. Both operate on a caller-owned
//! cursor and keep no reference to it after returning.

mod pretty;
mod reader;
mod writer;

pub use pretty::pretty_tree;
pub use reader::{read_filter, read_filter_with};
pub use writer::{write_filter, write_filter_with};

use crate::error::{ParseError, WriteError};
use crate::filter::SubtreeFilter;
use netconf_datatree::ValueContext;
use quick_xml::reader::NsReader;
use std::fmt;

/// Limits applied while reading filter XML.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    max_depth: usize,
}

impl ReadOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Maximum nesting below the `<filter>` element.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { max_depth: Self::DEFAULT_MAX_DEPTH }
    }
}

/// Layout of written filter XML. The default is compact output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    indent: Option<usize>,
}

impl WriteOptions {
    /// Indents nested elements by `width` spaces per level.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }
}

impl SubtreeFilter {
    /// Parses a filter from an XML document holding one `<filter>` element.
    pub fn from_xml(context: ValueContext, xml: &str) -> Result<Self, ParseError> {
        let mut reader = NsReader::from_str(xml);
        read_filter(context, &mut reader)
    }

    pub fn to_xml_string(&self) -> Result<String, WriteError> {
        self.to_xml_string_with(&WriteOptions::default())
    }

    pub fn to_xml_string_with(&self, options: &WriteOptions) -> Result<String, WriteError> {
        let mut writer = quick_xml::Writer::new(Vec::new());
        write_filter_with(self, &mut writer, options)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    pub fn pretty_tree(&self) -> String {
        pretty_tree(self)
    }
}

impl fmt::Display for SubtreeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_tree(self))
    }
}
