//! Errors raised while reading or writing filter XML.
//!
//! Matching never fails: a missing node or a failed predicate is an empty
//! result, not an error. Only malformed filter XML and I/O failures of the
//! underlying writer are reported here.

use netconf_datatree::ValueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The input ended before any element was found.
    #[error("no <filter> element found")]
    MissingFilter,

    #[error("expected <filter> element, found <{element}>")]
    UnexpectedRoot { element: String },

    #[error("unsupported filter type '{found}', only 'subtree' is supported")]
    UnsupportedFilterType { found: String },

    #[error("unknown namespace prefix '{prefix}' on <{element}>")]
    UnknownPrefix { element: String, prefix: String },

    /// Character data next to child elements.
    #[error("<{element}> mixes text with child elements")]
    MixedContent { element: String },

    /// Attributes are only meaningful on selection nodes.
    #[error("unexpected attribute '{attribute}' on <{element}>")]
    UnexpectedAttribute { element: String, attribute: String },

    #[error("attribute '{attribute}' on <{element}> has no namespace")]
    UnqualifiedAttribute { element: String, attribute: String },

    #[error("input ended inside <{element}>")]
    Unterminated { element: String },

    #[error("<{element}> exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { element: String, max_depth: usize },

    #[error("invalid value for <{element}>: {source}")]
    InvalidValue {
        element: String,
        #[source]
        source: ValueError,
    },

    #[error("malformed attribute on <{element}>: {source}")]
    Attribute {
        element: String,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("malformed escape sequence in <{element}>: {source}")]
    Escape {
        element: String,
        #[source]
        source: quick_xml::escape::EscapeError,
    },

    #[error("element or text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write filter XML: {0}")]
    Io(#[from] std::io::Error),
}
