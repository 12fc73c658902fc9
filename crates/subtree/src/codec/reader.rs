use super::ReadOptions;
use crate::builder::SiblingSetBuilder;
use crate::error::ParseError;
use crate::filter::SubtreeFilter;
use crate::selection::NamespaceSelection;
use crate::sibling::{AttributeMatch, ContainmentNode, ContentMatchNode, SelectionNode, Sibling, SiblingSet};
use netconf_datatree::{QName, ScalarKind, Value, ValueContext, ValueError};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName as XmlName, ResolveResult};
use quick_xml::reader::NsReader;
use std::io::BufRead;
use tracing::debug;

/// Reads a subtree filter with default [`ReadOptions`].
pub fn read_filter<R: BufRead>(context: ValueContext, reader: &mut NsReader<R>) -> Result<SubtreeFilter, ParseError> {
    read_filter_with(context, reader, &ReadOptions::default())
}

/// Reads a subtree filter from `reader`, which must be positioned before the
/// `<filter>` element. Declarations, comments and processing instructions in
/// front of it are skipped.
pub fn read_filter_with<R: BufRead>(
    context: ValueContext,
    reader: &mut NsReader<R>,
    options: &ReadOptions,
) -> Result<SubtreeFilter, ParseError> {
    let mut state = FilterReader { reader, context: &context, options, buf: Vec::new() };
    let siblings = state.read_root()?;
    let filter = SubtreeFilter::from_siblings(context, siblings.build());
    debug!(siblings = filter.len(), namespaces = filter.prefixes().len(), "parsed subtree filter");
    Ok(filter)
}

/// A start tag, detached from the read buffer.
struct ElementHead {
    raw_name: String,
    selection: NamespaceSelection,
    attributes: Vec<RawAttribute>,
}

struct RawAttribute {
    raw_name: String,
    namespace: Option<String>,
    local: String,
    value: String,
}

#[derive(Default)]
struct ElementBody {
    text: String,
    children: Vec<Sibling>,
}

struct FilterReader<'a, R> {
    reader: &'a mut NsReader<R>,
    context: &'a ValueContext,
    options: &'a ReadOptions,
    buf: Vec<u8>,
}

impl<R: BufRead> FilterReader<'_, R> {
    fn read_root(&mut self) -> Result<SiblingSetBuilder, ParseError> {
        loop {
            self.buf.clear();
            let (start, is_empty) = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => (e.into_owned(), false),
                Event::Empty(e) => (e.into_owned(), true),
                Event::Eof => return Err(ParseError::MissingFilter),
                _ => continue,
            };
            self.check_root(&start)?;
            if is_empty {
                return Ok(SiblingSetBuilder::new());
            }
            let body = self.read_body("filter", 1)?;
            if !body.text.trim().is_empty() {
                return Err(ParseError::MixedContent { element: "filter".to_owned() });
            }
            let mut builder = SiblingSetBuilder::new();
            for sibling in body.children {
                builder.push(sibling);
            }
            return Ok(builder);
        }
    }

    fn check_root(&self, start: &BytesStart<'_>) -> Result<(), ParseError> {
        let (_, local) = self.reader.resolver().resolve_element(start.name());
        let local = std::str::from_utf8(local.as_ref())?;
        if local != "filter" {
            return Err(ParseError::UnexpectedRoot { element: std::str::from_utf8(start.name().as_ref())?.to_owned() });
        }
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|source| ParseError::Attribute { element: "filter".to_owned(), source })?;
            if attribute.key.as_ref() == b"type" {
                let value = std::str::from_utf8(&attribute.value)?;
                if value.trim() != "subtree" {
                    return Err(ParseError::UnsupportedFilterType { found: value.to_owned() });
                }
            }
        }
        Ok(())
    }

    /// Reads everything up to the end tag of `element`.
    fn read_body(&mut self, element: &str, depth: usize) -> Result<ElementBody, ParseError> {
        let mut body = ElementBody::default();
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    let start = e.into_owned();
                    let head = self.head(&start, depth)?;
                    let child = self.read_body(&head.raw_name, depth + 1)?;
                    body.children.push(self.classify(head, child)?);
                }
                Event::Empty(e) => {
                    let start = e.into_owned();
                    let head = self.head(&start, depth)?;
                    body.children.push(self.classify(head, ElementBody::default())?);
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e)?;
                    let text = unescape(raw).map_err(|source| ParseError::Escape { element: element.to_owned(), source })?;
                    body.text.push_str(&text);
                }
                Event::CData(e) => body.text.push_str(std::str::from_utf8(&e)?),
                Event::GeneralRef(e) => {
                    let reference = format!("&{};", std::str::from_utf8(&e)?);
                    let resolved =
                        unescape(&reference).map_err(|source| ParseError::Escape { element: element.to_owned(), source })?;
                    body.text.push_str(&resolved);
                }
                Event::End(_) => return Ok(body),
                Event::Eof => return Err(ParseError::Unterminated { element: element.to_owned() }),
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            }
        }
    }

    fn head(&self, start: &BytesStart<'_>, depth: usize) -> Result<ElementHead, ParseError> {
        let raw_name = std::str::from_utf8(start.name().as_ref())?.to_owned();
        if depth > self.options.max_depth() {
            return Err(ParseError::TooDeep { element: raw_name, max_depth: self.options.max_depth() });
        }

        let (ns, local) = self.reader.resolver().resolve_element(start.name());
        let local = std::str::from_utf8(local.as_ref())?;
        let selection = match ns {
            ResolveResult::Bound(ns) if !ns.as_ref().is_empty() => {
                NamespaceSelection::exact(std::str::from_utf8(ns.as_ref())?, local)
            }
            ResolveResult::Bound(_) | ResolveResult::Unbound => NamespaceSelection::wildcard(local),
            ResolveResult::Unknown(prefix) => {
                return Err(ParseError::UnknownPrefix {
                    prefix: String::from_utf8_lossy(&prefix).into_owned(),
                    element: raw_name,
                });
            }
        };

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute =
                attribute.map_err(|source| ParseError::Attribute { element: raw_name.clone(), source })?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let attr_raw = std::str::from_utf8(attribute.key.as_ref())?.to_owned();
            let (ns, attr_local) = self.reader.resolver().resolve_attribute(attribute.key);
            let namespace = match ns {
                ResolveResult::Bound(ns) => Some(std::str::from_utf8(ns.as_ref())?.to_owned()),
                ResolveResult::Unbound => None,
                ResolveResult::Unknown(prefix) => {
                    return Err(ParseError::UnknownPrefix {
                        prefix: String::from_utf8_lossy(&prefix).into_owned(),
                        element: raw_name,
                    });
                }
            };
            let raw_value = std::str::from_utf8(&attribute.value)?;
            let value = unescape(raw_value).map_err(|source| ParseError::Escape { element: raw_name.clone(), source })?;
            attributes.push(RawAttribute {
                raw_name: attr_raw,
                namespace,
                local: std::str::from_utf8(attr_local.as_ref())?.to_owned(),
                value: value.into_owned(),
            });
        }

        Ok(ElementHead { raw_name, selection, attributes })
    }

    /// Element children make a containment, text makes a content match and
    /// an empty element is a selection.
    fn classify(&self, head: ElementHead, body: ElementBody) -> Result<Sibling, ParseError> {
        let text = body.text.trim();

        if !body.children.is_empty() {
            if !text.is_empty() {
                return Err(ParseError::MixedContent { element: head.raw_name });
            }
            reject_attributes(&head)?;
            let mut containment = ContainmentNode::builder(head.selection);
            for child in body.children {
                containment.push(child);
            }
            return Ok(containment.build().into());
        }

        if !text.is_empty() {
            reject_attributes(&head)?;
            let kind = match &head.selection {
                NamespaceSelection::Exact { namespace, name } => {
                    self.context.leaf_kind(&QName::new(&**namespace, &**name))
                }
                NamespaceSelection::Wildcard { name } => self.context.kind_by_local_name(name),
            };
            let value = match kind {
                Some(ScalarKind::IdentityRef) => self.identity(&head.raw_name, text)?,
                _ => self
                    .context
                    .parse_text(kind, text)
                    .map_err(|source| ParseError::InvalidValue { element: head.raw_name.clone(), source })?,
            };
            return Ok(ContentMatchNode::new(head.selection, value).into());
        }

        let mut selection = SelectionNode::builder(head.selection.clone());
        for attribute in head.attributes {
            let namespace = match (attribute.namespace, head.selection.namespace()) {
                (Some(ns), _) => ns,
                (None, Some(element_ns)) => element_ns.to_owned(),
                (None, None) => {
                    return Err(ParseError::UnqualifiedAttribute {
                        element: head.raw_name,
                        attribute: attribute.raw_name,
                    });
                }
            };
            selection.push(AttributeMatch::new(NamespaceSelection::exact(namespace, attribute.local), attribute.value));
        }
        Ok(selection.build().into())
    }

    /// Resolves `prefix:identity` text against the bindings of `element`,
    /// which stay in scope until the next read after its end tag. Unprefixed
    /// text takes the default namespace.
    fn identity(&self, element: &str, text: &str) -> Result<Value, ParseError> {
        let invalid = || ParseError::InvalidValue {
            element: element.to_owned(),
            source: ValueError::Invalid { kind: ScalarKind::IdentityRef, text: text.to_owned() },
        };
        if text.contains(['{', '}']) || text.contains(char::is_whitespace) || text.matches(':').count() > 1 {
            return Err(invalid());
        }
        let (ns, local) = self.reader.resolver().resolve_element(XmlName(text.as_bytes()));
        let local = std::str::from_utf8(local.as_ref())?;
        if local.is_empty() {
            return Err(invalid());
        }
        let name = match ns {
            ResolveResult::Bound(ns) if !ns.as_ref().is_empty() => {
                QName::new(std::str::from_utf8(ns.as_ref())?, local)
            }
            ResolveResult::Bound(_) | ResolveResult::Unbound => QName::unqualified(local),
            ResolveResult::Unknown(prefix) => {
                return Err(ParseError::UnknownPrefix {
                    prefix: String::from_utf8_lossy(&prefix).into_owned(),
                    element: element.to_owned(),
                });
            }
        };
        Ok(Value::IdentityRef(name))
    }
}

fn reject_attributes(head: &ElementHead) -> Result<(), ParseError> {
    match head.attributes.first() {
        Some(attribute) => Err(ParseError::UnexpectedAttribute {
            element: head.raw_name.clone(),
            attribute: attribute.raw_name.clone(),
        }),
        None => Ok(()),
    }
}
