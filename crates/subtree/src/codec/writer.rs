use crate::error::WriteError;
use crate::filter::SubtreeFilter;
use crate::prefixes::PrefixTable;
use crate::selection::NamespaceSelection;
use crate::sibling::SiblingSet;
use netconf_datatree::Value;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use tracing::debug;

/// Writes `filter` as a `<filter type="subtree">` element.
///
/// Every namespace of the prefix table is declared on the root element.
/// Wildcard selections are written without a prefix and with `xmlns=""`. An I/O failure leaves
/// the writer in an undefined state and should end its use.
pub fn write_filter<W: Write>(filter: &SubtreeFilter, writer: &mut Writer<W>) -> Result<(), WriteError> {
    let prefixes = filter.prefixes();
    let mut root = BytesStart::new("filter");
    root.push_attribute(("type", "subtree"));
    for (namespace, prefix) in prefixes.iter() {
        root.push_attribute((format!("xmlns:{prefix}").as_str(), namespace));
    }

    if filter.is_empty() {
        writer.write_event(Event::Empty(root))?;
    } else {
        writer.write_event(Event::Start(root))?;
        write_siblings(filter, prefixes, writer)?;
        writer.write_event(Event::End(BytesEnd::new("filter")))?;
    }
    debug!(siblings = filter.len(), namespaces = prefixes.len(), "wrote subtree filter");
    Ok(())
}

/// Like [`write_filter`], indenting nested elements when `options` asks for it.
pub fn write_filter_with<W: Write>(
    filter: &SubtreeFilter,
    writer: &mut Writer<W>,
    options: &super::WriteOptions,
) -> Result<(), WriteError> {
    match options.indent() {
        Some(width) => {
            let mut indented = Writer::new_with_indent(writer.get_mut(), b' ', width);
            write_filter(filter, &mut indented)
        }
        None => write_filter(filter, writer),
    }
}

fn write_siblings<W: Write>(
    set: &impl SiblingSet,
    prefixes: &PrefixTable,
    writer: &mut Writer<W>,
) -> Result<(), WriteError> {
    for node in set.content_matches() {
        let name = qualified(node.selection(), prefixes);
        let unqualified_identity =
            matches!(node.value(), Value::IdentityRef(identity) if identity.namespace().is_none());
        let element = start(&name, node.selection().is_wildcard() || unqualified_identity);
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::new(&content_text(node.value(), prefixes))))?;
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }

    for node in set.selections() {
        let name = qualified(node.selection(), prefixes);
        let mut element = start(&name, node.selection().is_wildcard());
        for attribute in node.attribute_matches() {
            element.push_attribute((qualified(attribute.selection(), prefixes).as_str(), attribute.value()));
        }
        writer.write_event(Event::Empty(element))?;
    }

    for node in set.containments() {
        let name = qualified(node.selection(), prefixes);
        let element = start(&name, node.selection().is_wildcard());
        if node.is_empty() {
            writer.write_event(Event::Empty(element))?;
            continue;
        }
        writer.write_event(Event::Start(element))?;
        write_siblings(node, prefixes, writer)?;
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }
    Ok(())
}

/// Start tag named `name`. Elements in no namespace undeclare the default
/// namespace, which an enclosing RPC element would otherwise lend them.
fn start(name: &str, no_namespace: bool) -> BytesStart<'_> {
    let mut element = BytesStart::new(name);
    if no_namespace {
        element.push_attribute(("xmlns", ""));
    }
    element
}

pub(super) fn qualified(selection: &NamespaceSelection, prefixes: &PrefixTable) -> String {
    match selection.namespace().and_then(|ns| prefixes.prefix(ns)) {
        Some(prefix) => format!("{prefix}:{}", selection.name()),
        None => selection.name().to_owned(),
    }
}

/// Text content of a content match; identities are written `prefix:local`.
pub(super) fn content_text(value: &Value, prefixes: &PrefixTable) -> String {
    match value {
        Value::IdentityRef(identity) => match identity.namespace().and_then(|ns| prefixes.prefix(ns)) {
            Some(prefix) => format!("{prefix}:{}", identity.local_name()),
            None => identity.local_name().to_owned(),
        },
        other => other.to_string(),
    }
}
