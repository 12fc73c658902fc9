use criterion as _;
use netconf_datatree::{
    DataChild, DataNode, LeafTypes, ScalarKind, Untyped, Value, ValueContext, container, leaf, list,
};
use netconf_subtree::{
    AttributeMatch, ContainmentNode, ContentMatchNode, NamespaceSelection, SelectionNode, SiblingSet, SubtreeFilter,
};
use quick_xml as _;
use rstest::{fixture, rstest};
use std::sync::Arc;
use thiserror as _;
use tracing as _;

const NS: &str = "urn:example:people";
const NS_A: &str = "urn:example:a";
const NS_B: &str = "urn:example:b";

fn exact(name: &str) -> NamespaceSelection {
    NamespaceSelection::exact(NS, name)
}

fn untyped() -> ValueContext {
    Arc::new(Untyped)
}

#[fixture]
fn person() -> DataNode {
    container((NS, "person")).child(leaf((NS, "name"), "Althea")).child(leaf((NS, "age"), 30u8)).build()
}

#[fixture]
fn entries() -> DataNode {
    let entry = |key: &str, value: &str| {
        container((NS, "list-entry")).child(leaf((NS, "key"), key)).child(leaf((NS, "value"), value))
    };
    container((NS, "root")).child(list((NS, "list-entry")).entry(entry("K1", "V1")).entry(entry("K2", "V2"))).build()
}

#[rstest]
fn selection_keeps_only_selected_leaf(person: DataNode) {
    let filter = SubtreeFilter::builder(untyped()).add(SelectionNode::new(exact("name"))).build();

    let expected = container((NS, "person")).child(leaf((NS, "name"), "Althea")).build();
    assert_eq!(filter.matcher(&person).result(), Some(expected));
}

#[rstest]
fn content_match_selects_one_list_entry(entries: DataNode) {
    let filter = SubtreeFilter::builder(untyped())
        .add(
            ContainmentNode::builder(exact("list-entry"))
                .add(ContentMatchNode::new(exact("key"), "K2"))
                .add(SelectionNode::new(exact("value"))),
        )
        .build();

    let expected = container((NS, "root"))
        .child(list((NS, "list-entry")).entry(container((NS, "list-entry")).child(leaf((NS, "value"), "V2"))))
        .build();
    assert_eq!(filter.matcher(&entries).result(), Some(expected));
}

#[test]
fn wildcard_matches_across_namespaces() {
    let data = container((NS, "interfaces"))
        .child(leaf((NS_B, "if-name"), "eth1"))
        .child(leaf((NS_A, "if-name"), "eth0"))
        .child(leaf((NS_A, "mtu"), 1500u16))
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(SelectionNode::new(NamespaceSelection::wildcard("if-name")))
        .build();

    let result = filter.matcher(&data).result().expect("wildcard selects both leaves");
    let names: Vec<String> = result.children().iter().map(|child| child.name().to_string()).collect();
    assert_eq!(names, ["{urn:example:a}if-name", "{urn:example:b}if-name"]);
}

#[rstest]
fn failed_content_match_drops_the_whole_list(entries: DataNode) {
    let filter = SubtreeFilter::builder(untyped())
        .add(
            ContainmentNode::builder(exact("list-entry"))
                .add(ContentMatchNode::new(exact("key"), "K3"))
                .add(SelectionNode::new(exact("value"))),
        )
        .build();

    let matcher = filter.matcher(&entries);
    assert!(!matcher.matches());
    assert_eq!(matcher.result(), None);
}

#[rstest]
fn content_match_only_selects_node_in_full(entries: DataNode) {
    let filter = SubtreeFilter::builder(untyped())
        .add(ContainmentNode::builder(exact("list-entry")).add(ContentMatchNode::new(exact("key"), "K1")))
        .build();

    let result = filter.matcher(&entries).result().expect("K1 matches");
    let DataChild::List(selected) = &result.children()[0] else { panic!("expected a list") };
    assert_eq!(selected.entries().len(), 1);
    assert_eq!(selected.entries()[0].children().len(), 2);
    assert_eq!(selected.entries()[0].leaf(&(NS, "value").into()), Some(&Value::from("V1")));
}

#[rstest]
fn content_match_against_container_does_not_match(person: DataNode) {
    let data = container((NS, "top")).child(person).build();
    let filter = SubtreeFilter::builder(untyped()).add(ContentMatchNode::new(exact("person"), "Althea")).build();

    assert!(!filter.matcher(&data).matches());
}

#[rstest]
fn containment_against_leaf_does_not_match(person: DataNode) {
    let filter = SubtreeFilter::builder(untyped())
        .add(ContainmentNode::builder(exact("name")).add(SelectionNode::new(exact("first"))))
        .build();

    assert!(!filter.matcher(&person).matches());
}

#[rstest]
fn empty_filter_selects_nothing(person: DataNode) {
    let filter = SubtreeFilter::builder(untyped()).build();

    let matcher = filter.matcher(&person);
    assert!(!matcher.matches());
    assert_eq!(matcher.result(), None);
}

#[test]
fn empty_containment_is_an_existence_test() {
    let data = container((NS, "top"))
        .child(container((NS, "config")).child(leaf((NS, "hostname"), "r1")))
        .child(leaf((NS, "uptime"), 42u32))
        .build();
    let filter = SubtreeFilter::builder(untyped()).add(ContainmentNode::builder(exact("config"))).build();

    let expected = container((NS, "top")).child(container((NS, "config"))).build();
    assert_eq!(filter.matcher(&data).result(), Some(expected));
}

#[test]
fn key_attribute_selects_list_entries() {
    let interface = |name: &str, mtu: u16| {
        container((NS, "interface")).child(leaf((NS, "ifName"), name)).child(leaf((NS, "mtu"), mtu))
    };
    let data = container((NS, "top"))
        .child(list((NS, "interface")).entry(interface("eth0", 1500)).entry(interface("eth1", 9000)))
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(SelectionNode::builder(exact("interface")).add(AttributeMatch::new(exact("ifName"), "eth1")))
        .build();

    let expected = container((NS, "top")).child(list((NS, "interface")).entry(interface("eth1", 9000))).build();
    assert_eq!(filter.matcher(&data).result(), Some(expected));
}

#[test]
fn attribute_match_falls_back_to_metadata() {
    let data = container((NS, "top"))
        .child(
            list((NS, "route"))
                .entry(container((NS, "route")).attribute((NS, "origin"), "static").child(leaf((NS, "prefix"), "10.0.0.0/8")))
                .entry(container((NS, "route")).attribute((NS, "origin"), "learned").child(leaf((NS, "prefix"), "0.0.0.0/0"))),
        )
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(SelectionNode::builder(exact("route")).add(AttributeMatch::new(exact("origin"), "static")))
        .build();

    let result = filter.matcher(&data).result().expect("static route selected");
    let routes = result.list(&(NS, "route").into()).expect("route list kept");
    assert_eq!(routes.entries().len(), 1);
    assert_eq!(routes.entries()[0].attribute(&(NS, "origin").into()), Some(&Value::from("static")));
}

#[test]
fn typed_values_compare_canonically() {
    let context = LeafTypes::builder()
        .leaf((NS, "mtu"), ScalarKind::Uint16)
        .leaf((NS, "ratio"), ScalarKind::Decimal)
        .build()
        .into_context();
    let data = container((NS, "link")).child(leaf((NS, "mtu"), 1500u16)).child(leaf((NS, "ratio"), "0.50")).build();

    let by_ratio = SubtreeFilter::from_xml(
        context.clone(),
        r#"<filter><ratio xmlns="urn:example:people">0.5</ratio></filter>"#,
    )
    .expect("valid filter");
    assert!(by_ratio.matcher(&data).matches());

    let by_mtu = SubtreeFilter::from_xml(context, r#"<filter><mtu xmlns="urn:example:people">01500</mtu></filter>"#)
        .expect("valid filter");
    assert!(by_mtu.matcher(&data).matches());
}

#[test]
fn overlapping_siblings_union_their_results() {
    let data = container((NS, "top"))
        .child(
            container((NS, "system"))
                .attribute((NS, "revision"), 3u32)
                .child(leaf((NS, "hostname"), "r1"))
                .child(leaf((NS, "domain"), "example.net"))
                .child(leaf((NS, "location"), "lab")),
        )
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(ContainmentNode::builder(exact("system")).add(SelectionNode::new(exact("location"))))
        .add(ContainmentNode::builder(NamespaceSelection::wildcard("system")).add(SelectionNode::new(exact("hostname"))))
        .build();

    let expected = container((NS, "top"))
        .child(
            container((NS, "system"))
                .attribute((NS, "revision"), 3u32)
                .child(leaf((NS, "hostname"), "r1"))
                .child(leaf((NS, "location"), "lab")),
        )
        .build();
    assert_eq!(filter.matcher(&data).result(), Some(expected));
}

#[test]
fn full_selection_absorbs_partial_one() {
    let data = container((NS, "top"))
        .child(container((NS, "system")).child(leaf((NS, "hostname"), "r1")).child(leaf((NS, "domain"), "example.net")))
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(SelectionNode::new(exact("system")))
        .add(ContainmentNode::builder(exact("system")).add(SelectionNode::new(exact("hostname"))))
        .build();

    assert_eq!(filter.matcher(&data).result(), Some(data));
}

#[test]
fn result_children_follow_canonical_order() {
    let data = container((NS, "top"))
        .child(leaf((NS_B, "zeta"), 1u8))
        .child(leaf("plain", 2u8))
        .child(leaf((NS_A, "alpha"), 3u8))
        .child(leaf((NS_A, "beta"), 4u8))
        .build();
    let filter = SubtreeFilter::builder(untyped())
        .add(SelectionNode::new(NamespaceSelection::wildcard("zeta")))
        .add(SelectionNode::new(NamespaceSelection::wildcard("plain")))
        .add(SelectionNode::new(NamespaceSelection::wildcard("beta")))
        .add(SelectionNode::new(NamespaceSelection::wildcard("alpha")))
        .build();

    let result = filter.matcher(&data).result().expect("all leaves selected");
    let names: Vec<String> = result.children().iter().map(|child| child.name().to_string()).collect();
    assert_eq!(names, ["plain", "{urn:example:a}alpha", "{urn:example:a}beta", "{urn:example:b}zeta"]);
}

#[rstest]
fn matching_is_repeatable_across_threads(entries: DataNode) {
    let filter = SubtreeFilter::builder(untyped())
        .add(
            ContainmentNode::builder(exact("list-entry"))
                .add(ContentMatchNode::new(exact("key"), "K1"))
                .add(SelectionNode::new(exact("value"))),
        )
        .build();
    let expected = filter.matcher(&entries).result();
    assert!(expected.is_some());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| filter.matcher(&entries).result())).collect();
        for handle in handles {
            assert_eq!(handle.join().expect("matcher thread panicked"), expected);
        }
    });
    assert_eq!(filter.len(), 1);
}
