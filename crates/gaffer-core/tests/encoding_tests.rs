//! Tests for the JSON documents produced by the operation model.

use gaffer_core::{
    EdgeSeed, Encode, EntitySeed, GetAllElements, GetElements, GetWalks, GroupRef, Groups,
    IncludeIncomingOutgoing, Limit, Operation, OperationChain, Payload, ViewGroup, class,
};
use serde_json::{Value, json};

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn test_view_group_encodes_exactly_one_key() {
    for (name, props) in [("a", vec!["x"]), ("person", vec!["age", "name"]), ("e", vec![])] {
        let encoded = ViewGroup::new(name).exclude(props.clone()).encode();
        assert_eq!(keys(&encoded), vec![name]);
        assert_eq!(encoded, json!({ name: { "excludeProperties": props } }));
    }
}

#[test]
fn test_bare_group_name_encodes_empty_definition() {
    for name in ["a", "person", "knows"] {
        let op = GetAllElements::new().entities([name]);
        assert_eq!(op.encode()["view"]["entities"], json!({ name: {} }));
    }
}

#[test]
fn test_duplicate_group_later_entry_wins_entirely() {
    let op = GetAllElements::new().edges(Groups::only([
        GroupRef::from("knows"),
        GroupRef::from(ViewGroup::new("knows").exclude(["since"])),
    ]));
    assert_eq!(
        op.encode()["view"]["edges"],
        json!({"knows": {"excludeProperties": ["since"]}})
    );

    let op = GetAllElements::new().edges(Groups::only([
        GroupRef::from(ViewGroup::new("knows").exclude(["since"])),
        GroupRef::from(ViewGroup::new("knows").exclude(["weight"])),
    ]));
    assert_eq!(
        op.encode()["view"]["edges"],
        json!({"knows": {"excludeProperties": ["weight"]}})
    );
}

#[test]
fn test_get_elements_round_trip_shape() {
    let op = GetElements::new()
        .entities(["a", "b"])
        .edges(Groups::All)
        .include(IncludeIncomingOutgoing::Outgoing)
        .input([EntitySeed::new("v1")]);

    let encoded = op.encode();
    assert_eq!(encoded["class"], class::GET_ELEMENTS);
    assert_eq!(encoded["view"]["entities"], json!({"a": {}, "b": {}}));
    assert_eq!(encoded["view"]["edges"], json!({}));
    assert_eq!(encoded["includeIncomingOutGoing"], "OUTGOING");
    assert_eq!(
        encoded["input"],
        json!([{"class": class::ENTITY_SEED, "vertex": "v1"}])
    );
}

#[test]
fn test_selection_three_way_distinction() {
    let all = GetAllElements::new().entities(Groups::All).encode();
    let some = GetAllElements::new().entities(["a"]).encode();
    let none = GetAllElements::new().entities(Groups::Excluded).encode();

    assert_eq!(all["view"]["entities"], json!({}));
    assert_eq!(some["view"]["entities"], json!({"a": {}}));
    assert!(none["view"].get("entities").is_none());
    assert_eq!(none["view"]["edges"], json!({}));
}

#[test]
fn test_chain_of_get_all_and_limit() {
    let chain = OperationChain::new([
        Operation::from(GetAllElements::new()),
        Operation::from(Limit::new(5)),
    ]);
    let encoded = chain.encode();

    assert_eq!(encoded["class"], class::OPERATION_CHAIN);
    let ops = encoded["operations"].as_array().expect("operations array");
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0], GetAllElements::new().encode());
    assert_eq!(ops[1], json!({"class": class::LIMIT, "resultLimit": 5}));
}

#[test]
fn test_walk_of_chains() {
    let hop = |group: &str| {
        let get = GetElements::new()
            .entities(Groups::Excluded)
            .edges([group])
            .include(IncludeIncomingOutgoing::Outgoing);
        Operation::from(OperationChain::new([Operation::from(get)]))
    };
    let walk = GetWalks::new([hop("knows"), hop("works_with")]).limit(100);
    let chain = OperationChain::default()
        .push(walk)
        .push(Limit::new(10));

    let encoded = chain.encode();
    let walk = &encoded["operations"][0];
    assert_eq!(walk["class"], class::GET_WALKS);
    assert_eq!(walk["resultsLimit"], 100);
    assert_eq!(
        walk["operations"][1]["operations"][0]["view"],
        json!({"edges": {"works_with": {}}})
    );
}

#[test]
fn test_edge_seed_input() {
    let op = GetElements::for_seeds([EdgeSeed::new("a", "b")]);
    assert_eq!(
        op.encode()["input"][0],
        json!({"class": class::EDGE_SEED, "source": "a", "destination": "b"})
    );
}

#[test]
fn test_groups_from_untyped_json() {
    let entities = Groups::try_from(json!(["person", {"place": {"excludeProperties": ["x"]}}]))
        .expect("valid groups");
    let op = GetAllElements::new().entities(entities).edges(
        Groups::try_from(Value::Null).expect("null excludes"),
    );
    assert_eq!(
        op.encode()["view"],
        json!({"entities": {"person": {}, "place": {"excludeProperties": ["x"]}}})
    );

    let err = Groups::try_from(json!([true])).unwrap_err();
    assert!(err.to_string().contains("true"));
}

#[test]
fn test_payload_variants() {
    let raw = json!({"class": "uk.gov.gchq.gaffer.operation.impl.get.GetAllElements"});
    assert_eq!(Payload::from(raw.clone()).to_json(), raw);
    assert_eq!(
        Payload::from(GetAllElements::new()).to_json(),
        GetAllElements::new().encode()
    );
}
