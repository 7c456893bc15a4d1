//! Unit tests for tablewright-types

use test_case::test_case;

use crate::{
    AttributeDefinition, AttributeValue, IndexStatus, Item, KeySchemaElement, KeyType,
    Projection, ProjectionType, ProvisionedThroughput, ScalarType, StreamSpecification,
    StreamViewType, TableStatus, hash_element, range_element,
};

// ============================================================================
// Wire Shapes
// ============================================================================

#[test]
fn attribute_definition_uses_wire_names() {
    let def = AttributeDefinition::new("Id", ScalarType::String);
    let json = serde_json::to_value(&def).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"AttributeName": "Id", "AttributeType": "S"})
    );
}

#[test]
fn key_schema_element_uses_wire_names() {
    let json = serde_json::to_value(KeySchemaElement::range("Created")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"AttributeName": "Created", "KeyType": "RANGE"})
    );
}

#[test]
fn projection_omits_empty_non_key_attributes() {
    let json = serde_json::to_value(Projection::keys_only()).unwrap();
    assert_eq!(json, serde_json::json!({"ProjectionType": "KEYS_ONLY"}));

    let json = serde_json::to_value(Projection::include(vec!["a".into()])).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"ProjectionType": "INCLUDE", "NonKeyAttributes": ["a"]})
    );
}

#[test]
fn throughput_ignores_extra_describe_fields() {
    let json = r#"{
        "ReadCapacityUnits": 10,
        "WriteCapacityUnits": 4,
        "NumberOfDecreasesToday": 0
    }"#;
    let throughput: ProvisionedThroughput = serde_json::from_str(json).unwrap();
    assert_eq!(throughput, ProvisionedThroughput::new(10, 4));
}

#[test]
fn default_throughput_is_five_read_one_write() {
    assert_eq!(
        ProvisionedThroughput::default(),
        ProvisionedThroughput::new(5, 1)
    );
}

#[test_case("\"ACTIVE\"", TableStatus::Active; "active")]
#[test_case("\"CREATING\"", TableStatus::Creating; "creating")]
#[test_case("\"ARCHIVED\"", TableStatus::Unknown; "unmodelled status")]
fn table_status_parses(json: &str, expected: TableStatus) {
    let status: TableStatus = serde_json::from_str(json).unwrap();
    assert_eq!(status, expected);
}

#[test]
fn index_status_parses_backfill_states_as_unknown() {
    let status: IndexStatus = serde_json::from_str("\"BACKFILLING\"").unwrap();
    assert_eq!(status, IndexStatus::Unknown);
}

#[test]
fn stream_specification_wire_shape() {
    let spec = StreamSpecification::enabled(StreamViewType::NewImage);
    let json = serde_json::to_value(spec).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"StreamEnabled": true, "StreamViewType": "NEW_IMAGE"})
    );

    let disabled: StreamSpecification =
        serde_json::from_str(r#"{"StreamEnabled": false}"#).unwrap();
    assert_eq!(disabled, StreamSpecification::disabled());
}

// ============================================================================
// Key Schema Helpers
// ============================================================================

#[test]
fn key_schema_helpers_find_roles_regardless_of_position() {
    let schema = vec![KeySchemaElement::range("B"), KeySchemaElement::hash("A")];
    assert_eq!(hash_element(&schema).unwrap().attribute_name, "A");
    assert_eq!(range_element(&schema).unwrap().key_type, KeyType::Range);
    assert!(range_element(&schema[1..]).is_none());
}

#[test]
fn projection_type_displays_tag_spelling() {
    assert_eq!(ProjectionType::KeysOnly.to_string(), "keys_only");
    assert_eq!(ProjectionType::Include.to_string(), "include");
}

// ============================================================================
// Attribute Values
// ============================================================================

#[test]
fn attribute_values_use_tagged_json() {
    let mut item = Item::new();
    item.insert("id".into(), AttributeValue::s("abc"));
    item.insert("n".into(), AttributeValue::n(42));
    item.insert("raw".into(), AttributeValue::b(vec![0xde, 0xad]));
    item.insert("flag".into(), AttributeValue::Bool(true));

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "flag": {"BOOL": true},
            "id": {"S": "abc"},
            "n": {"N": "42"},
            "raw": {"B": "3q0="},
        })
    );

    let back: Item = serde_json::from_value(json).unwrap();
    assert_eq!(back, item);
}

#[test]
fn binary_sets_and_nested_maps_deserialize() {
    let json = r#"{"BS": ["AQI=", "Aw=="]}"#;
    let value: AttributeValue = serde_json::from_str(json).unwrap();
    assert_eq!(value, AttributeValue::Bs(vec![vec![1, 2], vec![3]]));

    let json = r#"{"M": {"inner": {"L": [{"N": "1"}, {"NULL": true}]}}}"#;
    let value: AttributeValue = serde_json::from_str(json).unwrap();
    let AttributeValue::M(map) = value else {
        panic!("expected map");
    };
    assert_eq!(
        map["inner"],
        AttributeValue::L(vec![AttributeValue::n(1), AttributeValue::Null(true)])
    );
}

#[test]
fn invalid_base64_binary_is_rejected() {
    let result: Result<AttributeValue, _> = serde_json::from_str(r#"{"B": "!!"}"#);
    assert!(result.is_err());
}

#[test_case(AttributeValue::s("x"), Some(ScalarType::String); "string")]
#[test_case(AttributeValue::n(1), Some(ScalarType::Number); "number")]
#[test_case(AttributeValue::b(vec![1]), Some(ScalarType::Binary); "binary")]
#[test_case(AttributeValue::Bool(false), None; "bool is not a key type")]
fn scalar_type_of_values(value: AttributeValue, expected: Option<ScalarType>) {
    assert_eq!(value.scalar_type(), expected);
}
