//! Schema derivation tests.

use tablewright_types::{
    AttributeDefinition, KeySchemaElement, KeyType, Projection, ProjectionType,
    ProvisionedThroughput, ScalarType, StreamSpecification, StreamViewType,
};
use test_case::test_case;

use super::*;
use crate::description::FieldDescriptor as Field;

fn derive(description: &TypeDescription) -> Result<DesiredSchema> {
    derive_schema(description, &SchemaOptions::default())
}

// ============================================================================
// Table keys
// ============================================================================

#[test]
fn hash_first_regardless_of_declaration_order() {
    let description = TypeDescription::new("Pairs")
        .field(Field::number("B").key("range"))
        .field(Field::string("A").key("hash"));

    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.key_schema,
        vec![KeySchemaElement::hash("A"), KeySchemaElement::range("B")]
    );
    // Attribute definitions follow walk order, not key order.
    assert_eq!(
        schema.attribute_definitions,
        vec![
            AttributeDefinition::new("B", ScalarType::Number),
            AttributeDefinition::new("A", ScalarType::String),
        ]
    );
}

#[test]
fn table_name_defaults_to_type_name() {
    let description = TypeDescription::new("Orders").field(Field::string("Id").key("hash"));
    let schema = derive(&description).unwrap();
    assert_eq!(schema.table_name, "Orders");
    assert_eq!(schema.provisioned_throughput, ProvisionedThroughput::new(5, 1));
    assert!(schema.global_indexes.is_empty());
    assert!(schema.local_indexes.is_empty());
    assert!(schema.stream_specification.is_none());
}

#[test]
fn options_override_name_and_throughput() {
    let description =
        TypeDescription::new("Orders").field(Field::string("Id").key("hash,50,20"));
    let options = SchemaOptions {
        table_name: Some("orders-prod".to_string()),
        throughput: Some(ProvisionedThroughput::new(7, 3)),
        stream: Some(StreamSpecification::enabled(StreamViewType::NewImage)),
    };

    let schema = derive_schema(&description, &options).unwrap();
    assert_eq!(schema.table_name, "orders-prod");
    assert_eq!(schema.provisioned_throughput, ProvisionedThroughput::new(7, 3));
    assert_eq!(
        schema.stream_specification,
        Some(StreamSpecification::enabled(StreamViewType::NewImage))
    );
}

#[test]
fn throughput_may_ride_on_range_key() {
    let description = TypeDescription::new("T")
        .field(Field::string("H").key("hash"))
        .field(Field::number("R").key("range,12,4"));
    let schema = derive(&description).unwrap();
    assert_eq!(schema.provisioned_throughput, ProvisionedThroughput::new(12, 4));
}

#[test]
fn missing_hash_key_is_rejected() {
    let description = TypeDescription::new("NoKey").field(Field::string("R").key("range"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::MissingHashKey {
            type_name: "NoKey".to_string()
        }
    );
}

#[test]
fn duplicate_hash_key_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("A").key("hash"))
        .field(Field::string("B").key("hash"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::DuplicateKeyRole {
            index: None,
            role: KeyType::Hash,
            first: "A".to_string(),
            second: "B".to_string(),
        }
    );
}

#[test]
fn multiple_throughput_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("A").key("hash,10,5"))
        .field(Field::number("B").key("range,1,1"));
    let err = derive(&description).unwrap_err();
    assert_eq!(err.to_string(), "B: multiple throughput specifications");
}

#[test]
fn multiple_throughput_detected_in_nested_fields() {
    let inner = TypeDescription::new("Inner").field(Field::number("Seq").key("range,3,3"));
    let description = TypeDescription::new("Outer")
        .field(Field::string("Id").key("hash,10,5"))
        .field(Field::composite("Meta", inner).optional());

    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::MultipleThroughput {
            field: "Meta.Seq".to_string()
        }
    );
}

#[test]
fn nested_key_uses_qualified_name() {
    let target = TypeDescription::new("Ref").field(Field::string("Id").codec("id").key("range"));
    let description = TypeDescription::new("Link")
        .field(Field::composite("Target", target).codec("target").optional())
        .field(Field::string("Owner").key("hash"));

    let schema = derive(&description).unwrap();
    assert_eq!(schema.key_attribute_names(), vec!["Owner", "target.id"]);
    assert_eq!(
        schema.attribute_definitions[0],
        AttributeDefinition::new("target.id", ScalarType::String)
    );
}

#[test]
fn key_on_non_scalar_field_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::new("At", FieldKind::Timestamp).key("range"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::KeyNotScalar {
            attribute: "At".to_string()
        }
    );
}

#[test]
fn unixtime_timestamp_can_be_a_key() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::new("At", FieldKind::Timestamp).codec(",unixtime").key("range"));
    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.attribute_definitions[1],
        AttributeDefinition::new("At", ScalarType::Number)
    );
}

#[test]
fn key_on_composite_is_rejected() {
    let nested = TypeDescription::new("Blob").field(Field::string("Part"));
    let description = TypeDescription::new("T").field(Field::composite("Blob", nested).key("hash"));
    assert!(matches!(
        derive(&description).unwrap_err(),
        ConfigError::KeyNotScalar { .. }
    ));
}

// ============================================================================
// Global indexes
// ============================================================================

#[test]
fn global_index_hash_and_range_with_capacity() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("A").global_index("Foo,hash,10,5"))
        .field(Field::number("B").global_index("Foo,range"));

    let schema = derive(&description).unwrap();
    let foo = schema.global_index("Foo").unwrap();
    assert_eq!(foo.provisioned_throughput, ProvisionedThroughput::new(10, 5));
    assert_eq!(
        foo.key_schema,
        vec![KeySchemaElement::hash("A"), KeySchemaElement::range("B")]
    );
    assert_eq!(foo.projection, Projection::all());
    assert_eq!(schema.index_key_attribute_names("Foo"), Some(vec!["A", "B"]));
}

#[test]
fn global_index_capacity_defaults() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("A").global_index("Foo,hash"));
    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.global_indexes[0].provisioned_throughput,
        ProvisionedThroughput::new(5, 1)
    );
}

#[test]
fn project_fields_default_to_include_in_declaration_order() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Name").global_index("Snafu,project"))
        .field(Field::string("K").global_index("Snafu,hash"))
        .field(Field::string("Color").global_index("Snafu,project"));

    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.global_indexes[0].projection,
        Projection::include(vec!["Name".to_string(), "Color".to_string()])
    );
}

#[test]
fn explicit_include_keeps_projected_fields() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Name").global_index("Snafu,project"))
        .field(Field::string("K").global_index("Snafu,hash,,,include"));

    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.global_indexes[0].projection,
        Projection::include(vec!["Name".to_string()])
    );
}

#[test]
fn include_without_projected_fields_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("K").global_index("Snafu,hash,,,include"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::IncludeWithoutFields {
            index: "Snafu".to_string()
        }
    );
}

#[test]
fn keys_only_then_project_conflicts() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("K").global_index("Bar,hash,,,keys_only"))
        .field(Field::string("Extra").global_index("Bar,project"));

    let err = derive(&description).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ProjectionConflict {
            field: "Extra".to_string(),
            index: "Bar".to_string(),
            declared: ProjectionType::KeysOnly,
        }
    );
    assert!(
        err.to_string()
            .contains("projection specified as keys_only but there are projected fields specified")
    );
}

#[test]
fn project_then_all_conflicts() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Extra").global_index("Bar,project"))
        .field(Field::string("K").global_index("Bar,hash,,,all"));

    assert!(matches!(
        derive(&description).unwrap_err(),
        ConfigError::ProjectionConflict {
            declared: ProjectionType::All,
            ..
        }
    ));
}

#[test]
fn global_index_without_hash_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("R").global_index("Orphan,range"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::IndexMissingHashKey {
            index: "Orphan".to_string()
        }
    );
}

#[test]
fn global_indexes_keep_first_declaration_order() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Z").global_index("Zeta,hash;Alpha,range"))
        .field(Field::string("A").global_index("Alpha,hash"))
        .field(Field::string("M").global_index("Mid,hash"));

    let names: Vec<_> = derive(&description)
        .unwrap()
        .global_indexes
        .into_iter()
        .map(|i| i.index_name)
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn index_keys_become_attribute_definitions() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Unindexed"))
        .field(Field::binary("Blob").global_index("ByBlob,hash"))
        .field(Field::string("Projected").global_index("ByBlob,project"));

    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.attribute_definitions,
        vec![
            AttributeDefinition::new("Id", ScalarType::String),
            AttributeDefinition::new("Blob", ScalarType::Binary),
        ]
    );
}

#[test]
fn shared_attribute_is_defined_once() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash").global_index("Inverted,range"))
        .field(Field::string("Other").global_index("Inverted,hash"));

    let schema = derive(&description).unwrap();
    assert_eq!(schema.attribute_definitions.len(), 2);
}

// ============================================================================
// Local indexes
// ============================================================================

#[test]
fn local_index_copies_table_hash() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::number("Seq").key("range"))
        .field(Field::number("Created").local_index("ByCreated,range,keys_only"));

    let schema = derive(&description).unwrap();
    let lsi = &schema.local_indexes[0];
    assert_eq!(
        lsi.key_schema,
        vec![KeySchemaElement::hash("Id"), KeySchemaElement::range("Created")]
    );
    assert_eq!(lsi.projection, Projection::keys_only());
    assert!(schema.has_index("ByCreated"));
    assert_eq!(
        schema.index_key_attribute_names("ByCreated"),
        Some(vec!["Id", "Created"])
    );
}

#[test]
fn local_index_without_range_is_rejected() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("Note").local_index("ByNote,project"));
    assert_eq!(
        derive(&description).unwrap_err(),
        ConfigError::IndexMissingRangeKey {
            index: "ByNote".to_string()
        }
    );
}

#[test]
fn local_index_project_fields() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::number("Created").local_index("ByCreated,range"))
        .field(Field::string("Title").local_index("ByCreated,project"));

    let schema = derive(&description).unwrap();
    assert_eq!(
        schema.local_indexes[0].projection,
        Projection::include(vec!["Title".to_string()])
    );
}

// ============================================================================
// Grammar errors surface through derivation
// ============================================================================

#[test_case(Field::string("X").key("hash,0,1"); "zero capacity")]
#[test_case(Field::string("X").key("primary"); "unknown key role")]
#[test_case(Field::string("X").key("hash,1,1,1"); "too many key arguments")]
#[test_case(Field::string("X").key("hash").global_index("I,hash,1,1,everything"); "unknown projection")]
#[test_case(Field::string("X").key("hash").global_index("I,project,1"); "arguments on project")]
#[test_case(Field::string("X").key("hash").local_index("I,project,all"); "arguments on local project")]
#[test_case(Field::string("X").key("hash").global_index(",hash"); "missing index name")]
fn malformed_tags_fail(field: Field) {
    let description = TypeDescription::new("T").field(field);
    assert!(derive(&description).is_err());
}

#[test]
fn schema_serializes_with_wire_names() {
    let description = TypeDescription::new("T")
        .field(Field::string("Id").key("hash"))
        .field(Field::string("A").global_index("ByA,hash"));
    let json = serde_json::to_value(derive(&description).unwrap()).unwrap();
    assert_eq!(json["key_schema"][0]["AttributeName"], "Id");
    assert_eq!(json["global_indexes"][0]["IndexName"], "ByA");
    assert!(json.get("local_indexes").is_none());
}
