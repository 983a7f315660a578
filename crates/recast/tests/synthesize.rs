use pretty_assertions::assert_eq;
use recast::schema::{Field, Record, RecordKind, Type};
use recast::{FieldMapping, Origin, Registry, Value};

fn plain(name: &str, fields: Vec<Field>) -> Record {
    Record::new(name, RecordKind::Plain, fields)
}

#[test]
fn missing_required_source_field_is_unmappable() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain(
            "Target",
            vec![Field::new("x", Type::I64), Field::new("z", Type::String)],
        ))
        .unwrap();

    let err = registry.add_mapping(source, target).unwrap_err();
    assert!(err.is_unmappable_field());
    assert_eq!(
        err.to_string(),
        "mapping 'Source' to 'Target': unmappable field: required field 'z' of 'Target' \
         has no source field or override"
    );
}

#[test]
fn missing_defaulted_source_field_is_skipped() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain(
            "Target",
            vec![
                Field::new("x", Type::I64),
                Field::new("z", Type::String).with_default(Value::String("fallback".into())),
            ],
        ))
        .unwrap();

    let routine = registry.add_mapping(source, target).unwrap();

    let value = registry.record(source).build_instance([("x", Value::I64(1))]).unwrap();
    let mapped = registry.convert(routine, &value).unwrap();
    assert_eq!(mapped.values[1], Value::String("fallback".into()));
}

#[test]
fn incompatible_types_cannot_convert() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::String)]))
        .unwrap();

    let err = registry.add_mapping(source, target).unwrap_err();
    assert!(err.is_cannot_convert());
    assert_eq!(
        err.to_string(),
        "mapping 'Source' to 'Target': field 'x' of 'Source' cannot be converted to field 'x'"
    );
}

#[test]
fn nullable_source_into_required_non_nullable_target_fails() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain(
            "Source",
            vec![Field::new("x", Type::I64).nullable().with_default(Value::Null)],
        ))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::I64)]))
        .unwrap();

    let err = registry.add_mapping(source, target).unwrap_err();
    assert!(err.is_cannot_convert());
}

#[test]
fn nested_records_require_a_registered_routine() {
    let mut registry = Registry::new();
    let source_bar = registry
        .register(plain("SourceBar", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target_bar = registry
        .register(plain("TargetBar", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let source = registry
        .register(plain(
            "Source",
            vec![Field::new("bar", Type::Record(source_bar))],
        ))
        .unwrap();
    let target = registry
        .register(plain(
            "Target",
            vec![Field::new("bar", Type::Record(target_bar))],
        ))
        .unwrap();

    // No SourceBar -> TargetBar routine yet: synthesis must fail eagerly.
    let err = registry.add_mapping(source, target).unwrap_err();
    assert!(err.is_cannot_convert());

    registry.add_mapping(source_bar, target_bar).unwrap();
    assert!(registry.add_mapping(source, target).is_ok());
}

#[test]
fn use_default_on_required_field_is_rejected() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("id", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("id", Type::I64)]))
        .unwrap();

    let mut overrides = FieldMapping::new();
    overrides.insert("id".into(), Origin::UseDefault);

    let err = registry
        .add_mapping_with(source, target, &overrides)
        .unwrap_err();
    assert!(err.is_invalid_mapping());
    assert_eq!(
        err.to_string(),
        "mapping 'Source' to 'Target': invalid mapping: 'use default' applied to required \
         field 'id' of 'Target'"
    );
}

#[test]
fn override_naming_unknown_target_field_is_rejected() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::I64)]))
        .unwrap();

    let mut overrides = FieldMapping::new();
    overrides.insert("nope".into(), Origin::UseDefault);

    let err = registry
        .add_mapping_with(source, target, &overrides)
        .unwrap_err();
    assert!(err.is_invalid_mapping());
}

#[test]
fn override_naming_unknown_source_field_is_rejected() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::I64)]))
        .unwrap();

    let mut overrides = FieldMapping::new();
    overrides.insert("x".into(), Origin::field("y"));

    let err = registry
        .add_mapping_with(source, target, &overrides)
        .unwrap_err();
    assert!(err.is_invalid_mapping());
}

#[test]
fn register_rejects_duplicate_field_names() {
    let mut registry = Registry::new();
    let err = registry
        .register(plain(
            "Broken",
            vec![Field::new("x", Type::I64), Field::new("x", Type::String)],
        ))
        .unwrap_err();
    assert!(err.is_invalid_record());
    assert_eq!(
        err.to_string(),
        "invalid record: duplicate field name 'x' in 'Broken'"
    );
}

#[test]
fn register_rejects_required_and_default_disagreement() {
    let mut registry = Registry::new();

    let mut field = Field::new("x", Type::I64);
    field.required = false; // no default to back it up
    let err = registry.register(plain("Broken", vec![field])).unwrap_err();
    assert!(err.is_invalid_record());
}

#[test]
fn register_rejects_bad_defaults() {
    let mut registry = Registry::new();

    // Null default on a non-nullable field
    let err = registry
        .register(plain(
            "Broken",
            vec![Field::new("x", Type::I64).with_default(Value::Null)],
        ))
        .unwrap_err();
    assert!(err.is_invalid_record());

    // Default of the wrong type
    let err = registry
        .register(plain(
            "AlsoBroken",
            vec![Field::new("x", Type::I64).with_default(Value::String("seven".into()))],
        ))
        .unwrap_err();
    assert!(err.is_invalid_record());
}

#[test]
fn one_routine_per_pair() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::I64)]))
        .unwrap();

    let first = registry.add_mapping(source, target).unwrap();
    let second = registry.add_mapping(source, target).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.routine_between(source, target), Some(first));
}

#[test]
fn map_without_registered_routine_fails() {
    let mut registry = Registry::new();
    let source = registry
        .register(plain("Source", vec![Field::new("x", Type::I64)]))
        .unwrap();
    let target = registry
        .register(plain("Target", vec![Field::new("x", Type::I64)]))
        .unwrap();

    let value = registry.record(source).build_instance([("x", Value::I64(1))]).unwrap();
    let err = registry.map(&value, target).unwrap_err();
    assert!(err.is_invalid_mapping());
    assert_eq!(
        err.to_string(),
        "invalid mapping: no routine registered from 'Source' to 'Target'"
    );
}
