use super::{Field, FieldId};
use crate::value::{FieldSet, RecordValue, Value};
use crate::{bail, Error, Result};
use std::fmt;

/// A record type being mapped from or to.
#[derive(Debug, Clone)]
pub struct Record {
    /// Uniquely identifies the record within the registry.
    ///
    /// Assigned when the record is registered; placeholder until then.
    pub id: RecordId,

    /// Name of the record, used in diagnostics
    pub name: String,

    /// Identifier to construct instances under, when it differs from `name`
    /// (wrapped or aliased types). Diagnostic-only: construction itself goes
    /// through `id`.
    pub alias: Option<String>,

    /// Fields contained by the record, in declaration order
    pub fields: Vec<Field>,

    /// Distinguishes construction semantics, see [`RecordKind`]
    pub kind: RecordKind,
}

/// Construction flavor of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Construction takes values; nothing else is remembered
    Plain,

    /// Construction remembers which optional fields were explicitly
    /// provided, distinguishing "set to null" from "never set"
    TracksSet,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RecordId(pub usize);

impl Record {
    /// Creates a record description. The identity is assigned at
    /// registration.
    pub fn new(name: impl Into<String>, kind: RecordKind, fields: Vec<Field>) -> Self {
        Self {
            id: RecordId::placeholder(),
            name: name.into(),
            alias: None,
            fields,
            kind,
        }
    }

    /// Sets the construction alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The identifier instances are constructed under.
    pub fn alias_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns true if construction tracks explicitly provided fields.
    pub fn tracks_set(&self) -> bool {
        matches!(self.kind, RecordKind::TracksSet)
    }

    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.record);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Constructs an instance from one assignment slot per field.
    ///
    /// `None` slots fall back to the field's default. A `None` slot for a
    /// required field is an evaluation error; synthesis guarantees routines
    /// never produce one.
    ///
    /// For [`RecordKind::TracksSet`] records the explicitly-set set is
    /// exactly the `Some` slots; [`RecordKind::Plain`] instances mark every
    /// field.
    pub fn instantiate(&self, assignments: Vec<Option<Value>>) -> Result<RecordValue> {
        if assignments.len() != self.fields.len() {
            return Err(Error::evaluation_failed(format!(
                "'{}' has {} fields but {} assignment slots were supplied",
                self.name,
                self.fields.len(),
                assignments.len()
            )));
        }

        let mut values = Vec::with_capacity(self.fields.len());
        let mut set = FieldSet::new();

        for (index, (field, assignment)) in self.fields.iter().zip(assignments).enumerate() {
            match assignment {
                Some(value) => {
                    set.insert(index);
                    values.push(value);
                }
                None => match &field.default {
                    Some(default) => values.push(default.clone()),
                    None => {
                        return Err(Error::evaluation_failed(format!(
                            "required field '{}' of '{}' was not assigned",
                            field.name, self.name
                        )))
                    }
                },
            }
        }

        if !self.tracks_set() {
            set = (0..self.fields.len()).collect();
        }

        Ok(RecordValue {
            record: self.id,
            values,
            set,
        })
    }

    /// Constructs an instance from named values, validating names, types,
    /// and nullability against the descriptor.
    ///
    /// Fields left out fall back to their default; leaving out a required
    /// field is an error.
    pub fn build_instance<'a, I>(&self, entries: I) -> Result<RecordValue>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut assignments: Vec<Option<Value>> = vec![None; self.fields.len()];

        for (name, value) in entries {
            let Some(index) = self.field_index(name) else {
                bail!("record '{}' has no field '{}'", self.name, name);
            };
            if assignments[index].is_some() {
                bail!("field '{}' of '{}' assigned twice", name, self.name);
            }

            let field = &self.fields[index];
            if value.is_null() {
                if !field.nullable {
                    bail!("field '{}' of '{}' is not nullable", name, self.name);
                }
            } else if !value.is_a(&field.ty) {
                bail!(
                    "value for field '{}' of '{}' does not match its declared type",
                    name,
                    self.name
                );
            }

            assignments[index] = Some(value);
        }

        self.instantiate(assignments)
    }
}

impl RecordId {
    pub(crate) const fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Record> for RecordId {
    fn from(value: &Record) -> Self {
        value.id
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RecordId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Type;
    use pretty_assertions::assert_eq;

    fn user() -> Record {
        Record::new(
            "User",
            RecordKind::Plain,
            vec![
                Field::new("id", Type::I64),
                Field::new("name", Type::String).with_default(Value::String("anon".into())),
            ],
        )
    }

    #[test]
    fn instantiate_applies_defaults() {
        let record = user();
        let value = record
            .instantiate(vec![Some(Value::I64(1)), None])
            .unwrap();
        assert_eq!(value.values, vec![Value::I64(1), Value::String("anon".into())]);
        // Plain records mark every field, defaulted or not
        assert!(value.is_set(0));
        assert!(value.is_set(1));
    }

    #[test]
    fn instantiate_rejects_unassigned_required() {
        let record = user();
        let err = record.instantiate(vec![None, None]).unwrap_err();
        assert!(err.is_evaluation_failed());
        assert_eq!(
            err.to_string(),
            "evaluation failed: required field 'id' of 'User' was not assigned"
        );
    }

    #[test]
    fn instantiate_rejects_wrong_arity() {
        let record = user();
        let err = record.instantiate(vec![Some(Value::I64(1))]).unwrap_err();
        assert!(err.is_evaluation_failed());
    }

    #[test]
    fn build_instance_checks_names_and_types() {
        let record = user();

        let err = record
            .build_instance([("missing", Value::I64(1))])
            .unwrap_err();
        assert_eq!(err.to_string(), "record 'User' has no field 'missing'");

        let err = record
            .build_instance([("id", Value::String("not an int".into()))])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "value for field 'id' of 'User' does not match its declared type"
        );

        let err = record.build_instance([("id", Value::Null)]).unwrap_err();
        assert_eq!(err.to_string(), "field 'id' of 'User' is not nullable");
    }

    #[test]
    fn tracks_set_remembers_explicit_fields() {
        let record = Record::new(
            "Patch",
            RecordKind::TracksSet,
            vec![
                Field::new("nickname", Type::String)
                    .nullable()
                    .with_default(Value::Null),
                Field::new("bio", Type::String)
                    .nullable()
                    .with_default(Value::Null),
            ],
        );

        let value = record.build_instance([("nickname", Value::Null)]).unwrap();
        // explicitly set to null vs never set
        assert!(value.is_set(0));
        assert!(!value.is_set(1));
        assert_eq!(value.values, vec![Value::Null, Value::Null]);
    }

    #[test]
    fn alias_name_falls_back_to_name() {
        let record = user();
        assert_eq!(record.alias_name(), "User");
        let record = user().with_alias("UserAlias");
        assert_eq!(record.alias_name(), "UserAlias");
    }
}
