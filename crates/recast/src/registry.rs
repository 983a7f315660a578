use crate::origin::FieldMapping;
use crate::routine::{Routine, RoutineId};
use crate::synth::Builder;
use indexmap::IndexMap;
use recast_core::err;
use recast_core::schema::{FieldId, Record, RecordId};
use recast_core::value::RecordValue;
use recast_core::{Error, Result};

/// Registered record descriptions and the conversion routines between them.
///
/// Records and routines live in arenas; identities are arena indices. At
/// most one routine exists per ordered (source, target) pair; registering
/// a mapping for a pair again replaces the previous routine.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<Record>,

    routines: Vec<Routine>,

    /// Ordered (source, target) pair to routine handle
    by_pair: IndexMap<(RecordId, RecordId), RoutineId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record description, assigning its identity and its
    /// fields' identities.
    ///
    /// The description is verified eagerly: duplicate field names, a
    /// `required` flag disagreeing with the presence of a default, and
    /// defaults that don't fit their field are all rejected here.
    pub fn register(&mut self, mut record: Record) -> Result<RecordId> {
        self.verify(&record)?;

        let id = RecordId(self.records.len());
        record.id = id;
        for (index, field) in record.fields.iter_mut().enumerate() {
            field.id = FieldId { record: id, index };
        }

        tracing::debug!(record = %record.name, id = id.0, "registered record");
        self.records.push(record);
        Ok(id)
    }

    fn verify(&self, record: &Record) -> Result<()> {
        for (index, field) in record.fields.iter().enumerate() {
            if record.fields[..index]
                .iter()
                .any(|other| other.name == field.name)
            {
                return Err(Error::invalid_record(format!(
                    "duplicate field name '{}' in '{}'",
                    field.name, record.name
                )));
            }

            if field.required != field.default.is_none() {
                return Err(Error::invalid_record(format!(
                    "field '{}' of '{}' must carry a default exactly when it is not required",
                    field.name, record.name
                )));
            }

            if let Some(default) = &field.default {
                if default.is_null() {
                    if !field.nullable {
                        return Err(Error::invalid_record(format!(
                            "null default on non-nullable field '{}' of '{}'",
                            field.name, record.name
                        )));
                    }
                } else if !default.is_a(&field.ty) {
                    return Err(Error::invalid_record(format!(
                        "default for field '{}' of '{}' does not match its declared type",
                        field.name, record.name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn record(&self, id: impl Into<RecordId>) -> &Record {
        let id = id.into();
        &self.records[id.0]
    }

    pub fn record_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.name == name)
    }

    pub(crate) fn routine(&self, id: RoutineId) -> &Routine {
        &self.routines[id.0]
    }

    /// Returns the routine handle registered from `source` to `target`, if
    /// any. This is the capability the synthesizer's recursive strategies
    /// query.
    pub fn routine_between(
        &self,
        source: impl Into<RecordId>,
        target: impl Into<RecordId>,
    ) -> Option<RoutineId> {
        self.by_pair.get(&(source.into(), target.into())).copied()
    }

    /// Synthesizes and registers the conversion routine from `source` to
    /// `target`, pairing fields by name.
    pub fn add_mapping(&mut self, source: RecordId, target: RecordId) -> Result<RoutineId> {
        self.add_mapping_with(source, target, &FieldMapping::new())
    }

    /// Like [`Registry::add_mapping`], with per-field origin overrides.
    pub fn add_mapping_with(
        &mut self,
        source: RecordId,
        target: RecordId,
        overrides: &FieldMapping,
    ) -> Result<RoutineId> {
        let routine = Builder::new()
            .synthesize(&*self, source, target, overrides)
            .map_err(|e| {
                e.context(err!(
                    "mapping '{}' to '{}'",
                    self.record(source).name,
                    self.record(target).name
                ))
            })?;

        let id = match self.by_pair.get(&(source, target)) {
            Some(existing) => {
                self.routines[existing.0] = routine;
                *existing
            }
            None => {
                let id = RoutineId(self.routines.len());
                self.routines.push(routine);
                self.by_pair.insert((source, target), id);
                id
            }
        };

        tracing::debug!(
            source = %self.record(source).name,
            target = %self.record(target).name,
            routine = id.0,
            "registered mapping"
        );
        Ok(id)
    }

    /// Applies a registered routine to one source instance.
    pub fn convert(&self, routine: RoutineId, source: &RecordValue) -> Result<RecordValue> {
        let Some(routine) = self.routines.get(routine.0) else {
            return Err(Error::invalid_mapping(format!(
                "no routine with handle {}",
                routine.0
            )));
        };
        routine.apply(self, source)
    }

    /// Maps an instance to the target record type through the pair's
    /// registered routine.
    pub fn map(&self, source: &RecordValue, target: impl Into<RecordId>) -> Result<RecordValue> {
        let target = target.into();
        let source_record = self.records.get(source.record.0).ok_or_else(|| {
            Error::evaluation_failed("source instance does not belong to this registry")
        })?;

        let Some(routine) = self.routine_between(source_record.id, target) else {
            return Err(Error::invalid_mapping(format!(
                "no routine registered from '{}' to '{}'",
                source_record.name,
                self.record(target).name
            )));
        };
        self.convert(routine, source)
    }
}
