use crate::origin::{Producer, SourceProducer};
use crate::registry::Registry;
use recast_core::schema::RecordId;
use recast_core::value::{RecordValue, Value};
use recast_core::{Error, Result};
use std::fmt;

/// An executable conversion routine from one record type to another.
///
/// Built once per (source, target) pair by [`crate::Builder`] and reused for
/// every subsequent conversion. Applying it never raises a conversion error;
/// the only call-time behavior beyond field population is the null and
/// explicit-set guarding encoded in its steps.
#[derive(Debug)]
pub struct Routine {
    /// The record type instances are converted from
    pub source: RecordId,

    /// The record type instances are converted to
    pub target: RecordId,

    pub(crate) steps: Vec<Step>,

    /// Producer callables referenced by [`Op::Call`], owned by the routine
    /// and addressed by index
    pub(crate) helpers: Vec<Helper>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RoutineId(pub usize);

/// One field assignment of a routine.
#[derive(Debug)]
pub(crate) struct Step {
    /// Index of the target field being assigned
    pub(crate) target: usize,

    pub(crate) guard: Guard,

    pub(crate) op: Op,
}

/// Condition under which a step runs; a skipped step leaves its target
/// field unset.
#[derive(Debug)]
pub(crate) enum Guard {
    Always,

    /// Run only if the source field at the index holds a non-null value
    SourceNotNull(usize),

    /// Run only if the source field at the index was explicitly provided
    SourceSet(usize),
}

/// How a step obtains the target field's value.
#[derive(Debug)]
pub(crate) enum Op {
    /// Copy the source field's value as-is
    Copy { source: usize },

    /// Convert the source field's value through a nested routine
    MapRecord {
        source: usize,
        routine: RoutineId,
        /// Null in, null out. Set when the source field is nullable.
        null_passthrough: bool,
    },

    /// Convert every element of the source sequence through a nested
    /// routine, preserving order
    MapList {
        source: usize,
        routine: RoutineId,
        null_passthrough: bool,
    },

    /// Invoke a producer from the helper arena
    Call { helper: HelperId },
}

pub(crate) enum Helper {
    Produce(Producer),
    WithSource(SourceProducer),
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct HelperId(pub(crate) usize);

impl Routine {
    /// Applies the routine to one source instance, producing a new target
    /// instance.
    ///
    /// The registry resolves nested routine handles and the target
    /// descriptor; it must be the registry the routine was synthesized
    /// against.
    pub fn apply(&self, registry: &Registry, source: &RecordValue) -> Result<RecordValue> {
        if source.record != self.source {
            return Err(Error::evaluation_failed(format!(
                "instance of {:?} applied to a routine from {:?}",
                source.record, self.source
            )));
        }

        let target = registry.record(self.target);
        let mut assignments: Vec<Option<Value>> = vec![None; target.fields.len()];

        for step in &self.steps {
            match step.guard {
                Guard::Always => {}
                Guard::SourceNotNull(index) => {
                    if source_value(source, index)?.is_null() {
                        continue;
                    }
                }
                Guard::SourceSet(index) => {
                    if !source.is_set(index) {
                        continue;
                    }
                }
            }

            let value = match &step.op {
                Op::Copy { source: index } => source_value(source, *index)?.clone(),
                Op::MapRecord {
                    source: index,
                    routine,
                    null_passthrough,
                } => {
                    let value = source_value(source, *index)?;
                    if value.is_null() {
                        if !null_passthrough {
                            return Err(Error::evaluation_failed(format!(
                                "null in non-nullable source field index {index}"
                            )));
                        }
                        Value::Null
                    } else {
                        let nested = value.clone().to_record()?;
                        registry.routine(*routine).apply(registry, &nested)?.into()
                    }
                }
                Op::MapList {
                    source: index,
                    routine,
                    null_passthrough,
                } => {
                    let value = source_value(source, *index)?;
                    if value.is_null() {
                        if !null_passthrough {
                            return Err(Error::evaluation_failed(format!(
                                "null in non-nullable source field index {index}"
                            )));
                        }
                        Value::Null
                    } else {
                        let items = value.clone().to_list()?;
                        let nested_routine = registry.routine(*routine);
                        let mut mapped = Vec::with_capacity(items.len());
                        for item in items {
                            let nested = item.to_record()?;
                            mapped.push(nested_routine.apply(registry, &nested)?.into());
                        }
                        Value::List(mapped)
                    }
                }
                Op::Call { helper } => match &self.helpers[helper.0] {
                    Helper::Produce(f) => f(),
                    Helper::WithSource(f) => f(source),
                },
            };

            assignments[step.target] = Some(value);
        }

        target.instantiate(assignments)
    }
}

fn source_value(source: &RecordValue, index: usize) -> Result<&Value> {
    source.get(index).ok_or_else(|| {
        Error::evaluation_failed(format!("source instance is missing field index {index}"))
    })
}

impl fmt::Debug for RoutineId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RoutineId({})", self.0)
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Produce(_) => fmt.write_str("Produce"),
            Self::WithSource(_) => fmt.write_str("WithSource"),
        }
    }
}
