use crate::origin::{FieldMapping, Origin};
use crate::registry::Registry;
use crate::routine::{Guard, Helper, HelperId, Op, Routine, Step};
use recast_core::schema::{Field, Record, RecordId};
use recast_core::{Error, Result};

/// Synthesizes conversion routines from record descriptions.
///
/// For every target field a strategy is decided from the field pair's
/// types, nullability, and required-ness, or from a configured
/// [`Origin`] override. Unresolvable pairs fail here; a routine that
/// builds successfully never raises a conversion error when applied.
#[derive(Debug, Default)]
pub struct Builder;

/// State tracked while one routine is built.
struct BuildRoutine<'a> {
    registry: &'a Registry,

    source: &'a Record,

    target: &'a Record,

    /// Steps accumulated so far, in target field order
    steps: Vec<Step>,

    /// Producer callables registered for override origins, referenced from
    /// steps by index
    helpers: Vec<Helper>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the conversion routine from `source` to `target`.
    ///
    /// `overrides` assigns an explicit [`Origin`] per target field name;
    /// every other target field is paired with the same-named source field.
    pub fn synthesize(
        &self,
        registry: &Registry,
        source: impl Into<RecordId>,
        target: impl Into<RecordId>,
        overrides: &FieldMapping,
    ) -> Result<Routine> {
        let source = registry.record(source.into());
        let target = registry.record(target.into());

        for name in overrides.keys() {
            if target.field_index(name).is_none() {
                return Err(Error::invalid_mapping(format!(
                    "override names unknown target field '{}' of '{}'",
                    name, target.name
                )));
            }
        }

        let mut build = BuildRoutine {
            registry,
            source,
            target,
            steps: vec![],
            helpers: vec![],
        };

        for (index, field) in target.fields.iter().enumerate() {
            build.map_field(index, field, overrides.get(field.name.as_str()))?;
        }

        tracing::debug!(
            source = %source.name,
            target = %target.name,
            steps = build.steps.len(),
            "synthesized conversion routine"
        );

        Ok(Routine {
            source: source.id,
            target: target.id,
            steps: build.steps,
            helpers: build.helpers,
        })
    }
}

impl BuildRoutine<'_> {
    /// Resolves one target field to a step (or, for skips, to none).
    fn map_field(&mut self, index: usize, target: &Field, origin: Option<&Origin>) -> Result<()> {
        match origin {
            Some(Origin::Produce(f)) => {
                let helper = self.add_helper(Helper::Produce(f.clone()));
                self.push(index, Guard::Always, Op::Call { helper });
                Ok(())
            }
            Some(Origin::WithSource(f)) => {
                let helper = self.add_helper(Helper::WithSource(f.clone()));
                self.push(index, Guard::Always, Op::Call { helper });
                Ok(())
            }
            Some(Origin::UseDefault) => {
                if target.required {
                    return Err(Error::invalid_mapping(format!(
                        "'use default' applied to required field '{}' of '{}'",
                        target.name, self.target.name
                    )));
                }
                // No step: the field stays unset and the default applies at
                // construction.
                Ok(())
            }
            Some(Origin::Field(name)) => {
                let Some(source_index) = self.source.field_index(name) else {
                    return Err(Error::invalid_mapping(format!(
                        "override for '{}' names unknown source field '{}' of '{}'",
                        target.name, name, self.source.name
                    )));
                };
                self.decide(index, target, source_index)
            }
            None => match self.source.field_index(&target.name) {
                Some(source_index) => self.decide(index, target, source_index),
                None if target.required => Err(Error::unmappable_field(
                    target.name.as_str(),
                    self.target.name.as_str(),
                )),
                // Not required and no counterpart: leave unset, the default
                // applies.
                None => Ok(()),
            },
        }
    }

    /// The strategy decision table. Evaluated top to bottom, first match
    /// wins.
    fn decide(&mut self, index: usize, target: &Field, source_index: usize) -> Result<()> {
        let source = &self.source.fields[source_index];

        // Identical types: plain copy, modulo nullability.
        if target.ty == source.ty {
            if !(source.nullable && !target.nullable) {
                let guard = if self.maintains_set(target) {
                    // Both records track explicit sets and the target may
                    // stay unset: copy only when the source field was
                    // provided, preserving "set to null" vs "never set".
                    Guard::SourceSet(source_index)
                } else {
                    Guard::Always
                };
                self.push(index, guard, Op::Copy { source: source_index });
                return Ok(());
            }
            if !target.required {
                // Nullable source into a non-nullable defaulted target:
                // assign only when a value is present.
                self.push(
                    index,
                    Guard::SourceNotNull(source_index),
                    Op::Copy { source: source_index },
                );
                return Ok(());
            }
            // Nullable source into a non-nullable required target: no safe
            // strategy, fall through to failure.
        }

        // Nested records with a registered routine between them.
        if let (Some(source_rec), Some(target_rec)) =
            (source.ty.as_record(), target.ty.as_record())
        {
            if let Some(routine) = self.registry.routine_between(source_rec, target_rec) {
                if !(source.nullable && !target.nullable) {
                    let guard = if self.maintains_set(target) {
                        Guard::SourceSet(source_index)
                    } else {
                        Guard::Always
                    };
                    self.push(
                        index,
                        guard,
                        Op::MapRecord {
                            source: source_index,
                            routine,
                            null_passthrough: source.nullable,
                        },
                    );
                    return Ok(());
                }
            }
        }

        // Sequences whose element types have a registered routine.
        if let (Some(source_item), Some(target_item)) = (source.ty.as_list(), target.ty.as_list())
        {
            if let (Some(source_rec), Some(target_rec)) =
                (source_item.as_record(), target_item.as_record())
            {
                if let Some(routine) = self.registry.routine_between(source_rec, target_rec) {
                    if !(source.nullable && !target.nullable) {
                        let guard = if self.maintains_set(target) {
                            Guard::SourceSet(source_index)
                        } else {
                            Guard::Always
                        };
                        self.push(
                            index,
                            guard,
                            Op::MapList {
                                source: source_index,
                                routine,
                                null_passthrough: source.nullable,
                            },
                        );
                        return Ok(());
                    }
                    if !target.required {
                        self.push(
                            index,
                            Guard::SourceNotNull(source_index),
                            Op::MapList {
                                source: source_index,
                                routine,
                                null_passthrough: source.nullable,
                            },
                        );
                        return Ok(());
                    }
                }
            }
        }

        Err(Error::cannot_convert(
            source.name.as_str(),
            self.source.name.as_str(),
            target.name.as_str(),
        ))
    }

    /// True when both records track explicit sets and the target field may
    /// legitimately stay unset. Such pairs copy under a set-guard so an
    /// unset source field stays unset on the target.
    fn maintains_set(&self, target: &Field) -> bool {
        target.nullable
            && !target.required
            && self.source.tracks_set()
            && self.target.tracks_set()
    }

    fn push(&mut self, target: usize, guard: Guard, op: Op) {
        self.steps.push(Step { target, guard, op });
    }

    fn add_helper(&mut self, helper: Helper) -> HelperId {
        let id = HelperId(self.helpers.len());
        self.helpers.push(helper);
        id
    }
}
