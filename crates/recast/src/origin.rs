use indexmap::IndexMap;
use recast_core::value::{RecordValue, Value};
use std::fmt;
use std::sync::Arc;

/// A zero-argument producer of a target field value.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// A producer receiving the source instance.
pub type SourceProducer = Arc<dyn Fn(&RecordValue) -> Value + Send + Sync>;

/// Where a target field's value comes from.
#[derive(Clone)]
pub enum Origin {
    /// A source field, by name (the target's own name or a different one)
    Field(String),

    /// A zero-argument function producing the value
    Produce(Producer),

    /// A function producing the value from the source instance
    WithSource(SourceProducer),

    /// Leave the field unset; the target's own default applies.
    ///
    /// Only valid for fields that are not required.
    UseDefault,
}

/// Per-field mapping configuration: target field name to origin.
///
/// Ordered so repeated synthesis walks overrides deterministically.
pub type FieldMapping = IndexMap<String, Origin>;

impl Origin {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn produce(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Produce(Arc::new(f))
    }

    pub fn with_source(f: impl Fn(&RecordValue) -> Value + Send + Sync + 'static) -> Self {
        Self::WithSource(Arc::new(f))
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => fmt.debug_tuple("Field").field(name).finish(),
            Self::Produce(_) => fmt.write_str("Produce"),
            Self::WithSource(_) => fmt.write_str("WithSource"),
            Self::UseDefault => fmt.write_str("UseDefault"),
        }
    }
}
