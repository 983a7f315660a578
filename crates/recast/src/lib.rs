mod origin;
pub use origin::{FieldMapping, Origin};

mod registry;
pub use registry::Registry;

mod routine;
pub use routine::{Routine, RoutineId};

mod synth;
pub use synth::Builder;

pub use recast_core::{schema, value, Error, Result, Value};
