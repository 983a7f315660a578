//! Descriptions of record types, consumed by mapping synthesis.

mod field;
pub use field::{Field, FieldId};

mod record;
pub use record::{Record, RecordId, RecordKind};

mod ty;
pub use ty::Type;
