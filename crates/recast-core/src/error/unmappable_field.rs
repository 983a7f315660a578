use super::Error;

/// Error when a required target field has no corresponding source field and
/// no override.
///
/// Raised while a mapping is synthesized, never when a built routine runs: a
/// routine only exists once every required target field has been resolved.
#[derive(Debug)]
pub(super) struct UnmappableFieldError {
    field: Box<str>,
    record: Box<str>,
}

impl std::error::Error for UnmappableFieldError {}

impl core::fmt::Display for UnmappableFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unmappable field: required field '{}' of '{}' has no source field or override",
            self.field, self.record
        )
    }
}

impl Error {
    /// Creates an unmappable field error.
    ///
    /// `field` is the target field that could not be resolved, `record` the
    /// target record that declares it.
    pub fn unmappable_field(field: impl Into<String>, record: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnmappableField(UnmappableFieldError {
            field: field.into().into(),
            record: record.into().into(),
        }))
    }

    /// Returns `true` if this error is an unmappable field error.
    pub fn is_unmappable_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnmappableField(_))
    }
}
