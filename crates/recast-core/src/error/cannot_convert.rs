use super::Error;

/// Error when no strategy can convert a source field into a target field.
///
/// This occurs when:
/// - The field types differ and no routine is registered between them
/// - A nullable source feeds a non-nullable required target
/// - Sequence element types have no registered routine
///
/// Detected while a mapping is synthesized; a built routine never produces
/// this error at call time.
#[derive(Debug)]
pub(super) struct CannotConvertError {
    source_field: Box<str>,
    source_record: Box<str>,
    target_field: Box<str>,
}

impl std::error::Error for CannotConvertError {}

impl core::fmt::Display for CannotConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "field '{}' of '{}' cannot be converted to field '{}'",
            self.source_field, self.source_record, self.target_field
        )
    }
}

impl Error {
    /// Creates a cannot convert error naming the source field, the record
    /// declaring it, and the target field it failed to map to.
    pub fn cannot_convert(
        source_field: impl Into<String>,
        source_record: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::CannotConvert(CannotConvertError {
            source_field: source_field.into().into(),
            source_record: source_record.into().into(),
            target_field: target_field.into().into(),
        }))
    }

    /// Returns `true` if this error is a cannot convert error.
    pub fn is_cannot_convert(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CannotConvert(_))
    }
}
