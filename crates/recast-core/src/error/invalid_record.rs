use super::Error;

/// Error when a record descriptor is invalid.
///
/// This occurs when:
/// - Two fields of a record share a name
/// - A field is marked required but carries a default (or vice versa)
/// - A field's default value does not fit the field's declared type
///
/// These errors are caught when the descriptor is registered, before any
/// mapping is synthesized against it.
#[derive(Debug)]
pub(super) struct InvalidRecord {
    message: Box<str>,
}

impl std::error::Error for InvalidRecord {}

impl core::fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid record: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRecord(InvalidRecord {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid record error.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidRecord(_))
    }
}
