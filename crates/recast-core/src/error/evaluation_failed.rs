use super::Error;

/// Error when applying a routine to a malformed instance fails.
///
/// This occurs when:
/// - A value does not have the shape a step expects (a scalar where a record
///   routine applies, a non-list for a sequence step)
/// - An instance carries a different record identity than the routine's
///   source
/// - An instance's value vector does not match its descriptor's field count
///
/// Instances built through the checked constructors never trigger these;
/// this is the defensive surface for hand-assembled values.
#[derive(Debug)]
pub(super) struct EvaluationFailed {
    message: Box<str>,
}

impl std::error::Error for EvaluationFailed {}

impl core::fmt::Display for EvaluationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "evaluation failed: {}", self.message)
    }
}

impl Error {
    /// Creates an evaluation failed error.
    pub fn evaluation_failed(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EvaluationFailed(EvaluationFailed {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an evaluation failed error.
    pub fn is_evaluation_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EvaluationFailed(_))
    }
}
