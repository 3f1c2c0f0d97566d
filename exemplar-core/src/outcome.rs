use std::fmt;
use std::panic::Location;

use crate::error::Error;

/// Classifies a recorded outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// A matcher returned a false verdict.
    Failure,
    /// Something other than a false verdict went wrong.
    Error,
    /// The example asked to be excluded from pass/fail accounting.
    Skip,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure => write!(f, "failure"),
            Self::Error => write!(f, "error"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// An entry in an example's outcome list. Passing expectations leave no entry.
#[derive(Debug)]
pub struct Outcome {
    kind: OutcomeKind,
    message: String,
    cause: Option<Error>,
    location: Option<&'static Location<'static>>,
}

impl Outcome {
    /// Returns a failure outcome.
    ///
    /// # Arguments
    ///
    /// * `message` - The failure message.
    /// * `location` - Where the failing assertion was made, if known.
    pub fn failure(
        message: impl Into<String>,
        location: Option<&'static Location<'static>>,
    ) -> Self {
        Self {
            kind: OutcomeKind::Failure,
            message: message.into(),
            cause: None,
            location,
        }
    }

    /// Returns an error outcome wrapping `cause`.
    pub fn error(cause: Error) -> Self {
        Self {
            kind: OutcomeKind::Error,
            message: cause.to_string(),
            cause: Some(cause),
            location: None,
        }
    }

    /// Returns a skip outcome.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Skip,
            message: reason.into(),
            cause: None,
            location: None,
        }
    }

    /// Classifies an error escaping an example: skip requests become skips,
    /// failures converted into errors become failures again (keeping the
    /// assertion site), and everything else becomes an error.
    pub fn from_error(error: Error) -> Self {
        match error {
            Error::Skipped(reason) => Self::skip(reason),
            Error::ExpectationFailed { message, location } => {
                Self::failure(message, Some(location))
            }
            other => Self::error(other),
        }
    }

    /// Returns the outcome's kind.
    pub const fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Returns the outcome's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying error, for error outcomes.
    pub const fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    /// Returns the source location of the assertion, when known.
    pub const fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    /// Returns whether this outcome is an unmet expectation.
    pub const fn is_failure(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failure)
    }

    /// Returns whether this outcome is an error.
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, OutcomeKind::Error)
    }

    /// Returns whether this outcome is a skip.
    pub const fn is_skip(&self) -> bool {
        matches!(self.kind, OutcomeKind::Skip)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(location) = self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_error_classification() {
        assert_eq!(
            Outcome::from_error(Error::Skipped(String::from("later"))).kind(),
            OutcomeKind::Skip
        );

        let failed = Outcome::from_error(Error::ExpectationFailed {
            message: String::from("1 is not 2"),
            location: std::panic::Location::caller(),
        });
        assert_eq!(failed.kind(), OutcomeKind::Failure);
        assert_eq!(failed.location().map(|l| l.file()), Some(file!()));

        let outcome = Outcome::from_error(Error::custom("boom"));
        assert!(outcome.is_error());
        assert_eq!(outcome.message(), "boom");
        assert!(outcome.cause().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::skip("not ready").to_string(), "skip: not ready");
        assert_eq!(Outcome::failure("nope", None).to_string(), "failure: nope");
    }
}
