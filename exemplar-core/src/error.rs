use std::any::Any;
use std::panic::Location;

/// Boxed error accepted from fallible value producers.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Monolithic error type for the evaluation engine.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A matcher returned a false verdict.
    #[error("{message}")]
    ExpectationFailed {
        /// The matcher's message for the false verdict.
        message: String,
        /// Where the failing assertion was made.
        location: &'static Location<'static>,
    },

    /// An example asked to be excluded from pass/fail accounting.
    #[error("skipped: {0}")]
    Skipped(String),

    /// Code running inside an example panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The value under expectation could not be computed.
    #[error("failed to evaluate value: {0}")]
    ValueEvaluation(#[source] BoxedError),

    /// A matcher could not reach a verdict for the value.
    #[error("matcher could not be evaluated: {0}")]
    MatcherEvaluation(#[source] BoxedError),

    /// The given regular expression could not be compiled.
    #[error("invalid regex: {1}; expression: '{0}'")]
    InvalidRegex(String, #[source] Box<fancy_regex::Error>),

    /// A free-form error raised by an example body.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Returns a free-form error with the given message.
    ///
    /// # Arguments
    ///
    /// * `msg` - The message to carry.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Returns whether this error asks for the enclosing example to be skipped.
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns whether this error stems from an unmet expectation.
    pub const fn is_expectation_failure(&self) -> bool {
        matches!(self, Self::ExpectationFailed { .. })
    }

    /// Converts a panic payload caught at an example boundary into an error.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("unknown panic payload")
        };

        Self::Panicked(msg)
    }
}
