//! The matcher protocol and the matchers shipped with the library.
//!
//! A [`Matcher`] is a predicate with messages: applied to a value, it produces a
//! [`MatchOutcome`] holding a verdict plus the message to show when the verdict is
//! positive (`ok_message`) and when it is negative (`ko_message`). A matcher that
//! cannot reach a verdict returns an [`Error`] instead, which negation and the
//! composites pass through untouched. Matchers are
//! immutable; the optional description of the value under expectation is handed
//! to every application rather than stored on the matcher, so the same matcher can
//! be shared across any number of expectables.
//!
//! # Example
//!
//! ```
//! use exemplar_core::matchers::{Matcher, MatcherExt, equal};
//!
//! # fn main() -> Result<(), exemplar_core::Error> {
//! let matcher = equal(2).negate();
//! let outcome = matcher.apply(&1, Some("the sum"))?;
//! assert!(outcome.success);
//! assert_eq!(outcome.ok_message, "the sum 1 is not equal to 2");
//! # Ok(())
//! # }
//! ```

mod basic;
mod collections;
mod composite;
mod ordering;
mod strings;

use std::fmt::Debug;

use crate::error::Error;

pub use basic::{
    AlwaysOk, BeBool, BeOk, BeSome, Equal, NegationMarker, Satisfy, always_ok, be_err, be_false,
    be_none, be_ok, be_some, be_true, equal, negation_marker, satisfy,
};
pub use collections::{BeEmpty, Collection, ContainElement, HaveLength, be_empty, contain_element, have_length};
pub use composite::{AllOf, And, AnyOf, Not, Or, all_of, any_of};
pub use ordering::{BeCloseTo, Compare, be_at_least, be_at_most, be_close_to, be_greater_than, be_less_than};
pub use strings::{
    Contain, EndWith, MatchRegex, StartWith, contain, end_with, match_regex, start_with,
};

/// Verdict produced by applying a matcher to a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Whether the value satisfied the matcher.
    pub success: bool,
    /// Message describing the positive verdict.
    pub ok_message: String,
    /// Message describing the negative verdict.
    pub ko_message: String,
}

impl MatchOutcome {
    /// Returns a new outcome.
    ///
    /// # Arguments
    ///
    /// * `success` - The verdict.
    /// * `ok_message` - Message describing the positive verdict.
    /// * `ko_message` - Message describing the negative verdict.
    pub fn new(success: bool, ok_message: impl Into<String>, ko_message: impl Into<String>) -> Self {
        Self {
            success,
            ok_message: ok_message.into(),
            ko_message: ko_message.into(),
        }
    }

    /// Inverts the verdict and swaps the messages.
    #[must_use]
    pub fn negate(self) -> Self {
        Self {
            success: !self.success,
            ok_message: self.ko_message,
            ko_message: self.ok_message,
        }
    }

    /// Returns the message matching the verdict.
    pub fn message(&self) -> &str {
        if self.success {
            self.ok_message.as_str()
        } else {
            self.ko_message.as_str()
        }
    }
}

/// Markers recognized by the expectation engine before a matcher is applied.
///
/// Sentinel matchers never see the value under expectation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sentinel {
    /// Succeed without evaluating the value or notifying listeners.
    AlwaysOk,
    /// Negate the next real matcher application.
    NegationMarker,
}

/// A predicate with messages over values of type `T`.
pub trait Matcher<T: ?Sized> {
    /// Applies the matcher to the given value. An error means no verdict could
    /// be reached; it is reported as an error outcome, never as a failure.
    ///
    /// # Arguments
    ///
    /// * `value` - The value under expectation.
    /// * `description` - Optional human description of the value, substituted into
    ///   the produced messages when present.
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error>;

    /// Identifies sentinel matchers; regular matchers return `None`.
    fn sentinel(&self) -> Option<Sentinel> {
        None
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        (**self).apply(value, description)
    }

    fn sentinel(&self) -> Option<Sentinel> {
        (**self).sentinel()
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        (**self).apply(value, description)
    }

    fn sentinel(&self) -> Option<Sentinel> {
        (**self).sentinel()
    }
}

/// Combinator methods for matchers.
///
/// Implemented for every matcher shipped with the library; custom matchers opt in
/// with an empty `impl MatcherExt for MyMatcher {}`.
pub trait MatcherExt: Sized {
    /// Returns a matcher with the inverted verdict and swapped messages. The
    /// original matcher is left untouched.
    fn negate(self) -> Not<Self> {
        Not::new(self)
    }

    /// Returns a matcher that succeeds when both matchers succeed.
    fn and<M>(self, other: M) -> And<Self, M> {
        And::new(self, other)
    }

    /// Returns a matcher that succeeds when either matcher succeeds.
    fn or<M>(self, other: M) -> Or<Self, M> {
        Or::new(self, other)
    }
}

impl<M: ?Sized> MatcherExt for &M {}
impl<M: ?Sized> MatcherExt for Box<M> {}

/// Renders a value for inclusion in a matcher message, prefixed by its
/// description when one is available.
pub fn describe<V: Debug + ?Sized>(value: &V, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("{description} {value:?}"),
        None => format!("{value:?}"),
    }
}
