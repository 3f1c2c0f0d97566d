//! Expectation results and the `or` / `xor` combinators.
//!
//! Applying a matcher never unwinds. It produces an [`Evaluated`], which is either
//! a successful [`Expectation`], a [`Failure`] (a false verdict) or an [`Error`]
//! (anything else). Failures and successes both own the expectable they came from,
//! so a combinator can recover it and try another matcher against the same value.

use std::fmt;
use std::panic::Location;

use crate::error::Error;
use crate::expectable::Expectable;
use crate::matchers::{Matcher, Sentinel};
use crate::trace_categories;

/// A successful expectation.
pub struct Expectation<'a, T> {
    expectable: Expectable<'a, T>,
    message: String,
    already_ok: bool,
}

impl<'a, T> Expectation<'a, T> {
    pub(crate) const fn new(expectable: Expectable<'a, T>, message: String) -> Self {
        Self {
            expectable,
            message,
            already_ok: false,
        }
    }

    /// Returns the success message, passed through the expectable's renderer.
    pub fn message(&self) -> String {
        self.expectable.render(&self.message)
    }

    /// Returns whether this expectation is already satisfied. Combinators return
    /// a satisfied expectation unchanged.
    pub const fn is_already_ok(&self) -> bool {
        self.already_ok
    }

    /// Marks this expectation as already satisfied.
    pub fn set_already_ok(&mut self) {
        self.already_ok = true;
    }

    /// Returns this expectation marked as already satisfied.
    #[must_use]
    pub fn satisfied(mut self) -> Self {
        self.set_already_ok();
        self
    }

    /// Returns the expectable this expectation was produced from.
    pub const fn expectable(&self) -> &Expectable<'a, T> {
        &self.expectable
    }

    /// Returns the expectable this expectation was produced from, for further
    /// matcher applications.
    pub fn into_expectable(self) -> Expectable<'a, T> {
        self.expectable
    }

    /// Applies another matcher to the same value.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to apply.
    #[track_caller]
    pub fn and<M: Matcher<T>>(self, matcher: M) -> Evaluated<'a, T> {
        self.expectable.apply_at(matcher, Location::caller())
    }

    /// Alternative on a successful expectation: marks it satisfied and returns
    /// it without evaluating `matcher`.
    #[track_caller]
    pub fn or<M: Matcher<T>>(self, matcher: M) -> Evaluated<'a, T> {
        Evaluated::Passed(self).or_at(matcher, Location::caller())
    }

    /// Exclusive alternative on a successful expectation; see [`Evaluated::xor`].
    #[track_caller]
    pub fn xor<M: Matcher<T>>(self, matcher: M) -> Evaluated<'a, T> {
        Evaluated::Passed(self).xor_at(matcher, Location::caller())
    }
}

impl<T> fmt::Debug for Expectation<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("expectable", &self.expectable)
            .field("message", &self.message)
            .field("already_ok", &self.already_ok)
            .finish()
    }
}

/// A false verdict.
pub struct Failure<'a, T> {
    message: String,
    expectation: Expectation<'a, T>,
    location: &'static Location<'static>,
}

impl<'a, T> Failure<'a, T> {
    pub(crate) const fn new(
        message: String,
        expectation: Expectation<'a, T>,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            message,
            expectation,
            location,
        }
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location of the failing assertion.
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Returns the expectation that was being evaluated.
    pub const fn expectation(&self) -> &Expectation<'a, T> {
        &self.expectation
    }

    /// Returns the expectation that was being evaluated, giving access to its
    /// expectable.
    pub fn into_expectation(self) -> Expectation<'a, T> {
        self.expectation
    }

    /// Converts this failure into an error carrying its message.
    pub fn into_error(self) -> Error {
        Error::ExpectationFailed {
            message: self.message,
            location: self.location,
        }
    }
}

impl<T> fmt::Debug for Failure<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("message", &self.message)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Failure<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl<T> From<Failure<'_, T>> for Error {
    fn from(failure: Failure<'_, T>) -> Self {
        failure.into_error()
    }
}

/// The result of applying a matcher to an unbound expectable.
#[must_use = "an unmet expectation is only reported through this value"]
pub enum Evaluated<'a, T> {
    /// The matcher's verdict was true.
    Passed(Expectation<'a, T>),
    /// The matcher's verdict was false.
    Failed(Failure<'a, T>),
    /// The value could not be evaluated, or something else went wrong.
    Errored(Error),
}

impl<'a, T> Evaluated<'a, T> {
    /// Returns whether the evaluation passed.
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }

    /// Returns whether the evaluation produced a false verdict.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns whether the evaluation errored.
    pub const fn is_errored(&self) -> bool {
        matches!(self, Self::Errored(_))
    }

    /// Returns the failure, if the verdict was false.
    pub const fn failure(&self) -> Option<&Failure<'a, T>> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns the message describing the evaluation.
    pub fn message(&self) -> String {
        match self {
            Self::Passed(expectation) => expectation.message(),
            Self::Failed(failure) => failure.message.clone(),
            Self::Errored(err) => err.to_string(),
        }
    }

    /// Converts into a standard result, for use with `?` inside example bodies.
    pub fn into_result(self) -> Result<Expectation<'a, T>, Error> {
        match self {
            Self::Passed(expectation) => Ok(expectation),
            Self::Failed(failure) => Err(failure.into_error()),
            Self::Errored(err) => Err(err),
        }
    }

    /// Applies another matcher to the same value if this evaluation passed.
    /// Failures and errors are returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to apply.
    #[track_caller]
    pub fn and<M: Matcher<T>>(self, matcher: M) -> Self {
        self.and_at(matcher, Location::caller())
    }

    /// Alternative: succeeds if this evaluation passed or `matcher` holds.
    ///
    /// A passed evaluation is marked satisfied and returned unchanged without
    /// evaluating `matcher`. On a false verdict the expectable is recovered and
    /// `matcher` is applied to it. Errors pass through untouched, and so does a
    /// false verdict when `matcher` is the negation marker, which holds no
    /// verdict of its own.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The alternative matcher.
    #[track_caller]
    pub fn or<M: Matcher<T>>(self, matcher: M) -> Self {
        self.or_at(matcher, Location::caller())
    }

    /// Exclusive alternative: succeeds if exactly one of this evaluation and
    /// `matcher` holds.
    ///
    /// When this evaluation passed, `matcher` is applied negated; if it holds as
    /// well, the failure carries its message. The always-ok sentinel always
    /// holds, so it fails a passed evaluation. On a false verdict `matcher` is
    /// applied normally. Satisfied expectations and errors are returned
    /// unchanged, as is anything combined with the negation marker.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The other matcher.
    #[track_caller]
    pub fn xor<M: Matcher<T>>(self, matcher: M) -> Self {
        self.xor_at(matcher, Location::caller())
    }

    pub(crate) fn and_at<M: Matcher<T>>(
        self,
        matcher: M,
        location: &'static Location<'static>,
    ) -> Self {
        match self {
            Self::Passed(expectation) => expectation.expectable.apply_at(matcher, location),
            other => other,
        }
    }

    pub(crate) fn or_at<M: Matcher<T>>(
        self,
        matcher: M,
        location: &'static Location<'static>,
    ) -> Self {
        match self {
            Self::Passed(expectation) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "or: left side holds; alternative not evaluated");
                Self::Passed(expectation.satisfied())
            }
            Self::Failed(failure) if matcher.sentinel() == Some(Sentinel::NegationMarker) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "or: negation marker is not an alternative");
                Self::Failed(failure)
            }
            Self::Failed(failure) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "or: left side failed ({}); trying alternative", failure.message);
                failure
                    .into_expectation()
                    .into_expectable()
                    .apply_at(matcher, location)
            }
            Self::Errored(err) => Self::Errored(err),
        }
    }

    pub(crate) fn xor_at<M: Matcher<T>>(
        self,
        matcher: M,
        location: &'static Location<'static>,
    ) -> Self {
        match (self, matcher.sentinel()) {
            (Self::Passed(expectation), _) if expectation.is_already_ok() => {
                Self::Passed(expectation)
            }
            (evaluated, Some(Sentinel::NegationMarker)) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "xor: negation marker is not an alternative");
                evaluated
            }
            (Self::Passed(expectation), Some(Sentinel::AlwaysOk)) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "xor: both sides hold");
                let message = format!("{} and the alternative always holds", expectation.message);
                let expectation = Expectation::new(expectation.expectable, String::from("ok"));
                Self::Failed(Failure::new(message, expectation, location))
            }
            (Self::Passed(expectation), None) => {
                let Expectation {
                    expectable,
                    message,
                    ..
                } = expectation;

                match expectable.not().apply_at(matcher, location) {
                    Self::Passed(right) => {
                        tracing::debug!(target: trace_categories::COMBINATORS, "xor: only the left side holds");
                        Self::Passed(Expectation::new(right.into_expectable(), message))
                    }
                    Self::Failed(failure) => {
                        tracing::debug!(target: trace_categories::COMBINATORS, "xor: both sides hold");
                        Self::Failed(failure)
                    }
                    Self::Errored(err) => Self::Errored(err),
                }
            }
            (Self::Failed(failure), _) => {
                tracing::debug!(target: trace_categories::COMBINATORS, "xor: left side failed ({}); trying right side", failure.message);
                failure
                    .into_expectation()
                    .into_expectable()
                    .apply_at(matcher, location)
            }
            (Self::Errored(err), _) => Self::Errored(err),
        }
    }
}

impl<T> fmt::Debug for Evaluated<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed(expectation) => f.debug_tuple("Passed").field(expectation).finish(),
            Self::Failed(failure) => f.debug_tuple("Failed").field(failure).finish(),
            Self::Errored(err) => f.debug_tuple("Errored").field(err).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectable::{expect, expect_with, try_expect};
    use crate::matchers::{always_ok, be_greater_than, equal, negation_marker};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn test_or_short_circuits_on_success() {
        let calls = Cell::new(0);
        let evaluated = expect(1).must(equal(1)).or(crate::matchers::satisfy(
            "observed",
            |_: &i32| {
                calls.set(calls.get() + 1);
                true
            },
        ));

        let Evaluated::Passed(expectation) = evaluated else {
            panic!("or with a passing left side must pass");
        };
        assert!(expectation.is_already_ok());
        assert_eq!(expectation.message(), "1 is equal to 1");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_or_recovers_from_failure() {
        let evaluated = expect(1).must(equal(2)).or(equal(1));
        assert!(evaluated.is_passed());
        assert_eq!(evaluated.message(), "1 is equal to 1");
    }

    #[test]
    fn test_or_surfaces_right_failure() {
        let evaluated = expect(1).must(equal(2)).or(equal(3));
        let failure = evaluated.failure().map(Failure::message);
        assert_eq!(failure, Some("1 is not equal to 3"));
    }

    #[test]
    fn test_or_passes_errors_through() {
        let evaluated = try_expect(|| "nope".parse::<i32>())
            .must(equal(1))
            .or(always_ok());
        assert!(evaluated.is_errored());
    }

    #[test]
    fn test_xor_truth_table() {
        assert!(expect(1).must(equal(1)).xor(equal(2)).is_passed());
        assert!(expect(1).must(equal(2)).xor(equal(1)).is_passed());
        assert!(expect(1).must(equal(2)).xor(equal(3)).is_failed());

        let both = expect(1).must(equal(1)).xor(be_greater_than(0));
        assert_eq!(
            both.failure().map(Failure::message),
            Some("1 is greater than 0")
        );
    }

    #[test]
    fn test_xor_with_always_ok_leaves_no_negation_behind() {
        let evaluated = expect(1).must(equal(1)).xor(always_ok());
        let Evaluated::Failed(failure) = evaluated else {
            panic!("both sides hold");
        };
        assert_eq!(failure.message(), "1 is equal to 1 and the alternative always holds");
        assert!(!failure.expectation().expectable().is_negated());

        let recovered = failure.into_expectation().into_expectable();
        assert!(recovered.must(equal(1)).is_passed());

        assert!(expect(1).must(equal(2)).xor(always_ok()).is_passed());
    }

    #[test]
    fn test_negation_marker_is_not_an_alternative() {
        let or = expect(1).must(equal(2)).or(negation_marker());
        assert_eq!(or.failure().map(Failure::message), Some("1 is not equal to 2"));
        let Evaluated::Failed(failure) = or else {
            panic!("the left failure stands");
        };
        assert!(!failure.expectation().expectable().is_negated());

        let xor = expect(1).must(equal(1)).xor(negation_marker());
        let Evaluated::Passed(expectation) = xor else {
            panic!("the left success stands");
        };
        assert!(!expectation.expectable().is_negated());
        assert!(expectation.and(equal(1)).is_passed());

        assert!(expect(1).must(equal(2)).xor(negation_marker()).is_failed());
    }

    #[test]
    fn test_xor_keeps_left_message() {
        let evaluated = expect(1).must(equal(1)).xor(equal(2));
        assert_eq!(evaluated.message(), "1 is equal to 1");
    }

    #[test]
    fn test_combinators_are_idempotent_once_satisfied() {
        let calls = Cell::new(0);
        let expectable = expect_with(|| {
            calls.set(calls.get() + 1);
            4
        });

        let Evaluated::Passed(expectation) = expectable.must(equal(4)) else {
            panic!("4 equals 4");
        };
        let expectation = expectation.satisfied();
        assert_eq!(calls.get(), 1);

        let Evaluated::Passed(expectation) = expectation.or(equal(5)) else {
            panic!("satisfied expectations pass unchanged");
        };
        let Evaluated::Passed(expectation) = expectation.xor(equal(4)) else {
            panic!("satisfied expectations pass unchanged");
        };
        assert_eq!(expectation.message(), "4 is equal to 4");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_and_stops_at_first_failure() {
        let evaluated = expect(5).must(equal(6)).and(equal(5));
        assert_eq!(
            evaluated.failure().map(Failure::message),
            Some("5 is not equal to 6")
        );
    }

    #[test]
    fn test_failure_converts_into_error() {
        fn check() -> Result<(), Error> {
            expect("a").described("the letter").must(equal("b")).into_result()?;
            Ok(())
        }

        let err = check().unwrap_err();
        assert!(err.is_expectation_failure());
        assert!(matches!(err, Error::ExpectationFailed { location, .. } if location.file() == file!()));
        assert_eq!(err.to_string(), r#"the letter "a" is not equal to "b""#);
    }
}
