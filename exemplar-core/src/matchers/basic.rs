//! Equality, boolean, option/result and predicate matchers, plus the sentinels.

use std::fmt::Debug;

use super::{MatchOutcome, Matcher, MatcherExt, Sentinel, describe};
use crate::error::Error;

/// Matches values equal to an expected value.
#[derive(Clone, Debug)]
pub struct Equal<E> {
    expected: E,
}

/// Returns a matcher succeeding when the value equals `expected`.
pub const fn equal<E>(expected: E) -> Equal<E> {
    Equal { expected }
}

impl<T, E> Matcher<T> for Equal<E>
where
    T: PartialEq<E> + Debug + ?Sized,
    E: Debug,
{
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            *value == self.expected,
            format!("{actual} is equal to {:?}", self.expected),
            format!("{actual} is not equal to {:?}", self.expected),
        ))
    }
}

impl<E> MatcherExt for Equal<E> {}

/// Matches booleans against an expected truth value.
#[derive(Clone, Copy, Debug)]
pub struct BeBool {
    expected: bool,
}

/// Returns a matcher succeeding when the value is `true`.
pub const fn be_true() -> BeBool {
    BeBool { expected: true }
}

/// Returns a matcher succeeding when the value is `false`.
pub const fn be_false() -> BeBool {
    BeBool { expected: false }
}

impl Matcher<bool> for BeBool {
    fn apply(&self, value: &bool, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let subject = description.unwrap_or("the value");
        Ok(MatchOutcome::new(
            *value == self.expected,
            format!("{subject} is {}", self.expected),
            format!("{subject} is {}", !self.expected),
        ))
    }
}

impl MatcherExt for BeBool {}

/// Matches `Option` values by variant.
#[derive(Clone, Copy, Debug)]
pub struct BeSome {
    expected: bool,
}

/// Returns a matcher succeeding when the option holds a value.
pub const fn be_some() -> BeSome {
    BeSome { expected: true }
}

/// Returns a matcher succeeding when the option is empty.
pub const fn be_none() -> BeSome {
    BeSome { expected: false }
}

impl<V: Debug> Matcher<Option<V>> for BeSome {
    fn apply(&self, value: &Option<V>, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        let (ok, ko) = if self.expected {
            (format!("{actual} is Some"), format!("{actual} is None"))
        } else {
            (format!("{actual} is None"), format!("{actual} is Some"))
        };

        Ok(MatchOutcome::new(value.is_some() == self.expected, ok, ko))
    }
}

impl MatcherExt for BeSome {}

/// Matches `Result` values by variant.
#[derive(Clone, Copy, Debug)]
pub struct BeOk {
    expected: bool,
}

/// Returns a matcher succeeding when the result is `Ok`.
pub const fn be_ok() -> BeOk {
    BeOk { expected: true }
}

/// Returns a matcher succeeding when the result is `Err`.
pub const fn be_err() -> BeOk {
    BeOk { expected: false }
}

impl<V: Debug, E: Debug> Matcher<Result<V, E>> for BeOk {
    fn apply(&self, value: &Result<V, E>, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        let (ok, ko) = if self.expected {
            (format!("{actual} is Ok"), format!("{actual} is an error"))
        } else {
            (format!("{actual} is an error"), format!("{actual} is Ok"))
        };

        Ok(MatchOutcome::new(value.is_ok() == self.expected, ok, ko))
    }
}

impl MatcherExt for BeOk {}

/// Matches values against an arbitrary predicate.
pub struct Satisfy<F> {
    label: String,
    predicate: F,
}

/// Returns a matcher succeeding when `predicate` holds for the value.
///
/// # Arguments
///
/// * `label` - Names the property in messages, e.g. `"an even number"`.
/// * `predicate` - The property to check.
pub fn satisfy<T, F>(label: impl Into<String>, predicate: F) -> Satisfy<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool,
{
    Satisfy {
        label: label.into(),
        predicate,
    }
}

impl<T, F> Matcher<T> for Satisfy<F>
where
    T: Debug + ?Sized,
    F: Fn(&T) -> bool,
{
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            (self.predicate)(value),
            format!("{actual} is {}", self.label),
            format!("{actual} is not {}", self.label),
        ))
    }
}

impl<F> MatcherExt for Satisfy<F> {}

/// Sentinel that succeeds without looking at the value.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysOk;

/// Returns the no-op sentinel matcher.
pub const fn always_ok() -> AlwaysOk {
    AlwaysOk
}

impl<T: ?Sized> Matcher<T> for AlwaysOk {
    fn apply(&self, _value: &T, _description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(MatchOutcome::new(true, "ok", "ko"))
    }

    fn sentinel(&self) -> Option<Sentinel> {
        Some(Sentinel::AlwaysOk)
    }
}

/// Sentinel that negates the next matcher applied to the same expectable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NegationMarker;

/// Returns the negation sentinel.
pub const fn negation_marker() -> NegationMarker {
    NegationMarker
}

impl<T: ?Sized> Matcher<T> for NegationMarker {
    fn apply(&self, _value: &T, _description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(MatchOutcome::new(true, "negated", "not negated"))
    }

    fn sentinel(&self) -> Option<Sentinel> {
        Some(Sentinel::NegationMarker)
    }
}
