//! Ordering and numeric proximity matchers.

use std::fmt::Debug;

use super::{MatchOutcome, Matcher, MatcherExt, describe};
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    GreaterThan,
    LessThan,
    AtLeast,
    AtMost,
}

impl Relation {
    const fn phrase(self) -> &'static str {
        match self {
            Self::GreaterThan => "greater than",
            Self::LessThan => "less than",
            Self::AtLeast => "at least",
            Self::AtMost => "at most",
        }
    }
}

/// Compares values against a bound.
#[derive(Clone, Debug)]
pub struct Compare<E> {
    bound: E,
    relation: Relation,
}

/// Returns a matcher succeeding when the value is strictly greater than `bound`.
pub const fn be_greater_than<E>(bound: E) -> Compare<E> {
    Compare {
        bound,
        relation: Relation::GreaterThan,
    }
}

/// Returns a matcher succeeding when the value is strictly less than `bound`.
pub const fn be_less_than<E>(bound: E) -> Compare<E> {
    Compare {
        bound,
        relation: Relation::LessThan,
    }
}

/// Returns a matcher succeeding when the value is greater than or equal to `bound`.
pub const fn be_at_least<E>(bound: E) -> Compare<E> {
    Compare {
        bound,
        relation: Relation::AtLeast,
    }
}

/// Returns a matcher succeeding when the value is less than or equal to `bound`.
pub const fn be_at_most<E>(bound: E) -> Compare<E> {
    Compare {
        bound,
        relation: Relation::AtMost,
    }
}

impl<T, E> Matcher<T> for Compare<E>
where
    T: PartialOrd<E> + Debug + ?Sized,
    E: Debug,
{
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let success = match self.relation {
            Relation::GreaterThan => *value > self.bound,
            Relation::LessThan => *value < self.bound,
            Relation::AtLeast => *value >= self.bound,
            Relation::AtMost => *value <= self.bound,
        };

        let actual = describe(value, description);
        let phrase = self.relation.phrase();
        Ok(MatchOutcome::new(
            success,
            format!("{actual} is {phrase} {:?}", self.bound),
            format!("{actual} is not {phrase} {:?}", self.bound),
        ))
    }
}

impl<E> MatcherExt for Compare<E> {}

/// Matches floating-point values within a tolerance of an expected value.
#[derive(Clone, Copy, Debug)]
pub struct BeCloseTo {
    expected: f64,
    delta: f64,
}

/// Returns a matcher succeeding when the value lies within `delta` of `expected`.
pub const fn be_close_to(expected: f64, delta: f64) -> BeCloseTo {
    BeCloseTo { expected, delta }
}

impl Matcher<f64> for BeCloseTo {
    fn apply(&self, value: &f64, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            (value - self.expected).abs() <= self.delta,
            format!("{actual} is close to {} +/- {}", self.expected, self.delta),
            format!("{actual} is not close to {} +/- {}", self.expected, self.delta),
        ))
    }
}

impl Matcher<f32> for BeCloseTo {
    fn apply(&self, value: &f32, description: Option<&str>) -> Result<MatchOutcome, Error> {
        Matcher::<f64>::apply(self, &f64::from(*value), description)
    }
}

impl MatcherExt for BeCloseTo {}
