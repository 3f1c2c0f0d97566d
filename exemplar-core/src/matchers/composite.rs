//! Matchers built from other matchers.
//!
//! Composites hand the description they receive to every constituent, so nested
//! messages name the value the same way a standalone matcher would. Negating a
//! composite swaps the composite's messages, which are themselves assembled from
//! the constituents' messages. An error from any constituent is returned as is,
//! so negation never turns an undecided application into a verdict.

use itertools::Itertools;

use super::{MatchOutcome, Matcher, MatcherExt};
use crate::error::Error;

/// Inverts the verdict of a matcher and swaps its messages.
#[derive(Clone, Debug)]
pub struct Not<M> {
    inner: M,
}

impl<M> Not<M> {
    /// Wraps the given matcher.
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }

    /// Unwraps the negated matcher.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(self.inner.apply(value, description)?.negate())
    }
}

impl<M> MatcherExt for Not<M> {}

/// Succeeds when both constituents succeed.
#[derive(Clone, Debug)]
pub struct And<A, B> {
    left: A,
    right: B,
}

impl<A, B> And<A, B> {
    /// Combines the given matchers.
    pub const fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<T: ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for And<A, B> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let left = self.left.apply(value, description)?;
        let right = self.right.apply(value, description)?;

        let ko_message = if left.success {
            right.ko_message
        } else {
            left.ko_message
        };

        Ok(MatchOutcome::new(
            left.success && right.success,
            format!("{} and {}", left.ok_message, right.ok_message),
            ko_message,
        ))
    }
}

impl<A, B> MatcherExt for And<A, B> {}

/// Succeeds when either constituent succeeds.
#[derive(Clone, Debug)]
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<A, B> Or<A, B> {
    /// Combines the given matchers.
    pub const fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<T: ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for Or<A, B> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let left = self.left.apply(value, description)?;
        let right = self.right.apply(value, description)?;

        let ok_message = if left.success {
            left.ok_message
        } else {
            right.ok_message
        };

        Ok(MatchOutcome::new(
            left.success || right.success,
            ok_message,
            format!("{} and {}", left.ko_message, right.ko_message),
        ))
    }
}

impl<A, B> MatcherExt for Or<A, B> {}

/// Succeeds when every matcher in a homogeneous list succeeds.
#[derive(Clone, Debug)]
pub struct AllOf<M> {
    matchers: Vec<M>,
}

/// Returns a matcher succeeding when all of `matchers` succeed. An empty list
/// always succeeds.
pub fn all_of<M>(matchers: impl IntoIterator<Item = M>) -> AllOf<M> {
    AllOf {
        matchers: matchers.into_iter().collect(),
    }
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for AllOf<M> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let outcomes = self
            .matchers
            .iter()
            .map(|m| m.apply(value, description))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MatchOutcome::new(
            outcomes.iter().all(|o| o.success),
            outcomes.iter().map(|o| o.ok_message.as_str()).join(", "),
            outcomes
                .iter()
                .filter(|o| !o.success)
                .map(|o| o.ko_message.as_str())
                .join(", "),
        ))
    }
}

impl<M> MatcherExt for AllOf<M> {}

/// Succeeds when at least one matcher in a homogeneous list succeeds.
#[derive(Clone, Debug)]
pub struct AnyOf<M> {
    matchers: Vec<M>,
}

/// Returns a matcher succeeding when any of `matchers` succeeds. An empty list
/// never succeeds.
pub fn any_of<M>(matchers: impl IntoIterator<Item = M>) -> AnyOf<M> {
    AnyOf {
        matchers: matchers.into_iter().collect(),
    }
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for AnyOf<M> {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let outcomes = self
            .matchers
            .iter()
            .map(|m| m.apply(value, description))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MatchOutcome::new(
            outcomes.iter().any(|o| o.success),
            outcomes
                .iter()
                .filter(|o| o.success)
                .map(|o| o.ok_message.as_str())
                .join(", "),
            outcomes.iter().map(|o| o.ko_message.as_str()).join(", "),
        ))
    }
}

impl<M> MatcherExt for AnyOf<M> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{be_greater_than, be_less_than, equal};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_and_reports_first_failing_side() -> anyhow::Result<()> {
        let between = be_greater_than(0).and(be_less_than(10));
        assert!(between.apply(&5, None)?.success);

        let outcome = between.apply(&12, Some("x"))?;
        assert!(!outcome.success);
        assert_eq!(outcome.ko_message, "x 12 is not less than 10");
        Ok(())
    }

    #[test]
    fn test_or_reports_both_failures() -> anyhow::Result<()> {
        let either = equal(1).or(equal(2));
        assert!(either.apply(&2, None)?.success);
        assert_eq!(either.apply(&2, None)?.ok_message, "2 is equal to 2");

        let outcome = either.apply(&3, None)?;
        assert!(!outcome.success);
        assert_eq!(outcome.ko_message, "3 is not equal to 1 and 3 is not equal to 2");
        Ok(())
    }

    #[test]
    fn test_negated_composite_keeps_messages_accurate() -> anyhow::Result<()> {
        let outcome = equal(1).or(equal(2)).negate().apply(&2, None)?;
        assert!(!outcome.success);
        assert_eq!(outcome.ko_message, "2 is equal to 2");
        Ok(())
    }

    #[test]
    fn test_all_of_and_any_of() -> anyhow::Result<()> {
        let matchers = || vec![equal(1), equal(2)];

        assert!(!all_of(matchers()).apply(&1, None)?.success);
        assert_eq!(all_of(matchers()).apply(&1, None)?.ko_message, "1 is not equal to 2");
        assert!(any_of(matchers()).apply(&1, None)?.success);
        assert!(!any_of(matchers()).apply(&3, None)?.success);

        assert!(all_of(Vec::<crate::matchers::Equal<i32>>::new()).apply(&1, None)?.success);
        assert!(!any_of(Vec::<crate::matchers::Equal<i32>>::new()).apply(&1, None)?.success);
        Ok(())
    }
}
