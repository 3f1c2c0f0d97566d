//! Lazily evaluated values and the raising evaluator.
//!
//! An [`Expectable`] wraps a by-need value: the producer runs every time the value
//! is needed and nothing is cached. Applying a matcher consumes the expectable and
//! hands it back inside the returned [`Evaluated`], which lets combinators retry
//! the same value with another matcher. Unbound expectables report unmet
//! expectations to their immediate caller; see [`crate::ExampleContext`] for the
//! capturing variant.

use std::fmt;
use std::panic::Location;

use crate::error::{BoxedError, Error};
use crate::listener::{ExpectableSnapshot, ExpectationListener};
use crate::matchers::{Matcher, Not, Sentinel};
use crate::results::{Evaluated, Expectation, Failure};
use crate::trace_categories;

type Producer<'a, T> = Box<dyn Fn() -> Result<T, Error> + 'a>;
type Renderer<'a> = Box<dyn Fn(&str) -> String + 'a>;

/// The capability shared by the raising and capturing evaluators: applying a
/// matcher to the wrapped value.
pub trait Evaluate<T> {
    /// What a matcher application produces.
    type Output;

    /// Applies the given matcher to the wrapped value.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to apply.
    fn apply_matcher<M: Matcher<T>>(self, matcher: M) -> Self::Output;
}

/// A lazily evaluated value awaiting matchers.
pub struct Expectable<'a, T> {
    producer: Producer<'a, T>,
    description: Option<String>,
    negate_next: bool,
    renderer: Option<Renderer<'a>>,
    listener: Option<&'a dyn ExpectationListener>,
}

/// Wraps a value for expectation. The value is cloned on every access.
pub fn expect<'a, T: Clone + 'a>(value: T) -> Expectable<'a, T> {
    Expectable::from_fn(move || Ok(value.clone()))
}

/// Wraps a producer for expectation. The producer runs on every access.
pub fn expect_with<'a, T, F>(producer: F) -> Expectable<'a, T>
where
    F: Fn() -> T + 'a,
{
    Expectable::from_fn(move || Ok(producer()))
}

/// Wraps a fallible producer for expectation. A producer error surfaces as an
/// error outcome rather than as an unmet expectation.
pub fn try_expect<'a, T, E, F>(producer: F) -> Expectable<'a, T>
where
    F: Fn() -> Result<T, E> + 'a,
    E: Into<BoxedError>,
{
    Expectable::from_fn(move || producer().map_err(|e| Error::ValueEvaluation(e.into())))
}

impl<'a, T> Expectable<'a, T> {
    /// Returns a new expectable over the given producer.
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn() -> Result<T, Error> + 'a,
    {
        Self {
            producer: Box::new(producer),
            description: None,
            negate_next: false,
            renderer: None,
            listener: None,
        }
    }

    /// Attaches a human description used in matcher messages.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a renderer applied to success messages.
    #[must_use]
    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&str) -> String + 'a,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Attaches a listener notified before each real matcher application.
    #[must_use]
    pub fn with_listener(mut self, listener: &'a dyn ExpectationListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Negates the next matcher application. The flag is consumed by that
    /// application whatever its outcome.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate_next = true;
        self
    }

    /// Returns the description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the next matcher application will be negated.
    pub const fn is_negated(&self) -> bool {
        self.negate_next
    }

    /// Computes the value. The producer runs again on every call.
    pub fn value(&self) -> Result<T, Error> {
        (self.producer)()
    }

    /// Returns a read-only view of this expectable for listeners.
    pub fn snapshot(&self) -> ExpectableSnapshot<'_> {
        ExpectableSnapshot {
            description: self.description.as_deref(),
            negated: self.negate_next,
            value_type: std::any::type_name::<T>(),
        }
    }

    /// Applies a matcher to the value.
    ///
    /// An unmet expectation is returned as [`Evaluated::Failed`] pointing at the
    /// caller's location; a value that cannot be computed, or a matcher that
    /// cannot reach a verdict, is returned as [`Evaluated::Errored`].
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to apply.
    #[track_caller]
    pub fn must<M: Matcher<T>>(self, matcher: M) -> Evaluated<'a, T> {
        self.apply_at(matcher, Location::caller())
    }

    /// Applies the negation of a matcher to the value.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to negate and apply.
    #[track_caller]
    pub fn must_not<M: Matcher<T>>(self, matcher: M) -> Evaluated<'a, T> {
        self.not().apply_at(matcher, Location::caller())
    }

    pub(crate) fn render(&self, message: &str) -> String {
        match &self.renderer {
            Some(renderer) => renderer(message),
            None => message.to_owned(),
        }
    }

    pub(crate) fn apply_at<M: Matcher<T>>(
        mut self,
        matcher: M,
        location: &'static Location<'static>,
    ) -> Evaluated<'a, T> {
        match matcher.sentinel() {
            Some(Sentinel::AlwaysOk) => {
                tracing::trace!(target: trace_categories::EXPECTATIONS, "always-ok sentinel at {location}");
                return Evaluated::Passed(Expectation::new(self, String::from("ok")).satisfied());
            }
            Some(Sentinel::NegationMarker) => {
                tracing::trace!(target: trace_categories::EXPECTATIONS, "negation sentinel at {location}");
                return Evaluated::Passed(
                    Expectation::new(self.not(), String::from("negated")).satisfied(),
                );
            }
            None => (),
        }

        if let Some(listener) = self.listener {
            tracing::trace!(target: trace_categories::LISTENERS, "notifying listener for {}", std::any::type_name::<T>());
            listener.on_expectation(&self.snapshot());
        }

        let negate = std::mem::take(&mut self.negate_next);

        let value = match self.value() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(target: trace_categories::EXPECTATIONS, "value evaluation failed at {location}: {err}");
                return Evaluated::Errored(err);
            }
        };

        let description = self.description.as_deref();
        let applied = if negate {
            Not::new(&matcher).apply(&value, description)
        } else {
            matcher.apply(&value, description)
        };

        let outcome = match applied {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(target: trace_categories::EXPECTATIONS, "matcher evaluation failed at {location}: {err}");
                return Evaluated::Errored(err);
            }
        };

        tracing::debug!(
            target: trace_categories::EXPECTATIONS,
            success = outcome.success,
            negated = negate,
            "{} ({location})",
            outcome.message()
        );

        if outcome.success {
            Evaluated::Passed(Expectation::new(self, outcome.ok_message))
        } else {
            let expectation = Expectation::new(self, outcome.ok_message);
            Evaluated::Failed(Failure::new(outcome.ko_message, expectation, location))
        }
    }
}

impl<'a, T> Evaluate<T> for Expectable<'a, T> {
    type Output = Evaluated<'a, T>;

    #[track_caller]
    fn apply_matcher<M: Matcher<T>>(self, matcher: M) -> Self::Output {
        self.apply_at(matcher, Location::caller())
    }
}

impl<T> fmt::Debug for Expectable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectable")
            .field("description", &self.description)
            .field("negate_next", &self.negate_next)
            .field("value_type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
