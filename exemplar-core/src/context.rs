//! The per-example context and the capturing evaluator.
//!
//! Expectables created through an [`ExampleContext`] are *bound*: an unmet
//! expectation never reaches the caller. Instead it is captured into the
//! example's outcome list, so one failing assertion does not stop the remaining
//! assertions of the same example from running.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::rc::Rc;

use crate::error::{BoxedError, Error};
use crate::expectable::{self, Evaluate, Expectable};
use crate::listener::{ExpectableSnapshot, ExpectationListener};
use crate::matchers::Matcher;
use crate::outcome::Outcome;
use crate::results::Evaluated;
use crate::trace_categories;

/// State handed to an example body while it runs.
pub struct ExampleContext {
    description: String,
    outcomes: RefCell<Vec<Outcome>>,
    expectations: Cell<usize>,
    listener: Option<Rc<dyn ExpectationListener>>,
}

impl ExampleContext {
    pub(crate) fn new(description: String, listener: Option<Rc<dyn ExpectationListener>>) -> Self {
        Self {
            description,
            outcomes: RefCell::new(Vec::new()),
            expectations: Cell::new(0),
            listener,
        }
    }

    /// Returns the description of the example being run.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Wraps a value in an expectable bound to this example.
    pub fn expect<'a, T: Clone + 'a>(&'a self, value: T) -> BoundExpectable<'a, T> {
        self.bind(expectable::expect(value))
    }

    /// Wraps a producer in an expectable bound to this example.
    pub fn expect_with<'a, T, F>(&'a self, producer: F) -> BoundExpectable<'a, T>
    where
        F: Fn() -> T + 'a,
    {
        self.bind(expectable::expect_with(producer))
    }

    /// Wraps a fallible producer in an expectable bound to this example.
    pub fn try_expect<'a, T, E, F>(&'a self, producer: F) -> BoundExpectable<'a, T>
    where
        F: Fn() -> Result<T, E> + 'a,
        E: Into<BoxedError>,
    {
        self.bind(expectable::try_expect(producer))
    }

    /// Binds an existing expectable to this example. The example replaces any
    /// listener previously attached to the expectable.
    pub fn bind<'a, T>(&'a self, expectable: Expectable<'a, T>) -> BoundExpectable<'a, T> {
        BoundExpectable {
            inner: expectable.with_listener(self),
            context: self,
        }
    }

    /// Captures the result of an evaluation built outside this context, returning
    /// whether it passed.
    pub fn check<T>(&self, evaluated: Evaluated<'_, T>) -> bool {
        self.conclude(evaluated)
    }

    /// Records a failure that did not come from a matcher.
    #[track_caller]
    pub fn fail(&self, message: impl Into<String>) {
        self.record(Outcome::failure(message, Some(Location::caller())));
    }

    /// Returns an error asking for the example to be skipped. Meant to be
    /// returned from the body with `?`.
    pub fn skip(&self, reason: impl Into<String>) -> Result<(), Error> {
        Err(Error::Skipped(reason.into()))
    }

    /// Returns the number of matcher applications observed so far.
    pub fn expectation_count(&self) -> usize {
        self.expectations.get()
    }

    /// Returns the number of outcomes recorded so far.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.borrow().len()
    }

    pub(crate) fn conclude<T>(&self, evaluated: Evaluated<'_, T>) -> bool {
        match evaluated {
            Evaluated::Passed(_) => true,
            Evaluated::Failed(failure) => {
                let location = failure.location();
                self.record(Outcome::failure(failure.into_error().to_string(), Some(location)));
                false
            }
            Evaluated::Errored(err) => {
                self.record(Outcome::from_error(err));
                false
            }
        }
    }

    pub(crate) fn record(&self, outcome: Outcome) {
        tracing::debug!(target: trace_categories::EXAMPLES, "{}: recorded {outcome}", self.description);
        self.outcomes.borrow_mut().push(outcome);
    }

    pub(crate) fn into_parts(self) -> (Vec<Outcome>, usize) {
        (self.outcomes.into_inner(), self.expectations.get())
    }
}

impl ExpectationListener for ExampleContext {
    fn on_expectation(&self, snapshot: &ExpectableSnapshot<'_>) {
        self.expectations.set(self.expectations.get() + 1);
        tracing::trace!(
            target: trace_categories::LISTENERS,
            "{}: expectation #{} on {}",
            self.description,
            self.expectations.get(),
            snapshot.description.unwrap_or(snapshot.value_type)
        );

        if let Some(listener) = &self.listener {
            listener.on_expectation(snapshot);
        }
    }
}

impl fmt::Debug for ExampleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleContext")
            .field("description", &self.description)
            .field("outcomes", &self.outcomes)
            .field("expectations", &self.expectations)
            .finish_non_exhaustive()
    }
}

/// An expectable bound to an example. Matcher applications never return a
/// signal; see [`Captured`].
pub struct BoundExpectable<'a, T> {
    inner: Expectable<'a, T>,
    context: &'a ExampleContext,
}

impl<'a, T> BoundExpectable<'a, T> {
    /// Attaches a human description used in matcher messages.
    #[must_use]
    pub fn described(self, description: impl Into<String>) -> Self {
        Self {
            inner: self.inner.described(description),
            context: self.context,
        }
    }

    /// Attaches a renderer applied to success messages.
    #[must_use]
    pub fn with_renderer<F>(self, renderer: F) -> Self
    where
        F: Fn(&str) -> String + 'a,
    {
        Self {
            inner: self.inner.with_renderer(renderer),
            context: self.context,
        }
    }

    /// Negates the next matcher application.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            inner: self.inner.not(),
            context: self.context,
        }
    }

    /// Returns the underlying expectable.
    pub const fn expectable(&self) -> &Expectable<'a, T> {
        &self.inner
    }

    /// Applies a matcher, capturing an unmet expectation into the example.
    ///
    /// # Arguments
    ///
    /// * `matcher` - The matcher to apply.
    #[track_caller]
    pub fn must<M: Matcher<T>>(self, matcher: M) -> Captured<'a, T> {
        self.apply_at(matcher, Location::caller())
    }

    /// Applies the negation of a matcher, capturing an unmet expectation into the
    /// example.
    #[track_caller]
    pub fn must_not<M: Matcher<T>>(self, matcher: M) -> Captured<'a, T> {
        self.not().apply_at(matcher, Location::caller())
    }

    fn apply_at<M: Matcher<T>>(
        self,
        matcher: M,
        location: &'static Location<'static>,
    ) -> Captured<'a, T> {
        let Self { inner, context } = self;
        let evaluated = guarded(move || inner.apply_at(matcher, location));
        Captured::new(context, evaluated)
    }
}

impl<'a, T> Evaluate<T> for BoundExpectable<'a, T> {
    type Output = Captured<'a, T>;

    #[track_caller]
    fn apply_matcher<M: Matcher<T>>(self, matcher: M) -> Self::Output {
        self.apply_at(matcher, Location::caller())
    }
}

impl<T> fmt::Debug for BoundExpectable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundExpectable")
            .field("inner", &self.inner)
            .field("example", &self.context.description)
            .finish()
    }
}

/// Placeholder returned by bound matcher applications.
///
/// The evaluation is recorded into the example when the placeholder is dropped
/// or committed; until then `or` / `xor` / `and` may still change it.
pub struct Captured<'a, T> {
    context: &'a ExampleContext,
    state: Option<Evaluated<'a, T>>,
}

impl<'a, T> Captured<'a, T> {
    const fn new(context: &'a ExampleContext, evaluated: Evaluated<'a, T>) -> Self {
        Self {
            context,
            state: Some(evaluated),
        }
    }

    /// Returns whether the evaluation currently holds.
    pub const fn is_passed(&self) -> bool {
        matches!(self.state, Some(Evaluated::Passed(_)))
    }

    /// Returns whether the evaluation currently has a false verdict.
    pub const fn is_failed(&self) -> bool {
        matches!(self.state, Some(Evaluated::Failed(_)))
    }

    /// Returns whether the evaluation errored.
    pub const fn is_errored(&self) -> bool {
        matches!(self.state, Some(Evaluated::Errored(_)))
    }

    /// Applies another matcher if the evaluation holds so far.
    #[track_caller]
    pub fn and<M: Matcher<T>>(self, matcher: M) -> Self {
        let location = Location::caller();
        self.chain(move |state| state.and_at(matcher, location))
    }

    /// Alternative; see [`Evaluated::or`].
    #[track_caller]
    pub fn or<M: Matcher<T>>(self, matcher: M) -> Self {
        let location = Location::caller();
        self.chain(move |state| state.or_at(matcher, location))
    }

    /// Exclusive alternative; see [`Evaluated::xor`].
    #[track_caller]
    pub fn xor<M: Matcher<T>>(self, matcher: M) -> Self {
        let location = Location::caller();
        self.chain(move |state| state.xor_at(matcher, location))
    }

    /// Records the evaluation now and returns whether it passed.
    pub fn commit(mut self) -> bool {
        let context = self.context;
        self.state
            .take()
            .is_none_or(|state| context.conclude(state))
    }

    fn chain<F>(mut self, next: F) -> Self
    where
        F: FnOnce(Evaluated<'a, T>) -> Evaluated<'a, T>,
    {
        let context = self.context;
        match self.state.take() {
            Some(state) => Self::new(context, guarded(move || next(state))),
            None => self,
        }
    }
}

impl<T> Drop for Captured<'_, T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            self.context.conclude(state);
        }
    }
}

impl<T> fmt::Debug for Captured<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured")
            .field("example", &self.context.description)
            .field("state", &self.state)
            .finish()
    }
}

/// Runs a bound evaluation, turning a panic into an error result.
fn guarded<'a, T, F>(evaluate: F) -> Evaluated<'a, T>
where
    F: FnOnce() -> Evaluated<'a, T>,
{
    panic::catch_unwind(AssertUnwindSafe(evaluate)).unwrap_or_else(|payload| {
        let err = Error::from_panic(payload);
        tracing::debug!(target: trace_categories::EXPECTATIONS, "bound evaluation panicked: {err}");
        Evaluated::Errored(err)
    })
}
