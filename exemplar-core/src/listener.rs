//! Observation of matcher applications.

use std::cell::Cell;

/// Read-only view of an expectable, handed to listeners just before a matcher is
/// applied to it.
#[derive(Clone, Copy, Debug)]
pub struct ExpectableSnapshot<'s> {
    /// Human description of the value, if one was given.
    pub description: Option<&'s str>,
    /// Whether the pending application will be negated.
    pub negated: bool,
    /// Name of the value's type.
    pub value_type: &'static str,
}

/// Observer notified once per real (non-sentinel) matcher application.
///
/// Listeners are used for counting and aggregation; they never influence the
/// verdict of the expectation being checked.
pub trait ExpectationListener {
    /// Called before the matcher is applied.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The expectable about to be checked.
    fn on_expectation(&self, snapshot: &ExpectableSnapshot<'_>);
}

impl<L: ExpectationListener + ?Sized> ExpectationListener for std::rc::Rc<L> {
    fn on_expectation(&self, snapshot: &ExpectableSnapshot<'_>) {
        (**self).on_expectation(snapshot);
    }
}

/// Listener that counts the expectations it observes.
#[derive(Debug, Default)]
pub struct ExpectationCounter {
    count: Cell<usize>,
}

impl ExpectationCounter {
    /// Returns a new counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of expectations observed so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Resets the count to zero.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl ExpectationListener for ExpectationCounter {
    fn on_expectation(&self, _snapshot: &ExpectableSnapshot<'_>) {
        self.count.set(self.count.get() + 1);
    }
}
