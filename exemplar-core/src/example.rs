//! Examples and example sets.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::context::ExampleContext;
use crate::error::Error;
use crate::listener::ExpectationListener;
use crate::options::RunOptions;
use crate::outcome::Outcome;
use crate::trace_categories;

type Body = Box<dyn FnMut(&ExampleContext) -> Result<(), Error>>;

/// A named example: an optional deferred body plus nested examples.
pub struct Example {
    description: String,
    body: Option<Body>,
    examples: ExampleSet,
    outcomes: Vec<Outcome>,
    expectations: usize,
    executed: bool,
    filtered_out: bool,
    listener: Option<Rc<dyn ExpectationListener>>,
}

impl Example {
    /// Returns a new example without a body.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            body: None,
            examples: ExampleSet::default(),
            outcomes: Vec::new(),
            expectations: 0,
            executed: false,
            filtered_out: false,
            listener: None,
        }
    }

    /// Returns this example with the given body.
    #[must_use]
    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: FnMut(&ExampleContext) -> Result<(), Error> + 'static,
    {
        self.body = Some(Box::new(body));
        self
    }

    /// Binds a user listener notified of every expectation checked by this
    /// example.
    pub fn set_listener(&mut self, listener: Rc<dyn ExpectationListener>) -> &mut Self {
        self.listener = Some(listener);
        self
    }

    /// Adds nested examples.
    pub fn nest<F>(&mut self, declare: F) -> &mut Self
    where
        F: FnOnce(&mut ExampleSet),
    {
        declare(&mut self.examples);
        self
    }

    /// Returns the example's description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the nested examples.
    pub fn examples(&self) -> &[Example] {
        self.examples.as_slice()
    }

    /// Returns the outcomes recorded so far, in the order they occurred.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Returns whether there is a body to execute; groups have none.
    pub const fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Returns whether the body ran since the last reset.
    pub const fn is_executed(&self) -> bool {
        self.executed
    }

    /// Returns the number of matcher applications made by the last run.
    pub const fn expectation_count(&self) -> usize {
        self.expectations
    }

    /// Returns whether no failure or error has been recorded. Skips do not count
    /// against success.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_skip)
    }

    /// Runs the body, at most once until the next [`Example::reset`].
    ///
    /// Returns whether the body ran. The body runs inside a panic boundary: a
    /// panic or an error returned by the body is recorded as an error outcome,
    /// except for [`Error::Skipped`], which is recorded as a skip.
    pub fn execute(&mut self) -> bool {
        if self.executed {
            tracing::debug!(target: trace_categories::EXAMPLES, "not re-running example: {}", self.description);
            return false;
        }

        let Some(body) = self.body.as_mut() else {
            return false;
        };
        self.executed = true;

        tracing::debug!(target: trace_categories::EXAMPLES, "running example: {}", self.description);

        let context = ExampleContext::new(self.description.clone(), self.listener.clone());
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&context)));

        match result {
            Ok(Ok(())) => (),
            Ok(Err(err)) => context.record(Outcome::from_error(err)),
            Err(payload) => context.record(Outcome::error(Error::from_panic(payload))),
        }

        self.absorb(context);
        true
    }

    /// Re-enters the example with a fresh context bound to it. Anything the
    /// closure captures is appended to this example's outcome list.
    ///
    /// # Arguments
    ///
    /// * `f` - Code to run against the example's context.
    pub fn reenter<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&ExampleContext) -> R,
    {
        let context = ExampleContext::new(self.description.clone(), self.listener.clone());
        let result = f(&context);
        self.absorb(context);
        result
    }

    /// Clears recorded outcomes here and in nested examples so the example can
    /// run again.
    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.expectations = 0;
        self.executed = false;
        self.filtered_out = false;
        for nested in self.examples.iter_mut() {
            nested.reset();
        }
    }

    /// Runs the body unless planning or filtered out. Like execution, the skip
    /// for a filtered-out example is recorded once until the next reset.
    pub(crate) fn run(&mut self, options: &RunOptions, prefix: &str) {
        let qualified = qualify(prefix, &self.description);

        if options.plan_only {
            tracing::debug!(target: trace_categories::EXAMPLES, "planned: {qualified}");
        } else if !options.filter.selects(&qualified) {
            if self.has_body() && !self.executed && !self.filtered_out {
                tracing::debug!(target: trace_categories::EXAMPLES, "filtered out: {qualified}");
                self.filtered_out = true;
                self.outcomes.push(Outcome::skip("filtered out"));
            }
        } else {
            self.execute();
        }

        for nested in self.examples.iter_mut() {
            nested.run(options, &qualified);
        }
    }

    pub(crate) fn collect_names(&self, prefix: &str, names: &mut Vec<String>) {
        let qualified = qualify(prefix, &self.description);
        names.push(qualified.clone());
        for nested in self.examples.iter() {
            nested.collect_names(&qualified, names);
        }
    }

    fn absorb(&mut self, context: ExampleContext) {
        let (outcomes, expectations) = context.into_parts();
        self.outcomes.extend(outcomes);
        self.expectations += expectations;
    }
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("description", &self.description)
            .field("has_body", &self.body.is_some())
            .field("examples", &self.examples)
            .field("outcomes", &self.outcomes)
            .field("executed", &self.executed)
            .field("filtered_out", &self.filtered_out)
            .finish_non_exhaustive()
    }
}

pub(crate) fn qualify(prefix: &str, description: &str) -> String {
    if prefix.is_empty() {
        description.to_owned()
    } else {
        format!("{prefix} {description}")
    }
}

/// Ordered collection of examples, in declaration order.
#[derive(Debug, Default)]
pub struct ExampleSet {
    examples: Vec<Example>,
}

impl ExampleSet {
    /// Declares an example with a body and returns it.
    ///
    /// # Arguments
    ///
    /// * `description` - Completes the sentence started by the enclosing
    ///   system's verb, e.g. `"add one"`.
    /// * `body` - Runs when the example is executed.
    pub fn example<F>(&mut self, description: impl Into<String>, body: F) -> &mut Example
    where
        F: FnMut(&ExampleContext) -> Result<(), Error> + 'static,
    {
        self.push(Example::new(description).with_body(body))
    }

    /// Declares a bodyless example holding nested examples.
    pub fn group<F>(&mut self, description: impl Into<String>, declare: F) -> &mut Example
    where
        F: FnOnce(&mut ExampleSet),
    {
        let example = self.push(Example::new(description));
        example.nest(declare);
        example
    }

    /// Appends an example and returns it.
    pub fn push(&mut self, example: Example) -> &mut Example {
        let index = self.examples.len();
        self.examples.push(example);
        &mut self.examples[index]
    }

    /// Returns an iterator over the examples in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    /// Returns a mutable iterator over the examples in declaration order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Example> {
        self.examples.iter_mut()
    }

    /// Returns the examples as a slice.
    pub fn as_slice(&self) -> &[Example] {
        &self.examples
    }

    /// Returns the number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Returns whether no example was declared.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

impl<'s> IntoIterator for &'s ExampleSet {
    type Item = &'s Example;
    type IntoIter = std::slice::Iter<'s, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::ExpectationCounter;
    use crate::matchers::equal;
    use crate::options::ExampleFilter;
    use crate::outcome::OutcomeKind;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn test_execute_runs_body_once() {
        let runs = Rc::new(Cell::new(0));
        let observed = runs.clone();
        let mut example = Example::new("counts").with_body(move |_| {
            observed.set(observed.get() + 1);
            Ok(())
        });

        assert!(example.execute());
        assert!(!example.execute());
        assert_eq!(runs.get(), 1);
        assert!(example.is_executed());

        example.reset();
        assert!(example.execute());
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_body_errors_and_panics() {
        let mut sets = ExampleSet::default();
        sets.example("errs", |_| Err(Error::custom("broken")));
        sets.example("skips", |cx| cx.skip("not yet"));
        sets.example("panics", |_| panic!("boom"));
        sets.example("fails via ?", |_| {
            crate::expectable::expect(1).must(equal(2)).into_result()?;
            Ok(())
        });

        let kinds: Vec<_> = sets
            .iter_mut()
            .map(|example| {
                example.execute();
                example.outcomes().iter().map(Outcome::kind).collect::<Vec<_>>()
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                vec![OutcomeKind::Error],
                vec![OutcomeKind::Skip],
                vec![OutcomeKind::Error],
                vec![OutcomeKind::Failure],
            ]
        );
    }

    #[test]
    fn test_propagated_failure_keeps_assertion_site() {
        let mut example = Example::new("fails via ?").with_body(|_| {
            crate::expectable::expect(1).must(equal(2)).into_result()?;
            Ok(())
        });
        example.execute();

        let outcome = &example.outcomes()[0];
        assert_eq!(outcome.kind(), OutcomeKind::Failure);
        assert_eq!(outcome.message(), "1 is not equal to 2");
        assert_eq!(outcome.location().map(|l| l.file()), Some(file!()));
    }

    #[test]
    fn test_failures_do_not_stop_the_body() {
        let mut example = Example::new("keeps going").with_body(|cx| {
            cx.expect(1).must(equal(2));
            cx.expect(2).must(equal(3));
            cx.expect(3).must(equal(3));
            Ok(())
        });

        example.execute();
        assert_eq!(example.outcomes().len(), 2);
        assert_eq!(example.expectation_count(), 3);
        assert!(!example.is_success());
    }

    #[test]
    fn test_reenter_appends_to_outcomes() {
        let mut example = Example::new("deferred").with_body(|cx| {
            cx.expect("a").must(equal("b"));
            Ok(())
        });
        example.execute();

        let passed = example.reenter(|cx| cx.expect(5).must(equal(6)).commit());
        assert!(!passed);
        assert_eq!(
            example.outcomes().iter().map(Outcome::message).collect::<Vec<_>>(),
            vec![r#""a" is not equal to "b""#, "5 is not equal to 6"]
        );
    }

    #[test]
    fn test_listener_is_bound_per_example() {
        let counter = Rc::new(ExpectationCounter::new());
        let mut example = Example::new("listened").with_body(|cx| {
            cx.expect(1).must(equal(1)).or(equal(2));
            cx.expect(1).must(equal(2)).or(equal(1));
            Ok(())
        });
        example.set_listener(counter.clone());
        example.execute();

        assert_eq!(counter.count(), 3);
        assert_eq!(example.expectation_count(), 3);
        assert!(example.is_success());
    }

    #[test]
    fn test_run_respects_plan_only_and_filters() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let mut example = Example::new("group");
        example.nest(|nested| {
            nested.example("runs", move |_| {
                flag.set(true);
                Ok(())
            });
            nested.example("is filtered", |_| Ok(()));
        });

        example.run(&RunOptions::new().with_plan_only(true), "thing should");
        assert!(!ran.get());
        assert!(example.examples().iter().all(|e| e.outcomes().is_empty()));

        let options = RunOptions::new().with_filter(ExampleFilter {
            exclude: vec![String::from("filtered")],
            ..ExampleFilter::default()
        });
        example.run(&options, "thing should");
        assert!(ran.get());
        assert!(example.examples()[0].is_executed());
        assert_eq!(example.examples()[1].outcomes()[0].kind(), OutcomeKind::Skip);
    }

    #[test]
    fn test_filtered_skip_is_recorded_once_until_reset() {
        let mut example = Example::new("is filtered").with_body(|_| Ok(()));
        let options = RunOptions::new().with_filter(ExampleFilter {
            exclude: vec![String::from("filtered")],
            ..ExampleFilter::default()
        });

        example.run(&options, "");
        example.run(&options, "");
        assert_eq!(example.outcomes().len(), 1);
        assert!(!example.is_executed());

        example.reset();
        example.run(&options, "");
        assert_eq!(example.outcomes().len(), 1);
    }

    #[test]
    fn test_qualified_names() {
        let mut example = Example::new("outer");
        example.nest(|nested| {
            nested.example("inner", |_| Ok(()));
        });

        let mut names = Vec::new();
        example.collect_names("a stack should", &mut names);
        assert_eq!(
            names,
            vec!["a stack should outer", "a stack should outer inner"]
        );
    }
}
