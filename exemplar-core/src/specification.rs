//! The specification tree root and its traversal.

use crate::example::Example;
use crate::options::RunOptions;
use crate::sus::{Sus, SusBuilder};
use crate::trace_categories;

/// A named root owning systems under specification in declaration order.
#[derive(Debug, Default)]
pub struct Specification {
    name: String,
    description: Option<String>,
    systems: Vec<Sus>,
}

impl Specification {
    /// Returns a new, empty specification.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            systems: Vec::new(),
        }
    }

    /// Returns this specification with the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the specification's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the specification's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Appends a described system and returns a builder for its examples.
    ///
    /// # Arguments
    ///
    /// * `description` - Names the system, e.g. `"a calculator"`.
    pub fn specify(&mut self, description: impl Into<String>) -> SusBuilder<'_> {
        SusBuilder::new(self.add_system(Sus::new(description)))
    }

    /// Appends a system without a description and returns a builder for its
    /// examples.
    pub fn specify_anonymous(&mut self) -> SusBuilder<'_> {
        SusBuilder::new(self.add_system(Sus::anonymous()))
    }

    /// Appends a system and returns it.
    pub fn add_system(&mut self, sus: Sus) -> &mut Sus {
        let index = self.systems.len();
        self.systems.push(sus);
        &mut self.systems[index]
    }

    /// Returns the systems in declaration order.
    pub fn systems(&self) -> &[Sus] {
        &self.systems
    }

    /// Walks the tree depth-first in declaration order.
    ///
    /// # Arguments
    ///
    /// * `visitor` - Receives enter/leave notifications for every node.
    pub fn walk<V: TreeVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.enter_specification(self);
        for sus in &self.systems {
            visitor.enter_sus(sus);
            for example in sus.examples() {
                walk_example(example, 0, visitor);
            }
            visitor.leave_sus(sus);
        }
        visitor.leave_specification(self);
    }

    /// Runs every selected example in declaration order and returns the
    /// resulting statistics. Outcomes accumulate until [`Specification::reset`].
    pub fn run(&mut self, options: &RunOptions) -> SpecificationStats {
        tracing::debug!(
            target: trace_categories::EXAMPLES,
            plan_only = options.plan_only,
            "running specification: {}",
            self.name
        );

        for sus in &mut self.systems {
            sus.run(options);
        }

        self.stats()
    }

    /// Returns statistics over the outcomes recorded so far.
    pub fn stats(&self) -> SpecificationStats {
        let mut stats = SpecificationStats::default();
        self.walk(&mut stats);
        stats
    }

    /// Clears recorded outcomes so the specification can run again.
    pub fn reset(&mut self) {
        for sus in &mut self.systems {
            sus.reset();
        }
    }

    /// Returns the qualified names of every example, in traversal order.
    pub fn example_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for sus in &self.systems {
            sus.collect_names(&mut names);
        }
        names
    }
}

fn walk_example<V: TreeVisitor + ?Sized>(example: &Example, depth: usize, visitor: &mut V) {
    visitor.enter_example(example, depth);
    for nested in example.examples() {
        walk_example(nested, depth + 1, visitor);
    }
    visitor.leave_example(example, depth);
}

/// Receives notifications during [`Specification::walk`]. Every method defaults
/// to doing nothing.
#[allow(unused_variables)]
pub trait TreeVisitor {
    /// Called before anything else in the specification.
    fn enter_specification(&mut self, specification: &Specification) {}

    /// Called after everything else in the specification.
    fn leave_specification(&mut self, specification: &Specification) {}

    /// Called before the examples of a system.
    fn enter_sus(&mut self, sus: &Sus) {}

    /// Called after the examples of a system.
    fn leave_sus(&mut self, sus: &Sus) {}

    /// Called for each example; `depth` is 0 for examples directly under a
    /// system.
    fn enter_example(&mut self, example: &Example, depth: usize) {}

    /// Called once the example's nested examples have been visited.
    fn leave_example(&mut self, example: &Example, depth: usize) {}
}

/// Aggregate counts over a specification's examples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpecificationStats {
    /// Examples with a body.
    pub examples: usize,
    /// Examples whose body ran.
    pub executed: usize,
    /// Matcher applications observed.
    pub expectations: usize,
    /// Failure outcomes.
    pub failures: usize,
    /// Error outcomes.
    pub errors: usize,
    /// Skip outcomes.
    pub skips: usize,
}

impl SpecificationStats {
    /// Adds `other`'s counts to these.
    pub const fn merge(&mut self, other: &Self) {
        self.examples += other.examples;
        self.executed += other.executed;
        self.expectations += other.expectations;
        self.failures += other.failures;
        self.errors += other.errors;
        self.skips += other.skips;
    }

    /// Returns whether no failure or error was recorded.
    pub const fn is_success(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

impl TreeVisitor for SpecificationStats {
    fn enter_example(&mut self, example: &Example, _depth: usize) {
        if example.has_body() {
            self.examples += 1;
        }
        if example.is_executed() {
            self.executed += 1;
        }
        self.expectations += example.expectation_count();

        for outcome in example.outcomes() {
            if outcome.is_failure() {
                self.failures += 1;
            } else if outcome.is_error() {
                self.errors += 1;
            } else {
                self.skips += 1;
            }
        }
    }
}
