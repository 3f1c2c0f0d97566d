//! Systems under specification.

use crate::example::{Example, ExampleSet};
use crate::options::RunOptions;
use crate::trace_categories;

/// A system under specification: a described subject plus the examples
/// specifying its behaviour.
#[derive(Debug, Default)]
pub struct Sus {
    description: Option<String>,
    verb: String,
    examples: ExampleSet,
}

impl Sus {
    /// Returns a new system with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Returns a new system without a description.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the system's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the verb examples complete, e.g. `"should"` or `"should and can"`.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Sets the verb when none is set yet; otherwise appends `" and <verb>"`.
    /// Repeating the current last verb is a no-op.
    pub fn extend_verb(&mut self, verb: &str) {
        if self.verb.is_empty() {
            verb.clone_into(&mut self.verb);
        } else if self.verb.rsplit(" and ").next() != Some(verb) {
            self.verb.push_str(" and ");
            self.verb.push_str(verb);
        }
    }

    /// Returns `"<description> <verb>"`, omitting whichever part is empty.
    pub fn qualified_name(&self) -> String {
        match (self.description.as_deref(), self.verb.as_str()) {
            (Some(description), "") => description.to_owned(),
            (Some(description), verb) => format!("{description} {verb}"),
            (None, verb) => verb.to_owned(),
        }
    }

    /// Returns the examples declared so far.
    pub fn examples(&self) -> &[Example] {
        self.examples.as_slice()
    }

    /// Returns the examples for declaring more of them.
    pub fn examples_mut(&mut self) -> &mut ExampleSet {
        &mut self.examples
    }

    /// Extends the verb, then runs `declare` immediately to add examples.
    ///
    /// # Arguments
    ///
    /// * `verb` - The verb the declared examples complete.
    /// * `declare` - Populates the example set.
    pub fn declare<F>(&mut self, verb: &str, declare: F) -> &mut Self
    where
        F: FnOnce(&mut ExampleSet),
    {
        self.extend_verb(verb);
        declare(&mut self.examples);
        self
    }

    pub(crate) fn run(&mut self, options: &RunOptions) {
        let prefix = self.qualified_name();
        tracing::debug!(target: trace_categories::EXAMPLES, "entering system: {prefix}");

        for example in self.examples.iter_mut() {
            example.run(options, &prefix);
        }
    }

    pub(crate) fn reset(&mut self) {
        for example in self.examples.iter_mut() {
            example.reset();
        }
    }

    pub(crate) fn collect_names(&self, names: &mut Vec<String>) {
        let prefix = self.qualified_name();
        for example in &self.examples {
            example.collect_names(&prefix, names);
        }
    }
}

/// Restricts a freshly specified system to the `should` / `can` verbs.
#[derive(Debug)]
pub struct SusBuilder<'s> {
    sus: &'s mut Sus,
}

impl<'s> SusBuilder<'s> {
    pub(crate) const fn new(sus: &'s mut Sus) -> Self {
        Self { sus }
    }

    /// Declares what the system should do.
    pub fn should<F>(self, declare: F) -> &'s mut Sus
    where
        F: FnOnce(&mut ExampleSet),
    {
        self.sus.declare("should", declare)
    }

    /// Declares what the system can do.
    pub fn can<F>(self, declare: F) -> &'s mut Sus
    where
        F: FnOnce(&mut ExampleSet),
    {
        self.sus.declare("can", declare)
    }
}
