//! Runs collections of specifications and summarizes their outcomes.

use std::fmt;

use exemplar_core::{
    Example, RunOptions, Specification, SpecificationStats, Sus, TreeVisitor,
};

use crate::config::{Config, HarnessOptions};
use crate::events::RUNNER;

/// Runs specifications with a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct SpecRunner {
    options: RunOptions,
    verbose: bool,
}

impl SpecRunner {
    /// Creates a new runner with the given options.
    pub const fn new(options: RunOptions) -> Self {
        Self {
            options,
            verbose: false,
        }
    }

    /// Creates a runner from the layered configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration file.
    /// * `options` - The parsed command-line options.
    pub fn from_config(config: &Config, options: &HarnessOptions) -> Self {
        Self::new(config.to_run_options(options)).with_verbose(options.verbose)
    }

    /// Sets whether passing examples are reported too.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the options every run uses.
    pub const fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Resets and runs each specification in order, then reports the results.
    pub fn run(&self, specifications: &mut [Specification]) -> RunSummary {
        let mut summary = RunSummary::default();

        for specification in specifications.iter_mut() {
            specification.reset();
            let stats = specification.run(&self.options);

            let mut reporter = Reporter::new(self.verbose);
            specification.walk(&mut reporter);

            summary.specifications += 1;
            summary.stats.merge(&stats);
            summary.failed_examples.extend(reporter.failed);
        }

        tracing::info!(target: RUNNER, "{summary}");
        summary
    }

    /// Returns the qualified names of every example without running anything.
    pub fn list(specifications: &[Specification]) -> Vec<String> {
        specifications
            .iter()
            .flat_map(Specification::example_names)
            .collect()
    }
}

/// Aggregate results of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of specifications run.
    pub specifications: usize,
    /// Counts merged across all specifications.
    pub stats: SpecificationStats,
    /// Qualified names of examples with a failure or error, in run order.
    pub failed_examples: Vec<String>,
}

impl RunSummary {
    /// Returns whether no failure or error was recorded.
    pub const fn is_success(&self) -> bool {
        self.stats.is_success()
    }

    /// Returns the number of executed examples without failures or errors.
    pub fn succeeded(&self) -> usize {
        self.stats.executed.saturating_sub(self.failed_examples.len())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} example(s) ran: {} succeeded, {} failure(s), {} error(s), {} skipped; {} expectation(s) checked.",
            self.stats.executed,
            self.succeeded(),
            self.stats.failures,
            self.stats.errors,
            self.stats.skips,
            self.stats.expectations,
        )
    }
}

/// Logs per-example results while collecting failing example names.
struct Reporter {
    verbose: bool,
    names: Vec<String>,
    failed: Vec<String>,
}

impl Reporter {
    const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            names: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl TreeVisitor for Reporter {
    fn enter_sus(&mut self, sus: &Sus) {
        self.names.push(sus.qualified_name());
    }

    fn leave_sus(&mut self, _sus: &Sus) {
        self.names.pop();
    }

    fn enter_example(&mut self, example: &Example, _depth: usize) {
        let name = match self.names.last() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} {}", example.description()),
            _ => example.description().to_owned(),
        };

        if !example.is_success() {
            for outcome in example.outcomes() {
                tracing::warn!(target: RUNNER, "{name}: {outcome}");
            }
            self.failed.push(name.clone());
        } else if example.is_executed() {
            if self.verbose {
                tracing::info!(target: RUNNER, "{name}: ok");
            } else {
                tracing::debug!(target: RUNNER, "{name}: ok");
            }
        } else if example.has_body() {
            tracing::debug!(target: RUNNER, "{name}: not run");
        }

        self.names.push(name);
    }

    fn leave_example(&mut self, _example: &Example, _depth: usize) {
        self.names.pop();
    }
}
