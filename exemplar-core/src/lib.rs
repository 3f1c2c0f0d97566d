//! Expectation evaluation engine for behaviour specifications. Implements the
//! specification tree, lazily evaluated expectables, the matcher protocol and the
//! `or` / `xor` combinators.
//!
//! # Example
//!
//! ```
//! use exemplar_core::{RunOptions, Specification, matchers::equal};
//!
//! let mut spec = Specification::new("arithmetic");
//! spec.specify("addition").should(|examples| {
//!     examples.example("add one", |cx| {
//!         cx.expect(1 + 1).must(equal(2));
//!         cx.expect(2 + 1).must(equal(4)).or(equal(3));
//!         Ok(())
//!     });
//! });
//!
//! let stats = spec.run(&RunOptions::default());
//! assert!(stats.is_success());
//! assert_eq!(stats.expectations, 3);
//! ```

pub mod matchers;
pub mod trace_categories;

mod context;
mod error;
mod example;
mod expectable;
mod listener;
mod options;
mod outcome;
mod results;
mod specification;
mod sus;

pub use context::{BoundExpectable, Captured, ExampleContext};
pub use error::{BoxedError, Error};
pub use example::{Example, ExampleSet};
pub use expectable::{Evaluate, Expectable, expect, expect_with, try_expect};
pub use listener::{ExpectableSnapshot, ExpectationCounter, ExpectationListener};
pub use options::{ExampleFilter, RunOptions};
pub use outcome::{Outcome, OutcomeKind};
pub use results::{Evaluated, Expectation, Failure};
pub use specification::{Specification, SpecificationStats, TreeVisitor};
pub use sus::{Sus, SusBuilder};
