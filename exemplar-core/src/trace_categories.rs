//! Trace utilities

/// Trace category for or/xor combinator decisions.
pub const COMBINATORS: &str = "combinators";
/// Trace category for example execution.
pub const EXAMPLES: &str = "examples";
/// Trace category for matcher application.
pub const EXPECTATIONS: &str = "expectations";
/// Trace category for expectation listener notifications.
pub const LISTENERS: &str = "listeners";
