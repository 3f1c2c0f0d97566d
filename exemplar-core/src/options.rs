//! Options controlling a run over a specification tree.

/// Options for running a specification.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Traverse the tree without invoking any example body.
    pub plan_only: bool,
    /// Selects which examples run.
    pub filter: ExampleFilter,
}

impl RunOptions {
    /// Returns options that run every example.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether bodies are skipped entirely.
    #[must_use]
    pub const fn with_plan_only(mut self, plan_only: bool) -> Self {
        self.plan_only = plan_only;
        self
    }

    /// Sets the example filter.
    #[must_use]
    pub fn with_filter(mut self, filter: ExampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Include/exclude filters over qualified example names
/// (`<sus> <verb> <example>`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExampleFilter {
    /// When non-empty, only examples matching one of these run.
    pub include: Vec<String>,
    /// Examples matching one of these never run.
    pub exclude: Vec<String>,
    /// Match whole names instead of substrings.
    pub exact: bool,
}

impl ExampleFilter {
    /// Returns whether no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Returns whether the example with the given qualified name should run.
    ///
    /// # Arguments
    ///
    /// * `qualified_name` - The example's name prefixed by its ancestors.
    pub fn selects(&self, qualified_name: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        // Include filters put us in opt-in mode.
        if !self.include.is_empty() && !self.matches_any(qualified_name, &self.include) {
            return false;
        }

        if !self.exclude.is_empty() && self.matches_any(qualified_name, &self.exclude) {
            return false;
        }

        true
    }

    fn matches_any(&self, qualified_name: &str, filters: &[String]) -> bool {
        if self.exact {
            filters.iter().any(|f| f == qualified_name)
        } else {
            filters.iter().any(|f| qualified_name.contains(f.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str], exact: bool) -> ExampleFilter {
        ExampleFilter {
            include: include.iter().map(|s| (*s).to_owned()).collect(),
            exclude: exclude.iter().map(|s| (*s).to_owned()).collect(),
            exact,
        }
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        assert!(ExampleFilter::default().selects("a stack should push"));
    }

    #[test]
    fn test_substring_filters() {
        let f = filter(&["stack"], &["pop"], false);
        assert!(f.selects("a stack should push"));
        assert!(!f.selects("a stack should pop"));
        assert!(!f.selects("a queue should push"));
    }

    #[test]
    fn test_exact_filters() {
        let f = filter(&["a stack should push"], &[], true);
        assert!(f.selects("a stack should push"));
        assert!(!f.selects("a stack should push twice"));
    }

    #[test]
    fn test_exclude_only() {
        let f = filter(&[], &["slow"], false);
        assert!(f.selects("fast path"));
        assert!(!f.selects("slow path"));
    }
}
