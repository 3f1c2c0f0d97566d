//! Configuration file and command-line support for the harness.
//!
//! Configuration is layered: defaults < config file < command-line arguments.
//! Unknown fields in the config file are ignored, and a broken config file at
//! the default location is reported but does not prevent a run.

use clap::Parser;
use etcetera::BaseStrategy;
use exemplar_core::{ExampleFilter, RunOptions};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::events::TraceEvent;

/// Command-line options for running specifications.
#[derive(Clone, Debug, Parser)]
#[clap(name = "exemplar", version, about)]
pub struct HarnessOptions {
    /// Traverse specifications without running any example.
    #[clap(long = "plan-only")]
    pub plan_only: bool,

    /// List qualified example names without running them.
    #[clap(long = "list")]
    pub list_only: bool,

    /// Exactly match filters (not just substring match).
    #[clap(long = "exact")]
    pub exact_match: bool,

    /// Patterns for examples to be excluded.
    #[clap(long = "skip")]
    pub exclude_filters: Vec<String>,

    /// Enable tracing for the given event categories.
    #[clap(long = "trace", value_enum)]
    pub trace_events: Vec<TraceEvent>,

    /// Load configuration from this path instead of the default location.
    #[clap(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Don't load any configuration file.
    #[clap(long = "no-config")]
    pub no_config: bool,

    /// Report every example, not just failing ones.
    #[clap(short = 'v', long = "verbose", env = "EXEMPLAR_VERBOSE")]
    pub verbose: bool,

    /// Patterns for examples to be included.
    pub include_filters: Vec<String>,
}

/// Root configuration structure.
///
/// All fields are optional; unknown fields are silently ignored.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run selection options.
    pub run: RunConfig,

    /// Tracing options.
    pub trace: TraceConfig,
}

/// Run selection options.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Traverse without running any example.
    #[serde(rename = "plan-only")]
    pub plan_only: Option<bool>,

    /// Match filters exactly.
    pub exact: Option<bool>,

    /// Include filters, used when none are given on the command line.
    pub filters: Option<Vec<String>>,

    /// Exclude filters, combined with any given on the command line.
    pub skip: Option<Vec<String>>,
}

/// Tracing options.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Event categories to trace.
    pub events: Option<Vec<TraceEvent>>,
}

impl Config {
    /// Converts the configuration to [`RunOptions`], merging with command-line
    /// options.
    ///
    /// # Arguments
    ///
    /// * `options` - The parsed command-line options.
    #[must_use]
    pub fn to_run_options(&self, options: &HarnessOptions) -> RunOptions {
        let plan_only = merge_bool_setting(options.plan_only, false, self.run.plan_only);
        let exact = merge_bool_setting(options.exact_match, false, self.run.exact);

        let include = if options.include_filters.is_empty() {
            self.run.filters.clone().unwrap_or_default()
        } else {
            options.include_filters.clone()
        };

        let mut exclude = self.run.skip.clone().unwrap_or_default();
        exclude.extend(options.exclude_filters.iter().cloned());

        RunOptions::new()
            .with_plan_only(plan_only)
            .with_filter(ExampleFilter {
                include,
                exclude,
                exact,
            })
    }

    /// Returns the trace events enabled by either the configuration or the
    /// command line.
    pub fn trace_events(&self, options: &HarnessOptions) -> Vec<TraceEvent> {
        let mut events = self.trace.events.clone().unwrap_or_default();
        for event in &options.trace_events {
            if !events.contains(event) {
                events.push(event.clone());
            }
        }
        events
    }
}

/// Merges a boolean setting from the command line, config file, and defaults.
///
/// Boolean flags can't distinguish "explicitly false" from "not provided", so a
/// command-line value differing from the default is taken as explicit.
const fn merge_bool_setting(cli_value: bool, cli_default: bool, config_value: Option<bool>) -> bool {
    if cli_value != cli_default {
        cli_value
    } else if let Some(config) = config_value {
        config
    } else {
        cli_default
    }
}

/// Result of attempting to load a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration, or default if loading failed.
    pub config: Config,

    /// The path that was used (or attempted) for loading.
    pub path: Option<PathBuf>,

    /// Any error that occurred during loading.
    pub error: Option<Error>,

    /// Whether the path was explicitly provided (via `--config`). An error
    /// loading an explicit path is fatal.
    pub explicit_path: bool,
}

impl ConfigLoadResult {
    fn defaults(path: Option<PathBuf>) -> Self {
        Self {
            config: Config::default(),
            path,
            error: None,
            explicit_path: false,
        }
    }
}

/// Returns the default configuration file path for the current platform.
///
/// Returns `None` if the platform's config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("exemplar").join("config.toml"))
}

/// Loads configuration from the specified path.
///
/// `explicit_path` is always `false` in the result; see [`load_config`].
pub fn load_from_path(path: &Path) -> ConfigLoadResult {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return ConfigLoadResult {
                error: Some(Error::ConfigRead(path.to_path_buf(), e)),
                ..ConfigLoadResult::defaults(Some(path.to_path_buf()))
            };
        }
    };

    match toml::from_str(&content) {
        Ok(config) => ConfigLoadResult {
            config,
            ..ConfigLoadResult::defaults(Some(path.to_path_buf()))
        },
        Err(e) => ConfigLoadResult {
            error: Some(Error::ConfigParse(path.to_path_buf(), e)),
            ..ConfigLoadResult::defaults(Some(path.to_path_buf()))
        },
    }
}

/// Loads configuration based on the provided options.
///
/// # Arguments
///
/// * `disabled` - If true, skip loading and return defaults.
/// * `explicit_path` - If provided, use this path instead of the default.
pub fn load_config(disabled: bool, explicit_path: Option<&Path>) -> ConfigLoadResult {
    if disabled {
        return ConfigLoadResult::defaults(None);
    }

    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return ConfigLoadResult::defaults(None),
        },
    };

    // A missing file at the default location just means defaults.
    if explicit_path.is_none() && !path.exists() {
        return ConfigLoadResult::defaults(Some(path));
    }

    let mut result = load_from_path(&path);
    result.explicit_path = explicit_path.is_some();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn make_test_options(args: &[&str]) -> HarnessOptions {
        HarnessOptions::try_parse_from(std::iter::once("exemplar").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_empty_config() -> Result<()> {
        let config: Config = toml::from_str("")?;
        assert!(config.run.plan_only.is_none());
        assert!(config.run.filters.is_none());
        assert!(config.trace.events.is_none());
        Ok(())
    }

    #[test]
    fn test_full_config() -> Result<()> {
        let toml = r#"
            [run]
            plan-only = true
            exact = false
            filters = ["stack"]
            skip = ["slow"]

            [trace]
            events = ["examples", "combinators"]
        "#;

        let config: Config = toml::from_str(toml)?;
        assert_eq!(config.run.plan_only, Some(true));
        assert_eq!(config.run.exact, Some(false));
        assert_eq!(config.run.filters, Some(vec![String::from("stack")]));
        assert_eq!(config.run.skip, Some(vec![String::from("slow")]));
        assert_eq!(
            config.trace.events,
            Some(vec![TraceEvent::Examples, TraceEvent::Combinators])
        );
        Ok(())
    }

    #[test]
    fn test_unknown_fields_ignored() -> Result<()> {
        let toml = r#"
            [run]
            exact = true
            parallelism = 8

            [unknown-section]
            foo = "bar"
        "#;

        let config: Config = toml::from_str(toml)?;
        assert_eq!(config.run.exact, Some(true));
        Ok(())
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("exemplar/config.toml"));
        }
    }

    #[test]
    fn test_load_config_disabled() {
        let result = load_config(true, None);
        assert!(result.path.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_load_config_nonexistent_explicit() {
        let result = load_config(false, Some(Path::new("/nonexistent/exemplar/config.toml")));
        assert!(result.explicit_path);
        assert!(matches!(result.error, Some(Error::ConfigRead(_, _))));
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "[run]\nplan-only = true")?;

        let result = load_config(false, Some(file.path()));
        assert!(result.error.is_none());
        assert!(result.explicit_path);
        assert_eq!(result.config.run.plan_only, Some(true));
        Ok(())
    }

    #[test]
    fn test_load_from_path_parse_error() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "[run\nplan-only = ")?;

        let result = load_from_path(file.path());
        assert!(matches!(result.error, Some(Error::ConfigParse(_, _))));
        assert!(result.config.run.plan_only.is_none());
        Ok(())
    }

    #[test]
    fn test_to_run_options_defaults_only() {
        let options = Config::default().to_run_options(&make_test_options(&[]));
        assert!(!options.plan_only);
        assert!(options.filter.is_empty());
        assert!(!options.filter.exact);
    }

    #[test]
    fn test_to_run_options_config_overrides_defaults() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [run]
            plan-only = true
            exact = true
            filters = ["stack"]
            skip = ["slow"]
        "#,
        )?;

        let options = config.to_run_options(&make_test_options(&[]));
        assert!(options.plan_only);
        assert!(options.filter.exact);
        assert_eq!(options.filter.include, vec![String::from("stack")]);
        assert_eq!(options.filter.exclude, vec![String::from("slow")]);
        Ok(())
    }

    #[test]
    fn test_to_run_options_cli_overrides_config() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [run]
            filters = ["stack"]
            skip = ["slow"]
        "#,
        )?;

        let options = config.to_run_options(&make_test_options(&[
            "--plan-only",
            "--skip",
            "flaky",
            "queue",
        ]));
        assert!(options.plan_only);
        assert_eq!(options.filter.include, vec![String::from("queue")]);
        assert_eq!(
            options.filter.exclude,
            vec![String::from("slow"), String::from("flaky")]
        );
        Ok(())
    }

    #[test]
    fn test_trace_events_are_merged() -> Result<()> {
        let config: Config = toml::from_str("[trace]\nevents = [\"examples\"]")?;
        let events = config.trace_events(&make_test_options(&[
            "--trace",
            "examples",
            "--trace",
            "expectations",
        ]));
        assert_eq!(events, vec![TraceEvent::Examples, TraceEvent::Expectations]);
        Ok(())
    }
}
