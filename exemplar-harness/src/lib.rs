//! Host for running exemplar specifications: layered configuration, tracing
//! set-up and a runner producing a summary.

pub mod config;
mod error;
pub mod events;
pub mod runner;

pub use config::{Config, ConfigLoadResult, HarnessOptions};
pub use error::Error;
pub use events::{TraceEvent, TraceEventConfig};
pub use runner::{RunSummary, SpecRunner};

use clap::Parser;
use exemplar_core::Specification;
use std::ffi::OsString;

/// Parses command-line arguments, loads configuration, initializes tracing and
/// runs the given specifications.
///
/// With `--list`, prints the qualified example names to stdout instead of
/// running anything and returns an empty summary.
///
/// # Arguments
///
/// * `args` - The command line, including the program name.
/// * `specifications` - The specifications to run.
pub fn run_main<I, T>(args: I, specifications: &mut [Specification]) -> Result<RunSummary, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let options = match HarnessOptions::try_parse_from(args) {
        Ok(options) => options,
        Err(e) => e.exit(),
    };

    let loaded = config::load_config(options.no_config, options.config_path.as_deref());
    let (config, _trace_config) = start(&options, loaded)?;

    if options.list_only {
        for name in SpecRunner::list(specifications) {
            println!("{name}");
        }
        return Ok(RunSummary::default());
    }

    let runner = SpecRunner::from_config(&config, &options);
    Ok(runner.run(specifications))
}

/// Initializes tracing from the loaded configuration, then reports a
/// configuration file that could not be used. Errors loading an explicitly
/// requested file are fatal.
fn start(
    options: &HarnessOptions,
    loaded: ConfigLoadResult,
) -> Result<(Config, TraceEventConfig), Error> {
    let ConfigLoadResult {
        config,
        error,
        explicit_path,
        ..
    } = loaded;

    let error = match error {
        Some(err) if explicit_path => return Err(err),
        error => error,
    };

    let trace_config = TraceEventConfig::init(&config.trace_events(options));

    // Only reported now that a subscriber is installed.
    if let Some(err) = error {
        tracing::warn!("{err}; using default configuration");
    }

    Ok((config, trace_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn broken_default_config() -> ConfigLoadResult {
        let path = PathBuf::from("/nonexistent/exemplar/config.toml");
        let parse_error = toml::from_str::<Config>("[run").unwrap_err();
        ConfigLoadResult {
            config: Config::default(),
            path: Some(path.clone()),
            error: Some(Error::ConfigParse(path, parse_error)),
            explicit_path: false,
        }
    }

    #[test]
    fn test_broken_default_config_is_reported_after_tracing_starts() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let options = HarnessOptions::try_parse_from(["exemplar"]).unwrap();
        let started = tracing::subscriber::with_default(subscriber, || {
            start(&options, broken_default_config())
        });

        let (config, _trace_config) = started.unwrap();
        assert!(config.run.plan_only.is_none());

        let logged = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("using default configuration"));
        assert!(logged.contains("/nonexistent/exemplar/config.toml"));
    }

    #[test]
    fn test_broken_explicit_config_is_fatal() {
        let options = HarnessOptions::try_parse_from(["exemplar"]).unwrap();
        let mut loaded = broken_default_config();
        loaded.explicit_path = true;

        assert!(matches!(start(&options, loaded), Err(Error::ConfigParse(_, _))));
    }
}
