//! Tracing set-up with trace events that can be toggled at runtime.

use std::{collections::HashSet, fmt::Display};

use exemplar_core::trace_categories;
use tracing_subscriber::{
    Layer, Registry, filter::Targets, layer::SubscriberExt, reload::Handle,
    util::SubscriberInitExt,
};

use crate::error::Error;

/// Type of event to trace.
#[derive(Clone, Debug, Eq, Hash, PartialEq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEvent {
    /// Traces `or` / `xor` combinator decisions.
    #[clap(name = "combinators")]
    Combinators,
    /// Traces example execution and recorded outcomes.
    #[clap(name = "examples")]
    Examples,
    /// Traces matcher applications.
    #[clap(name = "expectations")]
    Expectations,
    /// Traces expectation listener notifications.
    #[clap(name = "listeners")]
    Listeners,
    /// Traces the runner's per-example reports.
    #[clap(name = "runner")]
    Runner,
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Combinators => write!(f, "combinators"),
            Self::Examples => write!(f, "examples"),
            Self::Expectations => write!(f, "expectations"),
            Self::Listeners => write!(f, "listeners"),
            Self::Runner => write!(f, "runner"),
        }
    }
}

/// Trace target used by the runner.
pub(crate) const RUNNER: &str = "runner";

/// Owns the process-wide tracing subscriber's reloadable filter.
#[derive(Default)]
pub struct TraceEventConfig {
    enabled_trace_events: HashSet<TraceEvent>,
    handle: Option<Handle<Targets, Registry>>,
}

impl TraceEventConfig {
    /// Installs a stderr subscriber tracing the given events at TRACE and
    /// everything else at INFO.
    pub fn init(enabled_events: &[TraceEvent]) -> Self {
        let mut config = Self {
            enabled_trace_events: enabled_events.iter().cloned().collect(),
            ..Default::default()
        };

        let filter = config.compose_filter();

        // Reloadable so events can be toggled after start-up.
        let (reload_filter, handle) = tracing_subscriber::reload::Layer::new(filter);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(true)
            .with_filter(reload_filter);

        if tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .is_ok()
        {
            config.handle = Some(handle);
        } else {
            // Another subscriber won; keep going without one of our own.
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    fn compose_filter(&self) -> Targets {
        let mut filter =
            Targets::new().with_default(tracing_subscriber::filter::LevelFilter::INFO);

        for event in &self.enabled_trace_events {
            let target = match event {
                TraceEvent::Combinators => trace_categories::COMBINATORS,
                TraceEvent::Examples => trace_categories::EXAMPLES,
                TraceEvent::Expectations => trace_categories::EXPECTATIONS,
                TraceEvent::Listeners => trace_categories::LISTENERS,
                TraceEvent::Runner => RUNNER,
            };

            filter = filter.with_target(target, tracing::Level::TRACE);
        }

        filter
    }

    /// Returns the events currently traced.
    pub fn enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }

    /// Enables tracing for `event`.
    pub fn enable(&mut self, event: &TraceEvent) -> Result<(), Error> {
        if !self.enabled_trace_events.insert(event.to_owned()) {
            return Ok(());
        }

        self.reload_filter()
    }

    /// Disables tracing for `event`.
    pub fn disable(&mut self, event: &TraceEvent) -> Result<(), Error> {
        if !self.enabled_trace_events.remove(event) {
            return Ok(());
        }

        self.reload_filter()
    }

    fn reload_filter(&self) -> Result<(), Error> {
        let handle = self.handle.as_ref().ok_or(Error::TracingNotInitialized)?;
        handle
            .reload(self.compose_filter())
            .map_err(|e| Error::TracingReload(e.to_string()))
    }
}

impl std::fmt::Debug for TraceEventConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceEventConfig")
            .field("enabled_trace_events", &self.enabled_trace_events)
            .field("initialized", &self.handle.is_some())
            .finish()
    }
}
