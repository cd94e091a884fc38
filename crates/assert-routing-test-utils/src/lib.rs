//! Testing utilities for the assert-routing workspace
//!
//! Shared fixtures: a recording UI hook, isolated traces, the serial lock
//! for tests that touch the process-wide trace, and suite-level routing.

#![allow(missing_docs)]

use assert_routing::{AssertBehavior, AssertRouter, AssertUi, RouterResult, Trace, TraceConfig};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

static SERIAL: Mutex<()> = Mutex::new(());

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
});

/// Install a test-friendly tracing subscriber once per process
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Serialize tests that touch [`assert_routing::global`]
///
/// `parking_lot` locks do not poison, so a test expecting a panic does not
/// break the ones after it.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock()
}

/// A UI shown event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownFailure {
    pub message: String,
    pub detail: Option<String>,
}

/// [`AssertUi`] that records failures instead of halting the test
#[derive(Debug, Default)]
pub struct RecordingUi {
    shown: Mutex<Vec<ShownFailure>>,
}

impl RecordingUi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown(&self) -> Vec<ShownFailure> {
        self.shown.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.shown.lock().len()
    }
}

impl AssertUi for RecordingUi {
    fn show(&self, message: &str, detail: Option<&str>) {
        self.shown.lock().push(ShownFailure {
            message: message.to_string(),
            detail: detail.map(str::to_string),
        });
    }
}

/// Fresh trace whose UI hook records instead of panicking
pub fn isolated_trace() -> (Arc<Trace>, Arc<RecordingUi>) {
    isolated_trace_with(TraceConfig::new())
}

/// Fresh trace built from `config` with a [`RecordingUi`] hook
pub fn isolated_trace_with(config: TraceConfig) -> (Arc<Trace>, Arc<RecordingUi>) {
    init_tracing();
    let ui = RecordingUi::new();
    let trace = Arc::new(Trace::with_config(config.with_ui(ui.clone())));
    (trace, ui)
}

/// Routing applied once for a whole group of test cases
///
/// The analogue of class initialise/cleanup: `start` applies the behavior,
/// every `run_case` runs under it, `finish` restores.
#[derive(Debug)]
pub struct SuiteScope {
    router: AssertRouter,
}

impl SuiteScope {
    pub fn start(trace: &Arc<Trace>, behavior: AssertBehavior) -> Self {
        Self {
            router: AssertRouter::on(trace, behavior),
        }
    }

    pub fn trace(&self) -> &Arc<Trace> {
        self.router.trace()
    }

    pub fn run_case<R>(&self, case: impl FnOnce(&Arc<Trace>) -> R) -> R {
        case(self.router.trace())
    }

    pub fn finish(mut self) -> RouterResult<()> {
        self.router.dispose()
    }
}
