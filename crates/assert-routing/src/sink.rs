//! Failure sink
//!
//! The listener that turns assertion failures into [`AssertionTriggered`]
//! errors, or swallows them, depending on a single flag.

use crate::error::AssertionTriggered;
use crate::listener::{ListenerCollection, TraceListener};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trace listener that converts assertion failures into errors
///
/// Only assertion failures are of interest; ordinary trace messages are
/// ignored.
#[derive(Debug)]
pub struct FailureSink {
    raise_on_failure: AtomicBool,
}

/// Result of [`FailureSink::install`]
#[derive(Debug, Clone)]
pub struct Installed {
    /// The registered sink
    pub sink: Arc<FailureSink>,
    /// Whether this call registered it
    pub fresh: bool,
}

impl FailureSink {
    /// Registry name of the sink
    pub const NAME: &'static str = "AssertRouting.FailureSink";

    /// Create an unregistered sink
    #[inline]
    #[must_use]
    pub fn new(raise_on_failure: bool) -> Self {
        Self {
            raise_on_failure: AtomicBool::new(raise_on_failure),
        }
    }

    /// Register a sink in `listeners` unless one is already present
    ///
    /// A fresh sink starts with `raise_on_failure`; an existing sink is
    /// returned with its flag untouched. A foreign listener squatting on
    /// [`FailureSink::NAME`] does not count as installed.
    #[must_use]
    pub fn install(listeners: &ListenerCollection, raise_on_failure: bool) -> Installed {
        let (sink, fresh) =
            listeners.get_or_add(Self::NAME, || Arc::new(Self::new(raise_on_failure)));
        Installed { sink, fresh }
    }

    /// Whether failures are converted into errors
    #[inline]
    #[must_use]
    pub fn raise_on_failure(&self) -> bool {
        self.raise_on_failure.load(Ordering::Acquire)
    }

    /// Set the conversion flag, returning the previous value
    #[inline]
    pub fn set_raise_on_failure(&self, raise: bool) -> bool {
        self.raise_on_failure.swap(raise, Ordering::AcqRel)
    }
}

impl TraceListener for FailureSink {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fail(&self, message: &str, detail: Option<&str>) -> Result<(), AssertionTriggered> {
        if !self.raise_on_failure() {
            return Ok(());
        }

        Err(match detail {
            Some(detail) => AssertionTriggered::with_detail(message, detail),
            None => AssertionTriggered::new(message),
        })
    }

    fn write(&self, _message: &str) {}

    fn write_line(&self, _message: &str) {}

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
