//! Assert Routing
//!
//! Scoped interception of debug-assertion failures for test runs.
//!
//! # Core Concepts
//!
//! - [`Trace`]: listener registry every assertion failure is routed through
//! - [`DefaultTraceListener`]: owns the "UI enabled" switch; with the UI on,
//!   a failure reaches the [`AssertUi`] hook (by default [`PanicUi`])
//! - [`FailureSink`]: swallows failures, or converts them into
//!   [`AssertionTriggered`] errors
//! - [`AssertRouter`]: RAII scope that applies an [`AssertBehavior`] and puts
//!   the previous policy back on exit
//!
//! # Example
//!
//! ```rust
//! use assert_routing::{debug_fail, AssertBehavior, AssertRouter};
//!
//! // Suppress the UI only: the failure vanishes.
//! AssertRouter::disable(|| debug_fail!("Assert")).unwrap();
//!
//! // Suppress and convert: the failure comes back as an error.
//! let err = AssertRouter::disable_and_throw(|| debug_fail!("Assert")).unwrap_err();
//! assert_eq!(err.message(), "Assert");
//!
//! // Scopes nest and restore exactly what they replaced.
//! let mut outer = AssertRouter::new(AssertBehavior::DISABLE_UI);
//! assert!(AssertRouter::disable_and_throw(|| debug_fail!("inner")).is_err());
//! assert!(debug_fail!("outer").is_ok());
//! outer.dispose().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod behavior;
pub mod config;
pub mod error;
pub mod listener;
pub mod router;
pub mod sink;
pub mod trace;

mod macros;

// Re-exports
pub use behavior::AssertBehavior;
pub use config::{TraceConfig, UI_ENV_VAR};
pub use error::{AssertionTriggered, RouterError, RouterResult};
pub use listener::{AssertUi, DefaultTraceListener, ListenerCollection, PanicUi, TraceListener};
pub use router::{AssertRouter, ScopeState};
pub use sink::{FailureSink, Installed};
pub use trace::{global, ScopeId, Trace};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Route an assertion failure through the process-wide trace
///
/// # Errors
/// Returns [`AssertionTriggered`] while failures are converted into errors.
pub fn fail(message: &str) -> Result<(), AssertionTriggered> {
    global().fail(message)
}

/// Route an assertion failure with a detail message through the process-wide trace
///
/// # Errors
/// Returns [`AssertionTriggered`] while failures are converted into errors.
pub fn fail_with_detail(message: &str, detail: &str) -> Result<(), AssertionTriggered> {
    global().fail_with_detail(message, detail)
}

/// Route an ordinary trace message through the process-wide trace
pub fn write(message: &str) {
    global().write(message);
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for routing assertions in tests
    pub use crate::{
        debug_check, debug_fail, AssertBehavior, AssertRouter, AssertionTriggered, RouterError,
        Trace, TraceConfig,
    };
}
