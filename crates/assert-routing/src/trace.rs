//! The trace subsystem
//!
//! A [`Trace`] owns the listener registry that assertion failures are routed
//! through, plus the stack of active [`AssertRouter`](crate::AssertRouter)
//! scopes. Tests create isolated instances; everything else shares
//! [`global`].

use crate::behavior::AssertBehavior;
use crate::config::TraceConfig;
use crate::error::{AssertionTriggered, RouterError};
use crate::listener::{DefaultTraceListener, ListenerCollection};
use crate::sink::FailureSink;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static GLOBAL: Lazy<Arc<Trace>> =
    Lazy::new(|| Arc::new(Trace::with_config(TraceConfig::from_env())));

/// The process-wide trace, created from [`TraceConfig::from_env`] on first use
#[must_use]
pub fn global() -> &'static Arc<Trace> {
    &GLOBAL
}

/// Identifier of a router scope, unique within its trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    #[inline]
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Values captured when a scope was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) ui_enabled: Option<bool>,
    pub(crate) raise_on_failure: bool,
}

/// Active scope and the listeners its snapshot belongs to
#[derive(Debug)]
struct ScopeFrame {
    id: ScopeId,
    snapshot: Snapshot,
    default_listener: Option<Arc<DefaultTraceListener>>,
    sink: Arc<FailureSink>,
    abandoned: bool,
}

impl ScopeFrame {
    fn apply_snapshot(&self) {
        if let (Some(listener), Some(enabled)) =
            (&self.default_listener, self.snapshot.ui_enabled)
        {
            listener.set_ui_enabled(enabled);
        }
        self.sink.set_raise_on_failure(self.snapshot.raise_on_failure);
    }
}

/// Listener registry plus routing scope stack
pub struct Trace {
    listeners: ListenerCollection,
    scopes: Mutex<Vec<ScopeFrame>>,
    next_scope: AtomicU64,
}

impl Trace {
    /// Create a trace with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TraceConfig::default())
    }

    /// Create a trace with custom configuration
    #[must_use]
    pub fn with_config(config: TraceConfig) -> Self {
        let listeners = ListenerCollection::new();
        if config.default_listener {
            listeners.add(Arc::new(DefaultTraceListener::new(
                config.ui,
                config.ui_enabled,
            )));
        }

        Self {
            listeners,
            scopes: Mutex::new(Vec::new()),
            next_scope: AtomicU64::new(1),
        }
    }

    /// The listener registry
    #[inline]
    #[must_use]
    pub fn listeners(&self) -> &ListenerCollection {
        &self.listeners
    }

    /// The registered default listener
    #[must_use]
    pub fn default_listener(&self) -> Option<Arc<DefaultTraceListener>> {
        self.listeners
            .get_as::<DefaultTraceListener>(DefaultTraceListener::NAME)
    }

    /// Current UI switch, `None` without a default listener
    #[must_use]
    pub fn ui_enabled(&self) -> Option<bool> {
        self.default_listener().map(|listener| listener.ui_enabled())
    }

    /// Set the UI switch; returns false when there is no default listener
    pub fn set_ui_enabled(&self, enabled: bool) -> bool {
        self.default_listener()
            .map(|listener| listener.set_ui_enabled(enabled))
            .is_some()
    }

    /// The installed failure sink, if any router has installed one
    #[must_use]
    pub fn failure_sink(&self) -> Option<Arc<FailureSink>> {
        self.listeners.get_as::<FailureSink>(FailureSink::NAME)
    }

    /// Current conversion flag, false while no sink is installed
    #[must_use]
    pub fn raise_on_failure(&self) -> bool {
        self.failure_sink()
            .is_some_and(|sink| sink.raise_on_failure())
    }

    /// Number of router scopes not yet restored
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.lock().len()
    }

    /// Route an assertion failure through every listener
    ///
    /// # Errors
    /// Returns the first [`AssertionTriggered`] raised by a listener.
    pub fn fail(&self, message: &str) -> Result<(), AssertionTriggered> {
        self.dispatch_failure(message, None)
    }

    /// Route an assertion failure with a detail message
    ///
    /// # Errors
    /// Returns the first [`AssertionTriggered`] raised by a listener.
    pub fn fail_with_detail(&self, message: &str, detail: &str) -> Result<(), AssertionTriggered> {
        self.dispatch_failure(message, Some(detail))
    }

    /// Route an ordinary trace message
    pub fn write(&self, message: &str) {
        for listener in self.listeners.snapshot() {
            listener.write(message);
        }
    }

    /// Route an ordinary trace message terminated by a newline
    pub fn write_line(&self, message: &str) {
        for listener in self.listeners.snapshot() {
            listener.write_line(message);
        }
    }

    fn dispatch_failure(
        &self,
        message: &str,
        detail: Option<&str>,
    ) -> Result<(), AssertionTriggered> {
        self.listeners
            .snapshot()
            .iter()
            .try_for_each(|listener| listener.fail(message, detail))
    }

    /// Capture the current policy, apply `behavior` and push a scope
    pub(crate) fn enter_scope(&self, behavior: AssertBehavior) -> (ScopeId, Snapshot) {
        let disable_ui = behavior.disables_ui();
        let throw_errors = behavior.throws_errors();

        let mut scopes = self.scopes.lock();

        let default_listener = self.default_listener();
        let ui_enabled = default_listener
            .as_ref()
            .map(|listener| listener.set_ui_enabled(!disable_ui));

        let installed = FailureSink::install(&self.listeners, throw_errors);
        let raise_on_failure = if installed.fresh {
            false
        } else {
            installed.sink.set_raise_on_failure(throw_errors)
        };

        let id = ScopeId::new(self.next_scope.fetch_add(1, Ordering::Relaxed));
        let snapshot = Snapshot {
            ui_enabled,
            raise_on_failure,
        };
        scopes.push(ScopeFrame {
            id,
            snapshot,
            default_listener,
            sink: installed.sink,
            abandoned: false,
        });

        (id, snapshot)
    }

    /// Restore the snapshot of `id`, which must be the innermost scope
    ///
    /// Abandoned scopes uncovered by the pop are restored as well.
    pub(crate) fn exit_scope(&self, id: ScopeId) -> Result<(), RouterError> {
        let mut scopes = self.scopes.lock();

        match scopes.last() {
            Some(top) if top.id == id => {}
            Some(top) => {
                return Err(RouterError::OutOfOrder {
                    scope: id,
                    active: top.id,
                })
            }
            None => return Ok(()),
        }

        if let Some(frame) = scopes.pop() {
            frame.apply_snapshot();
        }

        while scopes.last().is_some_and(|frame| frame.abandoned) {
            if let Some(frame) = scopes.pop() {
                tracing::debug!(scope = %frame.id, "restoring abandoned assert routing scope");
                frame.apply_snapshot();
            }
        }

        Ok(())
    }

    /// Mark `id` for restoration once every scope above it has exited
    pub(crate) fn abandon_scope(&self, id: ScopeId) {
        let mut scopes = self.scopes.lock();
        if let Some(frame) = scopes.iter_mut().find(|frame| frame.id == id) {
            frame.abandoned = true;
        }
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("listeners", &self.listeners.names())
            .field("ui_enabled", &self.ui_enabled())
            .field("raise_on_failure", &self.raise_on_failure())
            .field("scope_depth", &self.scope_depth())
            .finish()
    }
}
