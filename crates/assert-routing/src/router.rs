//! Scoped assertion routing
//!
//! An [`AssertRouter`] captures the routing policy of a [`Trace`], applies a
//! new [`AssertBehavior`] and puts the captured policy back when it is
//! restored, disposed or dropped. Routers nest: each one restores exactly
//! what the enclosing scope had, provided scopes end in LIFO order.
//!
//! # Example
//!
//! ```rust
//! use assert_routing::{AssertBehavior, AssertRouter, Trace};
//! use std::sync::Arc;
//!
//! let trace = Arc::new(Trace::new());
//!
//! let result = AssertRouter::reroute_on(&trace, AssertBehavior::DISABLE_UI_AND_THROW_ERRORS, || {
//!     trace.fail("Assert")
//! });
//! assert!(result.is_err());
//! assert!(!trace.raise_on_failure());
//! ```

use crate::behavior::AssertBehavior;
use crate::error::{RouterError, RouterResult};
use crate::trace::{global, ScopeId, Snapshot, Trace};
use std::sync::Arc;

/// Lifecycle of an [`AssertRouter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeState {
    /// Behavior applied
    Active,
    /// Previous policy restored
    Restored,
    /// Terminal; `restore` now fails
    Disposed,
}

/// RAII scope that applies an [`AssertBehavior`] to a [`Trace`]
#[derive(Debug)]
#[must_use = "dropping the router restores the previous routing immediately"]
pub struct AssertRouter {
    trace: Arc<Trace>,
    id: ScopeId,
    behavior: AssertBehavior,
    snapshot: Snapshot,
    restored: bool,
    disposed: bool,
}

impl AssertRouter {
    /// Apply `behavior` to the process-wide trace
    pub fn new(behavior: AssertBehavior) -> Self {
        Self::on(global(), behavior)
    }

    /// Apply `behavior` to `trace`
    pub fn on(trace: &Arc<Trace>, behavior: AssertBehavior) -> Self {
        let (id, snapshot) = trace.enter_scope(behavior);
        tracing::debug!(scope = %id, %behavior, "assert routing applied");

        Self {
            trace: Arc::clone(trace),
            id,
            behavior,
            snapshot,
            restored: false,
            disposed: false,
        }
    }

    /// Run `action` with `behavior` applied to the process-wide trace
    ///
    /// The previous policy is restored before `action`'s result is returned,
    /// and during unwinding if `action` panics.
    pub fn reroute<R>(behavior: AssertBehavior, action: impl FnOnce() -> R) -> R {
        Self::reroute_on(global(), behavior, action)
    }

    /// Run `action` with `behavior` applied to `trace`
    pub fn reroute_on<R>(
        trace: &Arc<Trace>,
        behavior: AssertBehavior,
        action: impl FnOnce() -> R,
    ) -> R {
        let mut router = Self::on(trace, behavior);
        let result = action();
        if let Err(err) = router.restore() {
            tracing::warn!(scope = %router.id, %err, "assert routing not restored after action");
        }
        result
    }

    /// Run `action` with the assertion UI disabled
    pub fn disable<R>(action: impl FnOnce() -> R) -> R {
        Self::reroute(AssertBehavior::DISABLE_UI, action)
    }

    /// Run `action` with the UI disabled and failures converted into errors
    pub fn disable_and_throw<R>(action: impl FnOnce() -> R) -> R {
        Self::reroute(AssertBehavior::DISABLE_UI_AND_THROW_ERRORS, action)
    }

    /// [`AssertRouter::disable`] on `trace`
    pub fn disable_on<R>(trace: &Arc<Trace>, action: impl FnOnce() -> R) -> R {
        Self::reroute_on(trace, AssertBehavior::DISABLE_UI, action)
    }

    /// [`AssertRouter::disable_and_throw`] on `trace`
    pub fn disable_and_throw_on<R>(trace: &Arc<Trace>, action: impl FnOnce() -> R) -> R {
        Self::reroute_on(trace, AssertBehavior::DISABLE_UI_AND_THROW_ERRORS, action)
    }

    /// Put back the policy captured at construction
    ///
    /// Only the first successful call has an effect.
    ///
    /// # Errors
    /// - [`RouterError::Disposed`] after [`AssertRouter::dispose`]
    /// - [`RouterError::OutOfOrder`] while a later scope on the same trace is
    ///   still active; nothing is changed
    pub fn restore(&mut self) -> RouterResult<()> {
        if self.disposed {
            return Err(RouterError::Disposed);
        }
        if self.restored {
            return Ok(());
        }

        self.trace.exit_scope(self.id)?;
        self.restored = true;
        tracing::debug!(scope = %self.id, behavior = %self.behavior, "assert routing restored");
        Ok(())
    }

    /// Restore if needed, then mark the router disposed
    ///
    /// Repeated calls are no-ops.
    ///
    /// # Errors
    /// [`RouterError::OutOfOrder`] when restoration is not yet possible; the
    /// router stays undisposed.
    pub fn dispose(&mut self) -> RouterResult<()> {
        if self.disposed {
            return Ok(());
        }

        self.restore()?;
        self.disposed = true;
        Ok(())
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ScopeState {
        if self.disposed {
            ScopeState::Disposed
        } else if self.restored {
            ScopeState::Restored
        } else {
            ScopeState::Active
        }
    }

    /// Behavior this router applied
    #[inline]
    #[must_use]
    pub fn behavior(&self) -> AssertBehavior {
        self.behavior
    }

    /// Scope identifier within the trace
    #[inline]
    #[must_use]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// The trace this router applies to
    #[inline]
    #[must_use]
    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// UI switch captured at construction, `None` without a default listener
    #[inline]
    #[must_use]
    pub fn previous_ui_enabled(&self) -> Option<bool> {
        self.snapshot.ui_enabled
    }

    /// Sink flag captured at construction
    #[inline]
    #[must_use]
    pub fn previous_raise_on_failure(&self) -> bool {
        self.snapshot.raise_on_failure
    }
}

impl Drop for AssertRouter {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if !self.restored && std::thread::panicking() {
            tracing::debug!(scope = %self.id, "restoring assert routing during unwind");
        }

        if let Err(err) = self.dispose() {
            tracing::warn!(
                scope = %self.id,
                %err,
                "assert routing scope dropped out of order, restoration deferred"
            );
            self.trace.abandon_scope(self.id);
            self.disposed = true;
        }
    }
}
