//! Trace listeners and the named listener registry
//!
//! Every assertion failure and trace message in a [`Trace`](crate::Trace) is
//! fanned out to its listeners in registration order.

use crate::error::AssertionTriggered;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver of assertion failures and trace messages
pub trait TraceListener: Any + Send + Sync + Debug {
    /// Registry name used for lookup
    fn name(&self) -> &str;

    /// Handle an assertion failure
    ///
    /// # Errors
    /// Returns [`AssertionTriggered`] when the listener converts the failure
    /// into an error.
    fn fail(&self, message: &str, detail: Option<&str>) -> Result<(), AssertionTriggered>;

    /// Handle an ordinary trace message
    fn write(&self, message: &str);

    /// Handle an ordinary trace message terminated by a newline
    fn write_line(&self, message: &str) {
        self.write(message);
    }

    /// Upcast for typed lookup through [`ListenerCollection::get_as`]
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Platform hook that surfaces an assertion failure to the user
///
/// The default hook, [`PanicUi`], halts the current thread the way a
/// blocking dialog halts an interactive session.
pub trait AssertUi: Send + Sync + Debug {
    /// Show the failure
    fn show(&self, message: &str, detail: Option<&str>);
}

/// [`AssertUi`] that panics with the failure message
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicUi;

impl AssertUi for PanicUi {
    fn show(&self, message: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => panic!("assertion failed: {message} ({detail})"),
            None => panic!("assertion failed: {message}"),
        }
    }
}

/// The platform's default listener, owner of the "UI enabled" switch
pub struct DefaultTraceListener {
    ui_enabled: AtomicBool,
    ui: Arc<dyn AssertUi>,
}

impl DefaultTraceListener {
    /// Registry name of the default listener
    pub const NAME: &'static str = "Default";

    /// Create with the given UI hook and initial switch value
    #[must_use]
    pub fn new(ui: Arc<dyn AssertUi>, ui_enabled: bool) -> Self {
        Self {
            ui_enabled: AtomicBool::new(ui_enabled),
            ui,
        }
    }

    /// Whether failures are shown through the UI hook
    #[inline]
    #[must_use]
    pub fn ui_enabled(&self) -> bool {
        self.ui_enabled.load(Ordering::Acquire)
    }

    /// Set the UI switch, returning the previous value
    #[inline]
    pub fn set_ui_enabled(&self, enabled: bool) -> bool {
        self.ui_enabled.swap(enabled, Ordering::AcqRel)
    }
}

impl Debug for DefaultTraceListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTraceListener")
            .field("ui_enabled", &self.ui_enabled())
            .field("ui", &self.ui)
            .finish()
    }
}

impl TraceListener for DefaultTraceListener {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Show the failure through the UI hook while the switch is on
    ///
    /// With the UI off the failure is only echoed at `trace` level, the
    /// counterpart of the platform writing it to the debugger output.
    fn fail(&self, message: &str, detail: Option<&str>) -> Result<(), AssertionTriggered> {
        if self.ui_enabled() {
            self.ui.show(message, detail);
        } else {
            tracing::trace!(
                failure = message,
                detail = ?detail,
                "assertion failed with UI disabled"
            );
        }
        Ok(())
    }

    fn write(&self, message: &str) {
        tracing::trace!(text = message, "trace write");
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Ordered registry of named listeners
///
/// Names are not unique: adding a second listener under an existing name
/// keeps both, and lookups return the first one registered.
#[derive(Debug, Default)]
pub struct ListenerCollection {
    inner: RwLock<Vec<Arc<dyn TraceListener>>>,
}

impl ListenerCollection {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener
    pub fn add(&self, listener: Arc<dyn TraceListener>) {
        self.inner.write().push(listener);
    }

    /// First listener registered under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn TraceListener>> {
        self.inner
            .read()
            .iter()
            .find(|listener| listener.name() == name)
            .cloned()
    }

    /// First `T` registered under `name`
    #[must_use]
    pub fn get_as<T: TraceListener>(&self, name: &str) -> Option<Arc<T>> {
        self.inner
            .read()
            .iter()
            .filter(|listener| listener.name() == name)
            .find_map(|listener| Arc::clone(listener).into_any().downcast::<T>().ok())
    }

    /// Append `make()` unless a `T` is registered under `name`; returns the
    /// registered `T` and whether it was freshly added
    ///
    /// Lookup and insertion happen under one write lock.
    pub(crate) fn get_or_add<T, F>(&self, name: &str, make: F) -> (Arc<T>, bool)
    where
        T: TraceListener,
        F: FnOnce() -> Arc<T>,
    {
        let mut guard = self.inner.write();
        let existing = guard
            .iter()
            .filter(|listener| listener.name() == name)
            .find_map(|listener| Arc::clone(listener).into_any().downcast::<T>().ok());
        if let Some(listener) = existing {
            return (listener, false);
        }

        let listener = make();
        guard.push(Arc::clone(&listener) as Arc<dyn TraceListener>);
        (listener, true)
    }

    /// Remove the first listener registered under `name`
    pub fn remove(&self, name: &str) -> Option<Arc<dyn TraceListener>> {
        let mut guard = self.inner.write();
        let index = guard.iter().position(|listener| listener.name() == name)?;
        Some(guard.remove(index))
    }

    /// Check if a listener is registered under `name`
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().iter().any(|listener| listener.name() == name)
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .iter()
            .map(|listener| listener.name().to_string())
            .collect()
    }

    /// Number of registered listeners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Remove every listener
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Copy of the current listener list
    ///
    /// Dispatch walks a snapshot so listeners may panic or touch the
    /// registry without holding its lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn TraceListener>> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Default)]
    struct CountingUi {
        shown: AtomicUsize,
    }

    impl AssertUi for CountingUi {
        fn show(&self, _message: &str, _detail: Option<&str>) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct Named(&'static str);

    impl TraceListener for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn fail(&self, _message: &str, _detail: Option<&str>) -> Result<(), AssertionTriggered> {
            Ok(())
        }

        fn write(&self, _message: &str) {}

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn default_listener_shows_ui_when_enabled() {
        let ui = Arc::new(CountingUi::default());
        let listener = DefaultTraceListener::new(ui.clone(), true);

        assert!(listener.fail("Assert", None).is_ok());
        assert_eq!(ui.shown.load(Ordering::SeqCst), 1);

        assert!(listener.set_ui_enabled(false));
        assert!(listener.fail("Assert", Some("detail")).is_ok());
        assert_eq!(ui.shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "assertion failed: Assert (detail)")]
    fn panic_ui_panics_with_detail() {
        PanicUi.show("Assert", Some("detail"));
    }

    #[test]
    fn registry_lookup_by_name() {
        let registry = ListenerCollection::new();
        registry.add(Arc::new(Named("first")));
        registry.add(Arc::new(Named("second")));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("second"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn registry_typed_lookup() {
        let registry = ListenerCollection::new();
        registry.add(Arc::new(DefaultTraceListener::new(Arc::new(PanicUi), true)));
        registry.add(Arc::new(Named("other")));

        assert!(registry
            .get_as::<DefaultTraceListener>(DefaultTraceListener::NAME)
            .is_some());
        assert!(registry.get_as::<DefaultTraceListener>("other").is_none());
    }

    #[test]
    fn registry_get_or_add_is_idempotent() {
        let registry = ListenerCollection::new();

        let (_, fresh) = registry.get_or_add("named", || Arc::new(Named("named")));
        assert!(fresh);

        let (_, fresh) = registry.get_or_add("named", || Arc::new(Named("named")));
        assert!(!fresh);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_remove_and_clear() {
        let registry = ListenerCollection::new();
        registry.add(Arc::new(Named("a")));
        registry.add(Arc::new(Named("a")));
        registry.add(Arc::new(Named("b")));

        assert!(registry.remove("a").is_some());
        assert_eq!(registry.names(), vec!["a", "b"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.remove("b").is_none());
    }
}
