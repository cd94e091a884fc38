//! Trace configuration
//!
//! Startup settings for a [`Trace`](crate::Trace): whether the default
//! listener is registered, its initial UI switch and the UI hook it calls.

use crate::listener::{AssertUi, PanicUi};
use std::sync::Arc;

/// Environment variable read by [`TraceConfig::from_env`]
pub const UI_ENV_VAR: &str = "ASSERT_ROUTING_UI";

/// Trace startup configuration
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Register a [`DefaultTraceListener`](crate::DefaultTraceListener)
    pub default_listener: bool,
    /// Initial value of the UI switch
    pub ui_enabled: bool,
    /// Hook invoked when a failure reaches the default listener with the UI on
    pub ui: Arc<dyn AssertUi>,
}

impl TraceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with the UI switch taken from [`UI_ENV_VAR`]
    ///
    /// `0`, `false`, `off` and `no` (any case) start with the UI disabled;
    /// anything else, or an unset variable, leaves it on.
    #[must_use]
    pub fn from_env() -> Self {
        let ui_enabled = std::env::var(UI_ENV_VAR)
            .map(|value| parse_switch(&value))
            .unwrap_or(true);
        Self::new().with_ui_enabled(ui_enabled)
    }

    /// With initial UI switch
    #[inline]
    #[must_use]
    pub fn with_ui_enabled(mut self, enabled: bool) -> Self {
        self.ui_enabled = enabled;
        self
    }

    /// With UI hook
    #[inline]
    #[must_use]
    pub fn with_ui(mut self, ui: Arc<dyn AssertUi>) -> Self {
        self.ui = ui;
        self
    }

    /// Without the default listener
    #[inline]
    #[must_use]
    pub fn without_default_listener(mut self) -> Self {
        self.default_listener = false;
        self
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            default_listener: true,
            ui_enabled: true,
            ui: Arc::new(PanicUi),
        }
    }
}

fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
