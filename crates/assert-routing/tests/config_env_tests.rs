//! Startup configuration read from the environment. Each test holds the
//! serial lock because the environment is process-wide.

use assert_routing::{global, TraceConfig, UI_ENV_VAR};
use assert_routing_test_utils::serial;
use pretty_assertions::assert_eq;

#[test]
fn test_from_env_unset_leaves_ui_on() {
    let _guard = serial();
    std::env::remove_var(UI_ENV_VAR);

    assert!(TraceConfig::from_env().ui_enabled);
}

#[test]
fn test_from_env_off_disables_ui() {
    let _guard = serial();

    for value in ["off", "0", "FALSE", "no"] {
        std::env::set_var(UI_ENV_VAR, value);
        assert!(!TraceConfig::from_env().ui_enabled, "{value:?} should disable the UI");
    }
    std::env::remove_var(UI_ENV_VAR);
}

#[test]
fn test_from_env_other_values_leave_ui_on() {
    let _guard = serial();

    for value in ["1", "on", "true"] {
        std::env::set_var(UI_ENV_VAR, value);
        assert!(TraceConfig::from_env().ui_enabled, "{value:?} should leave the UI on");
    }
    std::env::remove_var(UI_ENV_VAR);
}

#[test]
fn test_global_trace_built_from_env() {
    let _guard = serial();
    // Nothing else in this binary touches the global trace, so it is
    // created here with the variable set.
    std::env::set_var(UI_ENV_VAR, "off");
    let ui_enabled = global().ui_enabled();
    std::env::remove_var(UI_ENV_VAR);

    assert_eq!(ui_enabled, Some(false));
    assert!(!global().raise_on_failure());
}
