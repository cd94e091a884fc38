//! Routing applied once for a whole suite, with local routers nested inside.

use assert_routing::{AssertBehavior, AssertRouter, AssertionTriggered, Trace};
use assert_routing_test_utils::{isolated_trace, SuiteScope};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn converted_to_error(trace: &Arc<Trace>) -> Result<(), AssertionTriggered> {
    trace.fail("Assert")
}

fn local_router_restores_same_settings(trace: &Arc<Trace>) -> Result<(), AssertionTriggered> {
    let local_triggered =
        AssertRouter::disable_and_throw_on(trace, || trace.fail("Assert")).is_err();
    assert!(local_triggered, "the local router should have converted the failure");

    trace.fail("Assert")
}

fn local_router_restores_off_settings(trace: &Arc<Trace>) -> Result<(), AssertionTriggered> {
    let local_triggered = AssertRouter::disable_on(trace, || trace.fail("Assert")).is_err();
    assert!(!local_triggered, "the local router should not have converted the failure");

    trace.fail("Assert")
}

type Case = fn(&Arc<Trace>) -> Result<(), AssertionTriggered>;

const CASES: [Case; 3] = [
    converted_to_error,
    local_router_restores_same_settings,
    local_router_restores_off_settings,
];

#[test]
fn test_suite_scope_converts_every_case() {
    let (trace, ui) = isolated_trace();
    let suite = SuiteScope::start(&trace, AssertBehavior::DISABLE_UI_AND_THROW_ERRORS);

    for case in CASES {
        assert!(suite.run_case(case).is_err());
    }

    suite.finish().unwrap();
    assert_eq!(ui.count(), 0);
    assert_eq!(trace.ui_enabled(), Some(true));
    assert!(!trace.raise_on_failure());
}

#[test]
fn test_suite_scope_matches_per_case_routing() {
    let (suite_trace, _) = isolated_trace();
    let suite = SuiteScope::start(&suite_trace, AssertBehavior::DISABLE_UI_AND_THROW_ERRORS);
    let suite_results: Vec<_> = CASES.iter().map(|case| suite.run_case(case)).collect();
    suite.finish().unwrap();

    let (case_trace, _) = isolated_trace();
    let per_case_results: Vec<_> = CASES
        .iter()
        .map(|case| AssertRouter::disable_and_throw_on(&case_trace, || case(&case_trace)))
        .collect();

    assert_eq!(suite_results, per_case_results);
    assert_eq!(suite_trace.ui_enabled(), case_trace.ui_enabled());
    assert_eq!(suite_trace.raise_on_failure(), case_trace.raise_on_failure());
}

#[test]
fn test_suite_scope_exposes_trace() {
    let (trace, _) = isolated_trace();
    let suite = SuiteScope::start(&trace, AssertBehavior::DISABLE_UI);

    assert!(Arc::ptr_eq(suite.trace(), &trace));
    assert_eq!(trace.scope_depth(), 1);

    suite.finish().unwrap();
    assert_eq!(trace.scope_depth(), 0);
}
