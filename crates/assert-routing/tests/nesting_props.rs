use assert_routing::{AssertBehavior, AssertRouter, TraceConfig};
use assert_routing_test_utils::isolated_trace_with;
use proptest::prelude::*;

fn behavior() -> impl Strategy<Value = AssertBehavior> {
    prop_oneof![
        Just(AssertBehavior::NORMAL),
        Just(AssertBehavior::DISABLE_UI),
        Just(AssertBehavior::THROW_ERRORS),
        Just(AssertBehavior::DISABLE_UI_AND_THROW_ERRORS),
    ]
}

proptest! {
    #[test]
    fn prop_lifo_nesting_restores_each_level(
        initial_ui in any::<bool>(),
        behaviors in proptest::collection::vec(behavior(), 1..12)
    ) {
        let (trace, _) = isolated_trace_with(TraceConfig::new().with_ui_enabled(initial_ui));

        let mut routers = Vec::new();
        let mut expected = vec![(Some(initial_ui), false)];

        for behavior in &behaviors {
            routers.push(AssertRouter::on(&trace, *behavior));
            let effective = (Some(!behavior.disables_ui()), behavior.throws_errors());
            prop_assert_eq!((trace.ui_enabled(), trace.raise_on_failure()), effective);
            prop_assert_eq!(trace.fail("Assert").is_err(), behavior.throws_errors());
            expected.push(effective);
        }

        while let Some(mut router) = routers.pop() {
            router.dispose().unwrap();
            expected.pop();
            let enclosing = *expected.last().unwrap();
            prop_assert_eq!((trace.ui_enabled(), trace.raise_on_failure()), enclosing);
        }

        prop_assert_eq!(trace.scope_depth(), 0);
    }

    #[test]
    fn prop_drop_order_reversed_still_restores(
        behaviors in proptest::collection::vec(behavior(), 1..8)
    ) {
        let (trace, _) = isolated_trace_with(TraceConfig::new().with_ui_enabled(false));

        let routers: Vec<_> = behaviors
            .iter()
            .map(|behavior| AssertRouter::on(&trace, *behavior))
            .collect();
        // Vec drops front to back: outermost first, so every drop but the
        // last is deferred.
        drop(routers);

        prop_assert_eq!(trace.scope_depth(), 0);
        prop_assert_eq!(trace.ui_enabled(), Some(false));
        prop_assert!(!trace.raise_on_failure());
    }
}
