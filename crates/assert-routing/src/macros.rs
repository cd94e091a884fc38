//! Assertion macros routed through the process-wide trace

/// Report an assertion failure with a formatted message
///
/// Evaluates to `Result<(), AssertionTriggered>`.
///
/// ```rust
/// use assert_routing::{debug_fail, AssertRouter};
///
/// let result = AssertRouter::disable_and_throw(|| debug_fail!("bad index {}", 3));
/// assert_eq!(result.unwrap_err().message(), "bad index 3");
/// ```
#[macro_export]
macro_rules! debug_fail {
    ($($arg:tt)+) => {
        $crate::fail(&::std::format!($($arg)+))
    };
}

/// Check a condition in debug builds, routing a failure on `false`
///
/// Evaluates to `Ok(())` when the condition holds or debug assertions are
/// off; otherwise to the result of routing the failure.
///
/// ```rust
/// use assert_routing::{debug_check, AssertRouter};
///
/// let len = 2;
/// let result = AssertRouter::disable_and_throw(|| debug_check!(len > 3, "len was {}", len));
/// assert!(result.is_err() || !cfg!(debug_assertions));
/// ```
#[macro_export]
macro_rules! debug_check {
    ($cond:expr $(,)?) => {
        if ::std::cfg!(debug_assertions) && !$cond {
            $crate::fail(::std::concat!("assertion failed: ", ::std::stringify!($cond)))
        } else {
            ::std::result::Result::<(), $crate::AssertionTriggered>::Ok(())
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if ::std::cfg!(debug_assertions) && !$cond {
            $crate::fail(&::std::format!($($arg)+))
        } else {
            ::std::result::Result::<(), $crate::AssertionTriggered>::Ok(())
        }
    };
}
