//! Error types for assertion routing
//!
//! - [`AssertionTriggered`]: an assertion failure converted into a value
//! - [`RouterError`]: misuse of an [`AssertRouter`](crate::AssertRouter)

use crate::trace::ScopeId;

/// An assertion failure converted into a catchable error
///
/// Produced by the [`FailureSink`](crate::FailureSink) while failures are
/// routed with [`AssertBehavior::THROW_ERRORS`](crate::AssertBehavior::THROW_ERRORS).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionTriggered {
    message: String,
}

impl AssertionTriggered {
    /// Create from a failure message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create from a failure message and a detail message
    ///
    /// The stored message reads `"{message} ({detail})"`.
    pub fn with_detail(message: impl AsRef<str>, detail: impl AsRef<str>) -> Self {
        Self {
            message: format!("{} ({})", message.as_ref(), detail.as_ref()),
        }
    }

    /// The formatted failure message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by [`AssertRouter`](crate::AssertRouter)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// `restore` was called after the router was disposed
    #[error("assert router already disposed")]
    Disposed,

    /// Restoration attempted while a later scope on the same trace is active
    #[error("assert router scope {scope} restored out of order: scope {active} is still active")]
    OutOfOrder {
        /// Scope that attempted to restore
        scope: ScopeId,
        /// Innermost scope still active on the trace
        active: ScopeId,
    },

    /// An assertion failure routed as an error
    #[error("assertion triggered: {0}")]
    Triggered(#[from] AssertionTriggered),
}

impl RouterError {
    /// True for errors that indicate caller misuse rather than a failed assertion
    #[inline]
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Disposed | Self::OutOfOrder { .. })
    }
}

/// Result type alias for router operations
pub type RouterResult<T> = Result<T, RouterError>;
