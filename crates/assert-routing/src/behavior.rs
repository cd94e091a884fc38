//! Assertion routing behavior flags
//!
//! [`AssertBehavior`] is a set of independent capabilities. Decode it with
//! membership tests ([`AssertBehavior::contains`]) rather than comparing
//! against the combined constant.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Requested routing policy for the lifetime of an
    /// [`AssertRouter`](crate::AssertRouter)
    #[derive(Default)]
    pub struct AssertBehavior: u8 {
        /// Disable the assertion UI
        const DISABLE_UI = 1;
        /// Convert assertion failures into
        /// [`AssertionTriggered`](crate::AssertionTriggered) errors
        const THROW_ERRORS = 1 << 1;
        /// Disable the UI and convert failures into errors
        const DISABLE_UI_AND_THROW_ERRORS = Self::DISABLE_UI.bits | Self::THROW_ERRORS.bits;
    }
}

impl AssertBehavior {
    /// Leave the platform behavior untouched (UI shown, nothing converted)
    pub const NORMAL: Self = Self::empty();

    /// Whether the assertion UI should be turned off
    #[inline]
    #[must_use]
    pub const fn disables_ui(self) -> bool {
        self.contains(Self::DISABLE_UI)
    }

    /// Whether failures should be converted into errors
    #[inline]
    #[must_use]
    pub const fn throws_errors(self) -> bool {
        self.contains(Self::THROW_ERRORS)
    }
}

impl fmt::Display for AssertBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.disables_ui(), self.throws_errors()) {
            (false, false) => f.write_str("Normal"),
            (true, false) => f.write_str("DisableUI"),
            (false, true) => f.write_str("ThrowErrors"),
            (true, true) => f.write_str("DisableUI | ThrowErrors"),
        }
    }
}
