//! Shared gesture constants for consistent touch handling.
//!
//! These values are in pixels at baseline density. Hosts on high-density
//! screens should scale them through `RefreshConfig`.

/// Touch slop in pixels.
///
/// A pointer must travel further than this below its down position before a
/// pull is recognised as a drag. Until then the gesture belongs to whoever
/// else wants it (taps on list items, the list's own scrolling).
///
/// Matches common platform conventions (Android uses ~8dp for
/// `ViewConfiguration.TOUCH_SLOP`).
pub const TOUCH_SLOP: f32 = 8.0;

