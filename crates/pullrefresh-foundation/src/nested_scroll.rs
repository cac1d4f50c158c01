//! Nested-scroll protocol plumbing.
//!
//! A scrollable descendant offers its scroll deltas to its ancestors before
//! (pre-scroll) and after (scroll) consuming them itself. The refresh
//! coordinator sits in the middle of that chain: it is a parent for its
//! target and a child for its own ancestors. The upward half is modelled by
//! [`NestedScrollDispatcher`], which the host implements for whatever sits
//! above the coordinator.

use log::trace;

/// Set of scroll axes, as a small bit set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct ScrollAxes(u8);

impl ScrollAxes {
    pub const NONE: Self = Self(0);
    pub const HORIZONTAL: Self = Self(1 << 0);
    pub const VERTICAL: Self = Self(1 << 1);

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(&self, other: Self) -> bool {
        other.0 != 0 && (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Upward half of the nested-scroll protocol: how a view reaches the
/// nested-scroll parent above it.
///
/// All deltas are whole pixels, `[x, y]`.
pub trait NestedScrollDispatcher {
    /// Begin a nested scroll along `axes`. Returns true if an ancestor
    /// accepted it.
    fn start_nested_scroll(&mut self, axes: ScrollAxes) -> bool;

    fn stop_nested_scroll(&mut self);

    /// Offer `(dx, dy)` before this view consumes it. Returns what ancestors
    /// consumed, or `None` when nobody took part.
    fn dispatch_nested_pre_scroll(&mut self, dx: i32, dy: i32) -> Option<[i32; 2]>;

    /// Report consumed and leftover deltas after this view scrolled. Returns
    /// how far ancestors moved this view in the window, or `None` when
    /// nobody took part.
    fn dispatch_nested_scroll(
        &mut self,
        dx_consumed: i32,
        dy_consumed: i32,
        dx_unconsumed: i32,
        dy_unconsumed: i32,
    ) -> Option<[i32; 2]>;

    fn dispatch_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool;

    fn dispatch_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool;
}

/// Child-side helper: tracks whether nested scrolling is enabled and whether
/// an ancestor accepted the current nested scroll, and only forwards to the
/// dispatcher while both hold.
pub struct NestedScrollChildHelper {
    parent: Option<Box<dyn NestedScrollDispatcher>>,
    enabled: bool,
    in_progress: bool,
}

impl NestedScrollChildHelper {
    pub fn new() -> Self {
        Self {
            parent: None,
            enabled: true,
            in_progress: false,
        }
    }

    pub fn set_parent(&mut self, parent: Option<Box<dyn NestedScrollDispatcher>>) {
        if self.in_progress {
            self.stop_nested_scroll();
        }
        self.parent = parent;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.stop_nested_scroll();
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_nested_scrolling_parent(&self) -> bool {
        self.in_progress
    }

    pub fn start_nested_scroll(&mut self, axes: ScrollAxes) -> bool {
        if self.in_progress {
            return true;
        }
        if !self.enabled {
            return false;
        }
        let Some(parent) = self.parent.as_mut() else {
            return false;
        };
        self.in_progress = parent.start_nested_scroll(axes);
        trace!("nested scroll start {axes:?} accepted={}", self.in_progress);
        self.in_progress
    }

    pub fn stop_nested_scroll(&mut self) {
        if !self.in_progress {
            return;
        }
        self.in_progress = false;
        if let Some(parent) = self.parent.as_mut() {
            parent.stop_nested_scroll();
        }
    }

    pub fn dispatch_nested_pre_scroll(&mut self, dx: i32, dy: i32) -> Option<[i32; 2]> {
        if !self.is_dispatching() || (dx == 0 && dy == 0) {
            return None;
        }
        self.parent.as_mut()?.dispatch_nested_pre_scroll(dx, dy)
    }

    pub fn dispatch_nested_scroll(
        &mut self,
        dx_consumed: i32,
        dy_consumed: i32,
        dx_unconsumed: i32,
        dy_unconsumed: i32,
    ) -> Option<[i32; 2]> {
        if !self.is_dispatching() {
            return None;
        }
        if dx_consumed == 0 && dy_consumed == 0 && dx_unconsumed == 0 && dy_unconsumed == 0 {
            return None;
        }
        self.parent.as_mut()?.dispatch_nested_scroll(
            dx_consumed,
            dy_consumed,
            dx_unconsumed,
            dy_unconsumed,
        )
    }

    pub fn dispatch_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        if !self.is_dispatching() {
            return false;
        }
        self.parent
            .as_mut()
            .is_some_and(|parent| parent.dispatch_nested_pre_fling(velocity_x, velocity_y))
    }

    pub fn dispatch_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        if !self.is_dispatching() {
            return false;
        }
        self.parent
            .as_mut()
            .is_some_and(|parent| parent.dispatch_nested_fling(velocity_x, velocity_y, consumed))
    }

    fn is_dispatching(&self) -> bool {
        self.enabled && self.in_progress
    }
}

impl Default for NestedScrollChildHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// Parent-side bookkeeping: the axes of the nested scroll currently accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NestedScrollParentState {
    axes: ScrollAxes,
}

impl NestedScrollParentState {
    pub fn on_nested_scroll_accepted(&mut self, axes: ScrollAxes) {
        self.axes = axes;
    }

    pub fn on_stop_nested_scroll(&mut self) {
        self.axes = ScrollAxes::NONE;
    }

    pub fn nested_scroll_axes(&self) -> ScrollAxes {
        self.axes
    }
}

#[cfg(test)]
#[path = "tests/nested_scroll_tests.rs"]
mod tests;
