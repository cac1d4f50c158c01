//! Nested-scroll parent and child roles of the coordinator.
//!
//! As a parent, the coordinator takes pre-scroll pushes (positive `dy`) to
//! hide an exposed indicator before the target scrolls, and post-scroll
//! leftovers (negative `dy` the target could not use at its top) to pull the
//! indicator out. As a child, it forwards whatever it did not use to its own
//! ancestors.

use log::trace;
use pullrefresh_foundation::ScrollAxes;

use super::RefreshLayout;
use crate::error::RefreshError;

impl RefreshLayout {
    pub fn on_start_nested_scroll(&self, axes: ScrollAxes) -> bool {
        self.enabled && self.accepts_scroll() && axes.contains(ScrollAxes::VERTICAL)
    }

    pub fn on_nested_scroll_accepted(&mut self, axes: ScrollAxes) {
        self.nested_parent.on_nested_scroll_accepted(axes);
        self.in_nested_scroll = true;
        self.notify_motion_end = true;
        self.gesture_locked = false;
        self.has_motion = false;
        self.nested_child.start_nested_scroll(ScrollAxes::VERTICAL);
        trace!("nested scroll accepted {axes:?}");
        self.start_consume();
    }

    pub fn nested_scroll_axes(&self) -> ScrollAxes {
        self.nested_parent.nested_scroll_axes()
    }

    /// Offer `(dx, dy)` before the target scrolls. Returns the consumed
    /// `[x, y]`, including what ancestors took.
    ///
    /// Fails if the manager reports consuming more than it was offered.
    pub fn on_nested_pre_scroll(&mut self, dx: i32, dy: i32) -> Result<[i32; 2], RefreshError> {
        let mut consumed = [0, 0];
        if dy > 0 && !self.gesture_locked {
            consumed[1] = self.consume_checked(dy)?;
        }

        if let Some(parent_consumed) = self
            .nested_child
            .dispatch_nested_pre_scroll(dx - consumed[0], dy - consumed[1])
        {
            consumed[0] += parent_consumed[0];
            consumed[1] += parent_consumed[1];
        }
        Ok(consumed)
    }

    /// Leftover motion after the target scrolled. Ancestors see it first;
    /// what they did not absorb pulls the indicator out while the target is
    /// at its top.
    pub fn on_nested_scroll(
        &mut self,
        dx_consumed: i32,
        dy_consumed: i32,
        dx_unconsumed: i32,
        dy_unconsumed: i32,
    ) -> Result<(), RefreshError> {
        let window_offset = self
            .nested_child
            .dispatch_nested_scroll(dx_consumed, dy_consumed, dx_unconsumed, dy_unconsumed)
            .unwrap_or([0, 0]);

        let dy = dy_unconsumed.saturating_add(window_offset[1]);
        if dy < 0 && !self.gesture_locked && !self.can_target_scroll_up() {
            self.consume_checked(dy_unconsumed)?;
        }
        Ok(())
    }

    pub fn on_stop_nested_scroll(&mut self) {
        self.nested_parent.on_stop_nested_scroll();
        self.in_nested_scroll = false;
        if std::mem::take(&mut self.notify_motion_end) {
            self.stop_consume();
        } else {
            self.has_motion = false;
        }
        self.nested_child.stop_nested_scroll();
    }

    pub fn on_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.nested_child.dispatch_nested_pre_fling(velocity_x, velocity_y)
    }

    pub fn on_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        self.nested_child.dispatch_nested_fling(velocity_x, velocity_y, consumed)
    }
}
