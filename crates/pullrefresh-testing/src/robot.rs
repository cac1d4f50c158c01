//! Robot-style driver for a [`RefreshLayout`].
//!
//! The robot plays the host toolkit: it routes touches through interception
//! the way a view group does, plays a nested-scrolling child, and pumps the
//! frame clock.
//!
//! ```
//! use pullrefresh_testing::{FakeScrollView, GestureRobot, view_handle};
//! use pullrefresh_widget::{BannerRefreshManager, RefreshLayout};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let list = FakeScrollView::shared();
//! let mut layout = RefreshLayout::new();
//! layout.add_child(view_handle(&list));
//! layout
//!     .set_manager(Rc::new(RefCell::new(BannerRefreshManager::banner())))
//!     .unwrap();
//!
//! let mut robot = GestureRobot::new(layout).with_viewport(320.0, 480.0);
//! robot.pull(200.0, 10);
//! robot.run_until_idle();
//! assert!(robot.layout().is_refreshing());
//! ```

use log::trace;
use pullrefresh_foundation::{MotionAction, MotionEvent, PointerId, ScrollAxes};
use pullrefresh_ui_graphics::Rect;
use pullrefresh_ui_layout::Constraints;
use pullrefresh_widget::{RefreshError, RefreshLayout};

pub const FRAME_INTERVAL_NANOS: u64 = 16_000_000;
const EVENT_INTERVAL_MILLIS: u64 = 16;
const MAX_IDLE_FRAMES: usize = 1_000;

pub struct GestureRobot {
    layout: RefreshLayout,
    frame_time_nanos: u64,
    event_time_millis: u64,
    child_takes_touch: bool,
    routed_to_layout: bool,
    gesture_dropped: bool,
    pointer: PointerId,
    x: f32,
    y: f32,
    viewport: Option<Rect>,
}

impl GestureRobot {
    pub fn new(layout: RefreshLayout) -> Self {
        Self {
            layout,
            frame_time_nanos: 0,
            event_time_millis: 0,
            child_takes_touch: false,
            routed_to_layout: false,
            gesture_dropped: false,
            pointer: 1,
            x: 0.0,
            y: 0.0,
            viewport: None,
        }
    }

    /// Measure and lay out the coordinator at `width` x `height`, and again
    /// after every frame.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Some(Rect::new(0.0, 0.0, width, height));
        self.relayout();
        self
    }

    /// Whether the target claims touch streams itself, leaving the
    /// coordinator to intercept them.
    pub fn with_child_taking_touch(mut self, takes_touch: bool) -> Self {
        self.child_takes_touch = takes_touch;
        self
    }

    pub fn layout(&self) -> &RefreshLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut RefreshLayout {
        &mut self.layout
    }

    pub fn into_layout(self) -> RefreshLayout {
        self.layout
    }

    pub fn relayout(&mut self) {
        if let Some(viewport) = self.viewport {
            self.layout
                .measure(Constraints::tight(viewport.width, viewport.height));
            self.layout.layout(viewport);
        }
    }

    // ---- touch ------------------------------------------------------------

    /// Deliver `event` the way a view group would. Returns whether the
    /// coordinator handled it.
    pub fn dispatch(&mut self, event: MotionEvent) -> bool {
        let event = event.with_time(self.next_event_time());
        if event.action == MotionAction::Down {
            self.routed_to_layout = false;
            self.gesture_dropped = false;
        }

        let handled = if self.gesture_dropped {
            false
        } else if self.routed_to_layout {
            self.layout.on_touch_event(&event)
        } else if self.layout.on_intercept_touch_event(&event) {
            trace!("robot: coordinator intercepted {:?}", event.action);
            self.routed_to_layout = true;
            true
        } else if self.child_takes_touch {
            false
        } else if event.action == MotionAction::Down {
            let handled = self.layout.on_touch_event(&event);
            self.routed_to_layout = handled;
            self.gesture_dropped = !handled;
            handled
        } else {
            false
        };

        if matches!(event.action, MotionAction::Up | MotionAction::Cancel) {
            self.routed_to_layout = false;
        }
        handled
    }

    pub fn touch_down(&mut self, x: f32, y: f32) -> bool {
        self.x = x;
        self.y = y;
        self.dispatch(MotionEvent::down(self.pointer, x, y))
    }

    pub fn move_to(&mut self, y: f32) -> bool {
        self.y = y;
        self.dispatch(MotionEvent::move_to(self.pointer, self.x, y))
    }

    /// Move by `dy` in `steps` equal moves.
    pub fn drag_by(&mut self, dy: f32, steps: usize) {
        let steps = steps.max(1);
        let step = dy / steps as f32;
        let start = self.y;
        for i in 1..=steps {
            self.move_to(start + step * i as f32);
        }
    }

    pub fn touch_up(&mut self) -> bool {
        self.dispatch(MotionEvent::up(self.pointer, self.x, self.y))
    }

    pub fn cancel(&mut self) -> bool {
        self.dispatch(MotionEvent::cancel(0))
    }

    /// Full gesture: down at the top, drag down by `distance`, release.
    pub fn pull(&mut self, distance: f32, steps: usize) {
        self.touch_down(100.0, 100.0);
        self.drag_by(distance, steps);
        self.touch_up();
    }

    fn next_event_time(&mut self) -> u64 {
        self.event_time_millis += EVENT_INTERVAL_MILLIS;
        self.event_time_millis
    }

    // ---- nested scrolling --------------------------------------------------

    /// Start a vertical nested scroll as the target would. Returns whether
    /// the coordinator took part.
    pub fn begin_nested_scroll(&mut self) -> bool {
        if !self.layout.on_start_nested_scroll(ScrollAxes::VERTICAL) {
            return false;
        }
        self.layout.on_nested_scroll_accepted(ScrollAxes::VERTICAL);
        true
    }

    /// One scroll step of a target sitting at its top: the coordinator sees
    /// `dy` first, then the target consumes pushes and leaves pulls over.
    /// Returns what the pre-scroll pass consumed.
    pub fn nested_scroll_step(&mut self, dy: i32) -> Result<[i32; 2], RefreshError> {
        let consumed = self.layout.on_nested_pre_scroll(0, dy)?;
        let remaining = dy - consumed[1];
        if remaining < 0 {
            self.layout.on_nested_scroll(0, 0, 0, remaining)?;
        } else if remaining > 0 {
            self.layout.on_nested_scroll(0, remaining, 0, 0)?;
        }
        Ok(consumed)
    }

    pub fn end_nested_scroll(&mut self) {
        self.layout.on_stop_nested_scroll();
    }

    /// Whole nested scroll over `deltas`. A coordinator that declines the
    /// scroll sees none of it.
    pub fn nested_drag(&mut self, deltas: &[i32]) -> Result<(), RefreshError> {
        if !self.begin_nested_scroll() {
            return Ok(());
        }
        for &dy in deltas {
            self.nested_scroll_step(dy)?;
        }
        self.end_nested_scroll();
        Ok(())
    }

    // ---- frames -----------------------------------------------------------

    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_INTERVAL_NANOS;
        self.layout.on_frame(self.frame_time_nanos);
        self.relayout();
    }

    pub fn advance_time(&mut self, millis: u64) {
        let frames = (millis * 1_000_000).div_ceil(FRAME_INTERVAL_NANOS);
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Pump frames until no animation is running. Returns the number of
    /// frames it took.
    pub fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.layout.needs_frame() {
            assert!(
                frames < MAX_IDLE_FRAMES,
                "coordinator still animating after {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
            frames += 1;
        }
        frames
    }
}
