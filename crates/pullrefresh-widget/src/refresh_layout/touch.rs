use log::{error, trace};
use pullrefresh_foundation::{MotionAction, MotionEvent, PointerId};

use super::RefreshLayout;

/// Where the current touch gesture stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// No pointer is being tracked.
    #[default]
    Idle,
    /// A pointer is down but has not moved past the touch slop.
    Tracking,
    /// The pointer passed the touch slop and its motion feeds the manager.
    Dragging,
}

#[derive(Debug, Default)]
pub(super) struct TouchTracker {
    active_pointer: Option<PointerId>,
    initial_down_y: f32,
    last_motion_y: f32,
    being_dragged: bool,
    last_event_time: u64,
}

impl TouchTracker {
    pub(super) fn phase(&self) -> GesturePhase {
        match (self.active_pointer, self.being_dragged) {
            (_, true) => GesturePhase::Dragging,
            (Some(_), false) => GesturePhase::Tracking,
            (None, false) => GesturePhase::Idle,
        }
    }

    pub(super) fn is_dragging(&self) -> bool {
        self.being_dragged
    }

    pub(super) fn last_event_time(&self) -> u64 {
        self.last_event_time
    }

    fn end(&mut self) {
        self.being_dragged = false;
        self.active_pointer = None;
    }

    fn active_pointer_y(&self, event: &MotionEvent) -> Option<f32> {
        let index = event.find_pointer_index(self.active_pointer?)?;
        event.y(index)
    }
}

impl RefreshLayout {
    pub fn gesture_phase(&self) -> GesturePhase {
        self.touch.phase()
    }

    /// Decide whether to steal the gesture from the target.
    ///
    /// Returns true once a downward drag past the touch slop is seen while
    /// the target sits at its top; the host then routes the rest of the
    /// gesture to [`RefreshLayout::on_touch_event`].
    pub fn on_intercept_touch_event(&mut self, event: &MotionEvent) -> bool {
        self.begin_event(event);
        if !self.can_handle_motion() {
            return false;
        }

        match event.action {
            MotionAction::Down => self.on_touch_down(event),
            MotionAction::Move => {
                let Some(y) = self.touch.active_pointer_y(event) else {
                    error!("intercepted move without a valid active pointer");
                    return false;
                };
                self.start_dragging(y);
                self.touch.last_motion_y = y;
            }
            MotionAction::PointerUp => self.on_secondary_pointer_up(event),
            MotionAction::Up | MotionAction::Cancel => self.touch.end(),
            MotionAction::PointerDown => {}
        }

        self.touch.is_dragging()
    }

    /// Handle a motion event routed to the coordinator itself. Returns true
    /// while the gesture is being tracked.
    pub fn on_touch_event(&mut self, event: &MotionEvent) -> bool {
        self.begin_event(event);
        if !self.can_handle_motion() {
            return false;
        }
        self.process_touch_event(event)
    }

    /// Touch handling past the entry guard. Also receives the synthesized
    /// cancel when a gesture is aborted.
    pub(super) fn process_touch_event(&mut self, event: &MotionEvent) -> bool {
        match event.action {
            MotionAction::Down => self.on_touch_down(event),
            MotionAction::Move => {
                let Some(y) = self.touch.active_pointer_y(event) else {
                    error!("move without a valid active pointer");
                    return false;
                };
                self.start_dragging(y);
                if self.touch.is_dragging() {
                    let dy = (self.touch.last_motion_y - y) as i32;
                    self.consume(dy);
                }
                self.touch.last_motion_y = y;
            }
            MotionAction::PointerDown => {}
            MotionAction::PointerUp => self.on_secondary_pointer_up(event),
            MotionAction::Up => {
                if self.touch.active_pointer_y(event).is_none() {
                    error!("up without a valid active pointer");
                    return false;
                }
                self.touch.end();
                if std::mem::take(&mut self.notify_motion_end) {
                    self.stop_consume();
                }
            }
            MotionAction::Cancel => {
                self.touch.end();
                return false;
            }
        }
        true
    }

    fn begin_event(&mut self, event: &MotionEvent) {
        self.touch.last_event_time = event.event_time_millis;
        if event.action == MotionAction::Down && self.gesture_locked {
            trace!("fresh gesture, releasing gesture lock");
            self.gesture_locked = false;
        }
    }

    /// Whether touch input may drive the manager right now.
    fn can_handle_motion(&self) -> bool {
        self.controller.is_some()
            && self.enabled
            && !self.can_target_scroll_up()
            && self.accepts_scroll()
            && !self.in_nested_scroll
            && !self.gesture_locked
    }

    fn on_touch_down(&mut self, event: &MotionEvent) {
        self.touch.active_pointer = event.pointer_id(0);
        self.touch.being_dragged = false;
        self.has_motion = false;
        if let Some(y) = self.touch.active_pointer_y(event) {
            self.touch.initial_down_y = y;
            self.touch.last_motion_y = y;
        }
    }

    fn start_dragging(&mut self, y: f32) {
        if self.touch.being_dragged {
            return;
        }
        let slop = self.config.touch_slop;
        if y - self.touch.initial_down_y > slop {
            self.touch.last_motion_y = self.touch.initial_down_y + slop;
            self.touch.being_dragged = true;
            self.notify_motion_end = true;
            trace!("drag started at y={y}");
            self.start_consume();
        }
    }

    fn on_secondary_pointer_up(&mut self, event: &MotionEvent) {
        let Some(pointer_id) = event.action_pointer_id() else {
            return;
        };
        if Some(pointer_id) != self.touch.active_pointer {
            return;
        }
        let new_index = if event.action_index == 0 { 1 } else { 0 };
        self.touch.active_pointer = event.pointer_id(new_index);
        if let Some(y) = event.y(new_index) {
            self.touch.last_motion_y = y;
        }
    }
}
