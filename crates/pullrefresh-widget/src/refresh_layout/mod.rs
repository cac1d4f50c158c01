//! The pull-to-refresh coordinator.
//!
//! [`RefreshLayout`] wraps one scrollable target plus the indicator view of
//! its current [`RefreshManager`](crate::RefreshManager). It arbitrates
//! between raw touch drags and the nested-scroll protocol, decides when the
//! target has reached its top edge, feeds pull distance to the manager, and
//! owns the refreshing flag through a [`RefreshController`].
//!
//! The host toolkit drives it: it forwards motion events and nested-scroll
//! callbacks, asks it to measure and lay out, and pumps [`RefreshLayout::on_frame`]
//! while [`RefreshLayout::needs_frame`] reports running animations.

mod nested_scroll;
mod touch;

pub use touch::GesturePhase;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use pullrefresh_foundation::{
    can_target_scroll_up, gesture_constants::TOUCH_SLOP, MotionEvent, NestedScrollChildHelper,
    NestedScrollDispatcher, NestedScrollParentState, TargetScrollUpChecker,
};
use pullrefresh_ui_graphics::{EdgeInsets, Rect, Size};
use pullrefresh_ui_layout::{same_view, Constraints, View, ViewHandle};

use crate::controller::RefreshController;
use crate::error::RefreshError;
use crate::manager::{DrawingOrder, ManagerHandle, RefreshHost};

use touch::TouchTracker;

/// Coordinator tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshConfig {
    /// Distance in pixels a pointer must travel before a drag starts.
    pub touch_slop: f32,
}

impl RefreshConfig {
    /// Touch slop scaled to a display density.
    pub fn for_density(density: f32) -> Self {
        Self {
            touch_slop: TOUCH_SLOP * density,
        }
    }

    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            touch_slop: TOUCH_SLOP,
        }
    }
}

/// Coordinator state a manager may touch through its context. Kept apart
/// from the controller so both can be borrowed at once.
#[derive(Debug, Default)]
struct HostSurface {
    scroll_y: i32,
    layout_requests: u64,
    pending_refresh_events: u32,
}

impl RefreshHost for HostSurface {
    fn scroll_to(&mut self, y: i32) {
        self.scroll_y = y;
    }

    fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    fn fire_refresh(&mut self) {
        self.pending_refresh_events += 1;
    }

    fn invalidate(&mut self) {
        self.layout_requests += 1;
    }
}

type RefreshListener = Box<dyn FnMut()>;

pub struct RefreshLayout {
    config: RefreshConfig,
    controller: Option<RefreshController>,
    listener: Option<RefreshListener>,
    scroll_up_checker: Option<TargetScrollUpChecker>,
    children: Vec<ViewHandle>,
    target: Option<Weak<RefCell<dyn View>>>,
    refresh_view: Option<ViewHandle>,
    refresh_view_index: Option<usize>,
    surface: HostSurface,
    touch: TouchTracker,
    nested_parent: NestedScrollParentState,
    nested_child: NestedScrollChildHelper,
    in_nested_scroll: bool,
    gesture_locked: bool,
    notify_motion_end: bool,
    has_motion: bool,
    enabled: bool,
    attached: bool,
    padding: EdgeInsets,
    measured_size: Size,
    bounds: Rect,
}

impl RefreshLayout {
    pub fn new() -> Self {
        Self::with_config(RefreshConfig::default())
    }

    pub fn with_config(config: RefreshConfig) -> Self {
        Self {
            config,
            controller: None,
            listener: None,
            scroll_up_checker: None,
            children: Vec::new(),
            target: None,
            refresh_view: None,
            refresh_view_index: None,
            surface: HostSurface::default(),
            touch: TouchTracker::default(),
            nested_parent: NestedScrollParentState::default(),
            nested_child: NestedScrollChildHelper::new(),
            in_nested_scroll: false,
            gesture_locked: false,
            notify_motion_end: false,
            has_motion: false,
            enabled: true,
            attached: false,
            padding: EdgeInsets::default(),
            measured_size: Size::ZERO,
            bounds: Rect::default(),
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    // ---- children ---------------------------------------------------------

    pub fn add_child(&mut self, child: ViewHandle) {
        self.children.push(child);
        self.refresh_view_index = None;
    }

    /// Removes `child`. Removing the current target makes the next pass
    /// pick a new one.
    pub fn remove_child(&mut self, child: &ViewHandle) -> bool {
        let Some(index) = self.children.iter().position(|c| same_view(c, child)) else {
            return false;
        };
        self.children.remove(index);
        self.refresh_view_index = None;
        if self.target_view().is_some_and(|target| same_view(&target, child)) {
            self.target = None;
        }
        true
    }

    pub fn children(&self) -> &[ViewHandle] {
        &self.children
    }

    pub fn refresh_view(&self) -> Option<&ViewHandle> {
        self.refresh_view.as_ref()
    }

    /// The scroll target: the first child that is not the indicator view.
    pub fn target(&mut self) -> Option<ViewHandle> {
        self.ensure_target()
    }

    fn target_view(&self) -> Option<ViewHandle> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    fn ensure_target(&mut self) -> Option<ViewHandle> {
        if let Some(target) = self.target_view() {
            return Some(target);
        }
        let refresh = self.refresh_view.as_ref();
        let target = self
            .children
            .iter()
            .find(|child| refresh.map_or(true, |refresh| !same_view(child, refresh)))
            .cloned();
        self.target = target.as_ref().map(Rc::downgrade);
        target
    }

    // ---- configuration ----------------------------------------------------

    /// Attach `manager`, replacing the current one and its indicator view.
    ///
    /// Fails while refreshing or while a gesture is in flight. Attaching the
    /// manager that is already attached does nothing.
    pub fn set_manager(&mut self, manager: ManagerHandle) -> Result<(), RefreshError> {
        if self.is_refreshing() {
            return Err(RefreshError::IllegalState {
                reason: "cannot change refresh manager while refreshing",
            });
        }
        if self.touch.is_dragging() || self.in_nested_scroll {
            return Err(RefreshError::IllegalState {
                reason: "cannot change refresh manager while scrolling",
            });
        }
        if self
            .controller
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current.manager(), &manager))
        {
            return Ok(());
        }

        if let Some(old) = self.controller.take() {
            if self.attached {
                old.manager().borrow_mut().on_detached_from_window();
            }
        }
        if let Some(view) = self.refresh_view.take() {
            self.remove_child(&view);
        }

        let view = manager.borrow_mut().create_view();
        if self.attached {
            manager.borrow_mut().on_attached_to_window();
        }
        self.children.push(view.clone());
        self.refresh_view = Some(view);
        self.refresh_view_index = None;
        self.target = None;
        self.surface.scroll_y = 0;
        self.controller = Some(RefreshController::new(manager));
        self.surface.invalidate();
        debug!("refresh manager attached");
        Ok(())
    }

    pub fn manager(&self) -> Option<&ManagerHandle> {
        self.controller.as_ref().map(RefreshController::manager)
    }

    /// Listener invoked each time a refresh starts. It runs after the
    /// manager call that fired it has returned.
    pub fn set_on_refresh_listener(&mut self, listener: impl FnMut() + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_on_refresh_listener(&mut self) {
        self.listener = None;
    }

    pub fn set_target_scroll_up_checker(&mut self, checker: Option<TargetScrollUpChecker>) {
        self.scroll_up_checker = checker;
    }

    /// Dispatcher for the nested-scroll parent above this layout.
    pub fn set_nested_scroll_parent(&mut self, parent: Option<Box<dyn NestedScrollDispatcher>>) {
        self.nested_child.set_parent(parent);
    }

    pub fn set_nested_scrolling_enabled(&mut self, enabled: bool) {
        self.nested_child.set_enabled(enabled);
    }

    pub fn is_nested_scrolling_enabled(&self) -> bool {
        self.nested_child.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_padding(&mut self, padding: EdgeInsets) {
        self.padding = padding;
        self.surface.invalidate();
    }

    // ---- refresh state ----------------------------------------------------

    pub fn is_refreshing(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(RefreshController::is_refreshing)
    }

    /// Start or stop refreshing programmatically.
    ///
    /// Does nothing without a manager or when already in the requested state.
    /// Starting a refresh first aborts any drag or nested scroll in flight.
    pub fn set_refreshing(&mut self, refreshing: bool) {
        match self.controller.as_ref() {
            None => return,
            Some(controller) if controller.is_refreshing() == refreshing => return,
            Some(_) => {}
        }
        if refreshing {
            self.abort_scrolling();
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.set_refresh(&mut self.surface, refreshing, false);
        }
        self.dispatch_refresh_events();
    }

    /// Tear down the gesture in flight so it can no longer feed the manager.
    fn abort_scrolling(&mut self) {
        if self.in_nested_scroll {
            self.notify_motion_end = false;
            if let Some(target) = self.target_view() {
                target.borrow_mut().stop_nested_scroll();
            }
            self.gesture_locked = true;
            debug!("nested scroll aborted for refresh");
        }
        if self.touch.is_dragging() {
            self.notify_motion_end = false;
            let cancel = MotionEvent::cancel(self.touch.last_event_time());
            self.process_touch_event(&cancel);
            self.gesture_locked = true;
            debug!("drag aborted for refresh");
        }
    }

    pub fn is_gesture_locked(&self) -> bool {
        self.gesture_locked
    }

    pub fn is_in_nested_scroll(&self) -> bool {
        self.in_nested_scroll
    }

    /// Vertical content offset currently applied by the manager.
    pub fn scroll_y(&self) -> i32 {
        self.surface.scroll_y
    }

    /// Number of relayouts requested so far. Hosts compare it against the
    /// value seen at their last layout pass.
    pub fn layout_requests(&self) -> u64 {
        self.surface.layout_requests
    }

    // ---- frames -----------------------------------------------------------

    pub fn needs_frame(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(RefreshController::is_animating)
    }

    pub fn on_frame(&mut self, frame_time_nanos: u64) {
        if let Some(controller) = self.controller.as_mut() {
            controller.on_frame(&mut self.surface, frame_time_nanos);
        }
        self.dispatch_refresh_events();
    }

    // ---- window attachment -------------------------------------------------

    pub fn on_attached_to_window(&mut self) {
        self.attached = true;
        if let Some(controller) = self.controller.as_ref() {
            controller.manager().borrow_mut().on_attached_to_window();
        }
    }

    pub fn on_detached_from_window(&mut self) {
        self.attached = false;
        if let Some(controller) = self.controller.as_ref() {
            controller.manager().borrow_mut().on_detached_from_window();
        }
    }

    // ---- measure & layout --------------------------------------------------

    pub fn measure(&mut self, constraints: Constraints) -> Size {
        let size = constraints.max_size();
        self.measured_size = size;

        let target = self.ensure_target();
        if let Some(target) = target.as_ref() {
            let inner = Constraints::tight(size.width, size.height)
                .deflate(self.padding.horizontal_sum(), self.padding.vertical_sum());
            target.borrow_mut().measure(inner);
        }
        if let Some(controller) = self.controller.as_ref() {
            controller.manager().borrow_mut().measure(
                target.as_ref(),
                self.refresh_view.as_ref(),
                constraints,
                size,
            );
        }

        self.refresh_view_index = self.refresh_view.as_ref().and_then(|refresh| {
            self.children
                .iter()
                .position(|child| same_view(child, refresh))
        });
        size
    }

    pub fn measured_size(&self) -> Size {
        self.measured_size
    }

    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let Some(controller) = self.controller.as_ref() else {
            debug!("no refresh manager, children left unplaced");
            return;
        };
        let manager = controller.manager().clone();
        let target = self.ensure_target();
        manager
            .borrow_mut()
            .layout(target.as_ref(), self.refresh_view.as_ref(), bounds);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Child index to draw at position `i` out of `count`, moving the
    /// indicator to the front or back according to the manager.
    pub fn child_drawing_order(&self, count: usize, i: usize) -> usize {
        let (Some(index), Some(controller)) = (self.refresh_view_index, self.controller.as_ref())
        else {
            return i;
        };
        if count == 0 || index >= count {
            return i;
        }
        match controller.drawing_order() {
            DrawingOrder::Above => {
                if i == count - 1 {
                    index
                } else if i >= index {
                    i + 1
                } else {
                    i
                }
            }
            DrawingOrder::Below => {
                if i == 0 {
                    index
                } else if i <= index {
                    i - 1
                } else {
                    i
                }
            }
        }
    }

    /// Whether a descendant's request to stop interception should be
    /// honoured and passed further up. Swallowed when the target does not
    /// take part in nested scrolling, since then the coordinator must stay
    /// able to intercept its drags.
    pub fn request_disallow_intercept_touch_event(&mut self, disallow: bool) -> bool {
        match self.ensure_target() {
            Some(target) if !target.borrow().is_nested_scrolling_enabled() => {
                if disallow {
                    debug!("disallow-intercept swallowed, target does not nest scrolls");
                }
                false
            }
            _ => disallow,
        }
    }

    // ---- shared gesture plumbing -------------------------------------------

    fn can_target_scroll_up(&self) -> bool {
        can_target_scroll_up(self.target_view().as_ref(), self.scroll_up_checker.as_ref())
    }

    fn accepts_scroll(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(RefreshController::accept_scroll)
    }

    fn start_consume(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.start_consume(&mut self.surface);
        }
        self.dispatch_refresh_events();
    }

    fn consume(&mut self, dy: i32) -> i32 {
        let Some(controller) = self.controller.as_mut() else {
            return 0;
        };
        let consumed = controller.on_consume(&mut self.surface, dy);
        if consumed != 0 {
            self.has_motion = true;
        }
        self.dispatch_refresh_events();
        consumed
    }

    /// Like [`Self::consume`], but treats a manager consuming more than
    /// offered, or against the offered direction, as an error.
    fn consume_checked(&mut self, dy: i32) -> Result<i32, RefreshError> {
        let consumed = self.consume(dy);
        let exceeds = consumed != 0 && (consumed.signum() != dy.signum() || consumed.unsigned_abs() > dy.unsigned_abs());
        if exceeds {
            return Err(RefreshError::ConsumedTooMuch {
                offered: dy,
                consumed,
            });
        }
        Ok(consumed)
    }

    fn stop_consume(&mut self) {
        let had_motion = std::mem::take(&mut self.has_motion);
        if let Some(controller) = self.controller.as_mut() {
            controller.stop_consume(&mut self.surface, had_motion);
        }
        self.dispatch_refresh_events();
    }

    fn dispatch_refresh_events(&mut self) {
        let pending = std::mem::take(&mut self.surface.pending_refresh_events);
        for _ in 0..pending {
            debug!("refresh started");
            if let Some(listener) = self.listener.as_mut() {
                listener();
            }
        }
    }
}

impl Default for RefreshLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/refresh_layout_tests.rs"]
mod tests;
