//! Test doubles for the coordinator's collaborators: a scrollable target,
//! a nested-scroll ancestor and a manager decorator that records calls.

use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_foundation::{NestedScrollDispatcher, ScrollAxes};
use pullrefresh_ui_graphics::{Rect, Size};
use pullrefresh_ui_layout::{Constraints, View, ViewHandle};
use pullrefresh_widget::{DrawingOrder, RefreshContext, RefreshManager};

/// List-like target with a settable scroll position.
#[derive(Debug)]
pub struct FakeScrollView {
    scroll_y: f32,
    nested_scrolling_enabled: bool,
    stop_nested_scroll_calls: usize,
    measured: Size,
    bounds: Rect,
}

impl FakeScrollView {
    pub fn new() -> Self {
        Self {
            scroll_y: 0.0,
            nested_scrolling_enabled: true,
            stop_nested_scroll_calls: 0,
            measured: Size::ZERO,
            bounds: Rect::default(),
        }
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn with_nested_scrolling(mut self, enabled: bool) -> Self {
        self.nested_scrolling_enabled = enabled;
        self
    }

    /// Content offset from the top. Anything above zero means the list can
    /// still scroll up.
    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn stop_nested_scroll_calls(&self) -> usize {
        self.stop_nested_scroll_calls
    }
}

impl Default for FakeScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for FakeScrollView {
    fn measure(&mut self, constraints: Constraints) -> Size {
        self.measured = constraints.max_size();
        self.measured
    }

    fn measured_size(&self) -> Size {
        self.measured
    }

    fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn can_scroll_vertically(&self, direction: i32) -> bool {
        if direction < 0 {
            self.scroll_y > 0.0
        } else {
            direction > 0
        }
    }

    fn is_nested_scrolling_enabled(&self) -> bool {
        self.nested_scrolling_enabled
    }

    fn stop_nested_scroll(&mut self) {
        self.stop_nested_scroll_calls += 1;
    }
}

/// Coerce a typed shared view into the handle the coordinator stores.
pub fn view_handle<V: View + 'static>(view: &Rc<RefCell<V>>) -> ViewHandle {
    view.clone()
}

/// Everything a [`RecordingParent`] was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParentLog {
    pub started: usize,
    pub stopped: usize,
    pub pre_scrolls: Vec<(i32, i32)>,
    pub scrolls: Vec<[i32; 4]>,
    pub pre_flings: Vec<(f32, f32)>,
    pub flings: Vec<(f32, f32, bool)>,
}

/// Nested-scroll ancestor that records every call and can be told to take a
/// share of each pre-scroll.
pub struct RecordingParent {
    log: Rc<RefCell<ParentLog>>,
    pre_scroll_share: f32,
}

impl RecordingParent {
    pub fn new() -> (Self, Rc<RefCell<ParentLog>>) {
        let log = Rc::new(RefCell::new(ParentLog::default()));
        let parent = Self {
            log: log.clone(),
            pre_scroll_share: 0.0,
        };
        (parent, log)
    }

    /// Consume `share` of every offered pre-scroll `dy`.
    pub fn consuming_pre_scroll(mut self, share: f32) -> Self {
        self.pre_scroll_share = share;
        self
    }
}

impl NestedScrollDispatcher for RecordingParent {
    fn start_nested_scroll(&mut self, axes: ScrollAxes) -> bool {
        self.log.borrow_mut().started += 1;
        axes.contains(ScrollAxes::VERTICAL)
    }

    fn stop_nested_scroll(&mut self) {
        self.log.borrow_mut().stopped += 1;
    }

    fn dispatch_nested_pre_scroll(&mut self, dx: i32, dy: i32) -> Option<[i32; 2]> {
        self.log.borrow_mut().pre_scrolls.push((dx, dy));
        Some([0, (dy as f32 * self.pre_scroll_share) as i32])
    }

    fn dispatch_nested_scroll(
        &mut self,
        dx_consumed: i32,
        dy_consumed: i32,
        dx_unconsumed: i32,
        dy_unconsumed: i32,
    ) -> Option<[i32; 2]> {
        self.log
            .borrow_mut()
            .scrolls
            .push([dx_consumed, dy_consumed, dx_unconsumed, dy_unconsumed]);
        Some([0, 0])
    }

    fn dispatch_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.log.borrow_mut().pre_flings.push((velocity_x, velocity_y));
        false
    }

    fn dispatch_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        self.log
            .borrow_mut()
            .flings
            .push((velocity_x, velocity_y, consumed));
        false
    }
}

/// One call observed by a [`RecordingManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerCall {
    StartConsume,
    Consume { dy: i32, consumed: i32 },
    Prepare { during_scroll: bool, changed: bool },
    Finish { during_scroll: bool, changed: bool },
}

/// Wraps a manager and records the state-changing calls it receives.
pub struct RecordingManager<M> {
    inner: M,
    calls: Vec<ManagerCall>,
}

impl<M: RefreshManager> RecordingManager<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    pub fn shared(inner: M) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(inner)))
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn calls(&self) -> &[ManagerCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<ManagerCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of `prepare` and `finish` calls seen so far.
    pub fn transitions(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ManagerCall::Prepare { .. } | ManagerCall::Finish { .. }))
            .count()
    }
}

impl<M: RefreshManager> RefreshManager for RecordingManager<M> {
    fn create_view(&mut self) -> ViewHandle {
        self.inner.create_view()
    }

    fn can_trigger(&self) -> bool {
        self.inner.can_trigger()
    }

    fn prepare(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, changed: bool) {
        self.calls.push(ManagerCall::Prepare {
            during_scroll,
            changed,
        });
        self.inner.prepare(cx, during_scroll, changed);
    }

    fn finish(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, changed: bool) {
        self.calls.push(ManagerCall::Finish {
            during_scroll,
            changed,
        });
        self.inner.finish(cx, during_scroll, changed);
    }

    fn on_consume(&mut self, cx: &mut RefreshContext<'_>, dy: i32) -> i32 {
        let consumed = self.inner.on_consume(cx, dy);
        self.calls.push(ManagerCall::Consume { dy, consumed });
        consumed
    }

    fn layout(&mut self, target: Option<&ViewHandle>, refresh: Option<&ViewHandle>, container: Rect) {
        self.inner.layout(target, refresh, container);
    }

    fn measure(
        &mut self,
        target: Option<&ViewHandle>,
        refresh: Option<&ViewHandle>,
        constraints: Constraints,
        container: Size,
    ) {
        self.inner.measure(target, refresh, constraints, container);
    }

    fn drawing_order(&self) -> DrawingOrder {
        self.inner.drawing_order()
    }

    fn accept_scroll(&self) -> bool {
        self.inner.accept_scroll()
    }

    fn start_consume(&mut self, cx: &mut RefreshContext<'_>) {
        self.calls.push(ManagerCall::StartConsume);
        self.inner.start_consume(cx);
    }

    fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    fn on_frame(&mut self, cx: &mut RefreshContext<'_>, frame_time_nanos: u64) {
        self.inner.on_frame(cx, frame_time_nanos);
    }

    fn on_attached_to_window(&mut self) {
        self.inner.on_attached_to_window();
    }

    fn on_detached_from_window(&mut self) {
        self.inner.on_detached_from_window();
    }
}

/// Manager that consumes a fixed share of every delta, ignoring the usual
/// rules. Used to exercise the coordinator's consumption checks.
pub struct GreedyManager {
    pub factor: i32,
}

impl RefreshManager for GreedyManager {
    fn create_view(&mut self) -> ViewHandle {
        Rc::new(RefCell::new(FakeScrollView::new()))
    }

    fn can_trigger(&self) -> bool {
        false
    }

    fn prepare(&mut self, _cx: &mut RefreshContext<'_>, _during_scroll: bool, _changed: bool) {}

    fn finish(&mut self, _cx: &mut RefreshContext<'_>, _during_scroll: bool, _changed: bool) {}

    fn on_consume(&mut self, _cx: &mut RefreshContext<'_>, dy: i32) -> i32 {
        dy * self.factor
    }

    fn layout(&mut self, _target: Option<&ViewHandle>, _refresh: Option<&ViewHandle>, _container: Rect) {}
}
