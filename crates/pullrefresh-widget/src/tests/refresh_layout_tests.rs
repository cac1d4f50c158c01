use super::*;
use crate::managers::{OffsetRefreshManager, OffsetTrackerConfig};
use pullrefresh_foundation::ScrollAxes;

struct Target {
    nested: bool,
    measured: Size,
    bounds: Rect,
}

impl View for Target {
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

    fn is_nested_scrolling_enabled(&self) -> bool {
        self.nested
    }
}

fn target(nested: bool) -> ViewHandle {
    Rc::new(RefCell::new(Target {
        nested,
        measured: Size::ZERO,
        bounds: Rect::default(),
    }))
}

fn plain_manager() -> ManagerHandle {
    let config = OffsetTrackerConfig::default()
        .with_damping_rate(1.0)
        .with_trigger_distance(100);
    Rc::new(RefCell::new(OffsetRefreshManager::with_config((), config)))
}

#[test]
fn without_manager_everything_is_inert() {
    let mut layout = RefreshLayout::new();
    layout.add_child(target(false));

    layout.set_refreshing(true);
    assert!(!layout.is_refreshing());
    assert!(!layout.on_intercept_touch_event(&MotionEvent::down(1, 0.0, 0.0)));
    assert!(!layout.on_touch_event(&MotionEvent::down(1, 0.0, 0.0)));
    assert!(!layout.on_start_nested_scroll(ScrollAxes::VERTICAL));
    assert_eq!(layout.gesture_phase(), GesturePhase::Idle);
    layout.layout(Rect::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn indicator_is_not_the_target() {
    let mut layout = RefreshLayout::new();
    layout.set_manager(plain_manager()).unwrap();
    let content = target(true);
    layout.add_child(content.clone());

    assert_eq!(layout.children().len(), 2);
    let found = layout.target().unwrap();
    assert!(same_view(&found, &content));
}

#[test]
fn replacing_manager_swaps_indicator_view() {
    let mut layout = RefreshLayout::new();
    layout.add_child(target(true));
    layout.set_manager(plain_manager()).unwrap();
    let first = layout.refresh_view().cloned().unwrap();

    layout.set_manager(plain_manager()).unwrap();

    assert_eq!(layout.children().len(), 2);
    let second = layout.refresh_view().unwrap();
    assert!(!same_view(&first, second));
    assert!(!layout.children().iter().any(|child| same_view(child, &first)));
}

#[test]
fn target_fills_padded_container() {
    let mut layout = RefreshLayout::new();
    let content = target(true);
    layout.add_child(content.clone());
    layout.set_manager(plain_manager()).unwrap();
    layout.set_padding(EdgeInsets::from_components(4.0, 10.0, 6.0, 20.0));

    let size = layout.measure(Constraints::tight(200.0, 300.0));

    assert_eq!(size, Size::new(200.0, 300.0));
    assert_eq!(content.borrow().measured_size(), Size::new(190.0, 270.0));
}

#[test]
fn drawing_order_moves_indicator_to_front() {
    let mut layout = RefreshLayout::new();
    layout.set_manager(plain_manager()).unwrap();
    layout.add_child(target(true));
    layout.add_child(target(true));
    layout.measure(Constraints::tight(100.0, 100.0));

    // Indicator sits at index 0 and is drawn last.
    let order: Vec<usize> = (0..3).map(|i| layout.child_drawing_order(3, i)).collect();
    assert_eq!(order, vec![1, 2, 0]);
}

#[test]
fn drawing_order_is_identity_before_measure() {
    let mut layout = RefreshLayout::new();
    layout.set_manager(plain_manager()).unwrap();
    layout.add_child(target(true));
    assert_eq!(layout.child_drawing_order(2, 0), 0);
    assert_eq!(layout.child_drawing_order(2, 1), 1);
}

#[test]
fn disallow_intercept_swallowed_for_non_nesting_target() {
    let mut layout = RefreshLayout::new();
    layout.add_child(target(false));
    assert!(!layout.request_disallow_intercept_touch_event(true));

    let mut nesting = RefreshLayout::new();
    nesting.add_child(target(true));
    assert!(nesting.request_disallow_intercept_touch_event(true));
    assert!(!nesting.request_disallow_intercept_touch_event(false));
}

#[test]
fn gesture_phase_tracks_slop() {
    let mut layout = RefreshLayout::with_config(RefreshConfig::default().with_touch_slop(10.0));
    layout.add_child(target(false));
    layout.set_manager(plain_manager()).unwrap();

    layout.on_touch_event(&MotionEvent::down(7, 0.0, 100.0));
    assert_eq!(layout.gesture_phase(), GesturePhase::Tracking);
    layout.on_touch_event(&MotionEvent::move_to(7, 0.0, 105.0));
    assert_eq!(layout.gesture_phase(), GesturePhase::Tracking);
    layout.on_touch_event(&MotionEvent::move_to(7, 0.0, 140.0));
    assert_eq!(layout.gesture_phase(), GesturePhase::Dragging);
    // Slop is not part of the pull.
    assert_eq!(layout.scroll_y(), -30);

    layout.on_touch_event(&MotionEvent::cancel(0));
    assert_eq!(layout.gesture_phase(), GesturePhase::Idle);
}

#[test]
fn config_scales_slop_with_density() {
    assert_eq!(RefreshConfig::for_density(2.0).touch_slop, TOUCH_SLOP * 2.0);
    assert_eq!(RefreshConfig::default().touch_slop, TOUCH_SLOP);
}

#[test]
fn indicator_view_is_sized_by_manager() {
    let mut layout = RefreshLayout::new();
    layout.add_child(target(true));
    let manager = Rc::new(RefCell::new(OffsetRefreshManager::with_config(
        (),
        OffsetTrackerConfig::default().with_trigger_distance(50),
    )));
    layout.set_manager(manager).unwrap();
    layout.measure(Constraints::tight(120.0, 80.0));

    let refresh = layout.refresh_view().unwrap();
    assert_eq!(refresh.borrow().measured_size(), Size::new(120.0, 0.0));
}
