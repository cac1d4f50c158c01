use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pullrefresh_testing::prelude::*;
use pullrefresh_widget::prelude::*;
use pullrefresh_widget::OffsetTrackerConfig;

type PlainManager = RecordingManager<OffsetRefreshManager<()>>;

fn plain_manager(trigger: i32) -> Rc<RefCell<PlainManager>> {
    RecordingManager::shared(OffsetRefreshManager::with_config(
        (),
        OffsetTrackerConfig::default()
            .with_damping_rate(1.0)
            .with_trigger_distance(trigger),
    ))
}

struct Fixture {
    robot: GestureRobot,
    list: Rc<RefCell<FakeScrollView>>,
    fired: Rc<Cell<u32>>,
}

fn fixture(manager: ManagerHandle) -> Fixture {
    init_test_logging();
    let list = FakeScrollView::shared();
    let mut layout = RefreshLayout::new();
    layout.add_child(view_handle(&list));
    layout.set_manager(manager).expect("fresh layout accepts a manager");

    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    layout.set_on_refresh_listener(move || counter.set(counter.get() + 1));

    Fixture {
        robot: GestureRobot::new(layout).with_viewport(320.0, 480.0),
        list,
        fired,
    }
}

fn consumed_calls(manager: &Rc<RefCell<PlainManager>>) -> Vec<(i32, i32)> {
    manager
        .borrow()
        .calls()
        .iter()
        .filter_map(|call| match *call {
            ManagerCall::Consume { dy, consumed } => Some((dy, consumed)),
            _ => None,
        })
        .collect()
}

#[test]
fn consumption_never_exceeds_offer_or_flips_sign() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(120.0, 6);
    f.robot.drag_by(-200.0, 8);
    f.robot.touch_up();

    let calls = consumed_calls(&manager);
    assert!(!calls.is_empty());
    for (dy, consumed) in calls {
        assert!(
            consumed == 0 || (consumed.signum() == dy.signum() && consumed.abs() <= dy.abs()),
            "consumed {consumed} of {dy}"
        );
    }
    assert_eq!(manager.borrow().inner().tracker().consumed_distance(), 0);
}

#[test]
fn manager_cannot_change_while_refreshing() {
    let mut f = fixture(plain_manager(100));
    f.robot.layout_mut().set_refreshing(true);

    let result = f.robot.layout_mut().set_manager(plain_manager(50));
    assert!(matches!(result, Err(RefreshError::IllegalState { .. })));

    f.robot.run_until_idle();
    f.robot.layout_mut().set_refreshing(false);
    f.robot.run_until_idle();
    assert!(f.robot.layout_mut().set_manager(plain_manager(50)).is_ok());
}

#[test]
fn manager_cannot_change_mid_drag() {
    let mut f = fixture(plain_manager(100));
    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(40.0, 2);

    let result = f.robot.layout_mut().set_manager(plain_manager(50));
    assert!(matches!(result, Err(RefreshError::IllegalState { .. })));
}

#[test]
fn attaching_same_manager_twice_is_a_noop() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());
    let view = f.robot.layout().refresh_view().cloned().unwrap();

    f.robot.layout_mut().set_manager(manager).unwrap();

    let again = f.robot.layout().refresh_view().unwrap();
    assert!(Rc::ptr_eq(&view, again));
    assert_eq!(f.robot.layout().children().len(), 2);
}

#[test]
fn gesture_without_motion_changes_nothing() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.touch_down(100.0, 100.0);
    f.robot.move_to(103.0);
    f.robot.touch_up();
    f.robot.nested_drag(&[]).unwrap();

    assert_eq!(manager.borrow().transitions(), 0);
    assert!(!f.robot.layout().is_refreshing());
    assert_eq!(f.fired.get(), 0);
}

#[test]
fn prepare_then_finish_returns_everything_to_rest() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.layout_mut().set_refreshing(true);
    f.robot.run_until_idle();
    assert_eq!(f.robot.layout().scroll_y(), -100);
    assert_eq!(f.fired.get(), 1);

    f.robot.layout_mut().set_refreshing(false);
    f.robot.run_until_idle();

    let manager = manager.borrow();
    assert_eq!(manager.inner().tracker().view_offset(), 0);
    assert_eq!(manager.inner().tracker().consumed_distance(), 0);
    assert_eq!(f.robot.layout().scroll_y(), 0);
    assert!(!f.robot.layout().is_refreshing());
}

#[test]
fn nested_pull_past_trigger_fires_exactly_once() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.nested_drag(&[-30, -40, -50]).unwrap();

    assert!(f.robot.layout().is_refreshing());
    assert_eq!(f.fired.get(), 0, "fires once the indicator is in place");
    f.robot.run_until_idle();
    assert_eq!(f.fired.get(), 1);
    assert_eq!(f.robot.layout().scroll_y(), -100);
    assert_eq!(
        manager.borrow().calls().last(),
        Some(&ManagerCall::Prepare {
            during_scroll: true,
            changed: true
        })
    );

    f.robot.run_until_idle();
    assert_eq!(f.fired.get(), 1);
}

#[test]
fn nested_pull_short_of_trigger_stays_idle() {
    let mut f = fixture(plain_manager(100));

    f.robot.nested_drag(&[-30, -20]).unwrap();
    assert_eq!(f.robot.layout().scroll_y(), -50);
    f.robot.run_until_idle();

    assert!(!f.robot.layout().is_refreshing());
    assert_eq!(f.robot.layout().scroll_y(), 0);
    assert_eq!(f.fired.get(), 0);
}

#[test]
fn refreshing_mid_nested_scroll_locks_the_gesture() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    assert!(f.robot.begin_nested_scroll());
    f.robot.nested_scroll_step(-30).unwrap();
    f.robot.layout_mut().set_refreshing(true);

    assert!(f.robot.layout().is_gesture_locked());
    assert_eq!(f.list.borrow().stop_nested_scroll_calls(), 1);

    // The target keeps scrolling until it handles the stop request.
    f.robot.nested_scroll_step(-40).unwrap();
    f.robot.end_nested_scroll();

    assert_eq!(
        manager.borrow_mut().take_calls(),
        vec![
            ManagerCall::StartConsume,
            ManagerCall::Consume {
                dy: -30,
                consumed: -30
            },
            ManagerCall::Prepare {
                during_scroll: false,
                changed: true
            },
        ]
    );

    f.robot.run_until_idle();
    assert_eq!(f.fired.get(), 1);

    assert!(f.robot.begin_nested_scroll());
    assert!(!f.robot.layout().is_gesture_locked());
}

#[test]
fn refreshing_mid_drag_cancels_the_drag() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(40.0, 2);
    assert_eq!(f.robot.layout().gesture_phase(), GesturePhase::Dragging);

    f.robot.layout_mut().set_refreshing(true);
    assert_eq!(f.robot.layout().gesture_phase(), GesturePhase::Idle);
    assert!(f.robot.layout().is_gesture_locked());

    let before = manager.borrow().calls().len();
    assert!(!f.robot.move_to(180.0));
    f.robot.touch_up();
    assert_eq!(manager.borrow().calls().len(), before);

    f.robot.touch_down(100.0, 100.0);
    assert!(!f.robot.layout().is_gesture_locked());
}

#[test]
fn repeated_set_refreshing_is_a_noop() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.layout_mut().set_refreshing(true);
    f.robot.layout_mut().set_refreshing(true);
    f.robot.run_until_idle();

    assert_eq!(manager.borrow().transitions(), 1);
    assert_eq!(f.fired.get(), 1);
}

#[test]
fn unconsumed_pre_scroll_goes_to_ancestors() {
    let (parent, log) = RecordingParent::new();
    let mut f = fixture(plain_manager(100));
    f.robot
        .layout_mut()
        .set_nested_scroll_parent(Some(Box::new(parent)));

    assert!(f.robot.begin_nested_scroll());
    f.robot.nested_scroll_step(-8).unwrap();
    let consumed = f.robot.layout_mut().on_nested_pre_scroll(0, 20).unwrap();

    assert_eq!(consumed, [0, 8]);
    assert_eq!(log.borrow().started, 1);
    assert_eq!(log.borrow().pre_scrolls.last(), Some(&(0, 12)));

    f.robot.end_nested_scroll();
    assert_eq!(log.borrow().stopped, 1);
}

#[test]
fn ancestors_share_of_pre_scroll_is_reported() {
    let (parent, log) = RecordingParent::new();
    let mut f = fixture(plain_manager(100));
    f.robot
        .layout_mut()
        .set_nested_scroll_parent(Some(Box::new(parent.consuming_pre_scroll(0.5))));

    f.robot.begin_nested_scroll();
    let consumed = f.robot.layout_mut().on_nested_pre_scroll(0, 20).unwrap();

    assert_eq!(consumed, [0, 10]);
    assert_eq!(log.borrow().pre_scrolls, vec![(0, 20)]);
}

#[test]
fn flings_are_forwarded_to_ancestors() {
    let (parent, log) = RecordingParent::new();
    let mut f = fixture(plain_manager(100));
    f.robot
        .layout_mut()
        .set_nested_scroll_parent(Some(Box::new(parent)));

    f.robot.begin_nested_scroll();
    f.robot.layout_mut().on_nested_pre_fling(0.0, -900.0);
    f.robot.layout_mut().on_nested_fling(0.0, -900.0, false);

    assert_eq!(log.borrow().pre_flings, vec![(0.0, -900.0)]);
    assert_eq!(log.borrow().flings, vec![(0.0, -900.0, false)]);
}

#[test]
fn greedy_manager_is_rejected() {
    init_test_logging();
    let list = FakeScrollView::shared();
    let mut layout = RefreshLayout::new();
    layout.add_child(view_handle(&list));
    layout
        .set_manager(Rc::new(RefCell::new(GreedyManager { factor: 2 })))
        .unwrap();
    let mut robot = GestureRobot::new(layout);

    robot.begin_nested_scroll();
    let result = robot.layout_mut().on_nested_pre_scroll(0, 10);

    assert_eq!(
        result,
        Err(RefreshError::ConsumedTooMuch {
            offered: 10,
            consumed: 20
        })
    );
}

#[test]
fn scrolled_target_keeps_the_gesture() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());
    f.list.borrow_mut().set_scroll_y(50.0);

    f.robot.pull(200.0, 5);
    f.robot.nested_drag(&[-30, -40]).unwrap();

    assert!(consumed_calls(&manager).is_empty());
    assert!(!f.robot.layout().is_refreshing());
}

#[test]
fn checker_overrides_target_scroll_state() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());
    f.robot
        .layout_mut()
        .set_target_scroll_up_checker(Some(Box::new(|| true)));

    f.robot.pull(200.0, 5);

    assert!(consumed_calls(&manager).is_empty());
}

#[test]
fn disabled_layout_ignores_pulls() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());
    f.robot.layout_mut().set_enabled(false);

    f.robot.pull(200.0, 5);
    f.robot.nested_drag(&[-150]).unwrap();

    assert!(manager.borrow().calls().is_empty());
}

#[test]
fn touch_pull_past_trigger_refreshes() {
    let mut f = fixture(plain_manager(100));

    f.robot.pull(200.0, 10);
    assert!(f.robot.layout().is_refreshing());
    f.robot.run_until_idle();

    assert_eq!(f.fired.get(), 1);
    assert_eq!(f.robot.layout().scroll_y(), -100);
}

#[test]
fn intercepted_drag_starts_after_slop() {
    let manager = plain_manager(100);
    let list = FakeScrollView::shared();
    let mut layout = RefreshLayout::new();
    layout.add_child(view_handle(&list));
    layout.set_manager(manager.clone()).unwrap();
    let mut robot = GestureRobot::new(layout).with_child_taking_touch(true);

    robot.touch_down(100.0, 100.0);
    assert!(!robot.move_to(104.0));
    // Crossing the slop hands the stream over; this move is not consumed.
    assert!(robot.move_to(130.0));
    robot.move_to(160.0);

    assert_eq!(consumed_calls(&manager), vec![(-30, -30)]);
}

#[test]
fn secondary_pointer_takes_over() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.touch_down(100.0, 100.0);
    f.robot.move_to(150.0);
    f.robot.dispatch(
        MotionEvent::new(
            MotionAction::PointerDown,
            vec![PointerSample::new(1, 100.0, 150.0), PointerSample::new(2, 200.0, 300.0)].into(),
        )
        .with_action_index(1),
    );
    f.robot.dispatch(
        MotionEvent::new(
            MotionAction::PointerUp,
            vec![PointerSample::new(1, 100.0, 150.0), PointerSample::new(2, 200.0, 300.0)].into(),
        )
        .with_action_index(0),
    );
    f.robot.dispatch(MotionEvent::move_to(2, 200.0, 320.0));

    assert_eq!(consumed_calls(&manager).last(), Some(&(-20, -20)));
    assert!(f.robot.dispatch(MotionEvent::up(2, 200.0, 320.0)));
}

#[test]
fn up_with_unknown_pointer_is_rejected() {
    let mut f = fixture(plain_manager(100));

    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(50.0, 2);

    assert!(!f.robot.dispatch(MotionEvent::up(42, 0.0, 0.0)));
    assert_eq!(f.robot.layout().gesture_phase(), GesturePhase::Dragging);
}

#[test]
fn release_short_of_trigger_eases_back() {
    let mut f = fixture(plain_manager(100));
    f.robot.nested_drag(&[-50]).unwrap();

    // The first frame anchors the animation; twelve more cover 192 of 400 ms.
    for _ in 0..13 {
        f.robot.advance_frame();
    }
    assert_approx_eq(f.robot.layout().scroll_y() as f32, -25.0, 3.0, "halfway back");

    f.robot.run_until_idle();
    assert_eq!(f.robot.layout().scroll_y(), 0);
}

#[test]
fn cancel_never_notifies() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());

    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(150.0, 3);
    assert!(!f.robot.cancel());

    assert_eq!(f.robot.layout().gesture_phase(), GesturePhase::Idle);
    assert_eq!(manager.borrow().transitions(), 0);
    assert!(!f.robot.layout().is_refreshing());
}

#[test]
fn non_nesting_target_keeps_interception() {
    init_test_logging();
    let list = Rc::new(RefCell::new(FakeScrollView::new().with_nested_scrolling(false)));
    let mut layout = RefreshLayout::new();
    layout.add_child(view_handle(&list));

    assert!(!layout.request_disallow_intercept_touch_event(true));
    assert!(!layout.is_in_nested_scroll());
}

#[test]
fn pull_during_programmatic_refresh_announces_once() {
    let mut f = fixture(plain_manager(100));
    f.robot.layout_mut().set_refreshing(true);
    f.robot.advance_frame();
    f.robot.advance_frame();

    f.robot.nested_drag(&[-10]).unwrap();
    f.robot.run_until_idle();

    assert_eq!(f.fired.get(), 1);
    assert!(f.robot.layout().is_refreshing());
}

#[test]
fn repeated_release_during_prepare_announces_once() {
    let mut f = fixture(plain_manager(100));
    f.robot.nested_drag(&[-150]).unwrap();
    assert!(f.robot.layout().is_refreshing());
    f.robot.advance_frame();

    // Pulled further before the first settle landed.
    f.robot.nested_drag(&[-80]).unwrap();
    assert_eq!(f.fired.get(), 1);
    f.robot.run_until_idle();

    assert_eq!(f.fired.get(), 1);
    assert_eq!(f.robot.layout().scroll_y(), -100);
}

#[test]
fn nested_pull_during_settle_back_keeps_its_distance() {
    let manager = plain_manager(100);
    let mut f = fixture(manager.clone());
    f.robot.nested_drag(&[-30, -20]).unwrap();
    assert!(!f.robot.layout().is_refreshing());
    f.robot.advance_frame();
    f.robot.advance_frame();
    let visible = f.robot.layout().scroll_y();
    assert!(visible < -40, "settle barely started: {visible}");

    assert!(f.robot.begin_nested_scroll());
    f.robot.nested_scroll_step(-200).unwrap();
    assert_eq!(f.robot.layout().scroll_y(), visible - 200);

    // Frames arriving mid-gesture no longer drag the offset home.
    f.robot.advance_time(500);
    assert_eq!(f.robot.layout().scroll_y(), visible - 200);
    assert_eq!(
        manager.borrow().inner().tracker().consumed_distance(),
        visible - 200
    );

    f.robot.end_nested_scroll();
    f.robot.run_until_idle();

    assert!(f.robot.layout().is_refreshing());
    assert_eq!(f.fired.get(), 1);
    assert_eq!(f.robot.layout().scroll_y(), -100);
}

#[test]
fn touch_pull_during_finish_starts_a_new_refresh() {
    let mut f = fixture(plain_manager(100));
    f.robot.layout_mut().set_refreshing(true);
    f.robot.run_until_idle();
    f.robot.layout_mut().set_refreshing(false);
    f.robot.advance_frame();
    f.robot.advance_frame();

    f.robot.touch_down(100.0, 100.0);
    f.robot.drag_by(150.0, 5);
    let pulled = f.robot.layout().scroll_y();
    assert!(pulled < -200, "pull lost to the settle: {pulled}");

    f.robot.advance_frame();
    f.robot.advance_frame();
    assert_eq!(f.robot.layout().scroll_y(), pulled);

    f.robot.touch_up();
    f.robot.run_until_idle();

    assert!(f.robot.layout().is_refreshing());
    assert_eq!(f.fired.get(), 2);
    assert_eq!(f.robot.layout().scroll_y(), -100);
}

#[test]
fn extreme_nested_delta_is_accepted() {
    let mut f = fixture(plain_manager(100));
    assert!(f.robot.begin_nested_scroll());

    f.robot.nested_scroll_step(i32::MIN).unwrap();

    assert_eq!(f.robot.layout().scroll_y(), i32::MIN);
}
