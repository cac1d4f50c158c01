use super::*;
use crate::manager::RefreshHost;

const FRAME_NANOS: u64 = 16_000_000;

#[derive(Default)]
struct Host {
    fired: u32,
    invalidations: u32,
}

impl RefreshHost for Host {
    fn scroll_to(&mut self, _y: i32) {
        panic!("the spinner never scrolls the content");
    }

    fn scroll_y(&self) -> i32 {
        0
    }

    fn fire_refresh(&mut self) {
        self.fired += 1;
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

fn settle(manager: &mut SwipeRefreshManager, host: &mut Host, refreshing: bool) {
    let mut time = 0;
    for _ in 0..200 {
        if !manager.is_animating() {
            return;
        }
        time += FRAME_NANOS;
        manager.on_frame(&mut RefreshContext::new(&mut *host, refreshing), time);
    }
    panic!("spinner animation never settled");
}

#[test]
fn sizes_scale_with_density() {
    let manager = SwipeRefreshManager::new(2.0);
    assert_eq!(manager.circle_diameter(), 80);
    assert_eq!(manager.trigger_distance(), 128);
    assert_eq!(manager.original_offset_top(), -80);

    let large = SwipeRefreshManager::new(2.0).with_size(IndicatorSize::Large);
    assert_eq!(large.circle_diameter(), 112);
    assert_eq!(large.circle().borrow().content_size(), Size::new(112.0, 112.0));
    assert_eq!(large.original_offset_top(), -112);
    assert_eq!(large.current_offset_top(), -112);
}

#[test]
fn short_pull_fades_spinner_and_does_not_trigger() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    let consumed = manager.on_consume(&mut RefreshContext::new(&mut host, false), -32);

    assert_eq!(consumed, -32);
    assert_eq!(manager.current_offset_top(), -8);
    assert!(!manager.can_trigger());
    assert!(manager.circle().borrow().is_visible());
    assert!(manager.spinner().show_arrow);
    assert!(manager.is_animating());
    assert!(host.invalidations > 0);

    settle(&mut manager, &mut host, false);
    assert_eq!(manager.spinner().alpha, STARTING_PROGRESS_ALPHA);
}

#[test]
fn long_pull_uses_tension_curve() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    manager.on_consume(&mut RefreshContext::new(&mut host, false), -200);

    assert_eq!(manager.current_offset_top(), 88);
    assert!(manager.can_trigger());
    assert_eq!(manager.spinner().arrow_scale, 1.0);
    assert_eq!(manager.spinner().end_trim, MAX_PROGRESS_ANGLE);
}

#[test]
fn release_slides_to_trigger_and_fires() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();
    manager.on_consume(&mut RefreshContext::new(&mut host, false), -200);

    manager.prepare(&mut RefreshContext::new(&mut host, true), true, true);
    settle(&mut manager, &mut host, true);

    assert_eq!(host.fired, 1);
    assert_eq!(manager.current_offset_top(), 64);
    assert!(manager.spinner().running);
    assert_eq!(manager.spinner().alpha, MAX_ALPHA);
}

#[test]
fn unchanged_prepare_does_not_fire() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    manager.prepare(&mut RefreshContext::new(&mut host, true), true, false);
    settle(&mut manager, &mut host, true);

    assert_eq!(host.fired, 0);
}

#[test]
fn programmatic_refresh_scales_in_and_out() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    manager.prepare(&mut RefreshContext::new(&mut host, true), false, true);
    assert_eq!(manager.current_offset_top(), 64);
    assert_eq!(manager.circle().borrow().layer().scale, 0.0);
    settle(&mut manager, &mut host, true);
    assert_eq!(manager.circle().borrow().layer().scale, 1.0);
    assert_eq!(host.fired, 1);

    manager.finish(&mut RefreshContext::new(&mut host, false), false, true);
    settle(&mut manager, &mut host, false);

    assert!(!manager.circle().borrow().is_visible());
    assert!(!manager.spinner().running);
    assert_eq!(manager.current_offset_top(), manager.original_offset_top());
}

#[test]
fn circle_is_centered_over_target() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let circle = manager.create_view();
    let target: ViewHandle = Rc::new(RefCell::new(IndicatorView::new(Size::new(300.0, 500.0))));
    target.borrow_mut().measure(Constraints::tight(300.0, 500.0));

    manager.measure(Some(&target), Some(&circle), Constraints::tight(300.0, 500.0), Size::new(300.0, 500.0));
    manager.layout(Some(&target), Some(&circle), Rect::new(0.0, 0.0, 300.0, 500.0));

    assert_eq!(circle.borrow().bounds(), Rect::new(130.0, -40.0, 40.0, 40.0));
}

#[test]
fn unchanged_prepare_keeps_pending_announcement() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    manager.prepare(&mut RefreshContext::new(&mut host, true), false, true);
    manager.on_frame(&mut RefreshContext::new(&mut host, true), FRAME_NANOS);
    manager.prepare(&mut RefreshContext::new(&mut host, true), true, false);
    settle(&mut manager, &mut host, true);

    assert_eq!(host.fired, 1);
    assert!(manager.spinner().running);
}

#[test]
fn finish_during_scale_up_still_announces_once() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    manager.prepare(&mut RefreshContext::new(&mut host, true), false, true);
    manager.on_frame(&mut RefreshContext::new(&mut host, true), FRAME_NANOS);
    manager.finish(&mut RefreshContext::new(&mut host, false), false, true);
    assert_eq!(host.fired, 1);

    settle(&mut manager, &mut host, false);

    assert_eq!(host.fired, 1);
    assert!(!manager.circle().borrow().is_visible());
}

#[test]
fn pull_takes_over_circle_motion() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();
    manager.on_consume(&mut RefreshContext::new(&mut host, false), -200);
    manager.prepare(&mut RefreshContext::new(&mut host, true), true, true);
    manager.on_frame(&mut RefreshContext::new(&mut host, true), FRAME_NANOS);
    manager.on_frame(&mut RefreshContext::new(&mut host, true), 2 * FRAME_NANOS);
    assert!(manager.current_offset_top() < 88);

    manager.on_consume(&mut RefreshContext::new(&mut host, true), -10);
    assert_eq!(host.fired, 1);

    let mut reference = SwipeRefreshManager::new(1.0);
    reference.on_consume(&mut RefreshContext::new(&mut Host::default(), false), -210);
    let top = reference.current_offset_top();
    assert_eq!(manager.current_offset_top(), top);

    settle(&mut manager, &mut host, true);
    assert_eq!(manager.current_offset_top(), top);
    assert_eq!(host.fired, 1);
}

#[test]
fn extreme_pull_saturates() {
    let mut manager = SwipeRefreshManager::new(1.0);
    let mut host = Host::default();

    assert_eq!(manager.on_consume(&mut RefreshContext::new(&mut host, false), i32::MIN), i32::MIN);
    assert_eq!(manager.on_consume(&mut RefreshContext::new(&mut host, false), -1), -1);
    assert!(manager.can_trigger());
}
