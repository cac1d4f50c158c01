use super::*;

const FRAME_NANOS: u64 = 16_666_667; // ~60 FPS

#[test]
fn tween_interpolates_over_time() {
    let mut tween = Tween::new(0.0f32);
    tween.animate(0.0, -100.0, AnimationSpec::linear(200));

    let first = tween.on_frame(0).expect("running tween yields a frame");
    assert_eq!(first.value, 0.0);
    assert!(!first.finished);

    let mut frame_time = 0u64;
    let mut saw_midpoint = false;
    let mut last = first;
    for _ in 0..32 {
        frame_time += FRAME_NANOS;
        let Some(frame) = tween.on_frame(frame_time) else {
            break;
        };
        if frame.value < 0.0 && frame.value > -100.0 {
            saw_midpoint = true;
        }
        last = frame;
    }

    assert!(saw_midpoint, "expected intermediate values");
    assert!(last.finished);
    assert_eq!(last.value, -100.0);
    assert!(!tween.is_running());
    assert_eq!(tween.value(), -100.0);
}

#[test]
fn idle_tween_yields_no_frames() {
    let mut tween = Tween::new(3.0f32);
    assert!(tween.on_frame(0).is_none());
}

#[test]
fn restarting_bumps_generation() {
    let mut tween = Tween::new(0.0f32);
    let first = tween.animate(0.0, 10.0, AnimationSpec::linear(100));
    tween.on_frame(0);
    let second = tween.animate(tween.value(), -10.0, AnimationSpec::linear(100));
    assert_ne!(first, second);

    tween.on_frame(FRAME_NANOS);
    let done = tween
        .on_frame(FRAME_NANOS + 200_000_000)
        .expect("still running until the target is reached");
    assert!(done.finished);
    assert_eq!(done.generation, second);
    assert_eq!(done.value, -10.0);
}

#[test]
fn cancel_stops_without_completion() {
    let mut tween = Tween::new(0.0f32);
    tween.animate(0.0, 50.0, AnimationSpec::linear(100));
    tween.on_frame(0);
    tween.on_frame(50_000_000);
    let mid = tween.value();

    tween.cancel();
    assert!(!tween.is_running());
    assert!(tween.on_frame(500_000_000).is_none());
    assert_eq!(tween.value(), mid);
}

#[test]
fn snap_to_jumps_immediately() {
    let mut tween = Tween::new(0.0f32);
    tween.animate(0.0, 50.0, AnimationSpec::linear(100));
    tween.snap_to(7.0);
    assert!(!tween.is_running());
    assert_eq!(tween.value(), 7.0);
    assert!(tween.on_frame(0).is_none());
}

#[test]
fn easing_endpoints_are_exact() {
    let curves = [
        Easing::Linear,
        Easing::AccelerateDecelerate,
        Easing::Decelerate(1.0),
        Easing::Decelerate(2.0),
    ];
    for easing in curves {
        assert!(easing.transform(0.0).abs() < 1e-5, "{easing:?} at 0");
        assert!((easing.transform(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
    }
}

#[test]
fn decelerate_is_ahead_of_linear() {
    let easing = Easing::Decelerate(2.0);
    assert!(easing.transform(0.25) > 0.25);
    assert!(easing.transform(0.5) > Easing::Decelerate(1.0).transform(0.5));
}
