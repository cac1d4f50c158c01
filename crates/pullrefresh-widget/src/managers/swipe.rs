//! Material-style circular spinner that slides down over the content.
//!
//! Unlike the offset managers the content never moves: pulled distance is
//! fed through a tension curve that positions a small circle, and the
//! circle's spinner fades, trims and rotates with the pull.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;
use pullrefresh_animation::{AnimationGeneration, AnimationSpec, Easing, Tween};
use pullrefresh_ui_graphics::{Dp, Rect, Size};
use pullrefresh_ui_layout::{Constraints, ViewHandle};

use crate::manager::{DrawingOrder, RefreshContext, RefreshManager};
use crate::managers::IndicatorView;

const CIRCLE_DIAMETER: Dp = Dp(40.0);
const CIRCLE_DIAMETER_LARGE: Dp = Dp(56.0);
const DEFAULT_CIRCLE_TARGET: Dp = Dp(64.0);

pub const MAX_ALPHA: u8 = 255;
pub const STARTING_PROGRESS_ALPHA: u8 = (0.3 * MAX_ALPHA as f32) as u8;

/// Largest share of the circle the progress arc may fill while dragging.
const MAX_PROGRESS_ANGLE: f32 = 0.8;
const DECELERATE_FACTOR: f32 = 2.0;

const SCALE_DOWN_MILLIS: u64 = 150;
const ALPHA_ANIMATION_MILLIS: u64 = 300;
const ANIMATE_TO_TRIGGER_MILLIS: u64 = 200;
const ANIMATE_TO_START_MILLIS: u64 = 200;
const MEDIUM_ANIMATION_MILLIS: u64 = 400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndicatorSize {
    #[default]
    Default,
    Large,
}

impl IndicatorSize {
    fn diameter(self) -> Dp {
        match self {
            IndicatorSize::Default => CIRCLE_DIAMETER,
            IndicatorSize::Large => CIRCLE_DIAMETER_LARGE,
        }
    }
}

/// Drawing state of the progress spinner inside the circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinnerVisuals {
    pub alpha: u8,
    pub start_trim: f32,
    pub end_trim: f32,
    pub arrow_scale: f32,
    /// Rotation in turns.
    pub rotation: f32,
    pub show_arrow: bool,
    pub running: bool,
}

impl Default for SpinnerVisuals {
    fn default() -> Self {
        Self {
            alpha: MAX_ALPHA,
            start_trim: 0.0,
            end_trim: 0.0,
            arrow_scale: 0.0,
            rotation: 0.0,
            show_arrow: false,
            running: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CircleMotion {
    ToTrigger { from: i32, changed: bool },
    ToStart { from: i32 },
    ScaleUp { changed: bool },
    ScaleDown,
}

impl CircleMotion {
    fn is_refresh_entry(self) -> bool {
        matches!(self, CircleMotion::ToTrigger { .. } | CircleMotion::ScaleUp { .. })
    }

    /// Whether finishing this motion announces a new refresh.
    fn owes_refresh(self) -> bool {
        matches!(
            self,
            CircleMotion::ToTrigger { changed: true, .. } | CircleMotion::ScaleUp { changed: true }
        )
    }

    fn announcing(self) -> Self {
        match self {
            CircleMotion::ToTrigger { from, .. } => CircleMotion::ToTrigger { from, changed: true },
            CircleMotion::ScaleUp { .. } => CircleMotion::ScaleUp { changed: true },
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveMotion {
    generation: AnimationGeneration,
    motion: CircleMotion,
}

pub struct SwipeRefreshManager {
    density: f32,
    accept_scroll: bool,
    circle: Rc<RefCell<IndicatorView>>,
    circle_diameter: i32,
    total_trigger_distance: i32,
    spinner_offset_end: i32,
    original_offset_top: i32,
    current_target_offset_top: i32,
    last_target_y: i32,
    total_consumed_distance: i32,
    spinner: SpinnerVisuals,
    motion: Tween<f32>,
    active: Option<ActiveMotion>,
    alpha: Tween<f32>,
    alpha_target: u8,
}

impl SwipeRefreshManager {
    pub fn new(density: f32) -> Self {
        let circle_diameter = CIRCLE_DIAMETER.to_px_int(density);
        let total_trigger_distance = DEFAULT_CIRCLE_TARGET.to_px_int(density);
        let size = Size::new(circle_diameter as f32, circle_diameter as f32);
        let mut circle = IndicatorView::new(size);
        circle.set_visible(false);
        Self {
            density,
            accept_scroll: true,
            circle: Rc::new(RefCell::new(circle)),
            circle_diameter,
            total_trigger_distance,
            spinner_offset_end: total_trigger_distance,
            original_offset_top: -circle_diameter,
            current_target_offset_top: -circle_diameter,
            last_target_y: 0,
            total_consumed_distance: 0,
            spinner: SpinnerVisuals::default(),
            motion: Tween::new(0.0),
            active: None,
            alpha: Tween::new(MAX_ALPHA as f32),
            alpha_target: MAX_ALPHA,
        }
    }

    /// Whether drags and nested scrolls move the spinner. When false the
    /// spinner only appears through programmatic refresh requests.
    pub fn with_accept_scroll(mut self, accept_scroll: bool) -> Self {
        self.accept_scroll = accept_scroll;
        self
    }

    pub fn with_size(mut self, size: IndicatorSize) -> Self {
        self.set_size(size);
        self
    }

    pub fn set_size(&mut self, size: IndicatorSize) {
        self.circle_diameter = size.diameter().to_px_int(self.density);
        let diameter = self.circle_diameter as f32;
        let mut circle = self.circle.borrow_mut();
        circle.set_content_size(Size::new(diameter, diameter));
        // The resting position hides the whole circle above the top edge.
        if !circle.is_visible() {
            self.original_offset_top = -self.circle_diameter;
            self.current_target_offset_top = self.original_offset_top;
        }
    }

    pub fn circle(&self) -> &Rc<RefCell<IndicatorView>> {
        &self.circle
    }

    pub fn circle_diameter(&self) -> i32 {
        self.circle_diameter
    }

    pub fn spinner(&self) -> SpinnerVisuals {
        self.spinner
    }

    pub fn current_offset_top(&self) -> i32 {
        self.current_target_offset_top
    }

    pub fn original_offset_top(&self) -> i32 {
        self.original_offset_top
    }

    pub fn trigger_distance(&self) -> i32 {
        self.total_trigger_distance
    }

    fn move_spinner(&mut self, cx: &mut RefreshContext<'_>, overscroll_top: f32) {
        self.spinner.show_arrow = true;
        let trigger = self.total_trigger_distance as f32;
        let drag_percent = (overscroll_top / trigger).abs().min(1.0);
        let adjusted_percent = (drag_percent - 0.4).max(0.0) * 5.0 / 3.0;
        let extra_os = overscroll_top.abs() - trigger;
        let slingshot_dist = self.spinner_offset_end as f32;
        let tension_slingshot_percent =
            (extra_os.min(slingshot_dist * 2.0) / slingshot_dist).max(0.0);
        let tension_percent =
            ((tension_slingshot_percent / 4.0) - (tension_slingshot_percent / 4.0).powi(2)) * 2.0;
        let extra_move = slingshot_dist * tension_percent * 2.0;

        let target_y =
            self.original_offset_top + (slingshot_dist * drag_percent + extra_move) as i32;
        self.last_target_y = target_y;

        {
            let mut circle = self.circle.borrow_mut();
            circle.set_visible(true);
            circle.layer_mut().scale = 1.0;
        }

        if overscroll_top < trigger {
            if self.spinner.alpha > STARTING_PROGRESS_ALPHA && !self.alpha_running_to(STARTING_PROGRESS_ALPHA) {
                self.start_alpha_animation(STARTING_PROGRESS_ALPHA);
            }
        } else if self.spinner.alpha < MAX_ALPHA && !self.alpha_running_to(MAX_ALPHA) {
            self.start_alpha_animation(MAX_ALPHA);
        }

        let stroke_start = adjusted_percent * 0.8;
        self.spinner.start_trim = 0.0;
        self.spinner.end_trim = stroke_start.min(MAX_PROGRESS_ANGLE);
        self.spinner.arrow_scale = adjusted_percent.min(1.0);
        self.spinner.rotation = (-0.25 + 0.4 * adjusted_percent + tension_percent * 2.0) * 0.5;
        self.set_target_offset_top(cx, target_y);
    }

    fn set_target_offset_top(&mut self, cx: &mut RefreshContext<'_>, top: i32) {
        if self.current_target_offset_top != top {
            self.current_target_offset_top = top;
            cx.invalidate();
        }
    }

    fn alpha_running_to(&self, target: u8) -> bool {
        self.alpha.is_running() && self.alpha_target == target
    }

    fn start_alpha_animation(&mut self, target: u8) {
        self.alpha_target = target;
        self.alpha.animate(
            self.spinner.alpha as f32,
            target as f32,
            AnimationSpec::linear(ALPHA_ANIMATION_MILLIS),
        );
    }

    fn set_spinner_alpha(&mut self, alpha: u8) {
        self.alpha.snap_to(alpha as f32);
        self.alpha_target = alpha;
        self.spinner.alpha = alpha;
    }

    /// Replace the running circle motion. An unannounced refresh carries
    /// over to a new motion toward the refreshing position; any other
    /// replacement announces it right away.
    fn start_motion(&mut self, cx: &mut RefreshContext<'_>, motion: CircleMotion, spec: AnimationSpec) {
        let mut motion = motion;
        if self.active.is_some_and(|active| active.motion.owes_refresh()) {
            if motion.is_refresh_entry() {
                motion = motion.announcing();
            } else {
                cx.fire_refresh();
            }
        }
        let generation = self.motion.animate(0.0, 1.0, spec);
        self.active = Some(ActiveMotion { generation, motion });
    }

    /// Stop the circle where it is so a gesture can move it.
    fn take_over_motion(&mut self, cx: &mut RefreshContext<'_>) {
        let Some(active) = self.active.take() else {
            return;
        };
        trace!("gesture took over spinner motion {:?}", active.motion);
        self.motion.cancel();
        if active.motion.owes_refresh() {
            cx.fire_refresh();
        }
    }

    fn set_circle_scale(&mut self, scale: f32) {
        self.circle.borrow_mut().layer_mut().scale = scale;
    }

    fn on_refresh_ready(&mut self, cx: &mut RefreshContext<'_>, changed: bool) {
        self.set_spinner_alpha(MAX_ALPHA);
        self.spinner.running = true;
        self.last_target_y = self.current_target_offset_top;
        if changed {
            cx.fire_refresh();
        }
    }

    fn reset(&mut self, cx: &mut RefreshContext<'_>) {
        self.motion.cancel();
        self.active = None;
        self.spinner.running = false;
        {
            let mut circle = self.circle.borrow_mut();
            circle.set_visible(false);
            circle.layer_mut().scale = 1.0;
        }
        self.set_spinner_alpha(MAX_ALPHA);
        let original = self.original_offset_top;
        self.set_target_offset_top(cx, original);
        self.last_target_y = 0;
    }
}

impl RefreshManager for SwipeRefreshManager {
    fn create_view(&mut self) -> ViewHandle {
        self.circle.clone()
    }

    fn can_trigger(&self) -> bool {
        self.last_target_y > self.total_trigger_distance
    }

    fn accept_scroll(&self) -> bool {
        self.accept_scroll
    }

    fn drawing_order(&self) -> DrawingOrder {
        DrawingOrder::Above
    }

    fn prepare(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, changed: bool) {
        if during_scroll {
            let from = self.current_target_offset_top;
            self.start_motion(
                cx,
                CircleMotion::ToTrigger { from, changed },
                AnimationSpec::tween(ANIMATE_TO_TRIGGER_MILLIS, Easing::Decelerate(DECELERATE_FACTOR)),
            );
            return;
        }
        let end = self.spinner_offset_end;
        self.set_target_offset_top(cx, end);
        self.circle.borrow_mut().set_visible(true);
        self.set_circle_scale(0.0);
        self.set_spinner_alpha(MAX_ALPHA);
        self.start_motion(
            cx,
            CircleMotion::ScaleUp { changed },
            AnimationSpec::tween(MEDIUM_ANIMATION_MILLIS, Easing::AccelerateDecelerate),
        );
    }

    fn finish(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, _changed: bool) {
        self.total_consumed_distance = 0;
        self.spinner.start_trim = 0.0;
        self.spinner.end_trim = 0.0;
        self.spinner.show_arrow = false;
        if during_scroll {
            let from = self.current_target_offset_top;
            self.start_motion(
                cx,
                CircleMotion::ToStart { from },
                AnimationSpec::tween(ANIMATE_TO_START_MILLIS, Easing::Decelerate(DECELERATE_FACTOR)),
            );
        } else {
            self.start_motion(
                cx,
                CircleMotion::ScaleDown,
                AnimationSpec::tween(SCALE_DOWN_MILLIS, Easing::AccelerateDecelerate),
            );
        }
    }

    fn on_consume(&mut self, cx: &mut RefreshContext<'_>, dy: i32) -> i32 {
        if dy >= 0 && self.total_consumed_distance >= 0 {
            return 0;
        }
        let consumed = if self.total_consumed_distance.saturating_add(dy) > 0 {
            let to_rest = -self.total_consumed_distance;
            self.total_consumed_distance = 0;
            to_rest
        } else {
            self.total_consumed_distance = self.total_consumed_distance.saturating_add(dy);
            dy
        };
        if consumed != 0 {
            self.take_over_motion(cx);
        }
        let overscroll_top = self.total_consumed_distance.unsigned_abs() as f32;
        self.move_spinner(cx, overscroll_top);
        consumed
    }

    fn measure(
        &mut self,
        _target: Option<&ViewHandle>,
        refresh: Option<&ViewHandle>,
        _constraints: Constraints,
        _container: Size,
    ) {
        if let Some(refresh) = refresh {
            let diameter = self.circle_diameter as f32;
            refresh
                .borrow_mut()
                .measure(Constraints::tight(diameter, diameter));
        }
    }

    fn layout(&mut self, target: Option<&ViewHandle>, refresh: Option<&ViewHandle>, _container: Rect) {
        let Some(target) = target else {
            return;
        };
        let target_size = {
            let mut target = target.borrow_mut();
            let size = target.measured_size();
            target.layout(Rect::from_size(size));
            size
        };
        if let Some(refresh) = refresh {
            let mut refresh = refresh.borrow_mut();
            let size = refresh.measured_size();
            let left = ((target_size.width - size.width) / 2.0).trunc();
            let top = self.current_target_offset_top as f32;
            refresh.layout(Rect::new(left, top, size.width, size.height));
        }
    }

    fn is_animating(&self) -> bool {
        self.motion.is_running() || self.alpha.is_running()
    }

    fn on_frame(&mut self, cx: &mut RefreshContext<'_>, frame_time_nanos: u64) {
        if let Some(frame) = self.alpha.on_frame(frame_time_nanos) {
            self.spinner.alpha = frame.value.round().clamp(0.0, MAX_ALPHA as f32) as u8;
        }

        let Some(frame) = self.motion.on_frame(frame_time_nanos) else {
            return;
        };
        let Some(active) = self.active.filter(|active| active.generation == frame.generation) else {
            trace!("spinner frame from a superseded animation");
            return;
        };
        let progress = frame.value;
        match active.motion {
            CircleMotion::ToTrigger { from, .. } => {
                let top = from + ((self.spinner_offset_end - from) as f32 * progress) as i32;
                self.set_target_offset_top(cx, top);
                self.spinner.arrow_scale = 1.0 - progress;
            }
            CircleMotion::ToStart { from } => {
                let top = from + ((self.original_offset_top - from) as f32 * progress) as i32;
                self.set_target_offset_top(cx, top);
            }
            CircleMotion::ScaleUp { .. } => self.set_circle_scale(progress),
            CircleMotion::ScaleDown => self.set_circle_scale(1.0 - progress),
        }

        if !frame.finished {
            return;
        }
        self.active = None;
        match active.motion {
            CircleMotion::ToTrigger { changed, .. } | CircleMotion::ScaleUp { changed } => {
                self.on_refresh_ready(cx, changed);
            }
            CircleMotion::ToStart { .. } | CircleMotion::ScaleDown => self.reset(cx),
        }
    }
}

#[cfg(test)]
#[path = "../tests/swipe_tests.rs"]
mod tests;
