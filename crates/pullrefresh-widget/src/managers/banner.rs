use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_animation::{AnimationSpec, Easing, Tween};
use pullrefresh_ui_graphics::Size;
use pullrefresh_ui_layout::{LayoutDimension, ViewHandle};

use crate::managers::{IndicatorView, OffsetRefreshManager, OffsetTrackerConfig, RefreshIndicator};

/// Full-width banner above the content with an arrow, a spinner and a hint.
pub type BannerRefreshManager = OffsetRefreshManager<BannerIndicator>;

impl BannerRefreshManager {
    pub fn banner() -> Self {
        Self::new(BannerIndicator::default())
    }

    pub fn banner_with_config(config: OffsetTrackerConfig) -> Self {
        Self::with_config(BannerIndicator::default(), config)
    }
}

pub const DEFAULT_BANNER_HEIGHT: f32 = 60.0;
const ARROW_FLIP_MILLIS: u64 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BannerHint {
    #[default]
    PullToRefresh,
    ReleaseToRefresh,
    Refreshing,
}

impl BannerHint {
    pub fn label(self) -> &'static str {
        match self {
            BannerHint::PullToRefresh => "Pull to refresh",
            BannerHint::ReleaseToRefresh => "Release to refresh",
            BannerHint::Refreshing => "Refreshing...",
        }
    }
}

/// Snapshot of what the banner should currently draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerState {
    pub hint: BannerHint,
    /// Arrow rotation in degrees; 0 points down, 180 up.
    pub arrow_degrees: f32,
    pub arrow_visible: bool,
    pub spinner_running: bool,
}

pub struct BannerIndicator {
    view: Rc<RefCell<IndicatorView>>,
    hint: BannerHint,
    arrow: Tween<f32>,
    arrow_up: bool,
    waiting_release: bool,
    spinner_running: bool,
}

impl BannerIndicator {
    pub fn new(height: LayoutDimension) -> Self {
        let view = IndicatorView::new(Size::new(0.0, DEFAULT_BANNER_HEIGHT)).with_layout_height(height);
        Self {
            view: Rc::new(RefCell::new(view)),
            hint: BannerHint::PullToRefresh,
            arrow: Tween::new(0.0),
            arrow_up: false,
            waiting_release: false,
            spinner_running: false,
        }
    }

    pub fn view(&self) -> &Rc<RefCell<IndicatorView>> {
        &self.view
    }

    pub fn state(&self) -> BannerState {
        BannerState {
            hint: self.hint,
            arrow_degrees: self.arrow.value(),
            arrow_visible: !self.spinner_running,
            spinner_running: self.spinner_running,
        }
    }

    pub fn is_waiting_release(&self) -> bool {
        self.waiting_release
    }

    fn flip_arrow(&mut self) {
        self.arrow_up = !self.arrow_up;
        let (from, to) = if self.arrow_up { (0.0, 180.0) } else { (180.0, 0.0) };
        self.arrow.animate(
            from,
            to,
            AnimationSpec::tween(ARROW_FLIP_MILLIS, Easing::AccelerateDecelerate),
        );
    }
}

impl Default for BannerIndicator {
    fn default() -> Self {
        Self::new(LayoutDimension::WrapContent)
    }
}

impl RefreshIndicator for BannerIndicator {
    fn create_view(&mut self) -> ViewHandle {
        self.view.clone()
    }

    fn on_scroll(&mut self, offset: i32, trigger_distance: i32) {
        let past_trigger = offset.unsigned_abs() > trigger_distance.unsigned_abs();
        if past_trigger != self.waiting_release {
            self.waiting_release = past_trigger;
            self.hint = if past_trigger {
                BannerHint::ReleaseToRefresh
            } else {
                BannerHint::PullToRefresh
            };
            self.flip_arrow();
        }
    }

    fn on_refreshing(&mut self) {
        self.arrow.cancel();
        self.spinner_running = true;
        self.hint = BannerHint::Refreshing;
    }

    fn on_reset(&mut self) {
        self.waiting_release = false;
        self.spinner_running = false;
        self.arrow_up = false;
        self.arrow.snap_to(0.0);
        self.hint = BannerHint::PullToRefresh;
    }

    fn is_animating(&self) -> bool {
        self.arrow.is_running()
    }

    fn on_frame(&mut self, frame_time_nanos: u64) {
        self.arrow.on_frame(frame_time_nanos);
    }
}

#[cfg(test)]
#[path = "../tests/banner_tests.rs"]
mod tests;
