//! Offset-driven refresh managers.
//!
//! These managers reveal the indicator by scrolling the whole coordinator
//! content: pulled distance is damped into a view offset, released past the
//! trigger distance the offset animates to `-trigger` and stays there until
//! the refresh finishes.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;
use pullrefresh_animation::{AnimationGeneration, AnimationSpec, Easing, Tween};
use pullrefresh_ui_graphics::{Rect, Size};
use pullrefresh_ui_layout::{Constraints, LayoutDimension, ViewHandle};

use crate::manager::{RefreshContext, RefreshManager};
use crate::managers::IndicatorView;

/// Tuning for [`OffsetTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetTrackerConfig {
    /// Fraction of pulled distance that becomes visible offset.
    pub damping_rate: f32,
    /// Fixed trigger distance in pixels. `None` uses the indicator's
    /// measured height.
    pub trigger_distance: Option<i32>,
    pub to_trigger_millis: u64,
    pub to_rest_millis: u64,
}

impl OffsetTrackerConfig {
    pub fn with_damping_rate(mut self, damping_rate: f32) -> Self {
        self.damping_rate = damping_rate;
        self
    }

    pub fn with_trigger_distance(mut self, trigger_distance: i32) -> Self {
        self.trigger_distance = Some(trigger_distance);
        self
    }
}

impl Default for OffsetTrackerConfig {
    fn default() -> Self {
        Self {
            damping_rate: 0.6,
            trigger_distance: None,
            to_trigger_millis: 200,
            to_rest_millis: 400,
        }
    }
}

/// Where a settle animation ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settle {
    /// Parked at `-trigger`. `changed` marks an idle-to-refreshing transition.
    Triggered { changed: bool },
    /// Back at zero with accumulators cleared.
    Rest { changed: bool },
}

/// Result of advancing an [`OffsetTracker`] by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetFrame {
    Moved { offset: i32, toward: Settle },
    Settled(Settle),
}

#[derive(Clone, Copy, Debug)]
struct PendingSettle {
    generation: AnimationGeneration,
    settle: Settle,
    trigger: i32,
}

/// Pulled-distance bookkeeping shared by offset-driven managers.
///
/// `consumed_distance` is the raw, undamped sum of consumed deltas and is
/// never positive. `view_offset` is its damped projection and is what the
/// content gets scrolled to.
#[derive(Debug)]
pub struct OffsetTracker {
    config: OffsetTrackerConfig,
    consumed_distance: i32,
    view_offset: i32,
    animation: Tween<f32>,
    pending: Option<PendingSettle>,
}

impl OffsetTracker {
    pub fn new(config: OffsetTrackerConfig) -> Self {
        Self {
            config,
            consumed_distance: 0,
            view_offset: 0,
            animation: Tween::new(0.0),
            pending: None,
        }
    }

    pub fn config(&self) -> &OffsetTrackerConfig {
        &self.config
    }

    pub fn consumed_distance(&self) -> i32 {
        self.consumed_distance
    }

    pub fn view_offset(&self) -> i32 {
        self.view_offset
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    pub fn can_trigger(&self, trigger_distance: i32) -> bool {
        self.view_offset.unsigned_abs() > trigger_distance.unsigned_abs()
    }

    /// Whether the running settle ends in a refresh nobody has announced yet.
    pub fn owes_refresh(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingSettle {
                settle: Settle::Triggered { changed: true },
                ..
            })
        )
    }

    /// Consume `dy` of vertical motion and return the consumed part.
    ///
    /// Pulls (`dy < 0`) are always taken whole. Pushes are only taken while
    /// the indicator is out, and only up to the distance back to rest; the
    /// excess is left to the caller.
    pub fn consume(&mut self, dy: i32) -> i32 {
        if dy >= 0 && self.consumed_distance >= 0 {
            return 0;
        }
        let consumed = if self.consumed_distance.saturating_add(dy) > 0 {
            let to_rest = -self.consumed_distance;
            self.consumed_distance = 0;
            to_rest
        } else {
            self.consumed_distance = self.consumed_distance.saturating_add(dy);
            dy
        };
        self.view_offset = self.damped(self.consumed_distance);
        consumed
    }

    /// Start animating the offset to `-trigger`.
    ///
    /// Replacing a settle that still owes a refresh announcement carries the
    /// announcement over to the new one.
    pub fn animate_to_trigger(&mut self, trigger: i32, changed: bool) {
        let changed = changed || self.owes_refresh();
        self.start(
            -trigger,
            self.config.to_trigger_millis,
            Settle::Triggered { changed },
            trigger,
        );
    }

    /// Start animating the offset back to zero.
    pub fn animate_to_rest(&mut self, changed: bool) {
        self.start(
            0,
            self.config.to_rest_millis,
            Settle::Rest { changed },
            0,
        );
    }

    /// Park at `-trigger` immediately and realign the raw distance with it.
    pub fn settle_at_trigger(&mut self, trigger: i32) {
        self.animation.snap_to(-trigger as f32);
        self.pending = None;
        self.apply_trigger(trigger);
    }

    /// Hand a running settle over to a gesture offering `dy`.
    ///
    /// The animation stops at the visible offset and the raw distance is
    /// realigned with it, so the gesture continues from what is on screen.
    /// Returns the abandoned settle, or `None` when nothing was running or the
    /// gesture would not move the offset.
    pub fn take_over(&mut self, dy: i32) -> Option<Settle> {
        if dy == 0 || (dy > 0 && self.view_offset >= 0) {
            return None;
        }
        let pending = self.pending.take()?;
        self.animation.cancel();
        self.consumed_distance = self.undamped(self.view_offset);
        Some(pending.settle)
    }

    pub fn on_frame(&mut self, frame_time_nanos: u64) -> Option<OffsetFrame> {
        let frame = self.animation.on_frame(frame_time_nanos)?;
        let pending = self
            .pending
            .filter(|pending| pending.generation == frame.generation);
        self.view_offset = frame.value as i32;

        let Some(pending) = pending else {
            trace!("offset frame from a superseded animation");
            return None;
        };
        if !frame.finished {
            return Some(OffsetFrame::Moved {
                offset: self.view_offset,
                toward: pending.settle,
            });
        }

        self.pending = None;
        match pending.settle {
            Settle::Triggered { .. } => self.apply_trigger(pending.trigger),
            Settle::Rest { .. } => self.reset(),
        }
        Some(OffsetFrame::Settled(pending.settle))
    }

    pub fn reset(&mut self) {
        self.consumed_distance = 0;
        self.view_offset = 0;
    }

    fn start(&mut self, target: i32, duration_millis: u64, settle: Settle, trigger: i32) {
        let generation = self.animation.animate(
            self.view_offset as f32,
            target as f32,
            AnimationSpec::tween(duration_millis, Easing::AccelerateDecelerate),
        );
        self.pending = Some(PendingSettle {
            generation,
            settle,
            trigger,
        });
    }

    fn apply_trigger(&mut self, trigger: i32) {
        self.view_offset = -trigger;
        self.consumed_distance = self.undamped(self.view_offset);
    }

    fn undamped(&self, offset: i32) -> i32 {
        if self.config.damping_rate > 0.0 {
            (offset as f32 / self.config.damping_rate) as i32
        } else {
            offset
        }
    }

    fn damped(&self, distance: i32) -> i32 {
        (distance as f32 * self.config.damping_rate) as i32
    }
}

impl Default for OffsetTracker {
    fn default() -> Self {
        Self::new(OffsetTrackerConfig::default())
    }
}

/// Visual hooks of an offset-driven manager.
pub trait RefreshIndicator {
    fn create_view(&mut self) -> ViewHandle;

    fn on_scroll_start(&mut self) {}

    /// The visible offset changed while idle, or while animating into a
    /// fresh refresh.
    fn on_scroll(&mut self, offset: i32, trigger_distance: i32) {
        let _ = (offset, trigger_distance);
    }

    /// The indicator reached its refreshing position.
    fn on_refreshing(&mut self) {}

    /// The indicator went back to rest after a refresh.
    fn on_reset(&mut self) {}

    fn is_animating(&self) -> bool {
        false
    }

    fn on_frame(&mut self, frame_time_nanos: u64) {
        let _ = frame_time_nanos;
    }
}

/// No visuals. The view is empty, so a fixed trigger distance is needed.
impl RefreshIndicator for () {
    fn create_view(&mut self) -> ViewHandle {
        Rc::new(RefCell::new(IndicatorView::new(Size::ZERO)))
    }
}

/// Manager that scrolls the content to reveal an indicator placed above it.
pub struct OffsetRefreshManager<I> {
    tracker: OffsetTracker,
    indicator: I,
    view: Option<ViewHandle>,
}

impl<I: RefreshIndicator> OffsetRefreshManager<I> {
    pub fn new(indicator: I) -> Self {
        Self::with_config(indicator, OffsetTrackerConfig::default())
    }

    pub fn with_config(indicator: I, config: OffsetTrackerConfig) -> Self {
        Self {
            tracker: OffsetTracker::new(config),
            indicator,
            view: None,
        }
    }

    pub fn tracker(&self) -> &OffsetTracker {
        &self.tracker
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }

    pub fn trigger_distance(&self) -> i32 {
        self.tracker.config().trigger_distance.unwrap_or_else(|| {
            self.view
                .as_ref()
                .map_or(0, |view| view.borrow().measured_size().height as i32)
        })
    }

    /// Announce whatever `settle` was heading for, whether it got there or
    /// was cut short.
    fn complete(&mut self, cx: &mut RefreshContext<'_>, settle: Settle) {
        match settle {
            Settle::Triggered { changed: true } => {
                cx.fire_refresh();
                self.indicator.on_refreshing();
            }
            Settle::Rest { changed: true } => self.indicator.on_reset(),
            _ => {}
        }
    }
}

impl<I: RefreshIndicator> RefreshManager for OffsetRefreshManager<I> {
    fn create_view(&mut self) -> ViewHandle {
        let view = self.indicator.create_view();
        self.view = Some(view.clone());
        view
    }

    fn can_trigger(&self) -> bool {
        self.tracker.can_trigger(self.trigger_distance())
    }

    fn prepare(&mut self, cx: &mut RefreshContext<'_>, _during_scroll: bool, changed: bool) {
        let trigger = self.trigger_distance();
        if !changed && !self.tracker.is_animating() && self.tracker.view_offset() == -trigger {
            self.tracker.settle_at_trigger(trigger);
            cx.scroll_to(-trigger);
            return;
        }
        self.tracker.animate_to_trigger(trigger, changed);
    }

    fn finish(&mut self, cx: &mut RefreshContext<'_>, _during_scroll: bool, changed: bool) {
        if self.tracker.owes_refresh() {
            // The refresh started even though its settle never completed.
            self.complete(cx, Settle::Triggered { changed: true });
        }
        self.tracker.animate_to_rest(changed);
    }

    fn on_consume(&mut self, cx: &mut RefreshContext<'_>, dy: i32) -> i32 {
        if let Some(settle) = self.tracker.take_over(dy) {
            trace!("gesture took over a running {settle:?} settle");
            self.complete(cx, settle);
        }
        let consumed = self.tracker.consume(dy);
        if consumed == 0 {
            return 0;
        }
        let offset = self.tracker.view_offset();
        cx.scroll_to(offset);
        if !cx.is_refreshing() {
            self.indicator.on_scroll(offset, self.trigger_distance());
        }
        consumed
    }

    fn measure(
        &mut self,
        _target: Option<&ViewHandle>,
        refresh: Option<&ViewHandle>,
        _constraints: Constraints,
        container: Size,
    ) {
        let Some(refresh) = refresh else {
            return;
        };
        let mut view = refresh.borrow_mut();
        let height = match view.layout_height() {
            LayoutDimension::Exact(height) => Some(height),
            LayoutDimension::MatchParent => Some(container.height),
            LayoutDimension::WrapContent => None,
        };
        let constraints = Constraints::unbounded().tighten_width(container.width);
        let constraints = match height {
            Some(height) => constraints.tighten_height(height),
            None => constraints,
        };
        view.measure(constraints);
    }

    fn layout(&mut self, target: Option<&ViewHandle>, refresh: Option<&ViewHandle>, _container: Rect) {
        if let Some(target) = target {
            let mut target = target.borrow_mut();
            let size = target.measured_size();
            target.layout(Rect::from_size(size));
        }
        if let Some(refresh) = refresh {
            let mut refresh = refresh.borrow_mut();
            let size = refresh.measured_size();
            refresh.layout(Rect::from_ltrb(0.0, -size.height, size.width, 0.0));
        }
    }

    fn start_consume(&mut self, _cx: &mut RefreshContext<'_>) {
        self.indicator.on_scroll_start();
    }

    fn is_animating(&self) -> bool {
        self.tracker.is_animating() || self.indicator.is_animating()
    }

    fn on_frame(&mut self, cx: &mut RefreshContext<'_>, frame_time_nanos: u64) {
        match self.tracker.on_frame(frame_time_nanos) {
            Some(OffsetFrame::Moved { offset, toward }) => {
                cx.scroll_to(offset);
                if toward == (Settle::Triggered { changed: true }) {
                    self.indicator.on_scroll(offset, self.trigger_distance());
                }
            }
            Some(OffsetFrame::Settled(settle)) => {
                cx.scroll_to(self.tracker.view_offset());
                self.complete(cx, settle);
            }
            None => {}
        }
        self.indicator.on_frame(frame_time_nanos);
    }
}

#[cfg(test)]
#[path = "../tests/offset_tests.rs"]
mod tests;
