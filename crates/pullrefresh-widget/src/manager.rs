//! Refresh manager contract.
//!
//! A [`RefreshManager`] decides what a refresh looks like: which indicator
//! view exists, how pulled distance maps onto offsets, when a release should
//! trigger, and how the indicator animates in and out. The coordinator owns
//! gestures and the authoritative refreshing flag and drives the manager
//! through this trait.
//!
//! Managers never see the coordinator itself. Everything they may do to it
//! goes through [`RefreshContext`]: move the content, request a relayout, and
//! announce that a refresh has started.

use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_ui_graphics::{Rect, Size};
use pullrefresh_ui_layout::{Constraints, ViewHandle};

/// Shared handle to an attached manager. Callers keep their own typed clone
/// to configure the manager or read its visual state.
pub type ManagerHandle = Rc<RefCell<dyn RefreshManager>>;

/// Whether the refresh indicator is drawn over or under the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawingOrder {
    #[default]
    Above,
    Below,
}

/// Operations the coordinator exposes to its manager.
pub trait RefreshHost {
    /// Scroll the coordinator's content to vertical offset `y`. Negative
    /// values reveal space above the target.
    fn scroll_to(&mut self, y: i32);

    fn scroll_y(&self) -> i32;

    /// Record that a refresh has begun; the coordinator notifies its listener
    /// once the current manager call returns.
    fn fire_refresh(&mut self);

    /// Request a new layout pass.
    fn invalidate(&mut self);
}

/// Capability handed to manager callbacks for the duration of one call.
pub struct RefreshContext<'a> {
    host: &'a mut dyn RefreshHost,
    refreshing: bool,
}

impl<'a> RefreshContext<'a> {
    pub fn new(host: &'a mut dyn RefreshHost, refreshing: bool) -> Self {
        Self { host, refreshing }
    }

    /// The coordinator's refreshing flag as of this call. During `prepare`
    /// this is already `true`, during `finish` already `false`.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn scroll_to(&mut self, y: i32) {
        self.host.scroll_to(y);
    }

    pub fn scroll_y(&self) -> i32 {
        self.host.scroll_y()
    }

    /// Announce that the refresh is now running. Call exactly once per
    /// transition into the refreshing state.
    pub fn fire_refresh(&mut self) {
        self.host.fire_refresh();
    }

    pub fn invalidate(&mut self) {
        self.host.invalidate();
    }
}

pub trait RefreshManager {
    /// Create the indicator view. Called once when the manager is attached;
    /// the coordinator adds it to its children and removes it again when the
    /// manager is replaced.
    fn create_view(&mut self) -> ViewHandle;

    /// Whether the motion accumulated so far should start a refresh on
    /// release. Decides between [`RefreshManager::prepare`] and
    /// [`RefreshManager::finish`] when a gesture ends.
    fn can_trigger(&self) -> bool;

    /// Move into the refreshing presentation. When the indicator is in place
    /// and `changed` is true, the manager must call
    /// [`RefreshContext::fire_refresh`] exactly once.
    ///
    /// `during_scroll` is true when a released gesture triggered this rather
    /// than a programmatic request. `changed` is false when the coordinator
    /// was already refreshing and only asks to re-settle the indicator.
    fn prepare(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, changed: bool);

    /// Return to the idle presentation and reset all offsets.
    fn finish(&mut self, cx: &mut RefreshContext<'_>, during_scroll: bool, changed: bool);

    /// Consume up to `dy` pixels of vertical motion. Negative `dy` pulls the
    /// indicator out; positive pushes it back. Returns the consumed part,
    /// which must not exceed `dy` in magnitude nor differ from it in sign.
    fn on_consume(&mut self, cx: &mut RefreshContext<'_>, dy: i32) -> i32;

    /// Place target and indicator. `container` is the coordinator's own
    /// bounds; children are positioned relative to its origin.
    fn layout(&mut self, target: Option<&ViewHandle>, refresh: Option<&ViewHandle>, container: Rect);

    /// Measure the indicator. The target has already been measured to fill
    /// the container, so most managers leave it alone.
    fn measure(
        &mut self,
        target: Option<&ViewHandle>,
        refresh: Option<&ViewHandle>,
        constraints: Constraints,
        container: Size,
    ) {
        let _ = (target, constraints, container);
        if let Some(refresh) = refresh {
            refresh.borrow_mut().measure(Constraints::unbounded());
        }
    }

    fn drawing_order(&self) -> DrawingOrder {
        DrawingOrder::Above
    }

    /// Whether the coordinator should handle touch drags and accept nested
    /// scrolls on this manager's behalf. Managers driven purely by
    /// programmatic refresh requests return false.
    fn accept_scroll(&self) -> bool {
        true
    }

    /// A drag or nested scroll started feeding this manager.
    fn start_consume(&mut self, cx: &mut RefreshContext<'_>) {
        let _ = cx;
    }

    /// Whether [`RefreshManager::on_frame`] needs to be called.
    fn is_animating(&self) -> bool {
        false
    }

    /// Advance animations to `frame_time_nanos`.
    fn on_frame(&mut self, cx: &mut RefreshContext<'_>, frame_time_nanos: u64) {
        let _ = (cx, frame_time_nanos);
    }

    fn on_attached_to_window(&mut self) {}

    fn on_detached_from_window(&mut self) {}
}
