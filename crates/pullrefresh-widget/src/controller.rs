use log::{debug, trace};

use crate::manager::{DrawingOrder, ManagerHandle, RefreshContext, RefreshHost};

/// Refresh state machine around one manager.
///
/// Owns the authoritative refreshing flag. The manager only ever learns about
/// transitions through `prepare`/`finish` and never flips the flag itself.
pub struct RefreshController {
    manager: ManagerHandle,
    refreshing: bool,
}

impl RefreshController {
    pub fn new(manager: ManagerHandle) -> Self {
        Self {
            manager,
            refreshing: false,
        }
    }

    pub fn manager(&self) -> &ManagerHandle {
        &self.manager
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn accept_scroll(&self) -> bool {
        self.manager.borrow().accept_scroll()
    }

    pub fn drawing_order(&self) -> DrawingOrder {
        self.manager.borrow().drawing_order()
    }

    pub fn is_animating(&self) -> bool {
        self.manager.borrow().is_animating()
    }

    /// Move to `refresh`, letting the manager animate the change.
    ///
    /// Runs the manager even when the flag does not change; in that case the
    /// manager is told `changed = false` and must not fire a refresh.
    pub fn set_refresh(&mut self, host: &mut dyn RefreshHost, refresh: bool, during_scroll: bool) {
        let changed = self.refreshing != refresh;
        debug!(
            "refresh state {} -> {refresh} (during_scroll={during_scroll}, changed={changed})",
            self.refreshing
        );
        self.refreshing = refresh;

        let mut cx = RefreshContext::new(host, refresh);
        let mut manager = self.manager.borrow_mut();
        if refresh {
            manager.prepare(&mut cx, during_scroll, changed);
        } else {
            manager.finish(&mut cx, during_scroll, changed);
        }
    }

    pub fn start_consume(&mut self, host: &mut dyn RefreshHost) {
        let mut cx = RefreshContext::new(host, self.refreshing);
        self.manager.borrow_mut().start_consume(&mut cx);
    }

    pub fn on_consume(&mut self, host: &mut dyn RefreshHost, dy: i32) -> i32 {
        let mut cx = RefreshContext::new(host, self.refreshing);
        self.manager.borrow_mut().on_consume(&mut cx, dy)
    }

    /// End of a drag or nested scroll.
    ///
    /// Without any consumed motion this is a no-op. Otherwise the manager's
    /// trigger verdict decides: while idle it may start a refresh, while
    /// refreshing it re-settles the indicator without changing state.
    pub fn stop_consume(&mut self, host: &mut dyn RefreshHost, had_motion: bool) {
        if !had_motion {
            trace!("stop_consume without motion, ignored");
            return;
        }
        let can_trigger = self.manager.borrow().can_trigger();
        if !self.refreshing {
            self.set_refresh(host, can_trigger, true);
            return;
        }

        let mut cx = RefreshContext::new(host, true);
        let mut manager = self.manager.borrow_mut();
        if can_trigger {
            manager.prepare(&mut cx, true, false);
        } else {
            manager.finish(&mut cx, true, false);
        }
    }

    pub fn on_frame(&mut self, host: &mut dyn RefreshHost, frame_time_nanos: u64) {
        let mut cx = RefreshContext::new(host, self.refreshing);
        self.manager.borrow_mut().on_frame(&mut cx, frame_time_nanos);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
