//! Host view contract.
//!
//! Children of the refresh coordinator are host-toolkit views. The coordinator
//! and its managers only need to measure them, place them, and ask a few
//! scrolling questions, so that is all this trait exposes.

use std::cell::RefCell;
use std::rc::Rc;

use pullrefresh_ui_graphics::{Rect, Size};

use crate::Constraints;

/// Shared handle to a host view.
///
/// Views are single-threaded UI objects; the coordinator's child list holds
/// strong handles while the lazily discovered scroll target is held weakly.
pub type ViewHandle = Rc<RefCell<dyn View>>;

/// Requested size along one axis, mirroring the platform's layout params.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LayoutDimension {
    /// Size to content.
    #[default]
    WrapContent,
    /// Fill the space the parent offers.
    MatchParent,
    /// Fixed size in pixels.
    Exact(f32),
}

pub trait View {
    /// Measure the view and remember the result as its measured size.
    fn measure(&mut self, constraints: Constraints) -> Size;

    /// Size produced by the last call to [`View::measure`].
    fn measured_size(&self) -> Size;

    /// Place the view at `bounds` in its parent's coordinate space.
    fn layout(&mut self, bounds: Rect);

    /// Bounds assigned by the last call to [`View::layout`].
    fn bounds(&self) -> Rect;

    /// Requested height; used by managers that size their indicator from
    /// its own layout params.
    fn layout_height(&self) -> LayoutDimension {
        LayoutDimension::WrapContent
    }

    /// Whether the view can scroll further in `direction` (negative = up).
    fn can_scroll_vertically(&self, direction: i32) -> bool {
        let _ = direction;
        false
    }

    /// Whether this view participates in nested scrolling as a child.
    fn is_nested_scrolling_enabled(&self) -> bool {
        false
    }

    /// Ends any nested scroll this view started with its ancestors.
    fn stop_nested_scroll(&mut self) {}
}

/// Returns true when both handles point at the same view.
pub fn same_view(a: &ViewHandle, b: &ViewHandle) -> bool {
    Rc::ptr_eq(a, b)
}
