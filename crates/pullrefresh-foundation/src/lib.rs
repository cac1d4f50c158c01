//! Input events, gesture constants and nested-scroll plumbing
//!
//! Everything the refresh coordinator needs from the host's input system:
//! multi-pointer [`MotionEvent`]s, the touch slop, the nested-scroll axes and
//! the [`NestedScrollDispatcher`] contract for reaching ancestors.

pub mod gesture_constants;
mod motion;
mod nested_scroll;
mod scroll_up;

pub use gesture_constants::*;
pub use motion::*;
pub use nested_scroll::*;
pub use scroll_up::*;

pub mod prelude {
    pub use crate::motion::{MotionAction, MotionEvent, PointerId, PointerSample};
    pub use crate::nested_scroll::{NestedScrollChildHelper, NestedScrollDispatcher, ScrollAxes};
    pub use crate::scroll_up::TargetScrollUpChecker;
}
