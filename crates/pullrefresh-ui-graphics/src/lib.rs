//! Pure math/data for geometry & units used by the pull-to-refresh widget
//!
//! This crate contains geometry primitives and unit types shared by the
//! layout contract, the coordinator, and the refresh managers.

mod geometry;
mod unit;

pub use geometry::*;
pub use unit::*;

pub mod prelude {
    pub use crate::geometry::{EdgeInsets, GraphicsLayer, Point, Rect, Size};
    pub use crate::unit::Dp;
}
