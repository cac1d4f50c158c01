//! Layout contracts for the pull-to-refresh widget
//!
//! The host toolkit owns the real measure/layout protocol. This crate only
//! describes the slice of it the refresh coordinator and its managers rely on:
//! [`Constraints`] for measurement and the [`View`] trait for children.

mod constraints;
mod view;

pub use constraints::*;
pub use view::*;

pub mod prelude {
    pub use crate::constraints::Constraints;
    pub use crate::view::{LayoutDimension, View, ViewHandle};
}
