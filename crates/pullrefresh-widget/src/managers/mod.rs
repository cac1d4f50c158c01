//! Built-in refresh managers.

mod banner;
mod indicator_view;
mod offset;
mod swipe;

pub use banner::*;
pub use indicator_view::*;
pub use offset::*;
pub use swipe::*;
