//! Animation system for the pull-to-refresh widget
//!
//! Provides time-based tweens with easing curves. Tweens are advanced by the
//! host's frame clock through [`Tween::on_frame`]; nothing here owns a timer.

mod animation;
mod easing;

pub use animation::*;
pub use easing::*;
