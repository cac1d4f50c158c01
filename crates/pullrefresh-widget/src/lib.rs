//! Pull-to-refresh coordinator
//!
//! [`RefreshLayout`] sits between a scrollable target and the host toolkit,
//! detects pulls at the target's top edge through raw touches or nested
//! scrolling, and delegates everything visual to a pluggable
//! [`RefreshManager`]. Managers for a scrolling banner
//! ([`BannerRefreshManager`]) and a floating spinner
//! ([`SwipeRefreshManager`]) are included.

mod controller;
mod error;
mod manager;
pub mod managers;
mod refresh_layout;

pub use controller::*;
pub use error::*;
pub use manager::*;
pub use managers::{
    BannerHint, BannerIndicator, BannerRefreshManager, BannerState, IndicatorSize, IndicatorView,
    OffsetRefreshManager, OffsetTracker, OffsetTrackerConfig, RefreshIndicator,
    SpinnerVisuals, SwipeRefreshManager,
};
pub use refresh_layout::*;

pub mod prelude {
    pub use crate::error::RefreshError;
    pub use crate::manager::{DrawingOrder, ManagerHandle, RefreshContext, RefreshManager};
    pub use crate::managers::{BannerRefreshManager, OffsetRefreshManager, SwipeRefreshManager};
    pub use crate::refresh_layout::{GesturePhase, RefreshConfig, RefreshLayout};
    pub use pullrefresh_foundation::prelude::*;
}
