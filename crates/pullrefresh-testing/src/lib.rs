//! Testing utilities and harness for the pull-to-refresh widget

pub mod fakes;
pub mod robot;
pub mod robot_assertions;

pub use fakes::*;
pub use robot::*;
pub use robot_assertions::{assert_approx_eq, assert_rect_approx_eq};

/// Route `log` output through the test harness. Safe to call from every
/// test; only the first call installs the logger. Filter with `RUST_LOG`.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub mod prelude {
    pub use crate::fakes::*;
    pub use crate::init_test_logging;
    pub use crate::robot::*;
    pub use crate::robot_assertions::{self, assert_approx_eq, assert_rect_approx_eq};
}
