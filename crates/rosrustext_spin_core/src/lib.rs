//! rosrustext_spin_core: ROS-agnostic single-threaded callback scheduling.
//!
//! Design goals:
//! - Pure, testable logic (no ROS deps).
//! - Explicit types; no macro wizardry.
//! - Small, stable public API surface.

pub mod error;

/// Spinner configuration (poll interval, event buffering).
pub mod config;

/// Turns, callback queue, driver loop and the single-threaded wrapper.
pub mod spin;

pub use config::SpinConfig;
pub use error::{CoreError, Result};
pub use spin::{make_single_threaded, run_dispatch_loop, ShutdownFlag, SingleThreaded, Spinner};
