//! rosrustext_spin_ros
//!
//! ROS-facing helpers built on `rosrustext_spin_core`.
//! Host middleware is reached only through small traits (`SubscribeLike`,
//! `AdvertiseLike`), so any client library can sit behind them.
//!
//! Design rules:
//! - Application owns the spinner and the threads that drive it.
//! - No hidden threads inside the adapter.
//! - Scheduling semantics live in `rosrustext_spin_core`.

pub mod error;
pub mod service;
pub mod subscriber;

// Adapter error type
pub use error::{log_core_error, Error, Result};

pub use service::{advertise_single_threaded, guard_service_handler, ServiceGuard};
pub use subscriber::{
    subscribe_single_threaded, subscribe_single_threaded_with_args, SubscribeOptions,
};

// Re-export core types that adapter users will commonly need
pub use rosrustext_spin_core::error::CoreError;
pub use rosrustext_spin_core::spin::{run_dispatch_loop, ShutdownFlag, SingleThreaded, Spinner};
