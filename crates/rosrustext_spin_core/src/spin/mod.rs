//! rosrustext_spin_core::spin
//!
//! Serializes callbacks that a host middleware delivers on many threads.
//! This module intentionally contains **no** ROS transport code.
//!
//! Key ideas:
//! - Every wrapped invocation pushes a `Turn` onto the spinner's FIFO queue and waits
//! - A driver loop (`Spinner::spin`) pops one turn, grants it, and waits for completion
//! - Completion is signalled by a drop guard, so errors and panics never starve the queue
//! - With one driver loop, at most one wrapped callback body runs at a time

mod events;
mod queue;
mod shutdown;
mod spinner;
mod turn;
mod wrapper;

pub use events::TurnEvent;
pub use queue::CallbackQueue;
pub use shutdown::{ShutdownFlag, ShutdownSignal};
pub use spinner::{run_dispatch_loop, SpinOnce, Spinner};
pub use turn::{Turn, TurnGuard, TurnPhase};
pub use wrapper::{make_single_threaded, SingleThreaded};
