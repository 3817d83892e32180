//! rosrustext_spin_ros::subscriber
//!
//! Single-threaded subscription helpers.
//!
//! The host keeps delivering messages on its own threads; the callback it receives
//! takes a turn on the caller's `Spinner` before running user code.

// Subscription parameters.
mod options;
pub use options::{SubscribeOptions, DEFAULT_BUFF_SIZE};

// Arity-aware callback handed to the host.
mod callback;
pub use callback::SubscriberCallback;

mod subscribe;
pub use subscribe::{
    subscribe_single_threaded, subscribe_single_threaded_with_args, RosMessage, SubscribeLike,
};
