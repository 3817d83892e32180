use std::sync::Arc;

use rosrustext_spin_core::error::{CoreError, Domain, ErrorKind};
use rosrustext_spin_core::spin::Spinner;
use tracing::debug;

use super::{SubscribeOptions, SubscriberCallback};
use crate::error::{Error, Result};

/// A message type the host can subscribe to.
pub trait RosMessage: Send + 'static {
    /// Fully-qualified ROS type name, e.g. `std_msgs/String`.
    const ROS_TYPE_NAME: &'static str;
}

/// Minimal subscription capability of a host middleware.
///
/// This is intentionally tiny so we can:
/// - unit test single-threaded delivery without ROS
/// - adapt real client libraries in a transport layer
pub trait SubscribeLike<T: RosMessage, A = ()> {
    type Subscription;
    type Error: std::error::Error + Send + Sync + 'static;

    fn subscribe(
        &self,
        topic: &str,
        callback: SubscriberCallback<T, A>,
        options: SubscribeOptions,
    ) -> std::result::Result<Self::Subscription, Self::Error>;
}

/// Subscribe with a `callback(msg)` that runs one-at-a-time on `spinner`.
///
/// Every parameter except the callback reaches the host unchanged.
pub fn subscribe_single_threaded<T, H, F>(
    host: &H,
    spinner: &Spinner,
    topic: &str,
    callback: F,
    options: SubscribeOptions,
) -> Result<H::Subscription>
where
    T: RosMessage,
    H: SubscribeLike<T>,
    F: Fn(T) + Send + Sync + 'static,
{
    check_topic(topic)?;
    debug!(topic, msg_type = T::ROS_TYPE_NAME, "single-threaded subscription");

    let wrapped = spinner.single_threaded(callback).into_fn();
    host.subscribe(topic, SubscriberCallback::Message(Arc::new(wrapped)), options)
        .map_err(Error::host)
}

/// Subscribe with a `callback(msg, &args)` that runs one-at-a-time on `spinner`.
pub fn subscribe_single_threaded_with_args<T, A, H, F>(
    host: &H,
    spinner: &Spinner,
    topic: &str,
    callback: F,
    args: A,
    options: SubscribeOptions,
) -> Result<H::Subscription>
where
    T: RosMessage,
    A: Send + Sync + 'static,
    H: SubscribeLike<T, A>,
    F: Fn(T, &A) + Send + Sync + 'static,
{
    check_topic(topic)?;
    debug!(
        topic,
        msg_type = T::ROS_TYPE_NAME,
        "single-threaded subscription with callback args"
    );

    let wrapped = spinner.single_threaded(callback);
    let callback = SubscriberCallback::MessageWithArgs {
        callback: Arc::new(move |msg: T, args: &A| wrapped.call_with(msg, args)),
        args,
    };
    host.subscribe(topic, callback, options).map_err(Error::host)
}

fn check_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(CoreError::error(Domain::Subscription, ErrorKind::InvalidArgument)
            .msg("topic name must not be empty")
            .build()
            .into());
    }
    Ok(())
}
