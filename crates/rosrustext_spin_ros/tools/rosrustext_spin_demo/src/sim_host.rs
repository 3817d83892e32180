//! In-process stand-in for a ROS client library.
//!
//! Subscriptions are stored per topic; `deliver` fans a message out to every
//! subscriber on the calling thread, like a host's transport thread would.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use rosrustext_spin_ros::subscriber::{RosMessage, SubscribeLike, SubscriberCallback};
use rosrustext_spin_ros::SubscribeOptions;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chatter {
    pub sender: usize,
    pub index: usize,
}

impl RosMessage for Chatter {
    const ROS_TYPE_NAME: &'static str = "std_msgs/String";
}

#[derive(Debug)]
pub struct SimHostError(String);

impl fmt::Display for SimHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sim host: {}", self.0)
    }
}

impl std::error::Error for SimHostError {}

type Topics = HashMap<String, Vec<SubscriberCallback<Chatter>>>;

#[derive(Clone, Default)]
pub struct SimHost {
    topics: Arc<Mutex<Topics>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `msg` to every subscriber of `topic`; returns how many received it.
    pub fn deliver(&self, topic: &str, msg: Chatter) -> usize {
        let subscribers = match self.topics.lock() {
            Ok(topics) => topics.get(topic).cloned().unwrap_or_default(),
            Err(_) => {
                warn!("sim host topic table poisoned");
                return 0;
            }
        };

        for callback in &subscribers {
            callback.invoke(msg.clone());
        }
        subscribers.len()
    }
}

impl SubscribeLike<Chatter> for SimHost {
    type Subscription = ();
    type Error = SimHostError;

    fn subscribe(
        &self,
        topic: &str,
        callback: SubscriberCallback<Chatter>,
        _options: SubscribeOptions,
    ) -> Result<(), SimHostError> {
        let mut topics = self
            .topics
            .lock()
            .map_err(|_| SimHostError("topic table poisoned".to_string()))?;
        topics.entry(topic.to_string()).or_default().push(callback);
        Ok(())
    }
}
