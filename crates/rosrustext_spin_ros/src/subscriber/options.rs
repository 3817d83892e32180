/// Default incoming message buffer size in bytes (TCPROS default).
pub const DEFAULT_BUFF_SIZE: usize = 65536;

/// Subscription parameters forwarded untouched to the host.
///
/// Defaults mirror a plain ROS subscriber:
/// - `queue_size`: `None` (host default, usually unbounded)
/// - `buff_size`: `DEFAULT_BUFF_SIZE`
/// - `tcp_nodelay`: `false`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SubscribeOptions {
    pub queue_size: Option<usize>,
    pub buff_size: usize,
    pub tcp_nodelay: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            queue_size: None,
            buff_size: DEFAULT_BUFF_SIZE,
            tcp_nodelay: false,
        }
    }
}

impl SubscribeOptions {
    pub fn queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = Some(queue_size);
        self
    }

    pub fn buff_size(mut self, buff_size: usize) -> Self {
        self.buff_size = buff_size;
        self
    }

    pub fn tcp_nodelay(mut self, tcp_nodelay: bool) -> Self {
        self.tcp_nodelay = tcp_nodelay;
        self
    }
}
