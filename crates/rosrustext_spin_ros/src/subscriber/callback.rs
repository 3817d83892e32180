use std::fmt;
use std::sync::Arc;

/// Callback handed to the host, in the arity the subscription was created with.
///
/// Hosts call `invoke()` and never need to know which arity was requested.
pub enum SubscriberCallback<T, A = ()> {
    /// `callback(msg)`
    Message(Arc<dyn Fn(T) + Send + Sync>),
    /// `callback(msg, &args)`; `args` is the caller's context, passed through unchanged.
    MessageWithArgs {
        callback: Arc<dyn Fn(T, &A) + Send + Sync>,
        args: A,
    },
}

impl<T, A> SubscriberCallback<T, A> {
    pub fn invoke(&self, msg: T) {
        match self {
            SubscriberCallback::Message(callback) => callback(msg),
            SubscriberCallback::MessageWithArgs { callback, args } => callback(msg, args),
        }
    }

    /// Callback context, if the subscription was created with one.
    pub fn args(&self) -> Option<&A> {
        match self {
            SubscriberCallback::Message(_) => None,
            SubscriberCallback::MessageWithArgs { args, .. } => Some(args),
        }
    }
}

impl<T, A: Clone> Clone for SubscriberCallback<T, A> {
    fn clone(&self) -> Self {
        match self {
            SubscriberCallback::Message(callback) => {
                SubscriberCallback::Message(Arc::clone(callback))
            }
            SubscriberCallback::MessageWithArgs { callback, args } => {
                SubscriberCallback::MessageWithArgs {
                    callback: Arc::clone(callback),
                    args: args.clone(),
                }
            }
        }
    }
}

impl<T, A: fmt::Debug> fmt::Debug for SubscriberCallback<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriberCallback::Message(_) => f.write_str("SubscriberCallback::Message"),
            SubscriberCallback::MessageWithArgs { args, .. } => f
                .debug_struct("SubscriberCallback::MessageWithArgs")
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}
