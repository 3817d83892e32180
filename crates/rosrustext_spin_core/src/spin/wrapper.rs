use std::fmt;

use super::spinner::Spinner;

/// A callback that runs each invocation inside a turn of one spinner.
///
/// Return values (including `Result`s) pass through unchanged; the turn is
/// completed before the caller sees them. Wrapping a `SingleThreaded` callback
/// again is harmless: the inner turn request is served by the turn the thread
/// already holds.
#[derive(Clone)]
pub struct SingleThreaded<F> {
    spinner: Spinner,
    callback: F,
}

impl<F> SingleThreaded<F> {
    pub(crate) fn new(spinner: Spinner, callback: F) -> Self {
        Self { spinner, callback }
    }

    /// Already single-threaded: returns `self`.
    pub fn single_threaded(self) -> Self {
        self
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    /// The original, unwrapped callback.
    pub fn inner(&self) -> &F {
        &self.callback
    }

    pub fn into_inner(self) -> F {
        self.callback
    }

    /// Invoke a zero-argument callback.
    pub fn invoke<R>(&self) -> R
    where
        F: Fn() -> R,
    {
        self.spinner.run(|| (self.callback)())
    }

    /// Invoke a message-only callback.
    pub fn call<M, R>(&self, msg: M) -> R
    where
        F: Fn(M) -> R,
    {
        self.spinner.run(|| (self.callback)(msg))
    }

    /// Invoke a message-plus-context callback.
    pub fn call_with<M, C, R>(&self, msg: M, ctx: C) -> R
    where
        F: Fn(M, C) -> R,
    {
        self.spinner.run(|| (self.callback)(msg, ctx))
    }

    /// Erase into a plain closure for APIs that take `Fn(M) -> R`.
    pub fn into_fn<M, R>(self) -> impl Fn(M) -> R + Send + Sync + 'static
    where
        F: Fn(M) -> R + Send + Sync + 'static,
        M: 'static,
        R: 'static,
    {
        move |msg| self.call(msg)
    }

    /// Erase into a plain closure for APIs that take `Fn(M, C) -> R`.
    pub fn into_fn_with<M, C, R>(self) -> impl Fn(M, C) -> R + Send + Sync + 'static
    where
        F: Fn(M, C) -> R + Send + Sync + 'static,
        M: 'static,
        C: 'static,
        R: 'static,
    {
        move |msg, ctx| self.call_with(msg, ctx)
    }
}

impl<F> fmt::Debug for SingleThreaded<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleThreaded")
            .field("queue", &self.spinner.queue().id())
            .finish_non_exhaustive()
    }
}

/// Free-function form of `Spinner::single_threaded`.
pub fn make_single_threaded<F>(spinner: &Spinner, callback: F) -> SingleThreaded<F> {
    spinner.single_threaded(callback)
}
