use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use rosrustext_spin_core::error::{CoreError, Domain, ErrorKind};

use super::sink::{DiagnosticSink, TracingSink};

/// Error boundary around a service handler.
///
/// - `Ok(resp)` -> `Some(resp)`
/// - `Err(e)` or a panic -> one report to the sink, then `None` (no response)
///
/// Nothing escapes to the host's service dispatch thread.
pub struct ServiceGuard<F, S = TracingSink> {
    service: Cow<'static, str>,
    handler: F,
    sink: S,
}

impl<F> ServiceGuard<F> {
    pub fn new(service: impl Into<Cow<'static, str>>, handler: F) -> Self {
        Self {
            service: service.into(),
            handler,
            sink: TracingSink,
        }
    }
}

impl<F, S> ServiceGuard<F, S> {
    /// Report failures somewhere other than `tracing`.
    pub fn with_sink<S2>(self, sink: S2) -> ServiceGuard<F, S2>
    where
        S2: DiagnosticSink,
    {
        ServiceGuard {
            service: self.service,
            handler: self.handler,
            sink,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn call<Req, Resp, E>(&self, req: Req) -> Option<Resp>
    where
        F: Fn(Req) -> Result<Resp, E>,
        E: fmt::Display,
        S: DiagnosticSink,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(req))) {
            Ok(Ok(resp)) => Some(resp),
            Ok(Err(e)) => {
                self.sink.report(&self.failure(
                    ErrorKind::CallbackFailed,
                    format_args!("service handler failed: {e}"),
                ));
                None
            }
            Err(panic) => {
                self.sink.report(&self.failure(
                    ErrorKind::CallbackPanicked,
                    format_args!("service handler panicked: {}", panic_message(panic.as_ref())),
                ));
                None
            }
        }
    }

    /// Erase into a plain closure for hosts that take `Fn(Req) -> Option<Resp>`.
    pub fn into_fn<Req, Resp, E>(self) -> impl Fn(Req) -> Option<Resp> + Send + Sync + 'static
    where
        F: Fn(Req) -> Result<Resp, E> + Send + Sync + 'static,
        E: fmt::Display + 'static,
        S: DiagnosticSink + Send + Sync + 'static,
        Req: 'static,
        Resp: 'static,
    {
        move |req| self.call(req)
    }

    fn failure(&self, kind: ErrorKind, message: fmt::Arguments<'_>) -> CoreError {
        // A returned `Err` is the handler's own verdict; a panic is a bug.
        let builder = match kind {
            ErrorKind::CallbackFailed => CoreError::warn(Domain::Service, kind),
            _ => CoreError::error(Domain::Service, kind),
        };
        builder
            .msgf(message)
            .context("service", self.service.clone())
            .build()
    }
}

impl<F, S> fmt::Debug for ServiceGuard<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceGuard")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Wrap `handler` in a `ServiceGuard` reporting through `tracing`.
pub fn guard_service_handler<F>(
    service: impl Into<Cow<'static, str>>,
    handler: F,
) -> ServiceGuard<F> {
    ServiceGuard::new(service, handler)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
