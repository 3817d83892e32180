use std::borrow::Cow;
use std::fmt;
use std::io;
use thiserror::Error;

/// Convenient result alias for rosrustext_spin_core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// How loudly a diagnostic sink should report the error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    /// Handled failure the caller asked for (e.g. a handler returned `Err`).
    Warn,
    Error,
}

/// Which part of the scheduler stack raised the error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    /// Driver loops and their threads.
    Scheduler,
    Subscription,
    Service,
    Config,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    Io,
    /// A user callback reported failure through its return value.
    CallbackFailed,
    /// A user callback panicked.
    CallbackPanicked,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    None,
    /// Names the setting, service or resource the error is about.
    Context {
        key: &'static str,
        value: Cow<'static, str>,
    },
}

/// The one error type that crosses module boundaries in rosrustext_spin_core.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{domain:?}/{kind:?}: {message}")]
pub struct CoreError {
    pub domain: Domain,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: Cow<'static, str>,
    pub payload: Payload,
}

impl CoreError {
    #[inline]
    pub fn warn(domain: Domain, kind: ErrorKind) -> ErrB {
        ErrB::new(Severity::Warn, domain, kind)
    }

    #[inline]
    pub fn error(domain: Domain, kind: ErrorKind) -> ErrB {
        ErrB::new(Severity::Error, domain, kind)
    }

    /// A rejected setting; the payload names it.
    pub fn invalid_config(key: &'static str, message: &'static str) -> Self {
        CoreError::error(Domain::Config, ErrorKind::InvalidArgument)
            .msg(message)
            .context("config", key)
            .build()
    }

    /// A driver loop thread could not be started.
    pub(crate) fn spawn_failed(err: io::Error) -> Self {
        CoreError::error(Domain::Scheduler, ErrorKind::Io)
            .msg("failed to spawn driver loop thread")
            .context("io", err.to_string())
            .build()
    }
}

/// Fluent builder; severity, domain and kind are fixed by the entry point.
#[derive(Debug, Clone)]
pub struct ErrB {
    inner: CoreError,
}

impl ErrB {
    #[inline]
    fn new(severity: Severity, domain: Domain, kind: ErrorKind) -> Self {
        Self {
            inner: CoreError {
                domain,
                kind,
                severity,
                message: Cow::Borrowed(""),
                payload: Payload::None,
            },
        }
    }

    #[inline]
    pub fn msg(mut self, m: impl Into<Cow<'static, str>>) -> Self {
        self.inner.message = m.into();
        self
    }

    #[inline]
    pub fn msgf(mut self, args: fmt::Arguments<'_>) -> Self {
        self.inner.message = Cow::Owned(args.to_string());
        self
    }

    /// Replaces any previous payload.
    #[inline]
    pub fn context(mut self, key: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        self.inner.payload = Payload::Context {
            key,
            value: value.into(),
        };
        self
    }

    #[inline]
    pub fn build(self) -> CoreError {
        self.inner
    }
}

impl From<ErrB> for CoreError {
    fn from(b: ErrB) -> Self {
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_point_fixes_severity_domain_and_kind() {
        let e = CoreError::warn(Domain::Service, ErrorKind::CallbackFailed)
            .msgf(format_args!("request {} refused", 7))
            .context("service", "/set_speed")
            .build();
        assert_eq!(e.severity, Severity::Warn);
        assert_eq!(e.domain, Domain::Service);
        assert_eq!(e.kind, ErrorKind::CallbackFailed);
        assert_eq!(e.to_string(), "Service/CallbackFailed: request 7 refused");
        assert_eq!(
            e.payload,
            Payload::Context {
                key: "service",
                value: "/set_speed".into(),
            }
        );

        let bare: CoreError = CoreError::error(Domain::Subscription, ErrorKind::InvalidArgument).into();
        assert_eq!(bare.payload, Payload::None);
        assert_eq!(bare.message, "");
    }

    #[test]
    fn spawn_failure_carries_io_context() {
        let io = io::Error::new(io::ErrorKind::Other, "no threads left");
        let e = CoreError::spawn_failed(io);
        assert_eq!(e.domain, Domain::Scheduler);
        assert_eq!(e.kind, ErrorKind::Io);
        match e.payload {
            Payload::Context { key, value } => {
                assert_eq!(key, "io");
                assert!(value.contains("no threads left"));
            }
            Payload::None => panic!("expected io context payload"),
        }
    }
}
