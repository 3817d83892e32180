use std::{error::Error as StdError, fmt};

use rosrustext_spin_core::error::{CoreError, Severity};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Error raised by the host middleware (subscribe/advertise).
    Host(Box<dyn StdError + Send + Sync + 'static>),
    Core(CoreError),
}

impl Error {
    pub fn host<E>(e: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Host(Box::new(e))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Host(e) => write!(f, "host error: {e}"),
            Error::Core(e) => write!(f, "core error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Host(e) => Some(e.as_ref()),
            Error::Core(e) => Some(e),
        }
    }
}

impl From<CoreError> for Error {
    fn from(e: CoreError) -> Self {
        Error::Core(e)
    }
}

pub fn log_core_error(err: &CoreError) {
    match err.severity {
        Severity::Warn => tracing::warn!(domain = ?err.domain, kind = ?err.kind, "{err}"),
        Severity::Error => tracing::error!(domain = ?err.domain, kind = ?err.kind, "{err}"),
    }
}
