use std::fmt;
use std::sync::Arc;

use rosrustext_spin_core::error::{CoreError, Domain, ErrorKind};
use rosrustext_spin_core::spin::Spinner;
use tracing::debug;

use super::guard::guard_service_handler;
use crate::error::{Error, Result};

/// Handler the host calls per request; `None` means "no response".
pub type ServiceHandler<Req, Resp> = Arc<dyn Fn(Req) -> Option<Resp> + Send + Sync>;

/// Minimal service-server capability of a host middleware.
pub trait AdvertiseLike<Req, Resp> {
    type Service;
    type Error: std::error::Error + Send + Sync + 'static;

    fn advertise(
        &self,
        service: &str,
        handler: ServiceHandler<Req, Resp>,
    ) -> std::result::Result<Self::Service, Self::Error>;
}

/// Advertise a service whose handler runs one-at-a-time on `spinner` and
/// never lets a failure reach the host.
///
/// The turn is released before the failure is reported.
pub fn advertise_single_threaded<Req, Resp, E, H, F>(
    host: &H,
    spinner: &Spinner,
    service: &str,
    handler: F,
) -> Result<H::Service>
where
    Req: 'static,
    Resp: 'static,
    E: fmt::Display + 'static,
    H: AdvertiseLike<Req, Resp>,
    F: Fn(Req) -> std::result::Result<Resp, E> + Send + Sync + 'static,
{
    if service.is_empty() {
        return Err(Error::Core(
            CoreError::error(Domain::Service, ErrorKind::InvalidArgument)
                .msg("service name must not be empty")
                .build(),
        ));
    }
    debug!(service, "single-threaded service");

    let serialized = spinner.single_threaded(handler).into_fn();
    let guarded = guard_service_handler(service.to_string(), serialized).into_fn();
    host.advertise(service, Arc::new(guarded)).map_err(Error::host)
}
