//! rosrustext_spin_ros::service
//!
//! Service-side helpers: an error boundary for handlers, the sink it reports to,
//! and a single-threaded advertise helper composing both with a `Spinner`.

mod sink;
pub use sink::{DiagnosticSink, TracingSink};

mod guard;
pub use guard::{guard_service_handler, ServiceGuard};

mod advertise;
pub use advertise::{advertise_single_threaded, AdvertiseLike, ServiceHandler};
