use rosrustext_spin_core::error::CoreError;

use crate::error::log_core_error;

/// Where guarded handlers report failures.
pub trait DiagnosticSink {
    fn report(&self, err: &CoreError);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&CoreError),
{
    fn report(&self, err: &CoreError) {
        self(err)
    }
}

/// Default sink: the process-wide `tracing` subscriber.
#[derive(Debug, Copy, Clone, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, err: &CoreError) {
        log_core_error(err);
    }
}
