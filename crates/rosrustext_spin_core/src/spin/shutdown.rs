use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown predicate polled by driver loops between queue waits.
///
/// Implemented for plain closures so a host's own "is shutdown" query can be passed as-is.
pub trait ShutdownSignal {
    fn is_shutdown(&self) -> bool;
}

impl<F> ShutdownSignal for F
where
    F: Fn() -> bool,
{
    fn is_shutdown(&self) -> bool {
        self()
    }
}

/// Shared one-way shutdown flag.
///
/// Intended use:
/// - hand clones to every driver loop (`Spinner::spawn`)
/// - call `trigger()` once when the host shuts down
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    triggered: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }
}

impl ShutdownSignal for ShutdownFlag {
    fn is_shutdown(&self) -> bool {
        self.is_triggered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_flag_test() {
        let flag = ShutdownFlag::new();
        let observer = flag.clone();

        assert!(!observer.is_shutdown());

        flag.trigger();
        assert!(observer.is_shutdown());
        assert!(observer.is_triggered());
    }

    #[test]
    fn closures_are_shutdown_signals() {
        let never = || false;
        let always = || true;
        assert!(!never.is_shutdown());
        assert!(always.is_shutdown());
    }
}
