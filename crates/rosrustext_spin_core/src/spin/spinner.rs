use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::config::SpinConfig;
use crate::error::{CoreError, Result};

use super::events::TurnEvent;
use super::queue::CallbackQueue;
use super::shutdown::{ShutdownFlag, ShutdownSignal};
use super::turn::TurnGuard;
use super::wrapper::SingleThreaded;

/// Outcome of a single queue-service step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpinOnce {
    /// A turn was granted and its holder has completed.
    Granted { seq: u64 },
    /// Nothing arrived before the timeout.
    Idle,
}

#[derive(Debug)]
struct Shared {
    queue: CallbackQueue,
    config: SpinConfig,
    active_loops: AtomicUsize,
    warned_multi_loop: AtomicBool,
    spawned: AtomicUsize,
}

/// Owner of one callback queue and the driver loops that serve it.
///
/// Cloning shares the queue. One spinner per process gives the classic
/// "all wrapped callbacks run one at a time" behavior.
///
/// Usage constraint: run exactly **one** driver loop per spinner when mutual
/// exclusion of callback bodies matters. Each additional loop can grant a
/// different turn concurrently.
#[derive(Debug, Clone)]
pub struct Spinner {
    shared: Arc<Shared>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    /// Spinner with the default configuration.
    pub fn new() -> Self {
        Self::from_valid(SpinConfig::default())
    }

    pub fn with_config(config: SpinConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: SpinConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: CallbackQueue::new(config.event_capacity),
                config,
                active_loops: AtomicUsize::new(0),
                warned_multi_loop: AtomicBool::new(false),
                spawned: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SpinConfig {
        &self.shared.config
    }

    pub fn queue(&self) -> &CallbackQueue {
        &self.shared.queue
    }

    /// Queued turns not yet granted.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Driver loops currently inside `spin` / `spin_once`.
    pub fn active_loops(&self) -> usize {
        self.shared.active_loops.load(Ordering::Acquire)
    }

    /// Subscribe to turn events (queued / granted / completed).
    pub fn subscribe_turn_events(&self) -> broadcast::Receiver<TurnEvent> {
        self.shared.queue.subscribe()
    }

    /// Driver loop: grant turns in FIFO order until `shutdown` reports true.
    ///
    /// Shutdown is checked between queue waits, so a granted callback always runs to
    /// completion. Turns still queued when the loop exits are never granted.
    pub fn spin<S>(&self, shutdown: &S)
    where
        S: ShutdownSignal + ?Sized,
    {
        let _loop = self.enter_loop();
        let poll = self.shared.config.poll_interval;
        debug!(queue = self.shared.queue.id(), "spinner loop started");

        while !shutdown.is_shutdown() {
            self.serve_next(poll);
        }

        debug!(
            queue = self.shared.queue.id(),
            abandoned = self.pending(),
            "spinner loop stopped"
        );
    }

    /// Serve at most one turn, waiting up to `timeout` for one to arrive.
    pub fn spin_once(&self, timeout: Duration) -> SpinOnce {
        let _loop = self.enter_loop();
        self.serve_next(timeout)
    }

    /// Run `spin` on a dedicated, named thread.
    pub fn spawn(&self, shutdown: ShutdownFlag) -> Result<JoinHandle<()>> {
        let n = self.shared.spawned.fetch_add(1, Ordering::Relaxed);
        let spinner = self.clone();
        let handle = std::thread::Builder::new()
            .name(format!("rosrustext-spin-{n}"))
            .spawn(move || spinner.spin(&shutdown))
            .map_err(CoreError::spawn_failed)?;
        Ok(handle)
    }

    /// Block until this thread holds a turn. Dropping the guard releases it.
    pub fn acquire(&self) -> TurnGuard {
        TurnGuard::acquire(&self.shared.queue)
    }

    /// Run `f` while holding a turn; the turn is released even if `f` panics.
    pub fn run<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _turn = self.acquire();
        f()
    }

    /// Wrap `callback` so every invocation runs inside a turn of this spinner.
    pub fn single_threaded<F>(&self, callback: F) -> SingleThreaded<F> {
        SingleThreaded::new(self.clone(), callback)
    }

    fn serve_next(&self, timeout: Duration) -> SpinOnce {
        let queue = &self.shared.queue;
        let Some(turn) = queue.pop_timeout(timeout) else {
            return SpinOnce::Idle;
        };

        let seq = turn.seq();
        trace!(queue = queue.id(), seq, "granting turn");
        queue.emit(TurnEvent::granted(seq));
        turn.grant_and_wait();
        queue.emit(TurnEvent::completed(seq));
        trace!(queue = queue.id(), seq, "turn completed");

        SpinOnce::Granted { seq }
    }

    /// Whether the multi-loop warning has been emitted for this spinner.
    pub(crate) fn warned_multi_loop(&self) -> bool {
        self.shared.warned_multi_loop.load(Ordering::Acquire)
    }

    fn enter_loop(&self) -> ActiveLoop<'_> {
        let shared = &*self.shared;
        let running = shared.active_loops.fetch_add(1, Ordering::AcqRel) + 1;
        if running > 1 && !shared.warned_multi_loop.swap(true, Ordering::AcqRel) {
            warn!(
                queue = shared.queue.id(),
                running,
                "multiple driver loops on one queue: wrapped callbacks may overlap"
            );
        }
        ActiveLoop { shared }
    }
}

struct ActiveLoop<'a> {
    shared: &'a Shared,
}

impl Drop for ActiveLoop<'_> {
    fn drop(&mut self) {
        self.shared.active_loops.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Blocking dispatch loop for a dedicated thread; returns once `shutdown` is true.
pub fn run_dispatch_loop<S>(spinner: &Spinner, shutdown: &S)
where
    S: ShutdownSignal + ?Sized,
{
    spinner.spin(shutdown)
}
