use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tokio::sync::broadcast;

use super::events::TurnEvent;
use super::turn::{Turn, TurnPhase};

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct Pending {
    turns: VecDeque<Arc<Turn>>,
    next_seq: u64,
}

/// FIFO of turns waiting to be granted.
///
/// Invariants:
/// - sequence numbers are assigned under the queue lock, so `seq` order is push order
/// - a popped turn is no longer in the queue, so no two loops can grant the same turn
#[derive(Debug)]
pub struct CallbackQueue {
    id: u64,
    pending: Mutex<Pending>,
    available: Condvar,

    // broadcast so a slow observer never stalls a caller or a driver loop
    events: broadcast::Sender<TurnEvent>,
}

impl CallbackQueue {
    /// `event_capacity` must be non-zero.
    pub(crate) fn new(event_capacity: usize) -> Self {
        let (events, _rx) = broadcast::channel(event_capacity);
        Self {
            id: NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed),
            pending: Mutex::new(Pending {
                turns: VecDeque::new(),
                next_seq: 0,
            }),
            available: Condvar::new(),
            events,
        }
    }

    /// Process-unique queue identity.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Create the next turn and append it to the back of the queue.
    pub(crate) fn push(&self) -> Arc<Turn> {
        let mut pending = self.pending.lock();
        let seq = pending.next_seq;
        pending.next_seq += 1;

        let turn = Arc::new(Turn::new(seq));
        pending.turns.push_back(Arc::clone(&turn));
        self.emit(TurnEvent {
            seq,
            phase: TurnPhase::Queued,
        });
        drop(pending);

        self.available.notify_one();
        turn
    }

    /// Pop the front turn, waiting at most `timeout` for one to arrive.
    pub(crate) fn pop_timeout(&self, timeout: Duration) -> Option<Arc<Turn>> {
        let deadline = Instant::now() + timeout;
        let mut pending = self.pending.lock();
        loop {
            if let Some(turn) = pending.turns.pop_front() {
                return Some(turn);
            }
            if self.available.wait_until(&mut pending, deadline).timed_out() {
                return pending.turns.pop_front();
            }
        }
    }

    /// Number of queued, not yet granted turns.
    pub fn len(&self) -> usize {
        self.pending.lock().turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn emit(&self, event: TurnEvent) {
        // No receivers is the normal case.
        let _ = self.events.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.events.subscribe()
    }
}
