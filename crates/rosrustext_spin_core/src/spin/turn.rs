use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use super::queue::CallbackQueue;

/// Phase of a single turn.
///
/// A turn only ever moves forward: `Queued -> Granted -> Completed`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TurnPhase {
    Queued,
    Granted,
    Completed,
}

/// Permission to run exactly one serialized callback body.
///
/// The phase lives under the mutex, so a grant or completion signalled before
/// the other side starts waiting is never lost.
#[derive(Debug)]
pub struct Turn {
    seq: u64,
    phase: Mutex<TurnPhase>,
    cond: Condvar,
}

impl Turn {
    pub(crate) fn new(seq: u64) -> Self {
        Self {
            seq,
            phase: Mutex::new(TurnPhase::Queued),
            cond: Condvar::new(),
        }
    }

    /// Position of this turn in its queue's push order.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn phase(&self) -> TurnPhase {
        *self.phase.lock()
    }

    /// Caller side: block until a driver loop grants this turn.
    pub(crate) fn wait_granted(&self) {
        let mut phase = self.phase.lock();
        while *phase == TurnPhase::Queued {
            self.cond.wait(&mut phase);
        }
    }

    /// Driver side: grant the turn, then block until the holder completes it.
    pub(crate) fn grant_and_wait(&self) {
        let mut phase = self.phase.lock();
        *phase = TurnPhase::Granted;
        self.cond.notify_all();
        while *phase != TurnPhase::Completed {
            self.cond.wait(&mut phase);
        }
    }

    /// Holder side: release the driver loop that granted this turn.
    pub(crate) fn complete(&self) {
        let mut phase = self.phase.lock();
        *phase = TurnPhase::Completed;
        self.cond.notify_all();
    }
}

thread_local! {
    // Queue ids this thread currently holds a granted turn on.
    static HELD: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

fn held_by_current_thread(queue_id: u64) -> bool {
    HELD.try_with(|held| held.borrow().contains(&queue_id))
        .unwrap_or(false)
}

/// A held turn. Dropping the guard completes the turn, including during a panic unwind.
///
/// A thread that already holds a turn on the same queue gets a *nested* guard:
/// nothing is queued and dropping it does nothing. This is what keeps a
/// wrapped-inside-wrapped callback from waiting on its own turn.
#[must_use = "the turn is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TurnGuard {
    turn: Option<Arc<Turn>>,
    queue_id: u64,
    // Held-turn bookkeeping is per thread.
    _not_send: PhantomData<*const ()>,
}

impl TurnGuard {
    pub(crate) fn acquire(queue: &CallbackQueue) -> Self {
        let queue_id = queue.id();
        if held_by_current_thread(queue_id) {
            return Self {
                turn: None,
                queue_id,
                _not_send: PhantomData,
            };
        }

        let turn = queue.push();
        turn.wait_granted();
        let _ = HELD.try_with(|held| held.borrow_mut().push(queue_id));

        Self {
            turn: Some(turn),
            queue_id,
            _not_send: PhantomData,
        }
    }

    /// Sequence number of the held turn; `None` for a nested guard.
    pub fn seq(&self) -> Option<u64> {
        self.turn.as_ref().map(|turn| turn.seq())
    }

    /// True when this guard rides on a turn the thread already held.
    pub fn is_nested(&self) -> bool {
        self.turn.is_none()
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        let Some(turn) = self.turn.take() else {
            return;
        };

        let queue_id = self.queue_id;
        let _ = HELD.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|id| *id == queue_id) {
                held.remove(pos);
            }
        });

        turn.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn turn_phases_move_forward() {
        let turn = Arc::new(Turn::new(3));
        assert_eq!(turn.seq(), 3);
        assert_eq!(turn.phase(), TurnPhase::Queued);

        let driver = {
            let turn = Arc::clone(&turn);
            thread::spawn(move || turn.grant_and_wait())
        };

        turn.wait_granted();
        assert_eq!(turn.phase(), TurnPhase::Granted);

        turn.complete();
        driver.join().unwrap();
        assert_eq!(turn.phase(), TurnPhase::Completed);
    }

    #[test]
    fn grant_before_wait_is_not_lost() {
        let turn = Arc::new(Turn::new(0));

        let driver = {
            let turn = Arc::clone(&turn);
            thread::spawn(move || turn.grant_and_wait())
        };

        // Let the driver grant first; the holder must still see it.
        thread::sleep(Duration::from_millis(20));
        turn.wait_granted();
        turn.complete();
        driver.join().unwrap();
    }

    #[test]
    fn nested_guard_does_not_queue() {
        let queue = Arc::new(CallbackQueue::new(8));

        let driver = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let turn = queue
                    .pop_timeout(Duration::from_secs(5))
                    .expect("outer turn should be queued");
                turn.grant_and_wait();
            })
        };

        let outer = TurnGuard::acquire(&queue);
        assert!(!outer.is_nested());
        assert_eq!(outer.seq(), Some(0));

        let inner = TurnGuard::acquire(&queue);
        assert!(inner.is_nested());
        assert_eq!(inner.seq(), None);
        assert!(queue.is_empty());

        drop(inner);
        drop(outer);
        driver.join().unwrap();
    }
}
