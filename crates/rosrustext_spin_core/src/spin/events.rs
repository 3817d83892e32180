//! Turn event stream.
//!
//! Observers (tests, diagnostics, transport-side introspection) can follow every turn
//! through `Queued -> Granted -> Completed` without touching the scheduling path.

use super::turn::TurnPhase;

/// Emitted by the queue when a turn is pushed and by the driver loop on grant/completion.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TurnEvent {
    pub seq: u64,
    pub phase: TurnPhase,
}

impl TurnEvent {
    pub const fn granted(seq: u64) -> Self {
        Self {
            seq,
            phase: TurnPhase::Granted,
        }
    }

    pub const fn completed(seq: u64) -> Self {
        Self {
            seq,
            phase: TurnPhase::Completed,
        }
    }
}
