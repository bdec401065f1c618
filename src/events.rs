//! Events crossing the engine boundary.
//!
//! The engine never renders, formats text, or persists anything. Instead it
//! queues [`EngineEvent`]s describing what happened; the presentation,
//! feedback, and progression shells drain the queue and react. Move events
//! carry a [`MotionTicket`] that the presentation layer hands back via
//! `GameSession::complete_motion` once the move animation finishes.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::engine::blob::{BlobColor, BlobId, BlobKind};
use crate::engine::moves::MoveValidation;

/// Handle for an in-flight blob motion awaiting visual completion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MotionTicket(pub u32);

/// Everything the outside world needs to know about a session, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    BlobSpawned {
        id: BlobId,
        pos: IVec2,
        kind: BlobKind,
        color: BlobColor,
    },
    BlobRemoved {
        id: BlobId,
        pos: IVec2,
    },
    /// The grid already reflects the move; the ticket resolves the visual.
    BlobMoved {
        id: BlobId,
        from: IVec2,
        to: IVec2,
        ticket: MotionTicket,
    },
    /// A validated merge was dispatched to its behavior.
    MergeExecuted {
        source: BlobId,
        target: BlobId,
    },
    /// Validation rejected the attempt; nothing was mutated.
    MergeFailed {
        source: BlobId,
        reason: MoveValidation,
    },
    /// Shake the blob: a behavior-level rejection (the Flag gate).
    InvalidMove {
        blob: BlobId,
    },
    /// A Switch was absorbed; external obstacle systems should drop the
    /// matching laser. The engine does not model lasers.
    LaserDisabled {
        color: BlobColor,
    },
    /// Terminal report for the progression collaborator.
    LevelWon {
        stars: u32,
        score: i32,
    },
}
