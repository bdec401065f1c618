//! Pending-motion bookkeeping.
//!
//! A merge mutates the grid synchronously, but its *visible* completion is
//! asynchronous: the presentation layer animates the move and reports back.
//! Follow-up work that must happen "after the move" (trail spawns, ghost
//! respawn, flag clear, win check) is parked here as a continuation keyed by
//! ticket until `GameSession::complete_motion` is called. The engine holds no
//! lock and models no timeouts; a ticket that never completes blocks further
//! undo/redo.

use std::collections::BTreeMap;

use glam::IVec2;

use super::blob::{BlobColor, BlobId};
use super::command::CommandSeq;
use crate::events::MotionTicket;

/// Work to run when a motion's completion callback arrives.
#[derive(Debug, Clone)]
pub(crate) enum Continuation {
    /// Re-evaluate the win condition only.
    WinCheck,
    /// Spawn trail blobs on the recorded cells, then win-check.
    SpawnTrail {
        cells: Vec<IVec2>,
        color: BlobColor,
        command: CommandSeq,
    },
    /// Respawn a ghost on the vacated cell, then win-check.
    Haunt {
        cell: IVec2,
        color: BlobColor,
        command: CommandSeq,
    },
    /// Remove the source too (the flag-clearing merge), then win-check.
    ClearFlagSource { source: BlobId },
    /// Signal the laser drop, then win-check.
    DisableLaser { color: BlobColor },
    /// Nothing to do (undo motions).
    Idle,
}

#[derive(Debug)]
pub(crate) struct Motion {
    pub blob: BlobId,
    pub continuation: Continuation,
}

/// In-flight motions, ordered by ticket for deterministic iteration.
#[derive(Debug, Default)]
pub(crate) struct Motions {
    next: u32,
    pending: BTreeMap<MotionTicket, Motion>,
}

impl Motions {
    pub fn start(&mut self, blob: BlobId, continuation: Continuation) -> MotionTicket {
        self.next += 1;
        let ticket = MotionTicket(self.next);
        self.pending.insert(ticket, Motion { blob, continuation });
        ticket
    }

    pub fn complete(&mut self, ticket: MotionTicket) -> Option<Motion> {
        self.pending.remove(&ticket)
    }

    pub fn is_animating(&self, blob: BlobId) -> bool {
        self.pending.values().any(|m| m.blob == blob)
    }

    pub fn any_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn tickets(&self) -> Vec<MotionTicket> {
        self.pending.keys().copied().collect()
    }
}
