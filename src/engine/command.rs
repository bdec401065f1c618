//! Reversible merge commands and the bounded undo/redo history.
//!
//! Each player merge is captured as a [`MergeCommand`] holding the pre-merge
//! snapshot of both blobs. Undo restores the grid fully: side-effect blobs
//! spawned by the merge's continuation (trail segments, ghost respawns) are
//! recorded against the command and removed again. Restores re-add blobs
//! under their historical ids so handles held by neighbouring commands stay
//! valid across undo/redo cycles.

use std::collections::VecDeque;

use glam::IVec2;

use super::blob::{BlobColor, BlobId, BlobKind};
use super::grid::Grid;
use super::merge::{EngineCtx, MergeBehavior, MergeOutcome};
use super::motion::Continuation;

/// Monotone per-session command number, used to route late side-effect
/// spawns back to the command that caused them.
pub(crate) type CommandSeq = u64;

/// State machine per command: created, then executed, then undone/re-executed.
/// Double-execute and undo-before-execute are warning no-ops.
#[derive(Debug)]
pub struct MergeCommand {
    seq: CommandSeq,
    source: BlobId,
    target: BlobId,
    source_kind: BlobKind,
    source_color: BlobColor,
    source_from: IVec2,
    target_kind: BlobKind,
    target_color: BlobColor,
    target_pos: IVec2,
    executed: bool,
    /// Blobs spawned by this command's continuation, removed again on undo.
    spawned: Vec<BlobId>,
}

impl MergeCommand {
    /// Snapshot both blobs. `None` if either handle is stale.
    pub(crate) fn new(seq: CommandSeq, grid: &Grid, source: BlobId, target: BlobId) -> Option<Self> {
        let source_blob = grid.blob(source)?;
        let target_blob = grid.blob(target)?;
        Some(Self {
            seq,
            source,
            target,
            source_kind: source_blob.kind,
            source_color: source_blob.color,
            source_from: source_blob.pos,
            target_kind: target_blob.kind,
            target_color: target_blob.color,
            target_pos: target_blob.pos,
            executed: false,
            spawned: Vec::new(),
        })
    }

    pub(crate) fn seq(&self) -> CommandSeq {
        self.seq
    }

    pub(crate) fn note_spawned(&mut self, id: BlobId) {
        self.spawned.push(id);
    }

    /// Dispatch the matching behavior. A second call is a warning no-op.
    pub(crate) fn execute(&mut self, ctx: &mut EngineCtx) -> MergeOutcome {
        if self.executed {
            log::warn!("merge command {} already executed", self.seq);
            return MergeOutcome::Rejected;
        }
        let behavior = MergeBehavior::select(self.source_kind, self.target_kind);
        let outcome = behavior.resolve(self.source, self.target, self.seq, ctx);
        if outcome == MergeOutcome::Started {
            self.executed = true;
        }
        outcome
    }

    /// Restore the pre-merge grid: drop side-effect spawns, put the source
    /// back on its original cell, re-add the target from its snapshot.
    pub(crate) fn undo(&mut self, ctx: &mut EngineCtx) {
        if !self.executed {
            log::warn!("merge command {} not executed, nothing to undo", self.seq);
            return;
        }

        // Side effects first: a ghost respawn sits on the source's original
        // cell and must clear before the source moves back.
        for id in std::mem::take(&mut self.spawned) {
            ctx.remove_blob(id);
        }

        if ctx.grid.blob(self.source).is_some() {
            ctx.start_move(self.source, self.source_from, Continuation::Idle);
        } else {
            // Flag clears removed the source outright.
            ctx.restore_blob(self.source, self.source_kind, self.source_color, self.source_from);
        }

        ctx.restore_blob(self.target, self.target_kind, self.target_color, self.target_pos);
        self.executed = false;
    }
}

/// Bounded undo deque plus a redo stack cleared on every new command.
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: VecDeque<MergeCommand>,
    redo_stack: Vec<MergeCommand>,
    capacity: usize,
    next_seq: CommandSeq,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
            next_seq: 1,
        }
    }

    pub(crate) fn next_seq(&mut self) -> CommandSeq {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Record an executed command; evicts the oldest past capacity.
    pub(crate) fn record(&mut self, command: MergeCommand) {
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the most recent command. `false` if the history is empty.
    pub(crate) fn undo(&mut self, ctx: &mut EngineCtx) -> bool {
        let Some(mut command) = self.undo_stack.pop_back() else {
            log::info!("nothing to undo");
            return false;
        };
        command.undo(ctx);
        self.redo_stack.push(command);
        true
    }

    /// Re-execute the most recently undone command. `false` if none.
    pub(crate) fn redo(&mut self, ctx: &mut EngineCtx) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            log::info!("nothing to redo");
            return false;
        };
        match command.execute(ctx) {
            MergeOutcome::Started => {
                self.undo_stack.push_back(command);
                true
            }
            MergeOutcome::Rejected => {
                log::warn!("redo of command {} rejected", command.seq);
                false
            }
        }
    }

    /// Route a continuation's spawn to its originating command. Quietly
    /// ignored if the command was already evicted.
    pub(crate) fn attach_spawned(&mut self, seq: CommandSeq, id: BlobId) {
        if let Some(command) = self.undo_stack.iter_mut().rev().find(|c| c.seq() == seq) {
            command.note_spawned(id);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
