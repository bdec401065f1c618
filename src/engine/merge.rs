//! The six merge behaviors.
//!
//! The behavior set is closed, so it is a tagged enum rather than an open
//! trait: one variant per blob kind, all implementing the same contract.
//! `resolve` runs after validation has already passed; it removes the target,
//! relocates the source, and parks the kind-specific follow-up (trail spawn,
//! ghost respawn, flag clear, laser signal) on the motion ticket.

use std::collections::VecDeque;

use glam::IVec2;

use super::blob::{Blob, BlobColor, BlobId, BlobKind};
use super::command::CommandSeq;
use super::grid::Grid;
use super::motion::{Continuation, Motions};
use crate::events::EngineEvent;

/// Mutable working set handed to behaviors and commands.
pub(crate) struct EngineCtx<'a> {
    pub grid: &'a mut Grid,
    pub events: &'a mut VecDeque<EngineEvent>,
    pub motions: &'a mut Motions,
}

impl EngineCtx<'_> {
    /// Relocate a blob and park `continuation` on its motion ticket.
    pub fn start_move(&mut self, blob: BlobId, to: IVec2, continuation: Continuation) -> bool {
        let Some(from) = self.grid.blob(blob).map(|b| b.pos) else {
            log::warn!("start_move: blob {blob:?} not on grid");
            return false;
        };
        if !self.grid.move_blob(from, to) {
            return false;
        }
        let ticket = self.motions.start(blob, continuation);
        self.events.push_back(EngineEvent::BlobMoved {
            id: blob,
            from,
            to,
            ticket,
        });
        true
    }

    pub fn remove_blob(&mut self, id: BlobId) -> Option<Blob> {
        let blob = self.grid.remove_blob(id)?;
        self.events.push_back(EngineEvent::BlobRemoved { id, pos: blob.pos });
        Some(blob)
    }

    /// Re-add a blob under its historical id (undo restores).
    pub fn restore_blob(&mut self, id: BlobId, kind: BlobKind, color: BlobColor, pos: IVec2) {
        if self.grid.add_blob(pos, Blob::new(id, kind, color, pos)) {
            self.events.push_back(EngineEvent::BlobSpawned {
                id,
                pos,
                kind,
                color,
            });
        }
    }
}

/// Whether a dispatched merge actually started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Grid mutated; a motion ticket is pending.
    Started,
    /// Behavior-level rejection; nothing mutated.
    Rejected,
}

/// Behavior selector, one variant per blob kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeBehavior {
    Normal,
    Trail,
    Ghost,
    Flag,
    Rock,
    Switch,
}

impl MergeBehavior {
    /// A special target kind resolves with its own behavior; otherwise the
    /// source kind decides (Trail leaves its trail, anything else is Normal).
    pub fn select(source: BlobKind, target: BlobKind) -> Self {
        match target {
            BlobKind::Ghost => Self::Ghost,
            BlobKind::Flag => Self::Flag,
            BlobKind::Rock => Self::Rock,
            BlobKind::Switch => Self::Switch,
            BlobKind::Normal | BlobKind::Trail => match source {
                BlobKind::Trail => Self::Trail,
                _ => Self::Normal,
            },
        }
    }

    pub(crate) fn resolve(
        self,
        source: BlobId,
        target: BlobId,
        command: CommandSeq,
        ctx: &mut EngineCtx,
    ) -> MergeOutcome {
        let (Some(source_blob), Some(target_blob)) =
            (ctx.grid.blob(source).copied(), ctx.grid.blob(target).copied())
        else {
            log::warn!("merge: stale blob handle, ignoring");
            return MergeOutcome::Rejected;
        };
        let dest = target_blob.pos;

        match self {
            Self::Normal => {
                ctx.remove_blob(target);
                ctx.start_move(source, dest, Continuation::WinCheck);
                MergeOutcome::Started
            }
            Self::Trail => {
                // Record free intermediate cells before any mutation; the
                // endpoints themselves are excluded.
                let step = (dest - source_blob.pos).signum();
                debug_assert!(
                    step.x == 0 || step.y == 0,
                    "trail merge requires an aligned pair"
                );
                let mut cells = Vec::new();
                let mut cur = source_blob.pos + step;
                while cur != dest {
                    if ctx.grid.is_free(cur) {
                        cells.push(cur);
                    }
                    cur += step;
                }
                ctx.remove_blob(target);
                ctx.start_move(
                    source,
                    dest,
                    Continuation::SpawnTrail {
                        cells,
                        color: source_blob.color,
                        command,
                    },
                );
                MergeOutcome::Started
            }
            Self::Ghost => {
                // The ghost follows the cell the source vacates.
                let haunt = Continuation::Haunt {
                    cell: source_blob.pos,
                    color: target_blob.color,
                    command,
                };
                ctx.remove_blob(target);
                ctx.start_move(source, dest, haunt);
                MergeOutcome::Started
            }
            Self::Flag => {
                // Colors already match per can_merge_with; the playable-count
                // gate cannot be expressed there and is re-checked here.
                let playable = ctx.grid.playable_count();
                if playable != 2 {
                    log::info!("flag merge refused: {playable} playable blobs on grid");
                    ctx.events.push_back(EngineEvent::InvalidMove { blob: source });
                    return MergeOutcome::Rejected;
                }
                ctx.remove_blob(target);
                ctx.start_move(source, dest, Continuation::ClearFlagSource { source });
                MergeOutcome::Started
            }
            Self::Rock => {
                // Unreachable in correct play: can_merge_with refuses rocks.
                debug_assert!(false, "rock merge behavior invoked");
                log::warn!("merge into a rock requested; ignoring");
                MergeOutcome::Rejected
            }
            Self::Switch => {
                let color = target_blob.color;
                ctx.remove_blob(target);
                ctx.start_move(source, dest, Continuation::DisableLaser { color });
                MergeOutcome::Started
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_targets_pick_their_behavior() {
        for source in [BlobKind::Normal, BlobKind::Trail] {
            assert_eq!(MergeBehavior::select(source, BlobKind::Ghost), MergeBehavior::Ghost);
            assert_eq!(MergeBehavior::select(source, BlobKind::Flag), MergeBehavior::Flag);
            assert_eq!(MergeBehavior::select(source, BlobKind::Rock), MergeBehavior::Rock);
            assert_eq!(MergeBehavior::select(source, BlobKind::Switch), MergeBehavior::Switch);
        }
    }

    #[test]
    fn test_ordinary_targets_pick_source_behavior() {
        for target in [BlobKind::Normal, BlobKind::Trail] {
            assert_eq!(MergeBehavior::select(BlobKind::Trail, target), MergeBehavior::Trail);
            assert_eq!(MergeBehavior::select(BlobKind::Normal, target), MergeBehavior::Normal);
        }
    }
}
