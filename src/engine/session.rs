//! Game session: owns the grid, history, and counters for one level run.
//!
//! Explicitly owned state instead of process-wide managers: everything a
//! merge touches is a field here, and collaborators reach the session only
//! through its methods and the event queue. One merge may be in flight at a
//! time; the caller defers input while `is_animating` reports pending motion
//! and calls [`GameSession::complete_motion`] when the visual finishes.

use std::collections::VecDeque;

use super::blob::{BlobId, BlobKind};
use super::command::{CommandHistory, MergeCommand};
use super::grid::Grid;
use super::merge::{EngineCtx, MergeOutcome};
use super::motion::{Continuation, Motions};
use super::moves::{self, Direction, MoveValidation};
use crate::consts::HISTORY_CAPACITY;
use crate::events::{EngineEvent, MotionTicket};
use crate::level::{LevelData, TileKind};

/// Session phase. `Won` is terminal: merges, undo, and redo all refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Won,
}

/// Classification of the remaining board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinStatus {
    Ongoing,
    /// Exactly one playable blob left.
    NearWin,
    /// No playable blobs left.
    Won,
}

/// Stars earned for a cleared level, derived from undo usage.
pub fn star_rating(undo_count: u32) -> u32 {
    match undo_count {
        0 => 3,
        1..=2 => 2,
        3..=4 => 1,
        _ => 0,
    }
}

#[derive(Debug)]
pub struct GameSession {
    grid: Grid,
    history: CommandHistory,
    motions: Motions,
    events: VecDeque<EngineEvent>,
    phase: GamePhase,
    move_count: u32,
    undo_count: u32,
    level: LevelData,
}

impl GameSession {
    /// Build a session from authored level data, populating the grid.
    /// The level is assumed validated; bad records are skipped with warnings.
    pub fn new(level: &LevelData) -> Self {
        let mut session = Self {
            grid: Grid::new(level.width, level.height),
            history: CommandHistory::new(HISTORY_CAPACITY),
            motions: Motions::default(),
            events: VecDeque::new(),
            phase: GamePhase::Playing,
            move_count: 0,
            undo_count: 0,
            level: level.clone(),
        };
        session.populate();
        session
    }

    fn populate(&mut self) {
        for tile in &self.level.tiles {
            if tile.tile == TileKind::Blocked {
                self.grid.block_tile(tile.position);
            }
        }
        for spawn in self.level.blobs.clone() {
            if let Some(id) =
                self.grid
                    .spawn_blob_sized(spawn.position, spawn.kind, spawn.color, spawn.size)
            {
                self.events.push_back(EngineEvent::BlobSpawned {
                    id,
                    pos: spawn.position,
                    kind: spawn.kind,
                    color: spawn.color,
                });
            }
        }
        log::info!(
            "level {} loaded: {} blobs, {} playable",
            self.level.level_number,
            self.grid.blob_count(),
            self.grid.playable_count()
        );
    }

    /// Throw away the run and rebuild from the same level.
    pub fn restart(&mut self) {
        let level = self.level.clone();
        *self = Self::new(&level);
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn level(&self) -> &LevelData {
        &self.level
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn undo_count(&self) -> u32 {
        self.undo_count
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether this blob has a motion awaiting visual completion.
    pub fn is_animating(&self, blob: BlobId) -> bool {
        self.motions.is_animating(blob)
    }

    /// Outstanding motion tickets, oldest first.
    pub fn pending_motions(&self) -> Vec<MotionTicket> {
        self.motions.tickets()
    }

    /// Classify the board. The session wins when no playable blob remains;
    /// a lone playable blob is the near-win hint.
    pub fn win_status(&self) -> WinStatus {
        match self.grid.playable_count() {
            0 => WinStatus::Won,
            1 => WinStatus::NearWin,
            _ => WinStatus::Ongoing,
        }
    }

    /// Drain everything that happened since the last call, in order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Scan for the nearest blob in `direction` and try to merge into it.
    pub fn try_merge_in_direction(&mut self, source: BlobId, direction: Direction) -> MoveValidation {
        if self.phase == GamePhase::Won {
            log::warn!("merge attempted after win");
            return MoveValidation::NoTarget;
        }
        match moves::find_target_in_direction(&self.grid, source, direction) {
            Some(target) => self.try_merge(source, target),
            None => {
                self.events.push_back(EngineEvent::MergeFailed {
                    source,
                    reason: MoveValidation::NoTarget,
                });
                MoveValidation::NoTarget
            }
        }
    }

    /// Validate and dispatch a merge of `source` into `target`.
    ///
    /// Returns the validation result; `Valid` means the merge was dispatched
    /// to its behavior (the Flag gate may still refuse inside, emitting
    /// [`EngineEvent::InvalidMove`] instead of a merge).
    pub fn try_merge(&mut self, source: BlobId, target: BlobId) -> MoveValidation {
        if self.phase == GamePhase::Won {
            log::warn!("merge attempted after win");
            return MoveValidation::NoTarget;
        }

        // Selection normally filters this; refuse defensively.
        if let Some(blob) = self.grid.blob(source) {
            if !blob.can_initiate_merge() {
                log::warn!("{:?} blob cannot initiate a merge", blob.kind);
                self.events.push_back(EngineEvent::MergeFailed {
                    source,
                    reason: MoveValidation::IncompatibleType,
                });
                return MoveValidation::IncompatibleType;
            }
        }

        let validation = moves::validate_merge(&self.grid, source, target);
        if validation != MoveValidation::Valid {
            self.events.push_back(EngineEvent::MergeFailed {
                source,
                reason: validation,
            });
            return validation;
        }

        let seq = self.history.next_seq();
        let Some(mut command) = MergeCommand::new(seq, &self.grid, source, target) else {
            self.events.push_back(EngineEvent::MergeFailed {
                source,
                reason: MoveValidation::NoTarget,
            });
            return MoveValidation::NoTarget;
        };

        let mut ctx = EngineCtx {
            grid: &mut self.grid,
            events: &mut self.events,
            motions: &mut self.motions,
        };
        if command.execute(&mut ctx) == MergeOutcome::Started {
            self.history.record(command);
            self.move_count += 1;
            self.events
                .push_back(EngineEvent::MergeExecuted { source, target });
        }
        MoveValidation::Valid
    }

    /// Undo the most recent merge. Refuses after a win or while a motion is
    /// still pending (the caller serializes around animations).
    pub fn undo(&mut self) {
        if self.phase == GamePhase::Won {
            log::warn!("undo attempted after win");
            return;
        }
        if self.motions.any_pending() {
            log::warn!("undo attempted while a motion is pending");
            return;
        }
        let mut ctx = EngineCtx {
            grid: &mut self.grid,
            events: &mut self.events,
            motions: &mut self.motions,
        };
        if self.history.undo(&mut ctx) {
            self.undo_count += 1;
        }
    }

    /// Re-apply the most recently undone merge.
    pub fn redo(&mut self) {
        if self.phase == GamePhase::Won {
            log::warn!("redo attempted after win");
            return;
        }
        if self.motions.any_pending() {
            log::warn!("redo attempted while a motion is pending");
            return;
        }
        let mut ctx = EngineCtx {
            grid: &mut self.grid,
            events: &mut self.events,
            motions: &mut self.motions,
        };
        self.history.redo(&mut ctx);
    }

    /// Called by the presentation layer once a move animation finishes.
    /// Runs the continuation parked on the ticket.
    pub fn complete_motion(&mut self, ticket: MotionTicket) {
        let Some(motion) = self.motions.complete(ticket) else {
            log::warn!("unknown motion ticket {ticket:?}");
            return;
        };
        match motion.continuation {
            Continuation::WinCheck => self.check_win(),
            Continuation::SpawnTrail {
                cells,
                color,
                command,
            } => {
                for cell in cells {
                    // Skip cells that filled in the meantime.
                    if !self.grid.is_free(cell) {
                        log::info!("trail cell {cell} no longer free, skipping");
                        continue;
                    }
                    if let Some(id) = self.grid.spawn_blob(cell, BlobKind::Normal, color) {
                        self.events.push_back(EngineEvent::BlobSpawned {
                            id,
                            pos: cell,
                            kind: BlobKind::Normal,
                            color,
                        });
                        self.history.attach_spawned(command, id);
                    }
                }
                self.check_win();
            }
            Continuation::Haunt {
                cell,
                color,
                command,
            } => {
                if self.grid.is_free(cell) {
                    if let Some(id) = self.grid.spawn_blob(cell, BlobKind::Ghost, color) {
                        self.events.push_back(EngineEvent::BlobSpawned {
                            id,
                            pos: cell,
                            kind: BlobKind::Ghost,
                            color,
                        });
                        self.history.attach_spawned(command, id);
                    }
                } else {
                    log::warn!("haunted cell {cell} no longer free");
                }
                self.check_win();
            }
            Continuation::ClearFlagSource { source } => {
                if let Some(blob) = self.grid.remove_blob(source) {
                    self.events.push_back(EngineEvent::BlobRemoved {
                        id: source,
                        pos: blob.pos,
                    });
                }
                self.check_win();
            }
            Continuation::DisableLaser { color } => {
                self.events.push_back(EngineEvent::LaserDisabled { color });
                self.check_win();
            }
            Continuation::Idle => {}
        }
    }

    fn check_win(&mut self) {
        if self.phase == GamePhase::Won {
            return;
        }
        if self.win_status() != WinStatus::Won {
            return;
        }
        let stars = star_rating(self.undo_count);
        let score = self.final_score();
        self.phase = GamePhase::Won;
        log::info!(
            "level {} won: {stars} stars, score {score}",
            self.level.level_number
        );
        self.events.push_back(EngineEvent::LevelWon { stars, score });
    }

    fn final_score(&self) -> i32 {
        let penalty = self.level.move_penalty * self.move_count as i32
            + self.level.undo_penalty * self.undo_count as i32;
        (self.level.base_score - penalty).max(0)
    }
}
