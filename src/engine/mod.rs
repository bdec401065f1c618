//! Deterministic merge engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Synchronous, atomic grid mutation
//! - Stable iteration order (by blob id)
//! - Visual timing is external: "after the move" work is parked on motion
//!   tickets until `GameSession::complete_motion` is called
//! - No rendering or platform dependencies

pub mod blob;
pub mod command;
pub mod grid;
pub mod merge;
mod motion;
pub mod moves;
pub mod session;

pub use blob::{Blob, BlobColor, BlobId, BlobKind};
pub use command::{CommandHistory, MergeCommand};
pub use grid::Grid;
pub use merge::{MergeBehavior, MergeOutcome};
pub use moves::{find_target_in_direction, validate_merge, Direction, MoveValidation};
pub use session::{star_rating, GamePhase, GameSession, WinStatus};
