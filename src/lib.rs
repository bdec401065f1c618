//! Blob Merge - the logic core of a tile-merging puzzle game
//!
//! Core modules:
//! - `engine`: Deterministic game logic (grid, merge behaviors, undo/redo, win check)
//! - `level`: Authored level data, consumed once at load
//! - `progress`: Per-level best results and the unlock chain
//! - `events`: The seam to presentation, feedback, and progression shells
//!
//! Players merge a source blob into the nearest blob along its row or
//! column. Six blob kinds give merges their side effects: trails repopulate
//! the path, ghosts haunt the vacated cell, flags end the level, switches
//! drop lasers, rocks just sit there. Every merge is a reversible command on
//! a bounded history.

pub mod engine;
pub mod events;
pub mod level;
pub mod progress;

pub use engine::{
    Blob, BlobColor, BlobId, BlobKind, CommandHistory, Direction, GamePhase, GameSession, Grid,
    MergeBehavior, MoveValidation, WinStatus,
};
pub use events::{EngineEvent, MotionTicket};
pub use level::{BlobSpawn, LevelData, LevelError, TileKind, TileSpawn};
pub use progress::{LevelRecord, Progress};

/// Engine-wide constants
pub mod consts {
    /// Undo history bound; the oldest command is evicted past this.
    pub const HISTORY_CAPACITY: usize = 50;
    /// Star rating ceiling per level.
    pub const MAX_STARS: u32 = 3;
}
