//! Authored level data.
//!
//! Levels are immutable input, consumed once when a session loads: grid
//! dimensions, blob spawn records, optional tile overrides, and scoring
//! parameters. The on-disk home of this data is owned by the embedding
//! shell; the engine only defines the shape and validates it.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::blob::{BlobColor, BlobKind};

/// Tile overrides. Only `Blocked` affects the engine (no blob may occupy
/// it); the rest are presentation hints carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Normal,
    Blocked,
    Goal,
    Ice,
    Sticky,
}

/// A blob to place at level load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSpawn {
    pub position: IVec2,
    #[serde(default)]
    pub kind: BlobKind,
    #[serde(default)]
    pub color: BlobColor,
    /// Decorative size, carried onto the blob.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    1
}

/// A tile override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    pub position: IVec2,
    #[serde(default)]
    pub tile: TileKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("grid dimensions {width}x{height} must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("spawn position {0} is out of bounds")]
    OutOfBounds(IVec2),
    #[error("two spawns share position {0}")]
    DuplicateSpawn(IVec2),
    #[error("spawn position {0} is a blocked tile")]
    BlockedSpawn(IVec2),
    #[error("malformed level json: {0}")]
    Parse(String),
}

/// One level: dimensions, spawns, overrides, scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default = "default_level_number")]
    pub level_number: u32,
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_base_score")]
    pub base_score: i32,
    #[serde(default = "default_move_penalty")]
    pub move_penalty: i32,
    #[serde(default = "default_undo_penalty")]
    pub undo_penalty: i32,
    /// Score thresholds for 1, 2, 3 stars; menu display input only.
    #[serde(default = "default_star_thresholds")]
    pub star_thresholds: [i32; 3],
    #[serde(default)]
    pub blobs: Vec<BlobSpawn>,
    #[serde(default)]
    pub tiles: Vec<TileSpawn>,
}

fn default_level_number() -> u32 {
    1
}

fn default_base_score() -> i32 {
    1000
}

fn default_move_penalty() -> i32 {
    50
}

fn default_undo_penalty() -> i32 {
    100
}

fn default_star_thresholds() -> [i32; 3] {
    [300, 600, 900]
}

impl LevelData {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            level_number: default_level_number(),
            name: name.into(),
            width,
            height,
            base_score: default_base_score(),
            move_penalty: default_move_penalty(),
            undo_penalty: default_undo_penalty(),
            star_thresholds: default_star_thresholds(),
            blobs: Vec::new(),
            tiles: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Structural checks: positive dimensions, every spawn in bounds, no two
    /// spawns sharing a cell, no spawn on a blocked tile.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let in_bounds = |pos: IVec2| {
            pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
        };

        for tile in &self.tiles {
            if !in_bounds(tile.position) {
                return Err(LevelError::OutOfBounds(tile.position));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for spawn in &self.blobs {
            if !in_bounds(spawn.position) {
                return Err(LevelError::OutOfBounds(spawn.position));
            }
            if !seen.insert(spawn.position) {
                return Err(LevelError::DuplicateSpawn(spawn.position));
            }
            let blocked = self
                .tiles
                .iter()
                .any(|t| t.position == spawn.position && t.tile == TileKind::Blocked);
            if blocked {
                return Err(LevelError::BlockedSpawn(spawn.position));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    fn spawn(x: i32, y: i32, kind: BlobKind, color: BlobColor) -> BlobSpawn {
        BlobSpawn {
            position: pos(x, y),
            kind,
            color,
            size: 1,
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut level = LevelData::new("tutorial", 5, 5);
        level.blobs.push(spawn(0, 1, BlobKind::Normal, BlobColor::Pink));
        level.blobs.push(spawn(4, 3, BlobKind::Flag, BlobColor::Pink));
        level.tiles.push(TileSpawn {
            position: pos(2, 2),
            tile: TileKind::Blocked,
        });

        let json = level.to_json().unwrap();
        let back = LevelData::from_json(&json).unwrap();
        assert_eq!(back.width, 5);
        assert_eq!(back.blobs, level.blobs);
        assert_eq!(back.tiles, level.tiles);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let level = LevelData::from_json(r#"{"width": 4, "height": 3}"#).unwrap();
        assert_eq!(level.base_score, 1000);
        assert_eq!(level.move_penalty, 50);
        assert_eq!(level.undo_penalty, 100);
        assert_eq!(level.star_thresholds, [300, 600, 900]);
        assert!(level.blobs.is_empty());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(
            LevelData::from_json(r#"{"width": 0, "height": 3}"#),
            Err(LevelError::InvalidDimensions { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_spawn() {
        let mut level = LevelData::new("bad", 3, 3);
        level.blobs.push(spawn(3, 0, BlobKind::Normal, BlobColor::Pink));
        assert_eq!(level.validate(), Err(LevelError::OutOfBounds(pos(3, 0))));
    }

    #[test]
    fn test_rejects_duplicate_spawn() {
        let mut level = LevelData::new("bad", 3, 3);
        level.blobs.push(spawn(1, 1, BlobKind::Normal, BlobColor::Pink));
        level.blobs.push(spawn(1, 1, BlobKind::Normal, BlobColor::Blue));
        assert_eq!(level.validate(), Err(LevelError::DuplicateSpawn(pos(1, 1))));
    }

    #[test]
    fn test_rejects_spawn_on_blocked_tile() {
        let mut level = LevelData::new("bad", 3, 3);
        level.tiles.push(TileSpawn {
            position: pos(1, 1),
            tile: TileKind::Blocked,
        });
        level.blobs.push(spawn(1, 1, BlobKind::Normal, BlobColor::Pink));
        assert_eq!(level.validate(), Err(LevelError::BlockedSpawn(pos(1, 1))));
    }
}
