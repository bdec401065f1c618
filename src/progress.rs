//! Per-level progression records.
//!
//! Tracks the best stars/score per level with best-only overwrite and the
//! unlock chain. The record set is plain serializable data; where it lives
//! on disk is the embedding shell's concern.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_STARS;

/// Best result achieved on one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelRecord {
    pub stars: u32,
    pub score: i32,
}

/// Progression across the level list, indexed by level number (0-based).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    records: Vec<LevelRecord>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stars(&self, level: usize) -> u32 {
        self.records.get(level).map_or(0, |r| r.stars)
    }

    pub fn best_score(&self, level: usize) -> i32 {
        self.records.get(level).map_or(0, |r| r.score)
    }

    /// Record a finished run. Only improvements stick; returns whether
    /// anything was updated.
    pub fn record(&mut self, level: usize, stars: u32, score: i32) -> bool {
        let stars = stars.min(MAX_STARS);
        if level >= self.records.len() {
            self.records.resize(level + 1, LevelRecord::default());
        }
        let entry = &mut self.records[level];
        let mut improved = false;
        if stars > entry.stars {
            entry.stars = stars;
            improved = true;
        }
        if score > entry.score {
            entry.score = score;
            improved = true;
        }
        improved
    }

    /// Level 0 is always unlocked; each later level needs at least one star
    /// on the level before it.
    pub fn is_unlocked(&self, level: usize) -> bool {
        level == 0 || self.stars(level - 1) > 0
    }

    pub fn is_completed(&self, level: usize) -> bool {
        self.stars(level) > 0
    }

    /// Highest level the player may enter.
    pub fn highest_unlocked(&self) -> usize {
        let mut level = 0;
        while self.is_unlocked(level + 1) {
            level += 1;
        }
        level
    }

    pub fn total_stars(&self) -> u32 {
        self.records.iter().map(|r| r.stars).sum()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}
