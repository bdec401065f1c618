//! Authoritative grid state: cell ownership, occupancy queries, mutation.
//!
//! The grid is the single owner of every [`Blob`]. A cell holds at most one
//! blob, and a blob's recorded `pos` always matches the cell it is stored
//! under. All mutations are synchronous; invalid requests are warning no-ops
//! so race-y input can never corrupt or crash a session.

use std::collections::{HashMap, HashSet};

use glam::IVec2;

use super::blob::{Blob, BlobColor, BlobId, BlobKind};

#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: HashMap<IVec2, Blob>,
    /// Tile overrides: cells no blob may ever occupy.
    blocked: HashSet<IVec2>,
    next_id: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            cells: HashMap::new(),
            blocked: HashSet::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Bounds check only; blocked tiles are still valid positions.
    #[inline]
    pub fn is_valid_position(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    pub fn is_blocked(&self, pos: IVec2) -> bool {
        self.blocked.contains(&pos)
    }

    /// True if the cell can take a blob right now.
    #[inline]
    pub fn is_free(&self, pos: IVec2) -> bool {
        self.is_valid_position(pos) && !self.is_blocked(pos) && !self.is_occupied(pos)
    }

    #[inline]
    pub fn is_occupied(&self, pos: IVec2) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Mark a cell as never-occupiable. Level population only.
    pub fn block_tile(&mut self, pos: IVec2) {
        if !self.is_valid_position(pos) {
            log::warn!("block_tile: {pos} out of bounds");
            return;
        }
        if self.is_occupied(pos) {
            log::warn!("block_tile: {pos} already holds a blob");
            return;
        }
        self.blocked.insert(pos);
    }

    pub fn blob_at(&self, pos: IVec2) -> Option<&Blob> {
        self.cells.get(&pos)
    }

    pub fn blob(&self, id: BlobId) -> Option<&Blob> {
        self.cells.values().find(|b| b.id == id)
    }

    /// Allocate a fresh blob id.
    fn next_blob_id(&mut self) -> BlobId {
        let id = BlobId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place an externally built blob. Fails (with a warning, no mutation)
    /// if the position is invalid, blocked, or occupied.
    pub fn add_blob(&mut self, pos: IVec2, mut blob: Blob) -> bool {
        if !self.is_valid_position(pos) {
            log::warn!("add_blob: {pos} out of bounds");
            return false;
        }
        if self.is_blocked(pos) {
            log::warn!("add_blob: {pos} is a blocked tile");
            return false;
        }
        if self.is_occupied(pos) {
            log::warn!("add_blob: {pos} already occupied");
            return false;
        }
        blob.pos = pos;
        self.cells.insert(pos, blob);
        true
    }

    /// Allocate an id and place a new blob, returning its handle.
    pub fn spawn_blob(&mut self, pos: IVec2, kind: BlobKind, color: BlobColor) -> Option<BlobId> {
        self.spawn_blob_sized(pos, kind, color, 1)
    }

    /// Spawn with an explicit decorative size (level population).
    pub fn spawn_blob_sized(
        &mut self,
        pos: IVec2,
        kind: BlobKind,
        color: BlobColor,
        size: u32,
    ) -> Option<BlobId> {
        let id = self.next_blob_id();
        let mut blob = Blob::new(id, kind, color, pos);
        blob.size = size;
        if self.add_blob(pos, blob) {
            Some(id)
        } else {
            None
        }
    }

    /// Remove a blob from the grid. Returns the removed blob, or `None` with
    /// a warning for a stale handle.
    pub fn remove_blob(&mut self, id: BlobId) -> Option<Blob> {
        let pos = self.position_of(id)?;
        self.cells.remove(&pos)
    }

    fn position_of(&self, id: BlobId) -> Option<IVec2> {
        let found = self.cells.values().find(|b| b.id == id).map(|b| b.pos);
        if found.is_none() {
            log::warn!("blob {id:?} not on grid");
        }
        found
    }

    /// Atomic relocation. Warning no-op if `from` is unoccupied or `to` is
    /// invalid, blocked, or occupied.
    pub fn move_blob(&mut self, from: IVec2, to: IVec2) -> bool {
        if !self.is_occupied(from) {
            log::warn!("move_blob: {from} unoccupied");
            return false;
        }
        if !self.is_free(to) {
            log::warn!("move_blob: {to} not free");
            return false;
        }
        let Some(mut blob) = self.cells.remove(&from) else {
            return false;
        };
        debug_assert_eq!(blob.pos, from, "blob position desynced from cell map");
        blob.pos = to;
        self.cells.insert(to, blob);
        true
    }

    /// Snapshot of all blobs, sorted by id for deterministic iteration.
    pub fn all_blobs(&self) -> Vec<Blob> {
        let mut blobs: Vec<Blob> = self.cells.values().copied().collect();
        blobs.sort_by_key(|b| b.id);
        blobs
    }

    #[inline]
    pub fn blob_count(&self) -> usize {
        self.cells.len()
    }

    /// Count of blobs that matter for the win condition (everything but Rock).
    pub fn playable_count(&self) -> usize {
        self.cells.values().filter(|b| b.kind.is_playable()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(5, 4);
        assert!(grid.is_valid_position(pos(0, 0)));
        assert!(grid.is_valid_position(pos(4, 3)));
        assert!(!grid.is_valid_position(pos(5, 0)));
        assert!(!grid.is_valid_position(pos(0, 4)));
        assert!(!grid.is_valid_position(pos(-1, 0)));
    }

    #[test]
    fn test_spawn_and_query() {
        let mut grid = Grid::new(5, 5);
        let id = grid
            .spawn_blob(pos(2, 3), BlobKind::Normal, BlobColor::Pink)
            .unwrap();
        assert!(grid.is_occupied(pos(2, 3)));
        let blob = grid.blob(id).unwrap();
        assert_eq!(blob.pos, pos(2, 3));
        assert_eq!(blob.color, BlobColor::Pink);
    }

    #[test]
    fn test_spawn_rejects_occupied_and_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.spawn_blob(pos(1, 1), BlobKind::Normal, BlobColor::Pink).is_some());
        assert!(grid.spawn_blob(pos(1, 1), BlobKind::Normal, BlobColor::Blue).is_none());
        assert!(grid.spawn_blob(pos(3, 0), BlobKind::Normal, BlobColor::Blue).is_none());
        assert_eq!(grid.blob_count(), 1);
    }

    #[test]
    fn test_blocked_tiles_refuse_blobs() {
        let mut grid = Grid::new(3, 3);
        grid.block_tile(pos(1, 1));
        assert!(grid.spawn_blob(pos(1, 1), BlobKind::Normal, BlobColor::Pink).is_none());
        let id = grid
            .spawn_blob(pos(0, 1), BlobKind::Normal, BlobColor::Pink)
            .unwrap();
        assert!(!grid.move_blob(pos(0, 1), pos(1, 1)));
        assert_eq!(grid.blob(id).unwrap().pos, pos(0, 1));
    }

    #[test]
    fn test_move_updates_position() {
        let mut grid = Grid::new(5, 5);
        let id = grid
            .spawn_blob(pos(0, 0), BlobKind::Trail, BlobColor::Yellow)
            .unwrap();
        assert!(grid.move_blob(pos(0, 0), pos(4, 0)));
        assert!(!grid.is_occupied(pos(0, 0)));
        assert_eq!(grid.blob(id).unwrap().pos, pos(4, 0));
    }

    #[test]
    fn test_move_refuses_bad_endpoints() {
        let mut grid = Grid::new(5, 5);
        grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink);
        grid.spawn_blob(pos(1, 0), BlobKind::Normal, BlobColor::Blue);
        assert!(!grid.move_blob(pos(0, 0), pos(1, 0))); // destination occupied
        assert!(!grid.move_blob(pos(2, 2), pos(3, 3))); // source empty
        assert_eq!(grid.blob_count(), 2);
    }

    #[test]
    fn test_remove_by_stale_handle() {
        let mut grid = Grid::new(5, 5);
        let id = grid
            .spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink)
            .unwrap();
        assert!(grid.remove_blob(id).is_some());
        assert!(grid.remove_blob(id).is_none());
    }

    #[test]
    fn test_playable_count_excludes_rocks() {
        let mut grid = Grid::new(5, 5);
        grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink);
        grid.spawn_blob(pos(1, 0), BlobKind::Flag, BlobColor::Pink);
        grid.spawn_blob(pos(2, 0), BlobKind::Rock, BlobColor::Gray);
        assert_eq!(grid.blob_count(), 3);
        assert_eq!(grid.playable_count(), 2);
    }

    #[test]
    fn test_all_blobs_sorted_by_id() {
        let mut grid = Grid::new(5, 5);
        let a = grid.spawn_blob(pos(3, 3), BlobKind::Normal, BlobColor::Pink).unwrap();
        let b = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Blue).unwrap();
        let ids: Vec<BlobId> = grid.all_blobs().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
