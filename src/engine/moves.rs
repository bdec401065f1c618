//! Move finding and validation.
//!
//! Pure queries over the grid: ray scans along a row or column, and the
//! validation that gates every merge. Rejections are first-class values for
//! user feedback, never errors.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::blob::BlobId;
use super::grid::Grid;

/// The four merge directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step for this direction. `Up` is +y.
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Self::Up => IVec2::new(0, 1),
            Self::Down => IVec2::new(0, -1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
        }
    }
}

/// Outcome of validating a merge attempt, with the reason for failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveValidation {
    Valid,
    /// Nothing along the ray, or a stale blob handle.
    NoTarget,
    /// Equal colors on a non-Flag target.
    SameColor,
    /// Target kind refuses the merge (Rock, or a Flag of another color).
    IncompatibleType,
    /// Source and target share neither row nor column.
    NotAligned,
    /// Another blob sits strictly between source and target.
    PathBlocked,
}

/// Scan from the cell adjacent to `source` in `direction`, returning the
/// first occupied cell's blob, or `None` once the boundary is reached.
/// Blocked-but-empty tiles do not stop the ray.
pub fn find_target_in_direction(
    grid: &Grid,
    source: BlobId,
    direction: Direction,
) -> Option<BlobId> {
    let origin = grid.blob(source)?.pos;
    let step = direction.offset();
    let mut check = origin + step;
    while grid.is_valid_position(check) {
        if let Some(blob) = grid.blob_at(check) {
            return Some(blob.id);
        }
        check += step;
    }
    None
}

/// Validate a merge of `source` into an explicit `target`.
///
/// Alignment requires exact row or column equality; diagonals are never
/// permitted regardless of distance. The nearest blob along the line is the
/// only reachable target, so anything occupying the span between the two is
/// reported as [`MoveValidation::PathBlocked`].
pub fn validate_merge(grid: &Grid, source: BlobId, target: BlobId) -> MoveValidation {
    let (Some(source_blob), Some(target_blob)) = (grid.blob(source), grid.blob(target)) else {
        return MoveValidation::NoTarget;
    };
    if source == target {
        return MoveValidation::NoTarget;
    }

    let from = source_blob.pos;
    let to = target_blob.pos;
    if from.x != to.x && from.y != to.y {
        return MoveValidation::NotAligned;
    }

    let step = (to - from).signum();
    let mut check = from + step;
    while check != to {
        if grid.is_occupied(check) {
            return MoveValidation::PathBlocked;
        }
        check += step;
    }

    if !source_blob.can_merge_with(target_blob) {
        if target_blob.color == source_blob.color {
            return MoveValidation::SameColor;
        }
        return MoveValidation::IncompatibleType;
    }

    MoveValidation::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::blob::{BlobColor, BlobKind};

    fn pos(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    #[test]
    fn test_find_target_nearest_wins() {
        let mut grid = Grid::new(6, 1);
        let source = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        let near = grid.spawn_blob(pos(3, 0), BlobKind::Normal, BlobColor::Blue).unwrap();
        grid.spawn_blob(pos(5, 0), BlobKind::Normal, BlobColor::Red);
        assert_eq!(
            find_target_in_direction(&grid, source, Direction::Right),
            Some(near)
        );
    }

    #[test]
    fn test_find_target_at_boundary_returns_none() {
        let mut grid = Grid::new(4, 4);
        let source = grid.spawn_blob(pos(0, 3), BlobKind::Normal, BlobColor::Pink).unwrap();
        assert_eq!(find_target_in_direction(&grid, source, Direction::Up), None);
        assert_eq!(find_target_in_direction(&grid, source, Direction::Left), None);
    }

    #[test]
    fn test_validate_not_aligned() {
        let mut grid = Grid::new(5, 5);
        let a = grid.spawn_blob(pos(0, 1), BlobKind::Normal, BlobColor::Pink).unwrap();
        let b = grid.spawn_blob(pos(4, 3), BlobKind::Normal, BlobColor::Blue).unwrap();
        assert_eq!(validate_merge(&grid, a, b), MoveValidation::NotAligned);
    }

    #[test]
    fn test_validate_path_blocked() {
        let mut grid = Grid::new(5, 1);
        let a = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        grid.spawn_blob(pos(2, 0), BlobKind::Rock, BlobColor::Gray);
        let b = grid.spawn_blob(pos(4, 0), BlobKind::Normal, BlobColor::Blue).unwrap();
        assert_eq!(validate_merge(&grid, a, b), MoveValidation::PathBlocked);
    }

    #[test]
    fn test_validate_same_color_vs_incompatible() {
        let mut grid = Grid::new(5, 1);
        let a = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        let same = grid.spawn_blob(pos(2, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        assert_eq!(validate_merge(&grid, a, same), MoveValidation::SameColor);

        let mut grid = Grid::new(5, 1);
        let a = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        let rock = grid.spawn_blob(pos(2, 0), BlobKind::Rock, BlobColor::Gray).unwrap();
        assert_eq!(validate_merge(&grid, a, rock), MoveValidation::IncompatibleType);
    }

    #[test]
    fn test_validate_stale_handles() {
        let mut grid = Grid::new(5, 1);
        let a = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        let b = grid.spawn_blob(pos(2, 0), BlobKind::Normal, BlobColor::Blue).unwrap();
        grid.remove_blob(b);
        assert_eq!(validate_merge(&grid, a, b), MoveValidation::NoTarget);
        assert_eq!(validate_merge(&grid, a, a), MoveValidation::NoTarget);
    }

    #[test]
    fn test_validate_adjacent_pair_is_valid() {
        let mut grid = Grid::new(5, 1);
        let a = grid.spawn_blob(pos(0, 0), BlobKind::Normal, BlobColor::Pink).unwrap();
        let b = grid.spawn_blob(pos(1, 0), BlobKind::Normal, BlobColor::Blue).unwrap();
        assert_eq!(validate_merge(&grid, a, b), MoveValidation::Valid);
    }
}
