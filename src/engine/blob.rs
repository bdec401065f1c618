//! Blob entities: kind, color, and the merge-compatibility predicate.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Stable handle to a blob on the grid, allocated by [`Grid`](super::grid::Grid).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlobId(pub u32);

/// Blob kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlobKind {
    /// Standard blob - merges with different colors
    #[default]
    Normal,
    /// Leaves a trail of blobs along its path after merging
    Trail,
    /// Haunts the source's vacated cell when merged into (cannot initiate)
    Ghost,
    /// Goal point - a same-colored blob clears both (cannot initiate)
    Flag,
    /// Obstacle - cannot be merged with or moved (cannot initiate)
    Rock,
    /// Disables the matching laser when merged into (cannot initiate)
    Switch,
}

impl BlobKind {
    pub const ALL: [Self; 6] = [
        Self::Normal,
        Self::Trail,
        Self::Ghost,
        Self::Flag,
        Self::Rock,
        Self::Switch,
    ];

    /// Rocks are obstacles; everything else counts toward the win condition.
    #[inline]
    pub fn is_playable(self) -> bool {
        self != Self::Rock
    }
}

/// Blob colors. White is conventionally used for Ghost blobs, Gray for Rocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlobColor {
    #[default]
    Pink,
    Blue,
    Red,
    Cyan,
    Green,
    Yellow,
    White,
    Gray,
}

impl BlobColor {
    pub const ALL: [Self; 8] = [
        Self::Pink,
        Self::Blue,
        Self::Red,
        Self::Cyan,
        Self::Green,
        Self::Yellow,
        Self::White,
        Self::Gray,
    ];
}

/// A blob entity: immutable kind/color pair plus its current grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub id: BlobId,
    pub kind: BlobKind,
    pub color: BlobColor,
    /// Current grid cell; kept in lockstep with the grid's cell map.
    pub pos: IVec2,
    /// Carried from level data; decorative, drives no logic.
    pub size: u32,
}

impl Blob {
    pub fn new(id: BlobId, kind: BlobKind, color: BlobColor, pos: IVec2) -> Self {
        Self {
            id,
            kind,
            color,
            pos,
            size: 1,
        }
    }

    /// Only Normal and Trail blobs may be the moving side of a merge.
    #[inline]
    pub fn can_initiate_merge(&self) -> bool {
        matches!(self.kind, BlobKind::Normal | BlobKind::Trail)
    }

    /// Compatibility rule for merging `self` into `other`.
    ///
    /// Rocks are never mergeable. Flags accept only their own color. All
    /// other kinds require the colors to differ.
    pub fn can_merge_with(&self, other: &Blob) -> bool {
        if other.id == self.id {
            return false;
        }
        if other.kind == BlobKind::Rock {
            return false;
        }
        if other.kind == BlobKind::Flag {
            return other.color == self.color;
        }
        other.color != self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blob(id: u32, kind: BlobKind, color: BlobColor) -> Blob {
        Blob::new(BlobId(id), kind, color, IVec2::ZERO)
    }

    #[test]
    fn test_cannot_merge_with_self() {
        let a = blob(1, BlobKind::Normal, BlobColor::Pink);
        assert!(!a.can_merge_with(&a));
    }

    #[test]
    fn test_only_normal_and_trail_initiate() {
        for kind in BlobKind::ALL {
            let b = blob(1, kind, BlobColor::Blue);
            let expected = matches!(kind, BlobKind::Normal | BlobKind::Trail);
            assert_eq!(b.can_initiate_merge(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_flag_requires_same_color() {
        let source = blob(1, BlobKind::Normal, BlobColor::Pink);
        let flag_same = blob(2, BlobKind::Flag, BlobColor::Pink);
        let flag_other = blob(3, BlobKind::Flag, BlobColor::Blue);
        assert!(source.can_merge_with(&flag_same));
        assert!(!source.can_merge_with(&flag_other));
    }

    fn any_kind() -> impl Strategy<Value = BlobKind> {
        prop::sample::select(BlobKind::ALL.to_vec())
    }

    fn any_color() -> impl Strategy<Value = BlobColor> {
        prop::sample::select(BlobColor::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn rock_targets_never_merge(sk in any_kind(), sc in any_color(), tc in any_color()) {
            let source = blob(1, sk, sc);
            let rock = blob(2, BlobKind::Rock, tc);
            prop_assert!(!source.can_merge_with(&rock));
        }

        #[test]
        fn flag_targets_merge_iff_colors_match(sc in any_color(), tc in any_color()) {
            let source = blob(1, BlobKind::Normal, sc);
            let flag = blob(2, BlobKind::Flag, tc);
            prop_assert_eq!(source.can_merge_with(&flag), sc == tc);
        }

        #[test]
        fn ordinary_targets_merge_iff_colors_differ(
            sk in any_kind(),
            tk in any_kind(),
            sc in any_color(),
            tc in any_color(),
        ) {
            prop_assume!(tk != BlobKind::Rock && tk != BlobKind::Flag);
            let source = blob(1, sk, sc);
            let target = blob(2, tk, tc);
            prop_assert_eq!(source.can_merge_with(&target), sc != tc);
        }
    }
}
