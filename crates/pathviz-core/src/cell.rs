//! The [`CellKind`] type: what occupies a single grid cell.

use serde::{Deserialize, Serialize};

/// The role a grid cell plays in a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Blocked,
    Start,
    Goal,
}

impl CellKind {
    /// Single-character code used by the persisted grid format.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Self::Start => 's',
            Self::Goal => 'g',
            Self::Blocked => 'x',
            Self::Empty => 'o',
        }
    }

    /// Parse a persisted cell code. Returns `None` for unknown codes.
    #[inline]
    pub const fn from_code(ch: char) -> Option<Self> {
        match ch {
            's' => Some(Self::Start),
            'g' => Some(Self::Goal),
            'x' => Some(Self::Blocked),
            'o' => Some(Self::Empty),
            _ => None,
        }
    }

    /// Whether a search may step onto a cell of this kind.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}
