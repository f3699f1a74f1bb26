//! Shared types used across layout modules.

use super::{RowKey, WindowKey};
use crate::backend::OutputId;

/// Direction of a focus or move command, in screen terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A [`Direction`] translated into grid terms.
///
/// Which screen directions go along a row and which go across rows depends on the grid
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Step {
    /// Towards the start of the current row.
    WindowBack,
    /// Towards the end of the current row.
    WindowForward,
    /// Towards the first row.
    RowBack,
    /// Towards the last row.
    RowForward,
}

impl Direction {
    pub(super) fn to_step(self, horizontal: bool) -> Step {
        match (self, horizontal) {
            (Direction::Up, false) | (Direction::Left, true) => Step::RowBack,
            (Direction::Down, false) | (Direction::Right, true) => Step::RowForward,
            (Direction::Left, false) | (Direction::Up, true) => Step::WindowBack,
            (Direction::Right, false) | (Direction::Down, true) => Step::WindowForward,
        }
    }
}

/// A seam in the grid where a window can be dropped or which can be dragged to resize.
///
/// `before` is the row or window right before the seam; `None` means the seam is at the very
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Between two rows, or before the first or after the last row of a grid.
    Row {
        output: OutputId,
        before: Option<RowKey>,
    },
    /// Between two windows of a row, or before the first or after the last one.
    Window {
        row: RowKey,
        before: Option<WindowKey>,
    },
}

/// A row or a window that is alive in its arena but not linked into any list.
///
/// Every unlinking operation hands one of these out, and every linking operation consumes one, so
/// an entity can't end up linked twice.
#[must_use = "a detached entity must be reinserted or destroyed"]
#[derive(Debug, PartialEq, Eq)]
pub struct Detached<K>(pub(super) K);

impl<K: Copy> Detached<K> {
    pub fn key(&self) -> K {
        self.0
    }
}
