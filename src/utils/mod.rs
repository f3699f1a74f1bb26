use bitflags::bitflags;
use smithay::utils::{Logical, Point, Rectangle};

/// Smallest size a window or a row can be resized to along either axis.
pub const MIN_WINDOW_SIZE: i32 = 64;

bitflags! {
    /// Edges of a rectangle that are being dragged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeEdge: u32 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();

        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();

        const LEFT_RIGHT = Self::LEFT.bits() | Self::RIGHT.bits();
        const TOP_BOTTOM = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl ResizeEdge {
    /// Returns the single side of `rect` closest to `pos`.
    ///
    /// Ties prefer the vertical sides, then the leading side.
    pub fn nearest_side(rect: Rectangle<i32, Logical>, pos: Point<f64, Logical>) -> Self {
        let left = (pos.x - rect.loc.x as f64).abs();
        let right = (pos.x - (rect.loc.x + rect.size.w) as f64).abs();
        let top = (pos.y - rect.loc.y as f64).abs();
        let bottom = (pos.y - (rect.loc.y + rect.size.h) as f64).abs();

        let (horizontal, dx) = if left <= right {
            (Self::LEFT, left)
        } else {
            (Self::RIGHT, right)
        };
        let (vertical, dy) = if top <= bottom {
            (Self::TOP, top)
        } else {
            (Self::BOTTOM, bottom)
        };

        if dx <= dy {
            horizontal
        } else {
            vertical
        }
    }

    /// Returns the corner of `rect` closest to `pos`.
    pub fn nearest_corner(rect: Rectangle<i32, Logical>, pos: Point<f64, Logical>) -> Self {
        let center_x = rect.loc.x as f64 + rect.size.w as f64 / 2.;
        let center_y = rect.loc.y as f64 + rect.size.h as f64 / 2.;

        let mut edges = if pos.x < center_x {
            Self::LEFT
        } else {
            Self::RIGHT
        };
        edges |= if pos.y < center_y {
            Self::TOP
        } else {
            Self::BOTTOM
        };
        edges
    }

    /// Applies a pointer delta to `rect`, moving the dragged edges.
    ///
    /// The opposite edges stay put, and the size never drops below [`MIN_WINDOW_SIZE`].
    pub fn apply_delta(
        self,
        mut rect: Rectangle<i32, Logical>,
        dx: i32,
        dy: i32,
    ) -> Rectangle<i32, Logical> {
        if self.contains(Self::LEFT) {
            let right = rect.loc.x + rect.size.w;
            rect.size.w = (rect.size.w - dx).max(MIN_WINDOW_SIZE);
            rect.loc.x = right - rect.size.w;
        } else if self.contains(Self::RIGHT) {
            rect.size.w = (rect.size.w + dx).max(MIN_WINDOW_SIZE);
        }

        if self.contains(Self::TOP) {
            let bottom = rect.loc.y + rect.size.h;
            rect.size.h = (rect.size.h - dy).max(MIN_WINDOW_SIZE);
            rect.loc.y = bottom - rect.size.h;
        } else if self.contains(Self::BOTTOM) {
            rect.size.h = (rect.size.h + dy).max(MIN_WINDOW_SIZE);
        }

        rect
    }
}

/// Clamps `size` to [`MIN_WINDOW_SIZE`], returning whether it had to be changed.
pub fn ensure_min_size(size: &mut i32) -> bool {
    if *size < MIN_WINDOW_SIZE {
        *size = MIN_WINDOW_SIZE;
        true
    } else {
        false
    }
}
