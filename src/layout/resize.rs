//! Interactive resizing of rows and windows.

use super::{Edge, Layout, RowKey, WindowKey};
use crate::utils::{ensure_min_size, MIN_WINDOW_SIZE};

/// What dragging a seam resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Row(RowKey),
    Window(WindowKey),
}

impl Layout {
    /// What dragging the seam resizes: the row or window right before it.
    ///
    /// Seams at the very start have nothing before them and can't be dragged.
    pub fn resize_target(&self, edge: Edge) -> Option<ResizeTarget> {
        if !self.is_edge_valid(edge) {
            return None;
        }
        match edge {
            Edge::Row { before, .. } => before.map(ResizeTarget::Row),
            Edge::Window { before, .. } => before.map(ResizeTarget::Window),
        }
    }

    /// Grows or shrinks the row along the stacking axis, pushing the rows after it.
    pub fn resize_row(&mut self, key: RowKey, delta: i32) {
        let _span = tracy_client::span!("Layout::resize_row");

        let Some(row) = self.rows.get_mut(key) else {
            return;
        };
        let Some(output) = row.output else {
            return;
        };

        let mut size = row.size + delta;
        ensure_min_size(&mut size);
        row.size = size;
        row.preferred_size = size;

        self.layout_grid_from(key);
        self.clamp_scroll(output);
    }

    /// Grows or shrinks the window along its row.
    ///
    /// Space freed by shrinking goes to the next window, up to its preferred size. Growing uses
    /// the free space in the row first, then takes from the next window down to the minimum
    /// size. No other window is affected, and the row never grows past its capacity.
    ///
    /// The resulting sizes become the preferred sizes of the whole row.
    pub fn resize_window(&mut self, key: WindowKey, delta: i32) {
        let _span = tracy_client::span!("Layout::resize_window");

        let Some(win) = self.windows.get(key) else {
            return;
        };
        let Some(row) = win.row else {
            return;
        };
        let next = win.next;

        let mut size = win.size + delta;
        ensure_min_size(&mut size);
        let mut delta = size - win.size;

        if delta < 0 {
            if let Some(next) = next {
                let next = &mut self.windows[next];
                let grow = if self.options.minimize_empty_space {
                    -delta
                } else {
                    (next.preferred_size - next.size).clamp(0, -delta)
                };
                next.size += grow;
            }
        } else if delta > 0 {
            let occupied: i32 = self.windows_of(row).map(|k| self.windows[k].size).sum();
            let free = (self.row_capacity(row) - occupied).max(0);
            if delta > free {
                let taken = match next {
                    Some(next) => {
                        let next = &mut self.windows[next];
                        let taken = (next.size - MIN_WINDOW_SIZE).clamp(0, delta - free);
                        next.size -= taken;
                        taken
                    }
                    None => 0,
                };
                delta = free + taken;
            }
        }

        self.windows[key].size += delta;

        let mut cur = self.rows[row].first_window;
        while let Some(k) = cur {
            let win = &mut self.windows[k];
            win.preferred_size = win.size;
            cur = win.next;
        }

        self.layout_row(row);
    }
}
