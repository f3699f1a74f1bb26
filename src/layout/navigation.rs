//! Neighbour lookup and directional moves.

use super::types::Step;
use super::{Direction, Layout, WindowKey};
use crate::backend::ViewId;

impl Layout {
    /// First window of the previous row.
    fn parallel_prev(&self, key: WindowKey) -> Option<WindowKey> {
        let row = self.rows[self.windows[key].row?].prev?;
        self.rows[row].first_window
    }

    /// First window of the next row.
    fn parallel_next(&self, key: WindowKey) -> Option<WindowKey> {
        let row = self.rows[self.windows[key].row?].next?;
        self.rows[row].first_window
    }

    fn step(&self, key: WindowKey, step: Step) -> Option<WindowKey> {
        let win = &self.windows[key];
        match step {
            Step::WindowBack => win.prev,
            Step::WindowForward => win.next,
            Step::RowBack => self.parallel_prev(key),
            Step::RowForward => self.parallel_next(key),
        }
    }

    /// The view next to `view` in the given direction.
    ///
    /// Across rows this is always the first window of the neighbouring row.
    pub fn neighbor(&self, view: ViewId, direction: Direction) -> Option<ViewId> {
        let key = self.window_for_view(view)?;
        let neighbor = self.step(key, direction.to_step(self.options.horizontal))?;
        Some(self.windows[neighbor].view)
    }

    /// The view to focus once `view` goes away.
    ///
    /// Prefers the row-mates, then the neighbouring rows.
    pub fn focus_successor(&self, view: ViewId) -> Option<ViewId> {
        let key = self.window_for_view(view)?;
        let win = &self.windows[key];
        let successor = win
            .next
            .or(win.prev)
            .or_else(|| self.parallel_next(key))
            .or_else(|| self.parallel_prev(key))?;
        Some(self.windows[successor].view)
    }

    /// Moves the view one step in the given direction.
    ///
    /// Along a row the window swaps places with its neighbour. Across rows a window that shares
    /// its row is split off into a new row of the same size next to the old one, while a window
    /// alone in its row joins the start of the neighbouring row.
    ///
    /// Returns whether anything moved.
    pub fn move_window(&mut self, view: ViewId, direction: Direction) -> bool {
        let _span = tracy_client::span!("Layout::move_window");

        let Some(key) = self.window_for_view(view) else {
            return false;
        };
        let win = &self.windows[key];
        let Some(row) = win.row else {
            return false;
        };

        let step = direction.to_step(self.options.horizontal);
        match step {
            Step::WindowBack => {
                let Some(prev) = win.prev else {
                    return false;
                };
                let anchor = self.windows[prev].prev;
                let window = self.remove_window(key);
                self.insert_window_after(window, row, anchor);
            }
            Step::WindowForward => {
                let Some(next) = win.next else {
                    return false;
                };
                let window = self.remove_window(key);
                self.insert_window_after(window, row, Some(next));
            }
            Step::RowBack | Step::RowForward => {
                let forward = step == Step::RowForward;
                let alone = win.prev.is_none() && win.next.is_none();
                let current = &self.rows[row];
                let Some(output) = current.output else {
                    return false;
                };

                if alone {
                    let target = if forward { current.next } else { current.prev };
                    let Some(target) = target else {
                        return false;
                    };
                    let window = self.remove_window(key);
                    self.insert_window_after(window, target, None);
                } else {
                    let size = current.size;
                    let after = if forward { Some(row) } else { current.prev };
                    let window = self.remove_window(key);
                    self.insert_window_in_new_row(window, output, after, size);
                }
            }
        }

        trace!("moved {view} {direction:?}");
        true
    }
}
