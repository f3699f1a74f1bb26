//! Windows of a row: linking, the proportional resize pass and positioning.

use super::{Detached, Layout, RowKey, WindowKey};
use crate::backend::OutputId;

impl Layout {
    /// Room left for window sizes in the row once the spacing is taken out.
    pub(super) fn row_capacity(&self, row: RowKey) -> i32 {
        let Some(grid) = self.rows[row].output.and_then(|o| self.grids.get(&o)) else {
            return 0;
        };
        let count = self.windows_of(row).count() as i32;
        self.options.row_extent(grid.output_size) - self.options.window_spacing * (count + 1)
    }

    /// Fits the windows into the row and positions them.
    ///
    /// Windows get their preferred size if they all fit. Otherwise, or if empty space is to be
    /// minimized, every window is scaled by the same factor so that the row is filled exactly.
    /// Each scaled size is within a pixel of its exact share.
    pub(super) fn layout_row(&mut self, row: RowKey) {
        let _span = tracy_client::span!("Layout::layout_row");

        let keys: Vec<_> = self.windows_of(row).collect();
        let capacity = self.row_capacity(row);
        let total_preferred: i32 = keys.iter().map(|k| self.windows[*k].preferred_size).sum();

        if total_preferred > 0
            && (total_preferred > capacity || self.options.minimize_empty_space)
        {
            // Round the running end of each window rather than each size, so that the sizes
            // add up to the capacity exactly.
            let ratio = f64::from(capacity.max(0)) / f64::from(total_preferred);
            let mut preferred_end = 0;
            let mut end = 0;
            for key in &keys {
                let win = &mut self.windows[*key];
                preferred_end += win.preferred_size;
                let new_end = (f64::from(preferred_end) * ratio).round() as i32;
                win.size = new_end - end;
                end = new_end;
            }
        } else {
            for key in &keys {
                let win = &mut self.windows[*key];
                win.size = win.preferred_size;
            }
        }

        self.position_windows(row);
    }

    /// Packs the windows of the row one spacing apart and queues them.
    pub(super) fn position_windows(&mut self, row: RowKey) {
        let spacing = self.options.window_spacing;
        let mut origin = spacing;

        let mut cur = self.rows[row].first_window;
        while let Some(key) = cur {
            let win = &mut self.windows[key];
            win.origin = origin;
            origin += win.size + spacing;
            cur = win.next;

            self.queue_configure(key);
        }
    }

    /// Splices the window into the row without laying anything out.
    fn link_window(&mut self, window: Detached<WindowKey>, row: RowKey, after: Option<WindowKey>) {
        let key = window.0;
        let next = match after {
            Some(after) => self.windows[after].next,
            None => self.rows[row].first_window,
        };

        let win = &mut self.windows[key];
        win.row = Some(row);
        win.prev = after;
        win.next = next;
        win.size = win.preferred_size;

        match after {
            Some(after) => self.windows[after].next = Some(key),
            None => self.rows[row].first_window = Some(key),
        }
        match next {
            Some(next) => self.windows[next].prev = Some(key),
            None => self.rows[row].last_window = Some(key),
        }
    }

    /// Inserts the window into the row right after `after`, or first if `after` is `None`.
    pub(super) fn insert_window_after(
        &mut self,
        window: Detached<WindowKey>,
        row: RowKey,
        after: Option<WindowKey>,
    ) {
        self.link_window(window, row, after);
        self.layout_row(row);
    }

    /// Puts the window alone into a new row of the given size, inserted right after `after`.
    pub(super) fn insert_window_in_new_row(
        &mut self,
        window: Detached<WindowKey>,
        output: OutputId,
        after: Option<RowKey>,
        size: i32,
    ) -> RowKey {
        let row = self.create_row(size);
        let key = row.key();
        self.link_window(window, key, None);
        self.insert_row_after(row, output, after);
        key
    }

    /// Unlinks the window from its row.
    ///
    /// The window gets its preferred size back. If the row ends up empty, it is destroyed.
    pub(super) fn remove_window(&mut self, key: WindowKey) -> Detached<WindowKey> {
        let win = &mut self.windows[key];
        let Some(row) = win.row.take() else {
            return Detached(key);
        };
        let prev = win.prev.take();
        let next = win.next.take();
        win.size = win.preferred_size;

        match prev {
            Some(prev) => self.windows[prev].next = next,
            None => self.rows[row].first_window = next,
        }
        match next {
            Some(next) => self.windows[next].prev = prev,
            None => self.rows[row].last_window = prev,
        }

        if self.rows[row].first_window.is_none() {
            let row = self.remove_row(row);
            self.destroy_row(row);
        } else {
            self.layout_row(row);
        }

        Detached(key)
    }
}
