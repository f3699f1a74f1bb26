//! Rows of a grid: linking, stacking and scrolling.

use super::{Detached, Grid, Layout, Row, RowKey};
use crate::backend::{OutputId, ViewId};

impl Layout {
    /// Length of the viewport along the stacking axis, not counting the leading spacing.
    pub(super) fn page_length(&self, grid: &Grid) -> i32 {
        self.options.stack_extent(grid.output_size) - self.options.window_spacing
    }

    /// Distance from the leading edge of the first row to the trailing edge of the last one.
    fn content_length(&self, grid: &Grid) -> i32 {
        match (grid.first_row, grid.last_row) {
            (Some(first), Some(last)) => {
                let (first, last) = (&self.rows[first], &self.rows[last]);
                last.origin + last.size - first.origin
            }
            _ => 0,
        }
    }

    pub(super) fn max_scroll(&self, grid: &Grid) -> i32 {
        (self.content_length(grid) - self.page_length(grid)).max(0)
    }

    /// Stacks rows from `from` to the end of its grid and queues their windows.
    pub(super) fn layout_grid_from(&mut self, from: RowKey) {
        let spacing = self.options.window_spacing;
        let mut origin = match self.rows[from].prev {
            Some(prev) => {
                let prev = &self.rows[prev];
                prev.origin + prev.size + spacing
            }
            None => spacing,
        };

        let mut cur = Some(from);
        while let Some(key) = cur {
            let row = &mut self.rows[key];
            row.origin = origin;
            origin += row.size + spacing;
            cur = row.next;

            self.queue_configure_row(key);
        }
    }

    /// Lays out every row of the grid from scratch.
    pub(super) fn relayout_grid(&mut self, output: OutputId) {
        let rows: Vec<_> = self.rows_of(output).collect();
        for row in &rows {
            self.layout_row(*row);
        }
        if let Some(first) = rows.first() {
            self.layout_grid_from(*first);
        }
        self.clamp_scroll(output);
    }

    fn set_scroll(&mut self, output: OutputId, scroll: f64) {
        let Some(grid) = self.grids.get_mut(&output) else {
            return;
        };
        if grid.scroll == scroll {
            return;
        }
        grid.scroll = scroll;

        let rows: Vec<_> = self.rows_of(output).collect();
        for row in rows {
            self.queue_configure_row(row);
        }
    }

    /// Brings the scroll offset back into bounds after the content length changed.
    pub(super) fn clamp_scroll(&mut self, output: OutputId) {
        let Some(grid) = self.grids.get(&output) else {
            return;
        };
        let max = f64::from(self.max_scroll(grid));
        self.set_scroll(output, grid.scroll.clamp(0., max));
    }

    /// Scrolls the grid by `amount` pixels, clamped to the content.
    ///
    /// Returns whether the scroll offset changed.
    pub fn scroll_grid(&mut self, output: OutputId, amount: f64) -> bool {
        let _span = tracy_client::span!("Layout::scroll_grid");

        let Some(grid) = self.grids.get(&output) else {
            return false;
        };
        if !amount.is_finite() {
            return false;
        }

        let before = grid.scroll;
        let max = f64::from(self.max_scroll(grid));
        let scroll = (grid.scroll + amount).clamp(0., max);
        trace!("scrolling {output} by {amount}: {before} -> {scroll}");

        self.set_scroll(output, scroll);
        scroll != before
    }

    /// Scrolls the least amount needed for the whole row to be inside the viewport.
    pub fn scroll_to_row(&mut self, row: RowKey) {
        let Some(output) = self.rows.get(row).and_then(|row| row.output) else {
            return;
        };
        let grid = &self.grids[&output];
        let row = &self.rows[row];

        let page = f64::from(self.page_length(grid));
        let start = f64::from(row.origin - self.options.window_spacing);
        let end = start + f64::from(row.size);

        let target = if start < grid.scroll {
            start
        } else if end > grid.scroll + page {
            end - page
        } else {
            return;
        };

        let max = f64::from(self.max_scroll(grid));
        self.set_scroll(output, target.clamp(0., max));
    }

    pub fn scroll_to_view(&mut self, view: ViewId) {
        if let Some(row) = self
            .window_for_view(view)
            .and_then(|key| self.windows[key].row)
        {
            self.scroll_to_row(row);
        }
    }

    /// Allocates a row that is not linked into any grid yet.
    pub(super) fn create_row(&mut self, size: i32) -> Detached<RowKey> {
        Detached(self.rows.insert(Row {
            output: None,
            prev: None,
            next: None,
            first_window: None,
            last_window: None,
            origin: 0,
            size,
            preferred_size: size,
        }))
    }

    /// Frees a row. It must have no windows left.
    pub(super) fn destroy_row(&mut self, row: Detached<RowKey>) {
        if let Some(row) = self.rows.remove(row.0) {
            debug_assert!(row.first_window.is_none(), "destroyed row must be empty");
        }
    }

    /// Links the row into the output's grid right after `after`, or first if `after` is `None`.
    pub(super) fn insert_row_after(
        &mut self,
        row: Detached<RowKey>,
        output: OutputId,
        after: Option<RowKey>,
    ) {
        let key = row.0;
        let grid = self
            .grids
            .get_mut(&output)
            .expect("rows must be inserted into an existing grid");

        let next = match after {
            Some(after) => self.rows[after].next,
            None => grid.first_row,
        };

        let row = &mut self.rows[key];
        row.output = Some(output);
        row.prev = after;
        row.next = next;

        match after {
            Some(after) => self.rows[after].next = Some(key),
            None => grid.first_row = Some(key),
        }
        match next {
            Some(next) => self.rows[next].prev = Some(key),
            None => grid.last_row = Some(key),
        }

        // The output may have a different row length than where the row came from.
        self.layout_row(key);
        self.layout_grid_from(key);
        self.clamp_scroll(output);
    }

    /// Unlinks the row from its grid, restacking the rows after it.
    pub(super) fn remove_row(&mut self, key: RowKey) -> Detached<RowKey> {
        let row = &mut self.rows[key];
        let Some(output) = row.output.take() else {
            return Detached(key);
        };
        let prev = row.prev.take();
        let next = row.next.take();

        let grid = self
            .grids
            .get_mut(&output)
            .expect("linked rows must belong to an existing grid");

        match prev {
            Some(prev) => self.rows[prev].next = next,
            None => grid.first_row = next,
        }
        match next {
            Some(next) => self.rows[next].prev = prev,
            None => grid.last_row = prev,
        }

        if let Some(next) = next {
            self.layout_grid_from(next);
        }
        self.clamp_scroll(output);

        Detached(key)
    }

    /// Moves the view's row one place towards the start of the grid.
    pub fn move_row_back(&mut self, view: ViewId) -> bool {
        let Some(row) = self.window_for_view(view).and_then(|k| self.windows[k].row) else {
            return false;
        };
        let Some(output) = self.rows[row].output else {
            return false;
        };
        let Some(prev) = self.rows[row].prev else {
            return false;
        };

        let anchor = self.rows[prev].prev;
        let detached = self.remove_row(row);
        self.insert_row_after(detached, output, anchor);
        true
    }

    /// Moves the view's row one place towards the end of the grid.
    pub fn move_row_forward(&mut self, view: ViewId) -> bool {
        let Some(row) = self.window_for_view(view).and_then(|k| self.windows[k].row) else {
            return false;
        };
        let Some(output) = self.rows[row].output else {
            return false;
        };
        let Some(next) = self.rows[row].next else {
            return false;
        };

        let detached = self.remove_row(row);
        self.insert_row_after(detached, output, Some(next));
        true
    }
}
