use smithay::utils::{Logical, Size};

use super::{Detached, Layout, Window, WindowKey};
use crate::backend::{OutputId, ViewId};
use crate::utils::{ensure_min_size, MIN_WINDOW_SIZE};

impl Layout {
    /// Adds the view to the end of the output's grid, in a new row.
    ///
    /// `requested` is the size the view asked for; a zero extent falls back to filling the
    /// output. Returns `None` if the view is already in the layout or the output has no grid.
    pub fn add_window(
        &mut self,
        view: ViewId,
        output: OutputId,
        requested: Size<i32, Logical>,
    ) -> Option<WindowKey> {
        let _span = tracy_client::span!("Layout::add_window");

        if self.windows_by_view.contains_key(&view) {
            return None;
        }
        let grid = self.grids.get(&output)?;

        let mut preferred = self.options.row_extent(requested);
        if preferred <= 0 {
            preferred = self.options.row_extent(grid.output_size);
        }
        ensure_min_size(&mut preferred);

        let page = self.page_length(grid);
        let row_size = match self.options.stack_extent(requested) {
            size if size <= 0 => page,
            size => size.clamp(MIN_WINDOW_SIZE, page.max(MIN_WINDOW_SIZE)),
        };
        let last_row = grid.last_row;

        let key = self.windows.insert(Window {
            view,
            row: None,
            prev: None,
            next: None,
            origin: 0,
            size: preferred,
            preferred_size: preferred,
            needs_configure: false,
        });
        self.windows_by_view.insert(view, key);

        self.insert_window_in_new_row(Detached(key), output, last_row, row_size);
        debug!("added {view} to {output}, preferred size {preferred}, row size {row_size}");

        Some(key)
    }

    /// Frees a detached window, returning its view.
    pub(super) fn destroy_window(&mut self, window: Detached<WindowKey>) -> Option<ViewId> {
        let win = self.windows.remove(window.0)?;
        debug_assert!(win.row.is_none(), "destroyed window must be detached");
        self.windows_by_view.remove(&win.view);
        Some(win.view)
    }

    /// Removes the view from the layout. Returns whether it was there.
    pub fn remove_window_for_view(&mut self, view: ViewId) -> bool {
        let _span = tracy_client::span!("Layout::remove_window_for_view");

        let Some(key) = self.window_for_view(view) else {
            return false;
        };
        let window = self.remove_window(key);
        self.destroy_window(window);
        debug!("removed {view}");
        true
    }

    /// Handles a view asking for a geometry on its own.
    ///
    /// Gridded views don't get to pick their geometry, so their row is applied again. Returns
    /// whether the view is gridded.
    pub fn deny_geometry_request(&mut self, view: ViewId) -> bool {
        let Some(row) = self.window_for_view(view).and_then(|k| self.windows[k].row) else {
            return false;
        };
        self.queue_configure_row(row);
        true
    }
}
