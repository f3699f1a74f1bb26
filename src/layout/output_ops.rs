//! Adding, resizing and removing outputs.

use smithay::utils::{Logical, Size};

use super::{Grid, Layout};
use crate::backend::{OutputId, ViewId};

/// Where the views of a removed output went.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Evacuation {
    /// Output that received the rows, or `None` if no output was left, in which case the views
    /// were dropped from the layout.
    pub target: Option<OutputId>,
    /// Every view that was on the removed output, in grid order.
    pub views: Vec<ViewId>,
}

impl Layout {
    /// Creates an empty grid for the output. Returns `false` if it already has one.
    pub fn add_output(&mut self, output: OutputId, size: Size<i32, Logical>) -> bool {
        if self.grids.contains_key(&output) {
            return false;
        }

        debug!("adding grid for {output}, {}x{}", size.w, size.h);
        self.grids.insert(
            output,
            Grid {
                output,
                output_size: size,
                first_row: None,
                last_row: None,
                scroll: 0.,
            },
        );
        true
    }

    /// Fits the grid to a new output size.
    ///
    /// Rows shrink to the page length if needed and grow back to their preferred size when there
    /// is room again.
    pub fn update_output_size(&mut self, output: OutputId, size: Size<i32, Logical>) {
        let _span = tracy_client::span!("Layout::update_output_size");

        let Some(grid) = self.grids.get_mut(&output) else {
            return;
        };
        if grid.output_size == size {
            return;
        }
        grid.output_size = size;

        let page = self.page_length(&self.grids[&output]);
        let rows: Vec<_> = self.rows_of(output).collect();
        for key in rows {
            let row = &mut self.rows[key];
            row.size = row.preferred_size.min(page);
        }

        self.relayout_grid(output);
    }

    /// Removes the output's grid, moving its rows in order to the end of the grid of the remaining
    /// output with the lowest id.
    ///
    /// If there is no other output, the windows are dropped from the layout; the views are
    /// returned so that they can be closed.
    pub fn remove_output(&mut self, output: OutputId) -> Evacuation {
        let _span = tracy_client::span!("Layout::remove_output");

        if !self.grids.contains_key(&output) {
            return Evacuation::default();
        }

        let rows: Vec<_> = self.rows_of(output).collect();
        let views: Vec<_> = rows
            .iter()
            .flat_map(|row| self.windows_of(*row))
            .map(|key| self.windows[key].view)
            .collect();
        let target = self.grids.keys().copied().find(|o| *o != output);

        match target {
            Some(target) => {
                for row in rows {
                    let row = self.remove_row(row);
                    let after = self.grids[&target].last_row;
                    self.insert_row_after(row, target, after);
                }
                debug!("moved {} views from {output} to {target}", views.len());
            }
            None => {
                for view in &views {
                    self.remove_window_for_view(*view);
                }
                debug!("dropped {} views of {output}, no output left", views.len());
            }
        }

        self.grids.remove(&output);
        Evacuation { target, views }
    }
}
