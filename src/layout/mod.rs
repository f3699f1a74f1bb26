//! Grid layout.
//!
//! Every output has one *grid*: an ordered list of *rows* stacked along one axis, each row being
//! an ordered list of *windows* laid out along the other axis. With the default orientation rows
//! are stacked top to bottom and windows sit left to right inside a row; a horizontal grid swaps
//! the two axes.
//!
//! Windows never overlap. A row is exactly as long as the output along the row axis, and its
//! windows share that length: each window has a *preferred* size which it gets as long as the
//! row has room, otherwise all windows of the row are scaled down proportionally. Rows have a
//! free size along the stacking axis, so the grid can be longer than the output and is scrolled.
//!
//! The same spacing separates windows from each other, from the row ends, and rows from each
//! other and from the grid ends.
//!
//! Positions are tracked in *content space*: the first row starts at the spacing, every next row
//! starts one spacing after the previous one ends, and the scroll offset is subtracted only when
//! producing on-screen geometry.
//!
//! The layout does not talk to the backend. Operations mark windows whose geometry may have
//! changed, and [`Layout::take_configures`] hands out the resulting geometry to apply.

use std::collections::{BTreeMap, HashMap};
use std::iter;

use endlesswm_config::Config;
use slotmap::{new_key_type, SlotMap};
use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::backend::{OutputId, ViewId};

mod grid;
mod navigation;
mod output_ops;
mod resize;
mod row;
pub mod types;
mod window;

#[cfg(test)]
mod tests;

pub use self::output_ops::Evacuation;
pub use self::resize::ResizeTarget;
pub use self::types::{Detached, Direction, Edge};

new_key_type! {
    pub struct WindowKey;
    pub struct RowKey;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Stack rows along the X axis.
    pub horizontal: bool,
    pub minimize_empty_space: bool,
    pub floating_dialogs: bool,
    pub window_spacing: i32,
    pub scroll_mult: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            horizontal: false,
            minimize_empty_space: false,
            floating_dialogs: false,
            window_spacing: i32::from(endlesswm_config::DEFAULT_WINDOW_SPACING),
            scroll_mult: 1.,
        }
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        Self {
            horizontal: config.grid.horizontal,
            minimize_empty_space: config.grid.minimize_empty_space,
            floating_dialogs: config.grid.floating_dialogs,
            window_spacing: i32::from(config.grid.window_spacing),
            scroll_mult: config.behavior.scroll_mult,
        }
    }

    /// Extent of `size` along the axis windows are laid out on.
    pub fn row_extent(&self, size: Size<i32, Logical>) -> i32 {
        if self.horizontal {
            size.h
        } else {
            size.w
        }
    }

    /// Extent of `size` along the axis rows are stacked on.
    pub fn stack_extent(&self, size: Size<i32, Logical>) -> i32 {
        if self.horizontal {
            size.w
        } else {
            size.h
        }
    }

    /// Splits a point into its stacking-axis and row-axis coordinates.
    pub fn split(&self, pos: Point<f64, Logical>) -> (f64, f64) {
        if self.horizontal {
            (pos.x, pos.y)
        } else {
            (pos.y, pos.x)
        }
    }

    /// Builds a rectangle out of its stacking-axis and row-axis spans.
    fn join(&self, stack: (i32, i32), along: (i32, i32)) -> Rectangle<i32, Logical> {
        let ((stack_loc, stack_size), (along_loc, along_size)) = (stack, along);
        if self.horizontal {
            Rectangle::new(
                Point::from((stack_loc, along_loc)),
                Size::from((stack_size, along_size)),
            )
        } else {
            Rectangle::new(
                Point::from((along_loc, stack_loc)),
                Size::from((along_size, stack_size)),
            )
        }
    }
}

/// A view placed in the grid.
#[derive(Debug)]
pub struct Window {
    view: ViewId,
    row: Option<RowKey>,
    prev: Option<WindowKey>,
    next: Option<WindowKey>,
    /// Offset of the leading edge along the row, including the leading spacing.
    origin: i32,
    size: i32,
    preferred_size: i32,
    /// Whether the window is queued in [`Layout::pending_configures`].
    needs_configure: bool,
}

#[derive(Debug)]
pub struct Row {
    output: Option<OutputId>,
    prev: Option<RowKey>,
    next: Option<RowKey>,
    first_window: Option<WindowKey>,
    last_window: Option<WindowKey>,
    /// Offset of the leading edge in content space.
    origin: i32,
    size: i32,
    /// Size the row returns to when the output grows back.
    preferred_size: i32,
}

#[derive(Debug)]
pub struct Grid {
    output: OutputId,
    output_size: Size<i32, Logical>,
    first_row: Option<RowKey>,
    last_row: Option<RowKey>,
    scroll: f64,
}

/// Geometry to apply to a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configure {
    pub view: ViewId,
    /// Output-local geometry.
    pub geometry: Rectangle<i32, Logical>,
    /// Whether any part of the window's row is inside the viewport.
    pub visible: bool,
}

#[derive(Debug)]
pub struct Layout {
    /// Ordered so that "the remaining output with the lowest id" is the first entry.
    grids: BTreeMap<OutputId, Grid>,
    rows: SlotMap<RowKey, Row>,
    windows: SlotMap<WindowKey, Window>,
    windows_by_view: HashMap<ViewId, WindowKey>,
    pending_configures: Vec<WindowKey>,
    options: Options,
}

impl Window {
    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn row(&self) -> Option<RowKey> {
        self.row
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn preferred_size(&self) -> i32 {
        self.preferred_size
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }
}

impl Row {
    pub fn output(&self) -> Option<OutputId> {
        self.output
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn preferred_size(&self) -> i32 {
        self.preferred_size
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }
}

impl Grid {
    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn output_size(&self) -> Size<i32, Logical> {
        self.output_size
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn is_empty(&self) -> bool {
        self.first_row.is_none()
    }
}

impl Layout {
    pub fn new(options: Options) -> Self {
        Self {
            grids: BTreeMap::new(),
            rows: SlotMap::with_key(),
            windows: SlotMap::with_key(),
            windows_by_view: HashMap::new(),
            pending_configures: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replaces the options and lays every grid out again.
    pub fn update_options(&mut self, options: Options) {
        let _span = tracy_client::span!("Layout::update_options");

        if self.options == options {
            return;
        }
        self.options = options;

        let outputs: Vec<_> = self.grids.keys().copied().collect();
        for output in outputs {
            self.relayout_grid(output);
        }
    }

    pub fn grid(&self, output: OutputId) -> Option<&Grid> {
        self.grids.get(&output)
    }

    pub fn outputs(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.grids.keys().copied()
    }

    pub fn row(&self, key: RowKey) -> Option<&Row> {
        self.rows.get(key)
    }

    pub fn window(&self, key: WindowKey) -> Option<&Window> {
        self.windows.get(key)
    }

    pub fn window_for_view(&self, view: ViewId) -> Option<WindowKey> {
        self.windows_by_view.get(&view).copied()
    }

    /// Whether the view is placed in a grid.
    pub fn has_view(&self, view: ViewId) -> bool {
        self.windows_by_view.contains_key(&view)
    }

    /// Output whose grid holds the view.
    pub fn view_output(&self, view: ViewId) -> Option<OutputId> {
        let key = self.window_for_view(view)?;
        self.rows.get(self.windows[key].row?)?.output
    }

    /// Rows of the output's grid, first to last.
    pub fn rows_of(&self, output: OutputId) -> impl Iterator<Item = RowKey> + '_ {
        let first = self.grids.get(&output).and_then(|grid| grid.first_row);
        iter::successors(first, move |key| self.rows[*key].next)
    }

    /// Windows of the row, first to last.
    pub fn windows_of(&self, row: RowKey) -> impl Iterator<Item = WindowKey> + '_ {
        let first = self.rows.get(row).and_then(|row| row.first_window);
        iter::successors(first, move |key| self.windows[*key].next)
    }

    /// On-screen geometry of the view and whether its row is inside the viewport.
    pub fn view_geometry(&self, view: ViewId) -> Option<(Rectangle<i32, Logical>, bool)> {
        self.window_geometry(self.window_for_view(view)?)
    }

    fn window_geometry(&self, key: WindowKey) -> Option<(Rectangle<i32, Logical>, bool)> {
        let win = self.windows.get(key)?;
        let row = self.rows.get(win.row?)?;
        let grid = self.grids.get(&row.output?)?;
        let spacing = self.options.window_spacing;

        let scroll = grid.scroll.round() as i32;
        let on_screen = row.origin - scroll;
        let geometry = self
            .options
            .join((on_screen, row.size), (win.origin, win.size));

        // The viewport starts one spacing before the first row.
        let leading = on_screen - spacing;
        let visible = leading < self.page_length(grid) && on_screen + row.size > 0;

        Some((geometry, visible))
    }

    /// Queues a configure for the window.
    fn queue_configure(&mut self, key: WindowKey) {
        let win = &mut self.windows[key];
        if !win.needs_configure {
            win.needs_configure = true;
            self.pending_configures.push(key);
        }
    }

    fn queue_configure_row(&mut self, row: RowKey) {
        let mut cur = self.rows[row].first_window;
        while let Some(key) = cur {
            self.queue_configure(key);
            cur = self.windows[key].next;
        }
    }

    /// Returns the geometry of every window changed since the last call.
    pub fn take_configures(&mut self) -> Vec<Configure> {
        let _span = tracy_client::span!("Layout::take_configures");

        let pending = std::mem::take(&mut self.pending_configures);
        let mut rv = Vec::with_capacity(pending.len());
        for key in pending {
            let Some(win) = self.windows.get_mut(key) else {
                continue;
            };
            win.needs_configure = false;
            let view = win.view;

            if let Some((geometry, visible)) = self.window_geometry(key) {
                rv.push(Configure {
                    view,
                    geometry,
                    visible,
                });
            }
        }
        rv
    }

    /// Plain-text dump of every grid, for debugging and tests.
    pub fn snapshot(&self) -> String {
        let mut buf = String::new();
        for (output, grid) in &self.grids {
            let size = grid.output_size;
            buf.push_str(&format!(
                "output {} {}x{} scroll={}\n",
                output.0, size.w, size.h, grid.scroll
            ));

            for row_key in self.rows_of(*output) {
                let row = &self.rows[row_key];
                buf.push_str(&format!("  row {}+{}:", row.origin, row.size));
                for key in self.windows_of(row_key) {
                    let win = &self.windows[key];
                    buf.push_str(&format!(" {}[{}+{}]", win.view.0, win.origin, win.size));
                }
                buf.push('\n');
            }
        }
        buf
    }

    #[cfg(test)]
    pub(crate) fn verify_invariants(&self) {
        use std::collections::HashSet;

        let spacing = self.options.window_spacing;
        let mut seen_rows = HashSet::new();
        let mut seen_windows = HashSet::new();

        for (output, grid) in &self.grids {
            assert_eq!(grid.output, *output);

            let mut prev_row = None;
            let mut expected_origin = spacing;
            for row_key in self.rows_of(*output) {
                assert!(seen_rows.insert(row_key), "row must be linked once");
                let row = &self.rows[row_key];
                assert_eq!(row.output, Some(*output), "row must point at its grid");
                assert_eq!(row.prev, prev_row, "row links must be symmetric");
                assert!(row.first_window.is_some(), "rows must not be empty");
                assert_eq!(row.origin, expected_origin, "rows must be packed");
                expected_origin = row.origin + row.size + spacing;

                let mut prev_win = None;
                let mut expected_origin = spacing;
                let mut count = 0;
                let mut total = 0;
                let mut total_preferred = 0;
                for key in self.windows_of(row_key) {
                    assert!(seen_windows.insert(key), "window must be linked once");
                    let win = &self.windows[key];
                    assert_eq!(win.row, Some(row_key), "window must point at its row");
                    assert_eq!(win.prev, prev_win, "window links must be symmetric");
                    assert_eq!(win.origin, expected_origin, "windows must be packed");
                    assert_eq!(self.windows_by_view.get(&win.view), Some(&key));
                    assert!(!win.needs_configure || self.pending_configures.contains(&key));
                    expected_origin = win.origin + win.size + spacing;

                    count += 1;
                    total += win.size;
                    total_preferred += win.preferred_size;
                    prev_win = Some(key);
                }
                assert_eq!(row.last_window, prev_win);

                let capacity = self.options.row_extent(grid.output_size) - spacing * (count + 1);
                if total_preferred > 0
                    && (total_preferred > capacity || self.options.minimize_empty_space)
                {
                    let capacity = capacity.max(0);
                    let ratio = capacity as f64 / total_preferred as f64;
                    for key in self.windows_of(row_key) {
                        let win = &self.windows[key];
                        let exact = win.preferred_size as f64 * ratio;
                        assert!(win.size >= 0, "window sizes must not be negative");
                        assert!(
                            (win.size as f64 - exact).abs() <= 1. + 1e-9,
                            "window sizes must be proportional to preferred sizes"
                        );
                    }
                    assert_eq!(total, capacity, "scaled windows must fill the row exactly");
                } else {
                    assert_eq!(total, total_preferred, "windows that fit get preferred size");
                }

                prev_row = Some(row_key);
            }
            assert_eq!(grid.last_row, prev_row);

            let max_scroll = self.max_scroll(grid);
            assert!(
                0. <= grid.scroll && grid.scroll <= max_scroll as f64,
                "scroll must be within bounds: {} not in 0..={max_scroll}",
                grid.scroll
            );
        }

        assert_eq!(seen_rows.len(), self.rows.len(), "no detached rows may remain");
        assert_eq!(
            seen_windows.len(),
            self.windows.len(),
            "no detached windows may remain"
        );
        assert_eq!(self.windows_by_view.len(), self.windows.len());
    }
}
