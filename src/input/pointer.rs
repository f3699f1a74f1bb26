//! Pointer input: dragging views and seams, hover tracking and grid scrolling.

use endlesswm_config::Action;
use smithay::backend::input::ButtonState;
use smithay::input::keyboard::ModifiersState;
use smithay::utils::{Logical, Point, Rectangle};

use super::binds::{trigger_for_button, trigger_for_wheel};
use super::chord::{ChordRelease, MouseChords};
use super::is_pointer_action;
use crate::backend::{Backend, ViewId};
use crate::layout::{Edge, Layout, ResizeTarget, RowKey, WindowKey};
use crate::state::State;
use crate::utils::ResizeEdge;

/// What the pointer is currently doing.
///
/// Every mode other than `Normal` is a grab started by a button press and ended by the release
/// of that same button.
///
/// Grabs that move or resize remember where the pointer was pressed and what it was dragging
/// looked like then. Every motion applies the whole distance travelled since the press, so
/// sub-pixel motions add up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Normal {
        /// Seam under the pointer, if it is right over one.
        hovered_edge: Option<Edge>,
    },
    MovingFloating {
        view: ViewId,
        start: Point<f64, Logical>,
        original: Rectangle<i32, Logical>,
        button: u32,
    },
    ResizingFloating {
        view: ViewId,
        edges: ResizeEdge,
        start: Point<f64, Logical>,
        original: Rectangle<i32, Logical>,
        button: u32,
    },
    MovingGridded {
        window: WindowKey,
        /// Where the window lands on release.
        insert_edge: Option<Edge>,
        button: u32,
    },
    ResizingWindow {
        window: WindowKey,
        start: Point<f64, Logical>,
        original_size: i32,
        button: u32,
    },
    ResizingRow {
        row: RowKey,
        start: Point<f64, Logical>,
        original_size: i32,
        button: u32,
    },
}

impl Default for PointerState {
    fn default() -> Self {
        Self::Normal { hovered_edge: None }
    }
}

impl PointerState {
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal { .. })
    }

    /// The button that started the grab.
    pub fn button(&self) -> Option<u32> {
        match *self {
            Self::Normal { .. } => None,
            Self::MovingFloating { button, .. }
            | Self::ResizingFloating { button, .. }
            | Self::MovingGridded { button, .. }
            | Self::ResizingWindow { button, .. }
            | Self::ResizingRow { button, .. } => Some(button),
        }
    }

    pub fn hovered_edge(&self) -> Option<Edge> {
        match *self {
            Self::Normal { hovered_edge } => hovered_edge,
            _ => None,
        }
    }

    /// Whether removing the view from the layout would pull the rug from under the grab.
    pub(crate) fn references(&self, view: ViewId, layout: &Layout) -> bool {
        let window = layout.window_for_view(view);
        let row = window.and_then(|key| layout.window(key)?.row());

        match *self {
            Self::Normal { .. } => false,
            Self::MovingFloating { view: v, .. } | Self::ResizingFloating { view: v, .. } => {
                v == view
            }
            Self::MovingGridded { window: w, .. } | Self::ResizingWindow { window: w, .. } => {
                Some(w) == window
            }
            Self::ResizingRow { row: r, .. } => {
                Some(r) == row && layout.windows_of(r).count() == 1
            }
        }
    }

    /// Forgets rows, windows and seams that no longer exist.
    pub(crate) fn drop_stale(&mut self, layout: &Layout) {
        let stale = match *self {
            Self::MovingGridded { window, .. } | Self::ResizingWindow { window, .. } => {
                layout.window(window).is_none()
            }
            Self::ResizingRow { row, .. } => layout.row(row).is_none(),
            _ => false,
        };
        if stale {
            *self = Self::default();
            return;
        }

        if let Self::Normal {
            hovered_edge: edge, ..
        }
        | Self::MovingGridded {
            insert_edge: edge, ..
        } = self
        {
            if edge.is_some_and(|edge| !layout.is_edge_valid(edge)) {
                *edge = None;
            }
        }
    }

    /// Edges of the view being dragged by the current grab, as a hint for the client.
    pub(crate) fn resize_edges(&self, view: ViewId, layout: &Layout) -> ResizeEdge {
        let Some(key) = layout.window_for_view(view) else {
            return ResizeEdge::empty();
        };
        let horizontal = layout.options().horizontal;

        match *self {
            Self::ResizingWindow { window, .. } if window == key => {
                if horizontal {
                    ResizeEdge::TOP_BOTTOM
                } else {
                    ResizeEdge::LEFT_RIGHT
                }
            }
            Self::ResizingRow { row, .. }
                if layout.window(key).and_then(|win| win.row()) == Some(row) =>
            {
                if horizontal {
                    ResizeEdge::LEFT_RIGHT
                } else {
                    ResizeEdge::TOP_BOTTOM
                }
            }
            _ => ResizeEdge::empty(),
        }
    }
}

/// Pointer event handling.
///
/// Positions are output-local. Every handler returns whether the event was consumed, in which
/// case it must not reach the client.
pub trait PointerInput {
    /// The pointer moved to `pos`, over `view` if any.
    fn on_pointer_motion(&mut self, view: Option<ViewId>, pos: Point<f64, Logical>) -> bool;

    fn on_pointer_button(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        button: u32,
        state: ButtonState,
        pos: Point<f64, Logical>,
    ) -> bool;

    /// The wheel turned over `view`, if any. `amount[0]` is the vertical wheel amount.
    fn on_pointer_axis(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        amount: [f64; 2],
    ) -> bool;
}

impl<B: Backend> PointerInput for State<B> {
    fn on_pointer_motion(&mut self, view: Option<ViewId>, pos: Point<f64, Logical>) -> bool {
        let _span = tracy_client::span!("PointerInput::on_pointer_motion");

        self.backend.set_pointer_position(pos);

        match self.pointer {
            PointerState::Normal { .. } => {
                let hovered_edge = match view {
                    Some(_) => None,
                    None => self.exact_edge_at(pos),
                };
                self.pointer = PointerState::Normal { hovered_edge };
                return false;
            }
            PointerState::MovingFloating {
                view,
                start,
                mut original,
                ..
            } => {
                let delta: Point<i32, Logical> = (pos - start).to_i32_round();
                original.loc += delta;
                self.backend
                    .set_view_geometry(view, ResizeEdge::empty(), original);
            }
            PointerState::ResizingFloating {
                view,
                edges,
                start,
                original,
                ..
            } => {
                let delta: Point<i32, Logical> = (pos - start).to_i32_round();
                let geometry = edges.apply_delta(original, delta.x, delta.y);
                self.backend.set_view_geometry(view, edges, geometry);
            }
            PointerState::MovingGridded { window, button, .. } => {
                let insert_edge = self
                    .layout
                    .window(window)
                    .and_then(|win| self.layout.view_output(win.view()))
                    .and_then(|output| self.layout.nearest_edge(output, pos))
                    .filter(|edge| !self.layout.edge_belongs_to_window(*edge, window));

                if insert_edge != self.pointer.insert_edge() {
                    trace!("insertion point: {insert_edge:?}");
                }
                self.pointer = PointerState::MovingGridded {
                    window,
                    insert_edge,
                    button,
                };
            }
            PointerState::ResizingWindow {
                window,
                start,
                original_size,
                ..
            } => {
                let (_, along) = self.layout.options().split(pos - start);
                if let Some(size) = self.layout.window(window).map(|win| win.size()) {
                    let delta = original_size + along.round() as i32 - size;
                    self.layout.resize_window(window, delta);
                }
            }
            PointerState::ResizingRow {
                row,
                start,
                original_size,
                ..
            } => {
                let (stack, _) = self.layout.options().split(pos - start);
                if let Some(size) = self.layout.row(row).map(|row| row.size()) {
                    let delta = original_size + stack.round() as i32 - size;
                    self.layout.resize_row(row, delta);
                }
            }
        }

        self.flush();
        true
    }

    fn on_pointer_button(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        button: u32,
        state: ButtonState,
        pos: Point<f64, Logical>,
    ) -> bool {
        let _span = tracy_client::span!("PointerInput::on_pointer_button");

        let bind = trigger_for_button(button).and_then(|trigger| self.find_bind(mods, trigger));

        if MouseChords::handles(button) {
            match state {
                ButtonState::Pressed if bind.is_none() && self.pointer.is_normal() => {
                    self.chords.press(button);
                    return true;
                }
                ButtonState::Released => match self.chords.release(button) {
                    ChordRelease::Replay => {
                        self.backend.send_button(view, button, ButtonState::Pressed);
                        self.backend.send_button(view, button, ButtonState::Released);
                        return true;
                    }
                    ChordRelease::Swallow => return true,
                    ChordRelease::Forward => (),
                },
                ButtonState::Pressed => (),
            }
        }

        match state {
            ButtonState::Pressed => {
                if !self.pointer.is_normal() {
                    return true;
                }

                let next = match (view, bind.map(|bind| bind.action)) {
                    (Some(view), Some(Action::MoveWindow)) => self.start_move(view, button, pos),
                    (Some(view), Some(Action::ResizeWindow)) => {
                        self.start_resize(view, button, pos)
                    }
                    (None, Some(Action::ResizeEdge)) => self.start_edge_resize(button, pos),
                    (_, Some(action)) if !is_pointer_action(&action) => {
                        self.chords.action_performed();
                        self.do_action(action, view);
                        self.flush();
                        return true;
                    }
                    (Some(view), _) => {
                        self.backend.focus_view(Some(view));
                        return false;
                    }
                    (None, _) => None,
                };

                let Some(next) = next else {
                    return false;
                };
                debug!("pointer grab: {next:?}");
                self.pointer = next;
                self.chords.action_performed();
                self.flush();
                true
            }
            ButtonState::Released => {
                if self.pointer.button() != Some(button) {
                    return !self.pointer.is_normal();
                }

                if let PointerState::MovingGridded {
                    window,
                    insert_edge: Some(edge),
                    ..
                } = self.pointer
                {
                    self.drop_window(window, edge);
                }

                debug!("pointer grab ended");
                self.pointer = PointerState::default();
                self.flush();
                true
            }
        }
    }

    fn on_pointer_axis(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        amount: [f64; 2],
    ) -> bool {
        let _span = tracy_client::span!("PointerInput::on_pointer_axis");

        let Some(bind) = trigger_for_wheel(amount[0]).and_then(|t| self.find_bind(mods, t)) else {
            return false;
        };

        if bind.action != Action::ScrollGrid {
            if is_pointer_action(&bind.action) {
                debug!("{:?} can't be bound to the wheel", bind.action);
                return false;
            }
            self.chords.action_performed();
            self.do_action(bind.action, view);
            self.flush();
            return true;
        }

        let Some(output) = self.backend.focused_output() else {
            return true;
        };
        let amount = amount[0] * self.layout.options().scroll_mult;
        if self.layout.scroll_grid(output, amount) {
            if self.pointer.is_normal() {
                let hovered_edge = self.exact_edge_at(self.backend.pointer_position());
                self.pointer = PointerState::Normal { hovered_edge };
            }
            self.flush();
        }
        true
    }
}

impl PointerState {
    fn insert_edge(&self) -> Option<Edge> {
        match *self {
            Self::MovingGridded { insert_edge, .. } => insert_edge,
            _ => None,
        }
    }
}

impl<B: Backend> State<B> {
    fn exact_edge_at(&self, pos: Point<f64, Logical>) -> Option<Edge> {
        let output = self.backend.focused_output()?;
        self.layout.exact_edge(output, pos)
    }

    fn start_move(
        &mut self,
        view: ViewId,
        button: u32,
        pos: Point<f64, Logical>,
    ) -> Option<PointerState> {
        match self.layout.window_for_view(view) {
            Some(window) => Some(PointerState::MovingGridded {
                window,
                insert_edge: None,
                button,
            }),
            None => {
                let original = self.backend.view_geometry(view)?;
                self.backend.bring_to_front(view);
                Some(PointerState::MovingFloating {
                    view,
                    start: pos,
                    original,
                    button,
                })
            }
        }
    }

    /// Gridded views resize from the seam nearest to the pointer, floating ones from the nearest
    /// corner.
    fn start_resize(
        &mut self,
        view: ViewId,
        button: u32,
        pos: Point<f64, Logical>,
    ) -> Option<PointerState> {
        match self.layout.window_for_view(view) {
            Some(window) => {
                let edge = self.layout.edge_nearest_to(window, pos)?;
                self.grab_for_target(self.layout.resize_target(edge)?, button, pos)
            }
            None => {
                let original = self.backend.view_geometry(view)?;
                let edges = ResizeEdge::nearest_corner(original, pos);
                Some(PointerState::ResizingFloating {
                    view,
                    edges,
                    start: pos,
                    original,
                    button,
                })
            }
        }
    }

    fn start_edge_resize(&mut self, button: u32, pos: Point<f64, Logical>) -> Option<PointerState> {
        let edge = self
            .pointer
            .hovered_edge()
            .or_else(|| self.exact_edge_at(pos))?;
        self.grab_for_target(self.layout.resize_target(edge)?, button, pos)
    }

    fn grab_for_target(
        &self,
        target: ResizeTarget,
        button: u32,
        start: Point<f64, Logical>,
    ) -> Option<PointerState> {
        let state = match target {
            ResizeTarget::Row(row) => PointerState::ResizingRow {
                row,
                start,
                original_size: self.layout.row(row)?.size(),
                button,
            },
            ResizeTarget::Window(window) => PointerState::ResizingWindow {
                window,
                start,
                original_size: self.layout.window(window)?.size(),
                button,
            },
        };
        Some(state)
    }

    fn drop_window(&mut self, window: WindowKey, edge: Edge) {
        let Some(view) = self.layout.window(window).map(|win| win.view()) else {
            return;
        };

        let from = self.layout.view_output(view);
        if !self.layout.move_window_to_edge(window, edge) {
            return;
        }
        debug!("dropped {view} at {edge:?}");

        let to = self.layout.view_output(view);
        if let Some(to) = to.filter(|to| Some(*to) != from) {
            self.backend.set_view_output(view, to);
        }
        self.layout.scroll_to_view(view);
    }
}
