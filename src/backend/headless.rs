//! In-memory backend that records every request.
//!
//! Used by the tests to drive [`State`](crate::state::State) without a display server.

use std::collections::{BTreeMap, HashMap};

use smithay::backend::input::ButtonState;
use smithay::utils::{Logical, Point, Rectangle, Size};

use super::{Backend, OutputId, ViewId, ViewType};
use crate::utils::ResizeEdge;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    pub geometry: Rectangle<i32, Logical>,
    pub output: OutputId,
    pub parent: Option<ViewId>,
    pub ty: ViewType,
    pub visible: bool,
    /// Edges passed with the last configure.
    pub last_edges: ResizeEdge,
}

#[derive(Debug, Default)]
pub struct Headless {
    pub outputs: BTreeMap<OutputId, Size<i32, Logical>>,
    pub views: HashMap<ViewId, HeadlessView>,
    pub focused_output: Option<OutputId>,
    pub focused_view: Option<ViewId>,
    pub pointer: Point<f64, Logical>,
    /// Views in stacking order, topmost last.
    pub stacking: Vec<ViewId>,
    pub closed: Vec<ViewId>,
    pub spawned: Vec<Vec<String>>,
    pub sent_buttons: Vec<(Option<ViewId>, u32, ButtonState)>,
    pub terminated: bool,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, output: OutputId, size: impl Into<Size<i32, Logical>>) {
        self.outputs.insert(output, size.into());
        self.focused_output.get_or_insert(output);
    }

    pub fn add_view(
        &mut self,
        view: ViewId,
        output: OutputId,
        geometry: Rectangle<i32, Logical>,
    ) -> &mut HeadlessView {
        self.stacking.push(view);
        self.views.entry(view).or_insert(HeadlessView {
            geometry,
            output,
            parent: None,
            ty: ViewType::empty(),
            visible: true,
            last_edges: ResizeEdge::empty(),
        })
    }

    pub fn remove_view(&mut self, view: ViewId) {
        self.views.remove(&view);
        self.stacking.retain(|v| *v != view);
        if self.focused_view == Some(view) {
            self.focused_view = None;
        }
    }

    pub fn geometry(&self, view: ViewId) -> Rectangle<i32, Logical> {
        self.views[&view].geometry
    }

    pub fn is_visible(&self, view: ViewId) -> bool {
        self.views[&view].visible
    }
}

impl Backend for Headless {
    fn output_size(&self, output: OutputId) -> Option<Size<i32, Logical>> {
        self.outputs.get(&output).copied()
    }

    fn focused_output(&self) -> Option<OutputId> {
        self.focused_output
    }

    fn view_geometry(&self, view: ViewId) -> Option<Rectangle<i32, Logical>> {
        self.views.get(&view).map(|v| v.geometry)
    }

    fn view_output(&self, view: ViewId) -> Option<OutputId> {
        self.views.get(&view).map(|v| v.output)
    }

    fn view_parent(&self, view: ViewId) -> Option<ViewId> {
        self.views.get(&view).and_then(|v| v.parent)
    }

    fn view_type(&self, view: ViewId) -> ViewType {
        self.views.get(&view).map(|v| v.ty).unwrap_or_default()
    }

    fn pointer_position(&self) -> Point<f64, Logical> {
        self.pointer
    }

    fn set_view_geometry(
        &mut self,
        view: ViewId,
        edges: ResizeEdge,
        geometry: Rectangle<i32, Logical>,
    ) {
        if let Some(v) = self.views.get_mut(&view) {
            v.geometry = geometry;
            v.last_edges = edges;
        }
    }

    fn set_view_visible(&mut self, view: ViewId, visible: bool) {
        if let Some(v) = self.views.get_mut(&view) {
            v.visible = visible;
        }
    }

    fn set_view_output(&mut self, view: ViewId, output: OutputId) {
        if let Some(v) = self.views.get_mut(&view) {
            v.output = output;
        }
    }

    fn bring_to_front(&mut self, view: ViewId) {
        self.stacking.retain(|v| *v != view);
        self.stacking.push(view);
    }

    fn focus_view(&mut self, view: Option<ViewId>) {
        self.focused_view = view;
    }

    fn close_view(&mut self, view: ViewId) {
        self.closed.push(view);
    }

    fn terminate(&mut self) {
        self.terminated = true;
    }

    fn spawn(&mut self, command: &[String]) {
        self.spawned.push(command.to_vec());
    }

    fn set_pointer_position(&mut self, pos: Point<f64, Logical>) {
        self.pointer = pos;
    }

    fn send_button(&mut self, view: Option<ViewId>, button: u32, state: ButtonState) {
        self.sent_buttons.push((view, button, state));
    }
}
