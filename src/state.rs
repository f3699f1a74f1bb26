//! Compositor state: the entry point for every event the backend delivers.

use std::collections::HashSet;

use endlesswm_config::Config;
use smithay::input::keyboard::Keysym;
use smithay::utils::{Logical, Rectangle, Size};

use crate::backend::{Backend, OutputId, ViewId, ViewType};
use crate::input::chord::MouseChords;
use crate::input::pointer::PointerState;
use crate::layout::{Layout, Options};
use crate::utils::ResizeEdge;

/// How many parents to walk up when looking for the gridded ancestor of a view.
const MAX_PARENT_DEPTH: usize = 32;

pub struct State<B: Backend> {
    pub backend: B,
    pub layout: Layout,
    pub config: Config,

    pub(crate) pointer: PointerState,
    pub(crate) chords: MouseChords,
    /// Keys whose press triggered a bind, so that their release is not forwarded either.
    pub(crate) suppressed_keys: HashSet<Keysym>,
}

impl<B: Backend> State<B> {
    pub fn new(backend: B, config: Config) -> Self {
        let layout = Layout::new(Options::from_config(&config));

        Self {
            backend,
            layout,
            config,
            pointer: PointerState::default(),
            chords: MouseChords::default(),
            suppressed_keys: HashSet::new(),
        }
    }

    pub fn reload_config(&mut self, config: Config) {
        let _span = tracy_client::span!("State::reload_config");

        self.layout.update_options(Options::from_config(&config));
        self.config = config;
        self.flush();
    }

    /// Whether the view goes into the grid rather than floating above it.
    pub fn is_griddable(&self, view: ViewId) -> bool {
        let allowed = if self.layout.options().floating_dialogs {
            ViewType::empty()
        } else {
            ViewType::MODAL
        };
        self.backend.view_type(view).difference(allowed).is_empty()
    }

    /// The view itself if it is in the grid, otherwise its closest ancestor that is.
    pub fn gridded_ancestor(&self, view: ViewId) -> Option<ViewId> {
        let mut current = view;
        for _ in 0..MAX_PARENT_DEPTH {
            if self.layout.has_view(current) {
                return Some(current);
            }
            current = self.backend.view_parent(current)?;
        }

        warn!("parent chain of {view} is too deep");
        None
    }

    pub fn on_output_added(&mut self, output: OutputId) {
        let Some(size) = self.backend.output_size(output) else {
            warn!("{output} was added without a resolution");
            return;
        };
        self.layout.add_output(output, size);
    }

    pub fn on_output_resized(&mut self, output: OutputId, size: Size<i32, Logical>) {
        self.layout.update_output_size(output, size);
        self.flush();
    }

    pub fn on_output_removed(&mut self, output: OutputId) {
        let _span = tracy_client::span!("State::on_output_removed");

        let evacuation = self.layout.remove_output(output);
        match evacuation.target {
            Some(target) => {
                for view in &evacuation.views {
                    self.backend.set_view_output(*view, target);
                }
            }
            None => {
                for view in &evacuation.views {
                    self.backend.close_view(*view);
                }
            }
        }

        self.pointer.drop_stale(&self.layout);
        self.flush();
    }

    /// Returns whether the view was accepted.
    pub fn on_view_added(&mut self, view: ViewId) -> bool {
        let _span = tracy_client::span!("State::on_view_added");

        if !self.is_griddable(view) {
            debug!("{view} floats");
            self.backend.bring_to_front(view);
            self.backend.focus_view(Some(view));
            return true;
        }

        let Some(output) = self.backend.view_output(view) else {
            warn!("{view} has no output");
            return false;
        };
        if self.layout.grid(output).is_none() {
            self.on_output_added(output);
        }

        let size = self
            .backend
            .view_geometry(view)
            .map_or_else(|| Size::from((0, 0)), |geo| geo.size);
        if self.layout.add_window(view, output, size).is_none() {
            warn!("could not add {view} to the grid of {output}");
            return false;
        }

        self.backend.focus_view(Some(view));
        self.layout.scroll_to_view(view);
        self.flush();
        true
    }

    pub fn on_view_removed(&mut self, view: ViewId) {
        let _span = tracy_client::span!("State::on_view_removed");

        if self.pointer.references(view, &self.layout) {
            debug!("{view} went away during a pointer grab");
            self.pointer = PointerState::default();
        }

        if self.layout.has_view(view) {
            let successor = self.layout.focus_successor(view);
            self.layout.remove_window_for_view(view);

            if let Some(successor) = successor {
                self.backend.focus_view(Some(successor));
                self.layout.scroll_to_view(successor);
            }
        }

        self.pointer.drop_stale(&self.layout);
        self.flush();
    }

    pub fn on_view_focus(&mut self, view: ViewId, focused: bool) {
        if !focused {
            return;
        }

        if self.layout.has_view(view) {
            self.layout.scroll_to_view(view);
            self.flush();
        } else {
            self.backend.bring_to_front(view);
        }
    }

    /// A view asked for a geometry on its own.
    pub fn on_view_request_geometry(&mut self, view: ViewId, geometry: Rectangle<i32, Logical>) {
        if self.layout.deny_geometry_request(view) {
            trace!("denied geometry request of {view}");
            self.flush();
        } else {
            self.backend
                .set_view_geometry(view, ResizeEdge::empty(), geometry);
        }
    }

    /// Applies every pending layout change to the views.
    pub fn flush(&mut self) {
        let _span = tracy_client::span!("State::flush");

        for configure in self.layout.take_configures() {
            let edges = self.pointer.resize_edges(configure.view, &self.layout);
            self.backend
                .set_view_geometry(configure.view, edges, configure.geometry);
            self.backend
                .set_view_visible(configure.view, configure.visible);
        }
    }
}
