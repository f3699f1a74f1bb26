//! Interface to the compositor library that owns outputs, views and input devices.
//!
//! The grid never talks to the display server directly. Everything it needs to know about a view
//! or an output is queried through [`Backend`], and every side effect is requested through it.

use std::fmt;

use bitflags::bitflags;
use smithay::backend::input::ButtonState;
use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::utils::ResizeEdge;

pub mod headless;

/// Opaque handle of a client window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Opaque handle of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view {}", self.0)
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output {}", self.0)
    }
}

bitflags! {
    /// Window type flags reported for a view.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViewType: u32 {
        /// Override-redirect X11 window.
        const OVERRIDE_REDIRECT = 1;
        /// Tooltips, drag-n-drop icons and the like.
        const UNMANAGED = 1 << 1;
        const SPLASH = 1 << 2;
        const MODAL = 1 << 3;
        /// xdg-shell, wl-shell popups.
        const POPUP = 1 << 4;
    }
}

pub trait Backend {
    /// Virtual resolution of the output, or `None` if it's gone.
    fn output_size(&self, output: OutputId) -> Option<Size<i32, Logical>>;
    fn focused_output(&self) -> Option<OutputId>;

    fn view_geometry(&self, view: ViewId) -> Option<Rectangle<i32, Logical>>;
    fn view_output(&self, view: ViewId) -> Option<OutputId>;
    fn view_parent(&self, view: ViewId) -> Option<ViewId>;
    fn view_type(&self, view: ViewId) -> ViewType;

    fn pointer_position(&self) -> Point<f64, Logical>;

    /// Configures the view. `edges` hints which edges are being dragged, if any.
    fn set_view_geometry(
        &mut self,
        view: ViewId,
        edges: ResizeEdge,
        geometry: Rectangle<i32, Logical>,
    );
    fn set_view_visible(&mut self, view: ViewId, visible: bool);
    fn set_view_output(&mut self, view: ViewId, output: OutputId);
    fn bring_to_front(&mut self, view: ViewId);
    fn focus_view(&mut self, view: Option<ViewId>);
    /// Asks the client to close the view.
    fn close_view(&mut self, view: ViewId);

    /// Stops the compositor main loop.
    fn terminate(&mut self);
    fn spawn(&mut self, command: &[String]);

    fn set_pointer_position(&mut self, pos: Point<f64, Logical>);
    /// Delivers a synthetic button event to the view.
    fn send_button(&mut self, view: Option<ViewId>, button: u32, state: ButtonState);
}
