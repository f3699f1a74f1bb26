//! Input handling.
//!
//! The backend reports raw keyboard and pointer events together with the view under the pointer
//! or holding keyboard focus. Events are matched against the configured binds; pointer binds can
//! start a grab (see [`pointer::PointerState`]) that lasts until the button is released.

use endlesswm_config::{Action, Bind, Trigger};
use smithay::input::keyboard::ModifiersState;

use crate::backend::{Backend, ViewId};
use crate::layout::Direction;
use crate::state::State;

pub mod binds;
pub mod chord;
mod keyboard;
pub mod pointer;


pub use self::binds::{find_configured_bind, modifiers_from_state};
pub use self::keyboard::KeyboardInput;
pub use self::pointer::PointerInput;

/// Actions that need the pointer position and only make sense on pointer binds.
fn is_pointer_action(action: &Action) -> bool {
    matches!(
        action,
        Action::MoveWindow | Action::ResizeWindow | Action::ResizeEdge | Action::ScrollGrid
    )
}

impl<B: Backend> State<B> {
    /// Finds the bind for the trigger. Held chord buttons count as the mod key.
    fn find_bind(&self, mods: ModifiersState, trigger: Trigger) -> Option<Bind> {
        let mod_key = self.config.input.mod_key;
        let mut modifiers = modifiers_from_state(mods);
        if self.chords.is_held() {
            modifiers |= mod_key.to_modifiers();
        }

        find_configured_bind(&self.config.binds.0, mod_key, trigger, modifiers)
    }

    /// Runs the action on behalf of `view`, the focused view or the view under the pointer.
    pub fn do_action(&mut self, action: Action, view: Option<ViewId>) {
        let _span = tracy_client::span!("State::do_action");

        match action {
            Action::Quit => {
                info!("quitting as requested");
                self.backend.terminate();
            }
            Action::Spawn(command) => {
                if !command.is_empty() {
                    self.backend.spawn(&command);
                }
            }
            Action::CloseWindow => {
                if let Some(view) = view {
                    self.backend.close_view(view);
                }
            }
            Action::FocusWindowUp => self.focus_in_direction(view, Direction::Up),
            Action::FocusWindowDown => self.focus_in_direction(view, Direction::Down),
            Action::FocusWindowLeft => self.focus_in_direction(view, Direction::Left),
            Action::FocusWindowRight => self.focus_in_direction(view, Direction::Right),
            Action::MoveWindowUp => self.move_in_direction(view, Direction::Up),
            Action::MoveWindowDown => self.move_in_direction(view, Direction::Down),
            Action::MoveWindowLeft => self.move_in_direction(view, Direction::Left),
            Action::MoveWindowRight => self.move_in_direction(view, Direction::Right),
            Action::MoveRowBack => {
                if let Some(view) = view.and_then(|v| self.gridded_ancestor(v)) {
                    if self.layout.move_row_back(view) {
                        self.layout.scroll_to_view(view);
                    }
                }
            }
            Action::MoveRowForward => {
                if let Some(view) = view.and_then(|v| self.gridded_ancestor(v)) {
                    if self.layout.move_row_forward(view) {
                        self.layout.scroll_to_view(view);
                    }
                }
            }
            Action::MoveWindow | Action::ResizeWindow | Action::ResizeEdge | Action::ScrollGrid => {
                debug!("{action:?} needs a pointer grab, ignoring");
            }
        }
    }

    fn focus_in_direction(&mut self, view: Option<ViewId>, direction: Direction) {
        let Some(view) = view.and_then(|v| self.gridded_ancestor(v)) else {
            return;
        };
        if let Some(target) = self.layout.neighbor(view, direction) {
            self.backend.focus_view(Some(target));
            self.layout.scroll_to_view(target);
        }
    }

    fn move_in_direction(&mut self, view: Option<ViewId>, direction: Direction) {
        let Some(view) = view.and_then(|v| self.gridded_ancestor(v)) else {
            return;
        };
        if self.layout.move_window(view, direction) {
            self.layout.scroll_to_view(view);
        }
    }
}
