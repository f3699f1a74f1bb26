//! Keyboard input event handling.

use endlesswm_config::Trigger;
use smithay::backend::input::KeyState;
use smithay::input::keyboard::{Keysym, ModifiersState};

use super::is_pointer_action;
use crate::backend::{Backend, ViewId};
use crate::state::State;

/// Keyboard event handling.
pub trait KeyboardInput {
    /// A key changed state while `view` had keyboard focus.
    ///
    /// Returns whether the key was consumed by a bind, in which case it must not reach the
    /// client.
    fn on_keyboard(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        keysym: Keysym,
        state: KeyState,
    ) -> bool;
}

impl<B: Backend> KeyboardInput for State<B> {
    fn on_keyboard(
        &mut self,
        view: Option<ViewId>,
        mods: ModifiersState,
        keysym: Keysym,
        state: KeyState,
    ) -> bool {
        let _span = tracy_client::span!("KeyboardInput::on_keyboard");

        if state == KeyState::Released {
            return self.suppressed_keys.remove(&keysym);
        }

        let Some(bind) = self.find_bind(mods, Trigger::Keysym(keysym)) else {
            return false;
        };
        if is_pointer_action(&bind.action) {
            debug!("{:?} is bound to a key but only works from the pointer", bind.action);
            return false;
        }

        self.suppressed_keys.insert(keysym);
        self.chords.action_performed();
        self.do_action(bind.action, view);
        self.flush();
        true
    }
}
