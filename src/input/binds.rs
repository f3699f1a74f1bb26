//! Keyboard and mouse bind resolution.
//!
//! Free of `State` dependencies for testability.

use endlesswm_config::{Bind, ModKey, Modifiers, Trigger};
use smithay::input::keyboard::ModifiersState;

/// Linux input event codes of the mouse buttons binds can refer to.
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;
/// The "back" side button.
pub const BTN_SIDE: u32 = 0x113;
/// The "forward" side button.
pub const BTN_EXTRA: u32 = 0x114;

/// Convert XKB modifier state to our Modifiers type.
pub fn modifiers_from_state(mods: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if mods.ctrl {
        modifiers |= Modifiers::CTRL;
    }
    if mods.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if mods.alt {
        modifiers |= Modifiers::ALT;
    }
    if mods.logo {
        modifiers |= Modifiers::SUPER;
    }
    modifiers
}

pub fn trigger_for_button(button: u32) -> Option<Trigger> {
    match button {
        BTN_LEFT => Some(Trigger::MouseLeft),
        BTN_RIGHT => Some(Trigger::MouseRight),
        BTN_MIDDLE => Some(Trigger::MouseMiddle),
        BTN_SIDE => Some(Trigger::MouseBack),
        BTN_EXTRA => Some(Trigger::MouseForward),
        _ => None,
    }
}

/// Trigger for a vertical wheel amount; positive amounts scroll down.
pub fn trigger_for_wheel(amount: f64) -> Option<Trigger> {
    if amount > 0. {
        Some(Trigger::WheelScrollDown)
    } else if amount < 0. {
        Some(Trigger::WheelScrollUp)
    } else {
        None
    }
}

/// Find a configured bind matching the trigger and modifiers.
pub fn find_configured_bind<'a>(
    bindings: impl IntoIterator<Item = &'a Bind>,
    mod_key: ModKey,
    trigger: Trigger,
    mut modifiers: Modifiers,
) -> Option<Bind> {
    if modifiers.contains(mod_key.to_modifiers()) {
        modifiers |= Modifiers::COMPOSITOR;
    }

    for bind in bindings {
        if bind.key.trigger != trigger {
            continue;
        }

        let mut bind_modifiers = bind.key.modifiers;
        if bind_modifiers.contains(Modifiers::COMPOSITOR) {
            bind_modifiers |= mod_key.to_modifiers();
        } else if bind_modifiers.contains(mod_key.to_modifiers()) {
            bind_modifiers |= Modifiers::COMPOSITOR;
        }

        if bind_modifiers == modifiers {
            return Some(bind.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use endlesswm_config::{Action, Key};
    use smithay::input::keyboard::Keysym;

    use super::*;

    fn bind(key: &str, action: Action) -> Bind {
        Bind {
            key: key.parse().unwrap(),
            action,
        }
    }

    #[test]
    fn test_modifiers_from_state() {
        let mods = ModifiersState {
            ctrl: true,
            shift: true,
            ..Default::default()
        };
        let result = modifiers_from_state(mods);
        assert!(result.contains(Modifiers::CTRL));
        assert!(result.contains(Modifiers::SHIFT));
        assert!(!result.contains(Modifiers::ALT));
        assert!(!result.contains(Modifiers::SUPER));
    }

    #[test]
    fn test_modifiers_from_state_empty() {
        let result = modifiers_from_state(ModifiersState::default());
        assert!(result.is_empty());
    }

    #[test]
    fn mod_matches_configured_mod_key() {
        let binds = [bind("Mod+Up", Action::FocusWindowUp)];
        let up = Trigger::Keysym(Keysym::Up);

        let found = find_configured_bind(&binds, ModKey::Super, up, Modifiers::SUPER);
        assert_eq!(found.map(|b| b.action), Some(Action::FocusWindowUp));

        let found = find_configured_bind(&binds, ModKey::Alt, up, Modifiers::ALT);
        assert_eq!(found.map(|b| b.action), Some(Action::FocusWindowUp));

        assert!(find_configured_bind(&binds, ModKey::Alt, up, Modifiers::SUPER).is_none());
        assert!(find_configured_bind(&binds, ModKey::Super, up, Modifiers::empty()).is_none());
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let binds = [
            bind("Mod+Up", Action::FocusWindowUp),
            bind("Mod+Ctrl+Up", Action::MoveWindowUp),
        ];
        let up = Trigger::Keysym(Keysym::Up);

        let found = find_configured_bind(
            &binds,
            ModKey::Super,
            up,
            Modifiers::SUPER | Modifiers::CTRL,
        );
        assert_eq!(found.map(|b| b.action), Some(Action::MoveWindowUp));

        let found = find_configured_bind(
            &binds,
            ModKey::Super,
            up,
            Modifiers::SUPER | Modifiers::SHIFT,
        );
        assert!(found.is_none());
    }

    #[test]
    fn explicit_modifier_equal_to_mod_key() {
        let binds = [bind("Super+MouseLeft", Action::MoveWindow)];
        let found = find_configured_bind(
            &binds,
            ModKey::Super,
            Trigger::MouseLeft,
            Modifiers::SUPER,
        );
        assert_eq!(found.map(|b| b.key), Some("Super+MouseLeft".parse::<Key>().unwrap()));
    }

    #[test]
    fn button_and_wheel_triggers() {
        assert_eq!(trigger_for_button(BTN_LEFT), Some(Trigger::MouseLeft));
        assert_eq!(trigger_for_button(BTN_EXTRA), Some(Trigger::MouseForward));
        assert_eq!(trigger_for_button(0x200), None);

        assert_eq!(trigger_for_wheel(15.), Some(Trigger::WheelScrollDown));
        assert_eq!(trigger_for_wheel(-1.), Some(Trigger::WheelScrollUp));
        assert_eq!(trigger_for_wheel(0.), None);
    }
}
