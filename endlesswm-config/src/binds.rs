use std::str::FromStr;

use bitflags::bitflags;
use knuffel::errors::DecodeError;
use knuffel::Decode as _;
use miette::miette;
use smithay::input::keyboard::keysyms::KEY_NoSymbol;
use smithay::input::keyboard::xkb::{keysym_from_name, KEYSYM_CASE_INSENSITIVE};
use smithay::input::keyboard::Keysym;

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Binds(#[knuffel(children)] pub Vec<Bind>);

#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    pub key: Key,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub trigger: Trigger,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Keysym(Keysym),
    MouseLeft,
    MouseRight,
    MouseMiddle,
    MouseBack,
    MouseForward,
    WheelScrollDown,
    WheelScrollUp,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 1;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
        /// Stands for whichever modifier `input.mod-key` selects.
        const COMPOSITOR = 1 << 4;
    }
}

/// The real modifier that `Mod` refers to in binds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ModKey {
    Ctrl,
    Shift,
    Alt,
    #[default]
    Super,
}

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Spawn(#[knuffel(arguments)] Vec<String>),
    CloseWindow,
    FocusWindowUp,
    FocusWindowDown,
    FocusWindowLeft,
    FocusWindowRight,
    MoveWindowUp,
    MoveWindowDown,
    MoveWindowLeft,
    MoveWindowRight,
    MoveRowBack,
    MoveRowForward,
    /// Drag the view under the pointer (mouse binds only).
    MoveWindow,
    /// Resize the view under the pointer from its nearest edge (mouse binds only).
    ResizeWindow,
    /// Drag the row or window seam under the pointer (mouse binds only).
    ResizeEdge,
    /// Scroll the focused output's grid (wheel binds only).
    ScrollGrid,
}

impl ModKey {
    pub fn to_modifiers(&self) -> Modifiers {
        match self {
            ModKey::Ctrl => Modifiers::CTRL,
            ModKey::Shift => Modifiers::SHIFT,
            ModKey::Alt => Modifiers::ALT,
            ModKey::Super => Modifiers::SUPER,
        }
    }
}

impl FromStr for ModKey {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.to_ascii_lowercase() {
            "ctrl" | "control" => Ok(Self::Ctrl),
            "shift" => Ok(Self::Shift),
            "alt" => Ok(Self::Alt),
            "super" | "win" | "logo" => Ok(Self::Super),
            _ => Err(miette!("invalid mod key: {s}")),
        }
    }
}

impl FromStr for Key {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::empty();

        let mut split = s.split('+');
        let key = split.next_back().unwrap();

        for part in split {
            let part = part.trim();
            if part.eq_ignore_ascii_case("mod") {
                modifiers |= Modifiers::COMPOSITOR
            } else if part.eq_ignore_ascii_case("ctrl") || part.eq_ignore_ascii_case("control") {
                modifiers |= Modifiers::CTRL;
            } else if part.eq_ignore_ascii_case("shift") {
                modifiers |= Modifiers::SHIFT;
            } else if part.eq_ignore_ascii_case("alt") {
                modifiers |= Modifiers::ALT;
            } else if part.eq_ignore_ascii_case("super")
                || part.eq_ignore_ascii_case("win")
                || part.eq_ignore_ascii_case("logo")
            {
                modifiers |= Modifiers::SUPER;
            } else {
                return Err(miette!("invalid modifier: {part}"));
            }
        }

        let trigger = if key.eq_ignore_ascii_case("MouseLeft") {
            Trigger::MouseLeft
        } else if key.eq_ignore_ascii_case("MouseRight") {
            Trigger::MouseRight
        } else if key.eq_ignore_ascii_case("MouseMiddle") {
            Trigger::MouseMiddle
        } else if key.eq_ignore_ascii_case("MouseBack") {
            Trigger::MouseBack
        } else if key.eq_ignore_ascii_case("MouseForward") {
            Trigger::MouseForward
        } else if key.eq_ignore_ascii_case("WheelScrollDown") {
            Trigger::WheelScrollDown
        } else if key.eq_ignore_ascii_case("WheelScrollUp") {
            Trigger::WheelScrollUp
        } else {
            let keysym = keysym_from_name(key, KEYSYM_CASE_INSENSITIVE);
            if keysym.raw() == KEY_NoSymbol {
                return Err(miette!("invalid key: {key}"));
            }
            Trigger::Keysym(keysym)
        };

        Ok(Key { trigger, modifiers })
    }
}

impl Trigger {
    pub fn is_mouse_button(&self) -> bool {
        matches!(
            self,
            Trigger::MouseLeft
                | Trigger::MouseRight
                | Trigger::MouseMiddle
                | Trigger::MouseBack
                | Trigger::MouseForward
        )
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::Decode<S> for Bind {
    fn decode_node(
        node: &knuffel::ast::SpannedNode<S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        if let Some(type_name) = &node.type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }

        for val in node.arguments.iter() {
            ctx.emit_error(DecodeError::unexpected(
                &val.literal,
                "argument",
                "no arguments expected for this node",
            ));
        }

        for name in node.properties.keys() {
            ctx.emit_error(DecodeError::unexpected(
                name,
                "property",
                format!("unexpected property `{}`", name.escape_default()),
            ));
        }

        let key = node
            .node_name
            .parse::<Key>()
            .map_err(|err| DecodeError::conversion(&node.node_name, err.wrap_err("invalid keybind")))?;

        let mut children = node.children();

        let Some(child) = children.next() else {
            return Err(DecodeError::missing(
                node,
                "expected an action for this keybind",
            ));
        };

        for unwanted_child in children {
            ctx.emit_error(DecodeError::unexpected(
                unwanted_child,
                "node",
                "only one action is allowed per keybind",
            ));
        }

        let action = Action::decode_node(child, ctx)?;
        Ok(Self { key, action })
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for ModKey {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<ModKey, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) => match s.parse() {
                Ok(mod_key) => Ok(mod_key),
                Err(err) => {
                    ctx.emit_error(DecodeError::conversion(val, err));
                    Ok(ModKey::default())
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(val, "mod key must be a string"));
                Ok(ModKey::default())
            }
        }
    }
}
