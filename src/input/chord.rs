//! The back and forward mouse buttons double as a momentary mod key.
//!
//! Holding one of them makes the other binds behave as if the mod key was held. Pressing and
//! releasing one without triggering anything delivers the click to the client after all.

use super::binds::{BTN_EXTRA, BTN_SIDE};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChordState {
    #[default]
    Unpressed,
    Pressed,
    /// Still held, and used as a modifier for a bind at least once.
    ActionPerformed,
}

/// What to do with the release of a chord button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordRelease {
    /// The press was held back; deliver the whole click now.
    Replay,
    /// The press was consumed by a bind.
    Swallow,
    /// The press was never seen as a chord; handle the release normally.
    Forward,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseChords {
    back: ChordState,
    forward: ChordState,
}

impl MouseChords {
    pub fn handles(button: u32) -> bool {
        matches!(button, BTN_SIDE | BTN_EXTRA)
    }

    fn slot(&mut self, button: u32) -> Option<&mut ChordState> {
        match button {
            BTN_SIDE => Some(&mut self.back),
            BTN_EXTRA => Some(&mut self.forward),
            _ => None,
        }
    }

    /// Records a press. Returns `false` for buttons that aren't chord buttons.
    pub fn press(&mut self, button: u32) -> bool {
        let Some(slot) = self.slot(button) else {
            return false;
        };
        *slot = ChordState::Pressed;
        true
    }

    pub fn release(&mut self, button: u32) -> ChordRelease {
        let Some(slot) = self.slot(button) else {
            return ChordRelease::Forward;
        };
        match std::mem::take(slot) {
            ChordState::Unpressed => ChordRelease::Forward,
            ChordState::Pressed => ChordRelease::Replay,
            ChordState::ActionPerformed => ChordRelease::Swallow,
        }
    }

    /// Whether any chord button is currently held.
    pub fn is_held(&self) -> bool {
        self.back != ChordState::Unpressed || self.forward != ChordState::Unpressed
    }

    /// Marks held chord buttons as consumed.
    pub fn action_performed(&mut self) {
        for slot in [&mut self.back, &mut self.forward] {
            if *slot == ChordState::Pressed {
                *slot = ChordState::ActionPerformed;
            }
        }
    }
}
