//! The turn processor's output: what to say and whether to keep gathering.

use crate::ids::GameCode;
use crate::keypad::Direction;

/// Spoken-prompt selector.
///
/// The gateway's markup renderer turns these into provider-specific voice
/// markup; the state machine itself never deals in prose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Call opened, no session yet.
    GetReady,
    /// Game code accepted and stored.
    CodeSet(GameCode),
    /// Move accepted and relayed.
    Moving(Direction),
    /// Keypress was not a single digit.
    InvalidInput,
    /// Single digit with no mapped direction; the call ends.
    InvalidMove,
    /// Session torn down at the caller's request; the call ends.
    SessionRemoved,
    /// Caller redialed while their session was still live.
    WelcomeBack,
}

/// The ephemeral output of processing one [`Turn`](crate::turn::Turn).
///
/// `terminate` selects between "speak and end call" and "speak and gather
/// the next keypress". `first_turn` only drives supplementary instructional
/// text (the control-scheme reminder) in the renderer; it has no effect on
/// state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// What to say.
    pub prompt: Prompt,
    /// End the call after speaking instead of gathering another keypress.
    pub terminate: bool,
    /// This is the first turn of the current call.
    pub first_turn: bool,
}

impl Directive {
    /// A non-terminating directive that gathers the next keypress.
    pub fn gather(prompt: Prompt) -> Self {
        Self {
            prompt,
            terminate: false,
            first_turn: false,
        }
    }

    /// A terminating directive; the call ends after the prompt.
    pub fn hangup(prompt: Prompt) -> Self {
        Self {
            prompt,
            terminate: true,
            first_turn: false,
        }
    }

    /// Mark this directive as the first turn of the call.
    pub fn first_turn(mut self) -> Self {
        self.first_turn = true;
        self
    }
}
