//! Wire protocol for the outbound game-server connection.
//!
//! Every frame is a JSON envelope of the form
//! `{ "payload_type": "...", "payload": { ... } }`. The envelope is modeled
//! as a tagged enum rather than free-form maps so malformed payloads cannot
//! be constructed.

use serde::{Deserialize, Serialize};

use crate::ids::{CallerId, GameCode};
use crate::keypad::Direction;

/// A message sent to the game server over the relay connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "payload_type", content = "payload")]
pub enum GameMessage {
    /// Join a game session.
    #[serde(rename = "game:join")]
    Join {
        /// The caller's identity.
        user_id: String,
        /// The game code the caller entered.
        game_id: String,
    },

    /// Move the caller's character.
    #[serde(rename = "game:move")]
    Move {
        /// The caller's identity.
        user_id: String,
        /// The game code the caller entered.
        game_id: String,
        /// Movement direction.
        direction: Direction,
    },
}

impl GameMessage {
    /// Build a `game:join` envelope.
    pub fn join(caller: &CallerId, code: &GameCode) -> Self {
        Self::Join {
            user_id: caller.as_str().to_string(),
            game_id: code.as_str().to_string(),
        }
    }

    /// Build a `game:move` envelope.
    pub fn game_move(caller: &CallerId, code: &GameCode, direction: Direction) -> Self {
        Self::Move {
            user_id: caller.as_str().to_string(),
            game_id: code.as_str().to_string(),
            direction,
        }
    }
}
