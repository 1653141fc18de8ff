//! DTMF keypad semantics: the fixed digit→direction table and the cancel
//! marker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The keypress that tears down the caller's session, valid in any state.
pub const CANCEL_MARKER: char = '*';

/// A movement direction in the game world.
///
/// Serialized UPPERCASE on the wire, matching what the game server expects
/// in `game:move` payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Up (keypad 2).
    Up,
    /// Down (keypad 8 or 0).
    Down,
    /// Left (keypad 4).
    Left,
    /// Right (keypad 6).
    Right,
}

impl Direction {
    /// Map a single keypad character to a direction.
    ///
    /// The table is fixed: `2→UP, 8→DOWN, 0→DOWN, 4→LEFT, 6→RIGHT`.
    /// Everything else (including 1, 3, 5, 7, 9) is unmapped and returns
    /// `None`, which the turn processor treats as a terminal move.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '2' => Some(Self::Up),
            '8' | '0' => Some(Self::Down),
            '4' => Some(Self::Left),
            '6' => Some(Self::Right),
            _ => None,
        }
    }

    /// The wire/spoken form ("UP", "DOWN", "LEFT", "RIGHT").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_keys_are_stable() {
        assert_eq!(Direction::from_key('2'), Some(Direction::Up));
        assert_eq!(Direction::from_key('8'), Some(Direction::Down));
        assert_eq!(Direction::from_key('0'), Some(Direction::Down));
        assert_eq!(Direction::from_key('4'), Some(Direction::Left));
        assert_eq!(Direction::from_key('6'), Some(Direction::Right));
    }

    #[test]
    fn odd_digits_are_unmapped() {
        for key in ['1', '3', '5', '7', '9'] {
            assert_eq!(Direction::from_key(key), None, "key {key}");
        }
    }

    #[test]
    fn non_digits_are_unmapped() {
        assert_eq!(Direction::from_key('#'), None);
        assert_eq!(Direction::from_key('a'), None);
        assert_eq!(Direction::from_key(CANCEL_MARKER), None);
    }

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Up).unwrap(),
            "\"UP\""
        );
        assert_eq!(
            serde_json::to_string(&Direction::Left).unwrap(),
            "\"LEFT\""
        );
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Direction::Right.to_string(), "RIGHT");
    }
}
