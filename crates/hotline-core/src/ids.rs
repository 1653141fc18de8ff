//! Branded identifier newtypes.
//!
//! Plain `String`s invite key mix-ups in the registry; these newtypes make
//! the caller identity and the game code distinct types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, opaque identity of a caller across per-keypress callbacks.
///
/// Derived from the telephony provider's caller-number field as
/// `"{number}:caller"`, lowercased. The `:caller` role suffix scopes the
/// registry namespace so future non-caller identities (e.g. browser
/// clients on the game side) cannot collide with phone callers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Build a caller identity from the provider's raw caller-number field.
    pub fn from_number(number: &str) -> Self {
        Self(format!("{}:caller", number.trim()).to_lowercase())
    }

    /// The identity as a string slice (used in connection targets and
    /// wire messages).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The numeric game code a caller keyed in.
///
/// No validation beyond non-emptiness happens here; the game server owns
/// code semantics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(String);

impl GameCode {
    /// Wrap a raw digit string as a game code.
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code with digits separated by spaces, for spoken prompts
    /// ("1234" → "1 2 3 4").
    pub fn spoken(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2);
        for (i, ch) in self.0.chars().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GameCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
