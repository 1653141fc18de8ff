//! One inbound turn: a caller identity plus whatever they keyed in.

use crate::ids::CallerId;

/// The ephemeral input of a single caller-keypress-to-response cycle.
///
/// The telephony provider issues one HTTP callback per gather; the first
/// callback of a call carries no keypress at all. An empty `Digits`
/// parameter is normalized to `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// Who is calling.
    pub caller: CallerId,
    /// What they pressed, if anything.
    pub keypress: Option<String>,
}

impl Turn {
    /// Build a turn, normalizing an empty keypress to absent.
    pub fn new(caller: CallerId, keypress: Option<String>) -> Self {
        let keypress = keypress.filter(|k| !k.is_empty());
        Self { caller, keypress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keypress_normalized_to_none() {
        let turn = Turn::new(CallerId::from_number("+1555"), Some(String::new()));
        assert_eq!(turn.keypress, None);
    }

    #[test]
    fn keypress_preserved() {
        let turn = Turn::new(CallerId::from_number("+1555"), Some("1234".into()));
        assert_eq!(turn.keypress.as_deref(), Some("1234"));
    }
}
