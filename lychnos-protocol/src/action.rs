//! Action tokens understood by the dispatcher

// Wire tokens (case-sensitive)
const TOKEN_ON: &str = "on";
const TOKEN_OFF: &str = "off";
const TOKEN_BLINK: &str = "blink";

/// Pin actions reachable from the command grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Drive the pin high
    On,
    /// Drive the pin low
    Off,
    /// Run the fixed blink sequence on the pin
    Blink,
}

impl Action {
    /// Look up an action by its command token.
    ///
    /// Matching is case-sensitive and exact; `None` means the token is
    /// grammar-valid but names no action.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            TOKEN_ON => Some(Action::On),
            TOKEN_OFF => Some(Action::Off),
            TOKEN_BLINK => Some(Action::Blink),
            _ => None,
        }
    }

    /// The command token for this action.
    pub fn token(self) -> &'static str {
        match self {
            Action::On => TOKEN_ON,
            Action::Off => TOKEN_OFF,
            Action::Blink => TOKEN_BLINK,
        }
    }
}
