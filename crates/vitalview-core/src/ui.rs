//! Ports for the chat widget's page elements.

use crate::conversation::Turn;

/// The text box the user types into.
pub trait InputField: Send + Sync {
    fn clear(&self);
}

/// The scrollable list of message bubbles.
pub trait MessageLog: Send + Sync {
    /// Renders a turn at the end of the log and scrolls to it.
    fn push(&self, turn: &Turn);
}
