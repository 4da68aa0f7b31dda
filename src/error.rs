//! Error types for the helpstart core.
//!
//! Uses thiserror for derive macros. Resource exhaustion
//! ([`HelpstartError::NotEnoughBots`]) is an expected "not yet" condition for
//! the scheduling loop; the remaining variants indicate caller mistakes.

use thiserror::Error;

/// Main error type for helpstart operations.
#[derive(Error, Debug)]
pub enum HelpstartError {
    /// `pop` was called on an empty priority queue. Callers must check
    /// `peek`/`len` first, so this is a programming error.
    #[error("priority queue is empty")]
    EmptyQueue,

    /// A reservation asked for more bots than are currently available.
    /// The pool is left unchanged; retry on a later tick.
    #[error("not enough available bots: requested {requested}, available {available}")]
    NotEnoughBots { requested: usize, available: usize },

    /// A bot with the same identifier is already registered in the pool.
    #[error("bot {0} is already registered")]
    BotAlreadyRegistered(String),

    /// The bot must be connected before it can join the pool.
    #[error("bot {0} is not connected")]
    BotNotConnected(String),

    /// A session cannot be built from a transaction holding no bots.
    #[error("transaction holds no bots, cannot pick a leader")]
    EmptyTransaction,
}

/// Result type alias for helpstart operations.
pub type Result<T> = std::result::Result<T, HelpstartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_bots_message_names_both_counts() {
        let err = HelpstartError::NotEnoughBots {
            requested: 3,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "not enough available bots: requested 3, available 1"
        );
    }

    #[test]
    fn bot_errors_name_the_bot() {
        let err = HelpstartError::BotAlreadyRegistered("bot-1".to_string());
        assert_eq!(err.to_string(), "bot bot-1 is already registered");

        let err = HelpstartError::BotNotConnected("bot-2".to_string());
        assert_eq!(err.to_string(), "bot bot-2 is not connected");
    }

    #[test]
    fn empty_queue_message() {
        assert_eq!(
            HelpstartError::EmptyQueue.to_string(),
            "priority queue is empty"
        );
    }
}
