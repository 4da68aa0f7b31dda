//! Bot capability surface.
//!
//! The core never talks to the game server directly. It drives bots through
//! the [`Bot`] trait: fire-and-forget outbound primitives plus an inbox of
//! classified chat lines. The transport implementing the trait owns the
//! connection lifecycle; the core only observes `connected()`.
//!
//! Chat delivery uses scoped subscriptions: a stage calls
//! [`Bot::subscribe_chat`] on entry, drains the returned inbox once per tick,
//! and simply drops it on exit; dropping the receiver is what cancels
//! delivery, so no exit path can leak a listener.

use crate::game::{GameDifficulty, GameMap};
use std::rc::Rc;
use std::sync::mpsc;

mod pool;
#[cfg(test)]
mod tests;

pub use pool::{BotPool, BotTransaction};

/// A single line from a bot's incoming chat feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// The line with all formatting stripped; everything the core classifies.
    pub plain: String,
    /// The rendered form (color codes intact), kept for operator logs.
    pub ansi: String,
}

impl ChatMessage {
    pub fn new(plain: impl Into<String>, ansi: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            ansi: ansi.into(),
        }
    }
}

/// One automated participant, as seen by the core.
///
/// Bots are shared as `Rc<dyn Bot>`: the pool holds the canonical registry
/// while sessions hold reservations. All methods are callable through a
/// shared reference; implementations use interior mutability where needed.
pub trait Bot {
    /// Stable identifier, valid across reconnects.
    fn id(&self) -> &str;

    /// The transport-assigned display name; `Some` only while connected.
    fn username(&self) -> Option<String>;

    /// Whether the transport currently holds a live connection.
    fn connected(&self) -> bool;

    /// Queue one chat line for sending. Fire-and-forget: any response
    /// arrives later through the chat feed.
    fn chat(&self, line: &str);

    /// Interact with the map's chest to trigger the server's chest hint.
    fn check_chest(&self, map: GameMap);

    /// Open the difficulty menu and pick the given difficulty.
    fn set_difficulty(&self, difficulty: GameDifficulty);

    /// Open a new inbox receiving every subsequent chat line.
    fn subscribe_chat(&self) -> ChatSubscription;
}

/// Convenience alias for the shared bot handle.
pub type SharedBot = Rc<dyn Bot>;

/// An inbox of chat lines, created by [`Bot::subscribe_chat`].
///
/// Dropping the subscription cancels delivery; the transport prunes senders
/// whose receiver is gone.
pub struct ChatSubscription {
    rx: mpsc::Receiver<ChatMessage>,
}

impl ChatSubscription {
    /// Create a connected sender/inbox pair. Transports keep the sender and
    /// hand out the subscription.
    pub fn channel() -> (mpsc::Sender<ChatMessage>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Take every message that arrived since the last drain, in arrival
    /// order. Never blocks.
    pub fn drain(&self) -> Vec<ChatMessage> {
        self.rx.try_iter().collect()
    }
}

impl std::fmt::Debug for ChatSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChatSubscription")
    }
}
