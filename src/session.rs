//! A request bound to its bot reservation.

use crate::bot::{BotTransaction, SharedBot};
use crate::error::{HelpstartError, Result};
use crate::request::HelpstartRequest;
use std::cell::Cell;
use std::rc::Rc;

/// A request bound to a reservation and a designated leader. Immutable once
/// constructed; lives exactly as long as its execution.
pub struct HelpstartSession {
    pub request: Rc<HelpstartRequest>,
    pub transaction: BotTransaction,
    /// The first reserved bot. It fronts the party: sends the invites,
    /// warps, and reads the game's feed.
    pub leader: SharedBot,
    /// Chest mismatches observed so far. Monotonic for the session's
    /// lifetime; deliberately not reset when the session loops back through
    /// the warp stage.
    pub chest_failures: Cell<u32>,
}

impl HelpstartSession {
    /// Bind a request to a reservation, designating the first reserved bot
    /// as leader. Errors if the transaction holds no bots.
    pub fn new(request: Rc<HelpstartRequest>, transaction: BotTransaction) -> Result<Self> {
        let leader = transaction
            .bots()
            .first()
            .cloned()
            .ok_or(HelpstartError::EmptyTransaction)?;
        Ok(Self {
            request,
            transaction,
            leader,
            chest_failures: Cell::new(0),
        })
    }

    /// The leader's current display name, falling back to its identifier
    /// when the transport has dropped the connection.
    pub fn leader_name(&self) -> String {
        self.leader
            .username()
            .unwrap_or_else(|| self.leader.id().to_string())
    }
}

impl std::fmt::Debug for HelpstartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpstartSession")
            .field("request", &self.request)
            .field("transaction", &self.transaction)
            .field("leader", &self.leader.id())
            .field("chest_failures", &self.chest_failures.get())
            .finish()
    }
}
