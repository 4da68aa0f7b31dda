//! Bot pool: registration, reservation and release.
//!
//! The pool tracks every known bot's membership in three insertion-ordered
//! collections: `online` (everything registered), `available` (idle) and
//! `busy` (reserved by a session). While a reservation is held its bots are
//! absent from `available` and present in `busy`; an identifier is never in
//! both at once.
//!
//! The sets live behind an `Rc<RefCell<..>>` shared with every outstanding
//! [`BotTransaction`], so a transaction can return its bots without holding a
//! borrow of the pool itself.

use crate::bot::SharedBot;
use crate::error::{HelpstartError, Result};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct PoolSets {
    online: Vec<SharedBot>,
    available: Vec<SharedBot>,
    busy: Vec<SharedBot>,
}

fn contains(set: &[SharedBot], id: &str) -> bool {
    set.iter().any(|bot| bot.id() == id)
}

fn remove(set: &mut Vec<SharedBot>, id: &str) -> Option<SharedBot> {
    let index = set.iter().position(|bot| bot.id() == id)?;
    Some(set.remove(index))
}

/// Registry of every known bot and its reservation state.
#[derive(Default)]
pub struct BotPool {
    sets: Rc<RefCell<PoolSets>>,
}

impl BotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected bot, making it available for reservations.
    ///
    /// The bot is sent its baseline setup lines: switch to English, leave
    /// any party it is still in, and go to the arcade lobby.
    ///
    /// Errors if the identifier is already registered or the bot is not
    /// connected.
    pub fn add_bot(&self, bot: SharedBot) -> Result<()> {
        let mut sets = self.sets.borrow_mut();
        if contains(&sets.online, bot.id()) {
            return Err(HelpstartError::BotAlreadyRegistered(bot.id().to_string()));
        }
        if !bot.connected() {
            return Err(HelpstartError::BotNotConnected(bot.id().to_string()));
        }

        bot.chat("/language english");
        bot.chat("/party disband");
        bot.chat("/lobby arcade");

        debug!(
            "registered bot {} ({})",
            bot.id(),
            bot.username().unwrap_or_default()
        );
        sets.online.push(Rc::clone(&bot));
        sets.available.push(bot);
        Ok(())
    }

    /// Reserve `count` bots, in registration order, moving them from
    /// `available` to `busy`.
    ///
    /// Errors with [`HelpstartError::NotEnoughBots`] without touching pool
    /// state when fewer than `count` bots are available.
    pub fn provide_bots(&self, count: usize) -> Result<BotTransaction> {
        let mut sets = self.sets.borrow_mut();
        if sets.available.len() < count {
            return Err(HelpstartError::NotEnoughBots {
                requested: count,
                available: sets.available.len(),
            });
        }

        let bots: Vec<SharedBot> = sets.available.drain(..count).collect();
        sets.busy.extend(bots.iter().cloned());
        debug!("reserved {} bots ({} still available)", count, sets.available.len());

        Ok(BotTransaction {
            bots,
            sets: Rc::clone(&self.sets),
            ended: Cell::new(false),
        })
    }

    /// Drop every bot whose connection has ended from all three sets.
    ///
    /// The scheduling loop calls this once per tick; reconnection and
    /// re-registration are the surrounding application's responsibility.
    pub fn sweep_disconnected(&self) {
        let mut sets = self.sets.borrow_mut();
        let gone: Vec<String> = sets
            .online
            .iter()
            .filter(|bot| !bot.connected())
            .map(|bot| bot.id().to_string())
            .collect();
        for id in &gone {
            warn!("bot {id} disconnected, dropping from pool");
            remove(&mut sets.online, id);
            remove(&mut sets.available, id);
            remove(&mut sets.busy, id);
        }
    }

    pub fn online_count(&self) -> usize {
        self.sets.borrow().online.len()
    }

    pub fn available_count(&self) -> usize {
        self.sets.borrow().available.len()
    }

    pub fn busy_count(&self) -> usize {
        self.sets.borrow().busy.len()
    }

    /// Display names of every registered bot, for status reporting.
    pub fn online_usernames(&self) -> Vec<String> {
        self.sets
            .borrow()
            .online
            .iter()
            .map(|bot| bot.username().unwrap_or_else(|| bot.id().to_string()))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn is_available(&self, id: &str) -> bool {
        contains(&self.sets.borrow().available, id)
    }

    #[cfg(test)]
    pub(crate) fn is_busy(&self, id: &str) -> bool {
        contains(&self.sets.borrow().busy, id)
    }

    #[cfg(test)]
    pub(crate) fn is_online(&self, id: &str) -> bool {
        contains(&self.sets.borrow().online, id)
    }
}

/// An exclusive reservation of bots, usable by one session at a time.
pub struct BotTransaction {
    bots: Vec<SharedBot>,
    sets: Rc<RefCell<PoolSets>>,
    ended: Cell<bool>,
}

impl BotTransaction {
    /// The reserved bots, in reservation order. The first one is the
    /// session leader.
    pub fn bots(&self) -> &[SharedBot] {
        &self.bots
    }

    /// Release the reservation. Idempotent.
    ///
    /// Still-connected bots return to `available`; bots that disconnected
    /// while reserved are purged from the pool entirely.
    pub fn end(&self) {
        if self.ended.replace(true) {
            return;
        }

        let mut sets = self.sets.borrow_mut();
        for bot in &self.bots {
            if bot.connected() {
                if let Some(bot) = remove(&mut sets.busy, bot.id()) {
                    sets.available.push(bot);
                }
            } else {
                remove(&mut sets.busy, bot.id());
                remove(&mut sets.online, bot.id());
            }
        }
        debug!(
            "released {} bots ({} now available)",
            self.bots.len(),
            sets.available.len()
        );
    }
}

impl Drop for BotTransaction {
    fn drop(&mut self) {
        self.end();
    }
}

impl std::fmt::Debug for BotTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotTransaction")
            .field("bots", &self.bots.iter().map(|b| b.id()).collect::<Vec<_>>())
            .field("ended", &self.ended.get())
            .finish()
    }
}
