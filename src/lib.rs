//! Helpstart: priority-scheduled session orchestration for pooled game bots.
//!
//! The crate fulfills queued "start a multiplayer game" requests by reserving
//! automated bots from a pool and driving each reservation through a scripted
//! multi-step party protocol against the game server, using the server's
//! outgoing chat feed as the only observable signal.
//!
//! The crate is a library with a purely in-process boundary. Three
//! collaborators are supplied from outside:
//!
//! - the request intake, which pushes validated [`request::HelpstartRequest`]
//!   values into the scheduler,
//! - the bot transport, which implements the [`bot::Bot`] capability and
//!   delivers incoming chat as [`bot::ChatMessage`] events,
//! - a fixed-interval clock that drives [`scheduler::HelpstartScheduler::tick`].
//!
//! Everything else lives here: the priority queue, the bot pool with its
//! exclusivity guarantees, and the stage state machine that advances each
//! session from invite through warp, start, rejoin and completion.

pub mod bot;
pub mod error;
pub mod executor;
pub mod game;
pub mod notify;
pub mod protocol;
pub mod queue;
pub mod request;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod test_support;
