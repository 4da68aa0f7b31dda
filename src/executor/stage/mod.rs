//! The per-session stage machine.
//!
//! A session moves through a fixed set of stages: invite the party, warp it
//! into a game, wait for the start, optionally wait out a rejoin, then tear
//! down. Each stage is a stateless handler paired with a per-visit state
//! struct; the executor owns the state and drives the handler once per tick.
//!
//! Stage handlers never block and never talk back to the caller directly:
//! they send fire-and-forget chat lines, read classified events from inboxes
//! opened on entry, and communicate progress by setting a result key.

use crate::notify::Notifier;
use crate::protocol::ServerEvent;
use crate::request::{HelpstartRequest, RequestQueue};
use crate::session::HelpstartSession;
use rand::rngs::StdRng;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

mod completion;
mod invite;
mod rejoin;
mod start;
mod warp;

pub use completion::{CompletionStage, CompletionState};
pub use invite::{InviteStage, InviteState};
pub use rejoin::{REJOIN_MESSAGES, RejoinStage, RejoinState};
pub use start::{StartStage, StartState};
pub use warp::{WarpStage, WarpState};

/// Identifies one stage of a session's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKey {
    Invite,
    Warp,
    Start,
    Rejoin,
    Completion,
}

impl StageKey {
    pub fn display_name(self) -> &'static str {
        match self {
            StageKey::Invite => "Invite",
            StageKey::Warp => "Warp",
            StageKey::Start => "Start",
            StageKey::Rejoin => "Rejoin",
            StageKey::Completion => "Completion",
        }
    }
}

impl std::fmt::Display for StageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One stage handler. Handlers hold configuration only; everything that
/// changes per session lives in the associated `State`, created fresh on
/// every entry into the stage.
pub trait ExecutorStage {
    type State;

    /// Build the state for one visit to this stage.
    fn create_state(&self, session: &HelpstartSession) -> Self::State;

    /// Runs once on entry, before the first `update`.
    fn start(&self, _session: &HelpstartSession, _state: &mut Self::State) {}

    /// Runs once per tick while the stage is current.
    fn update(&self, _session: &HelpstartSession, _state: &mut Self::State) {}

    /// Runs once on a normal exit. Not called when a disconnect forces the
    /// execution straight into completion.
    fn end(&self, _session: &HelpstartSession, _state: &mut Self::State) {}

    /// The stage to move to, if this visit has decided one.
    fn result(&self, state: &Self::State) -> Option<StageKey>;

    /// Whether the whole execution should be torn down.
    fn should_terminate(&self, _state: &Self::State) -> bool {
        false
    }
}

/// A stage plus its live per-visit state.
#[derive(Debug)]
pub enum ExecutionStep {
    Invite(InviteState),
    Warp(WarpState),
    Start(StartState),
    Rejoin(RejoinState),
    Completion(CompletionState),
}

impl ExecutionStep {
    pub fn key(&self) -> StageKey {
        match self {
            ExecutionStep::Invite(_) => StageKey::Invite,
            ExecutionStep::Warp(_) => StageKey::Warp,
            ExecutionStep::Start(_) => StageKey::Start,
            ExecutionStep::Rejoin(_) => StageKey::Rejoin,
            ExecutionStep::Completion(_) => StageKey::Completion,
        }
    }
}

/// The full set of stage handlers, dispatching on [`ExecutionStep`].
pub struct StageSet {
    invite: InviteStage,
    warp: WarpStage,
    start: StartStage,
    rejoin: RejoinStage,
    completion: CompletionStage,
}

impl StageSet {
    pub fn new(
        notifier: Rc<dyn Notifier>,
        requests: Rc<RefCell<RequestQueue>>,
        max_failed_attempts: u32,
        rng: StdRng,
    ) -> Self {
        Self {
            invite: InviteStage::new(Rc::clone(&notifier)),
            warp: WarpStage::new(Rc::clone(&notifier)),
            start: StartStage::new(notifier, requests, max_failed_attempts),
            rejoin: RejoinStage::new(rng),
            completion: CompletionStage,
        }
    }

    /// Build a fresh step for `key` without starting it.
    pub fn create_step(&self, session: &HelpstartSession, key: StageKey) -> ExecutionStep {
        match key {
            StageKey::Invite => ExecutionStep::Invite(self.invite.create_state(session)),
            StageKey::Warp => ExecutionStep::Warp(self.warp.create_state(session)),
            StageKey::Start => ExecutionStep::Start(self.start.create_state(session)),
            StageKey::Rejoin => ExecutionStep::Rejoin(self.rejoin.create_state(session)),
            StageKey::Completion => {
                ExecutionStep::Completion(self.completion.create_state(session))
            }
        }
    }

    /// Build and start a step for `key`.
    pub fn enter(&self, session: &HelpstartSession, key: StageKey) -> ExecutionStep {
        let mut step = self.create_step(session, key);
        self.start(session, &mut step);
        step
    }

    pub fn start(&self, session: &HelpstartSession, step: &mut ExecutionStep) {
        match step {
            ExecutionStep::Invite(state) => self.invite.start(session, state),
            ExecutionStep::Warp(state) => self.warp.start(session, state),
            ExecutionStep::Start(state) => self.start.start(session, state),
            ExecutionStep::Rejoin(state) => self.rejoin.start(session, state),
            ExecutionStep::Completion(state) => self.completion.start(session, state),
        }
    }

    pub fn update(&self, session: &HelpstartSession, step: &mut ExecutionStep) {
        match step {
            ExecutionStep::Invite(state) => self.invite.update(session, state),
            ExecutionStep::Warp(state) => self.warp.update(session, state),
            ExecutionStep::Start(state) => self.start.update(session, state),
            ExecutionStep::Rejoin(state) => self.rejoin.update(session, state),
            ExecutionStep::Completion(state) => self.completion.update(session, state),
        }
    }

    pub fn end(&self, session: &HelpstartSession, step: &mut ExecutionStep) {
        match step {
            ExecutionStep::Invite(state) => self.invite.end(session, state),
            ExecutionStep::Warp(state) => self.warp.end(session, state),
            ExecutionStep::Start(state) => self.start.end(session, state),
            ExecutionStep::Rejoin(state) => self.rejoin.end(session, state),
            ExecutionStep::Completion(state) => self.completion.end(session, state),
        }
    }

    pub fn result(&self, step: &ExecutionStep) -> Option<StageKey> {
        match step {
            ExecutionStep::Invite(state) => self.invite.result(state),
            ExecutionStep::Warp(state) => self.warp.result(state),
            ExecutionStep::Start(state) => self.start.result(state),
            ExecutionStep::Rejoin(state) => self.rejoin.result(state),
            ExecutionStep::Completion(state) => self.completion.result(state),
        }
    }

    pub fn should_terminate(&self, step: &ExecutionStep) -> bool {
        match step {
            ExecutionStep::Invite(state) => self.invite.should_terminate(state),
            ExecutionStep::Warp(state) => self.warp.should_terminate(state),
            ExecutionStep::Start(state) => self.start.should_terminate(state),
            ExecutionStep::Rejoin(state) => self.rejoin.should_terminate(state),
            ExecutionStep::Completion(state) => self.completion.should_terminate(state),
        }
    }
}

impl std::fmt::Debug for StageSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StageSet")
    }
}

/// The failure cause signalled by `event`, if it is one of the causes every
/// non-terminal stage reacts to.
pub(crate) fn generic_failure(event: &ServerEvent) -> Option<&'static str> {
    match event {
        ServerEvent::RateLimited => Some("because of Hypixel ratelimiting commands."),
        ServerEvent::PartyDisconnected => Some("because someone disconnected."),
        ServerEvent::PartyLeft => Some("because someone left the party."),
        ServerEvent::KickedWhileJoining => Some("due to being kicked while joining a game."),
        _ => None,
    }
}

/// Send the requester the standard failure message for `reason`.
pub(crate) fn notify_failure(notifier: &dyn Notifier, request: &HelpstartRequest, reason: &str) {
    notifier.notify(
        request,
        &format!("{}, failed to helpstart {}", request.requester, reason),
    );
}
