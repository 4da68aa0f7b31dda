//! Ticks every active session through its stage machine.
//!
//! The executor owns the active executions. One call to
//! [`HelpstartExecutor::update`] is one tick: terminated executions are
//! reaped first (releasing
//! their bot reservations), then every remaining execution advances in
//! creation order. Stage callbacks never block, so a tick's cost is bounded
//! by chat-inbox processing.

use crate::notify::Notifier;
use crate::request::RequestQueue;
use crate::session::HelpstartSession;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

pub mod stage;

pub use stage::{ExecutionStep, StageKey, StageSet};

/// Stable handle to one active execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionId(u64);

/// One session plus its current stage step.
#[derive(Debug)]
pub struct PendingExecution {
    id: ExecutionId,
    session: HelpstartSession,
    step: ExecutionStep,
}

impl PendingExecution {
    pub fn id(&self) -> ExecutionId {
        self.id
    }

    pub fn session(&self) -> &HelpstartSession {
        &self.session
    }

    pub fn stage(&self) -> StageKey {
        self.step.key()
    }
}

pub struct HelpstartExecutor {
    stages: StageSet,
    notifier: Rc<dyn Notifier>,
    ongoing: Vec<PendingExecution>,
    next_id: u64,
}

impl HelpstartExecutor {
    pub fn new(
        notifier: Rc<dyn Notifier>,
        requests: Rc<RefCell<RequestQueue>>,
        max_failed_attempts: u32,
        rng: StdRng,
    ) -> Self {
        Self {
            stages: StageSet::new(Rc::clone(&notifier), requests, max_failed_attempts, rng),
            notifier,
            ongoing: Vec::new(),
            next_id: 0,
        }
    }

    /// Admit a session: enter the invite stage and tell the requester who
    /// will send the invites.
    pub fn execute(&mut self, session: HelpstartSession) -> ExecutionId {
        let id = ExecutionId(self.next_id);
        self.next_id += 1;

        let message = format!(
            "{}, {} will invite you to the party.",
            session.request.requester,
            session.leader_name()
        );
        self.notifier.notify(&session.request, &message);
        log::info!(
            "starting execution {:?} for {} on {}",
            id,
            session.request.requester,
            session.request.map
        );

        let step = self.stages.enter(&session, StageKey::Invite);
        self.ongoing.push(PendingExecution { id, session, step });
        id
    }

    /// One scheduling tick.
    pub fn update(&mut self) {
        self.clear_terminated();
        self.update_ongoing();
    }

    /// Reap executions that are done or have lost a bot, releasing their
    /// reservations.
    fn clear_terminated(&mut self) {
        let stages = &self.stages;
        self.ongoing.retain_mut(|execution| {
            let done = stages.should_terminate(&execution.step)
                || execution
                    .session
                    .transaction
                    .bots()
                    .iter()
                    .any(|bot| !bot.connected());
            if done {
                log::info!("terminating execution {:?}", execution.id);
                stages.end(&execution.session, &mut execution.step);
                execution.session.transaction.end();
            }
            !done
        });
    }

    fn update_ongoing(&mut self) {
        let stages = &self.stages;
        for execution in self.ongoing.iter_mut() {
            let disconnected = execution
                .session
                .transaction
                .bots()
                .iter()
                .any(|bot| !bot.connected());
            if disconnected {
                // A lost bot is fatal to the session. Swap straight into a
                // completion step without running either stage's exit or
                // entry hooks; the next tick reaps it.
                execution.step =
                    stages.create_step(&execution.session, StageKey::Completion);
                continue;
            }

            stages.update(&execution.session, &mut execution.step);
            if let Some(next) = stages.result(&execution.step) {
                stages.end(&execution.session, &mut execution.step);
                execution.step = stages.enter(&execution.session, next);
            }
        }
    }

    /// The active executions, in creation order.
    pub fn executions(&self) -> &[PendingExecution] {
        &self.ongoing
    }

    /// Cooperatively cancel one execution: it runs its completion stage and
    /// drains the teardown delay before being reaped.
    pub fn cancel(&mut self, id: ExecutionId) {
        let stages = &self.stages;
        if let Some(execution) = self.ongoing.iter_mut().find(|e| e.id == id) {
            if execution.step.key() != StageKey::Completion {
                stages.end(&execution.session, &mut execution.step);
                execution.step = stages.enter(&execution.session, StageKey::Completion);
            }
        }
    }

    /// Cancel every active execution.
    pub fn cancel_all(&mut self) {
        let stages = &self.stages;
        for execution in self.ongoing.iter_mut() {
            if execution.step.key() != StageKey::Completion {
                stages.end(&execution.session, &mut execution.step);
                execution.step = stages.enter(&execution.session, StageKey::Completion);
            }
        }
    }
}

impl std::fmt::Debug for HelpstartExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpstartExecutor")
            .field("ongoing", &self.ongoing.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
