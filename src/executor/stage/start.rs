//! Start stage: wait for the game to begin and vet the active chest.

use super::{ExecutorStage, StageKey, generic_failure, notify_failure};
use crate::bot::ChatSubscription;
use crate::notify::Notifier;
use crate::protocol::{ServerEvent, classify};
use crate::request::{ChestMode, RequestQueue};
use crate::session::HelpstartSession;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct StartState {
    leader_inbox: ChatSubscription,
    result: Option<StageKey>,
}

pub struct StartStage {
    notifier: Rc<dyn Notifier>,
    /// The pending-request backlog; a non-empty backlog caps how often a
    /// session may rewarp chasing a better chest.
    requests: Rc<RefCell<RequestQueue>>,
    max_failed_attempts: u32,
}

impl StartStage {
    pub fn new(
        notifier: Rc<dyn Notifier>,
        requests: Rc<RefCell<RequestQueue>>,
        max_failed_attempts: u32,
    ) -> Self {
        Self {
            notifier,
            requests,
            max_failed_attempts,
        }
    }

    /// Decide what an unwanted chest means: give up if the session has used
    /// its attempts while others wait, otherwise loop back and rewarp.
    fn handle_chest_miss(&self, session: &HelpstartSession, state: &mut StartState) {
        let others_waiting = !self.requests.borrow().is_empty();
        if others_waiting {
            let failures = session.chest_failures.get() + 1;
            session.chest_failures.set(failures);
            if failures >= self.max_failed_attempts {
                session
                    .leader
                    .chat("There are other people waiting in the queue, please try again.");
                self.notifier.notify(
                    &session.request,
                    &format!(
                        "{}, there are other people waiting in the queue, please try again.",
                        session.request.requester
                    ),
                );
                state.result = Some(StageKey::Completion);
                return;
            }
        }
        state.result = Some(StageKey::Warp);
    }
}

impl ExecutorStage for StartStage {
    type State = StartState;

    fn create_state(&self, session: &HelpstartSession) -> StartState {
        StartState {
            leader_inbox: session.leader.subscribe_chat(),
            result: None,
        }
    }

    fn update(&self, session: &HelpstartSession, state: &mut StartState) {
        if state.result.is_some() {
            return;
        }
        for message in state.leader_inbox.drain() {
            let Some(event) = classify(&message.plain) else {
                continue;
            };
            if let Some(reason) = generic_failure(&event) {
                notify_failure(self.notifier.as_ref(), &session.request, reason);
                state.result = Some(StageKey::Completion);
                return;
            }
            match event {
                ServerEvent::PlayerQuit => {
                    notify_failure(
                        self.notifier.as_ref(),
                        &session.request,
                        "because someone quit the game.",
                    );
                    state.result = Some(StageKey::Completion);
                    return;
                }
                ServerEvent::SelfRejoin | ServerEvent::OtherRejoin => {
                    state.result = Some(StageKey::Rejoin);
                    return;
                }
                ServerEvent::GameJoin => {
                    session.leader.chat("/party warp");
                    session.leader.chat("/party warp");
                    session.leader.set_difficulty(session.request.difficulty);
                }
                ServerEvent::GameStart => {
                    let map = session.request.map;
                    if map.chests().is_empty() || session.request.chest_mode == ChestMode::None {
                        state.result = Some(StageKey::Completion);
                        return;
                    }
                    session.leader.check_chest(map);
                }
                ServerEvent::ChestHint { area } => {
                    let listed = session
                        .request
                        .chests
                        .iter()
                        .any(|chest| chest.display_name().eq_ignore_ascii_case(&area));
                    let wants_listed = session.request.chest_mode == ChestMode::Whitelist;
                    if listed == wants_listed {
                        state.result = Some(StageKey::Completion);
                    } else {
                        self.handle_chest_miss(session, state);
                    }
                    return;
                }
                _ => {}
            }
        }
    }

    fn result(&self, state: &StartState) -> Option<StageKey> {
        state.result
    }
}
