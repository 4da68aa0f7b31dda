//! Warp stage: pull the assembled party into a fresh game.

use super::{ExecutorStage, StageKey, generic_failure, notify_failure};
use crate::bot::ChatSubscription;
use crate::notify::Notifier;
use crate::protocol::{ServerEvent, classify};
use crate::session::HelpstartSession;
use std::rc::Rc;

#[derive(Debug)]
pub struct WarpState {
    ticks: u32,
    leader_inbox: ChatSubscription,
    result: Option<StageKey>,
}

pub struct WarpStage {
    notifier: Rc<dyn Notifier>,
}

impl WarpStage {
    pub fn new(notifier: Rc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl ExecutorStage for WarpStage {
    type State = WarpState;

    fn create_state(&self, session: &HelpstartSession) -> WarpState {
        WarpState {
            ticks: 0,
            leader_inbox: session.leader.subscribe_chat(),
            result: None,
        }
    }

    fn start(&self, session: &HelpstartSession, _state: &mut WarpState) {
        session.leader.chat("/lobby arcade");
    }

    fn update(&self, session: &HelpstartSession, state: &mut WarpState) {
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
            if event == ServerEvent::NotEnoughServers {
                notify_failure(
                    self.notifier.as_ref(),
                    &session.request,
                    "because there are not enough available servers.",
                );
                state.result = Some(StageKey::Completion);
                return;
            }
        }

        // A short settle delay before warping, and another before /play, so
        // the lobby hop has finished server-side.
        if state.ticks == 5 {
            session.leader.chat("/party warp");
            session.leader.chat("/party warp");
        }
        if state.ticks == 10 {
            session
                .leader
                .chat(&format!("/play {}", session.request.map.minigame_name()));
            state.result = Some(StageKey::Start);
            return;
        }
        state.ticks += 1;
    }

    fn result(&self, state: &WarpState) -> Option<StageKey> {
        state.result
    }
}
