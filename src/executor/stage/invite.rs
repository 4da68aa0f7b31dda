//! Invite stage: assemble the party.

use super::{ExecutorStage, StageKey, generic_failure, notify_failure};
use crate::bot::ChatSubscription;
use crate::notify::Notifier;
use crate::protocol::{ServerEvent, classify};
use crate::session::HelpstartSession;
use std::rc::Rc;

#[derive(Debug)]
pub struct InviteState {
    /// Party joins still outstanding: players plus non-leader bots.
    expected: usize,
    accepted: usize,
    leader_inbox: ChatSubscription,
    /// One inbox per non-leader bot, aligned with the transaction's bot
    /// list starting at index 1.
    bot_inboxes: Vec<ChatSubscription>,
    result: Option<StageKey>,
}

pub struct InviteStage {
    notifier: Rc<dyn Notifier>,
}

impl InviteStage {
    pub fn new(notifier: Rc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    fn fail(&self, session: &HelpstartSession, state: &mut InviteState, reason: &str) {
        notify_failure(self.notifier.as_ref(), &session.request, reason);
        state.result = Some(StageKey::Completion);
    }
}

impl ExecutorStage for InviteStage {
    type State = InviteState;

    fn create_state(&self, session: &HelpstartSession) -> InviteState {
        let bots = session.transaction.bots();
        InviteState {
            expected: session.request.players.len() + bots.len() - 1,
            accepted: 0,
            leader_inbox: session.leader.subscribe_chat(),
            bot_inboxes: bots.iter().skip(1).map(|bot| bot.subscribe_chat()).collect(),
            result: None,
        }
    }

    fn start(&self, session: &HelpstartSession, _state: &mut InviteState) {
        for player in &session.request.players {
            session.leader.chat(&format!("/party invite {player}"));
        }
        let leader_name = session.leader_name();
        for bot in session.transaction.bots().iter().skip(1) {
            if let Some(username) = bot.username() {
                if username != leader_name {
                    session.leader.chat(&format!("/party invite {username}"));
                }
            }
        }
        session.leader.chat("/chat party");
    }

    fn update(&self, session: &HelpstartSession, state: &mut InviteState) {
        if state.result.is_some() {
            return;
        }
        if state.accepted == state.expected {
            state.result = Some(StageKey::Warp);
            return;
        }

        // Non-leader bots accept any invite sent by the leader.
        let leader_name = session.leader_name();
        for (bot, inbox) in session
            .transaction
            .bots()
            .iter()
            .skip(1)
            .zip(&state.bot_inboxes)
        {
            for message in inbox.drain() {
                if let Some(ServerEvent::PartyInvite { inviter }) = classify(&message.plain) {
                    if inviter == leader_name {
                        bot.chat(&format!("/party join {inviter}"));
                    }
                }
            }
        }

        for message in state.leader_inbox.drain() {
            let Some(event) = classify(&message.plain) else {
                continue;
            };
            if event == ServerEvent::PartyJoin {
                state.accepted += 1;
                continue;
            }
            if let Some(reason) = generic_failure(&event) {
                self.fail(session, state, reason);
                return;
            }
            match event {
                ServerEvent::InviteIgnored => {
                    self.fail(session, state, "because one of the players has a bot ignored.");
                    return;
                }
                ServerEvent::InviteUnable | ServerEvent::InviteUnknown => {
                    self.fail(
                        session,
                        state,
                        "because one of the players could not be invited.",
                    );
                    return;
                }
                ServerEvent::InviteOffline => {
                    self.fail(session, state, "because a player was offline.");
                    return;
                }
                ServerEvent::InviteExpired => {
                    self.fail(session, state, "because an invite expired.");
                    return;
                }
                _ => {}
            }
        }

        // Re-check so a tick that observed the final join advances now
        // rather than one tick late.
        if state.accepted == state.expected {
            state.result = Some(StageKey::Warp);
        }
    }

    fn result(&self, state: &InviteState) -> Option<StageKey> {
        state.result
    }
}
