//! Completion stage: hand the party back and release the bots.

use super::{ExecutorStage, StageKey};
use crate::session::HelpstartSession;

/// Ticks to linger so the teardown chat lines flush before the bots are
/// returned to the pool.
const TEARDOWN_TICKS: u32 = 10;

#[derive(Debug)]
pub struct CompletionState {
    ticks: u32,
}

pub struct CompletionStage;

impl ExecutorStage for CompletionStage {
    type State = CompletionState;

    fn create_state(&self, _session: &HelpstartSession) -> CompletionState {
        CompletionState { ticks: 0 }
    }

    fn start(&self, session: &HelpstartSession, _state: &mut CompletionState) {
        let players = &session.request.players;
        if players.len() == 1 {
            if session.leader.connected() {
                session.leader.chat("/party disband");
            }
        } else if players.len() > 1 {
            // Hand the party to the first player so the humans keep it.
            session
                .leader
                .chat(&format!("/party transfer {}", players[0]));
        }
        for bot in session.transaction.bots() {
            if bot.connected() {
                bot.chat("/party leave");
                bot.chat("/lobby arcade");
            }
        }

        (session.request.on_complete)();
    }

    fn update(&self, _session: &HelpstartSession, state: &mut CompletionState) {
        state.ticks += 1;
    }

    fn result(&self, _state: &CompletionState) -> Option<StageKey> {
        None
    }

    fn should_terminate(&self, state: &CompletionState) -> bool {
        state.ticks >= TEARDOWN_TICKS
    }
}
