//! Rejoin stage: someone landed in an old game, wait it out and rewarp.

use super::{ExecutorStage, StageKey};
use crate::session::HelpstartSession;
use rand::Rng;
use rand::rngs::StdRng;
use std::cell::RefCell;

/// Party-chat flavor lines sent while the session waits out a rejoin.
pub const REJOIN_MESSAGES: [&str; 10] = [
    "one of your fellow players rejoined someone else's game. that's bad.",
    "I feel like rewarping for some reason",
    "im not in ur game??? i guess ill rewarp",
    "hypixel trolled, rewarp time",
    "wait let me test the rewarp command",
    "you probably know what went wrong",
    "SOMETHING rejoined somebody else's game, please wait until I rewarp...",
    "using timer is cheat. thats why I warped you into wrong game.",
    "sorry, can I spectate someone first? no? ok...",
    "did you know about /play arcade_zombies_bad_blood ? let me show you",
];

/// 6 seconds at the 100 ms tick cadence.
const REJOIN_WAIT_TICKS: u32 = 60;

#[derive(Debug)]
pub struct RejoinState {
    ticks: u32,
    result: Option<StageKey>,
}

pub struct RejoinStage {
    rng: RefCell<StdRng>,
}

impl RejoinStage {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }
}

impl ExecutorStage for RejoinStage {
    type State = RejoinState;

    fn create_state(&self, _session: &HelpstartSession) -> RejoinState {
        RejoinState {
            ticks: 0,
            result: None,
        }
    }

    fn start(&self, session: &HelpstartSession, _state: &mut RejoinState) {
        let index = self.rng.borrow_mut().gen_range(0..REJOIN_MESSAGES.len());
        session.leader.chat(REJOIN_MESSAGES[index]);
    }

    fn update(&self, _session: &HelpstartSession, state: &mut RejoinState) {
        if state.ticks == REJOIN_WAIT_TICKS {
            state.result = Some(StageKey::Warp);
            return;
        }
        state.ticks += 1;
    }

    fn result(&self, state: &RejoinState) -> Option<StageKey> {
        state.result
    }
}
