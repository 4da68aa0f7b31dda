//! Helpstart requests and their priority order.
//!
//! A request is an immutable, fully validated intent to start one game:
//! which map, which difficulty, who plays, and which chest policy applies.
//! The intake layer performs all validation (player names, map legality,
//! chest legality) before a request reaches this crate.

use crate::game::{GameChest, GameDifficulty, GameMap};
use crate::queue::PriorityQueue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

mod compare;

pub use compare::request_comparator;

/// Policy governing how the session treats the map's active chest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestMode {
    /// Keep rewarping until the active chest is one of the listed chests.
    Whitelist,
    /// Keep rewarping while the active chest is one of the listed chests.
    Blacklist,
    /// Ignore chests entirely.
    None,
}

impl ChestMode {
    /// Human-readable mode name, as shown by the intake surface.
    pub fn display_name(self) -> &'static str {
        match self {
            ChestMode::Whitelist => "Good Chests",
            ChestMode::Blacklist => "Bad Chests",
            ChestMode::None => "None",
        }
    }
}

/// A validated intent to start one game. Immutable after creation; shared
/// as `Rc<HelpstartRequest>` between the queue and the session built from it.
pub struct HelpstartRequest {
    /// Display handle of whoever asked, embedded in status messages.
    pub requester: String,
    pub map: GameMap,
    pub difficulty: GameDifficulty,
    /// The human players to invite, 1 to 3 names.
    pub players: Vec<String>,
    pub chest_mode: ChestMode,
    /// The chests the mode applies to.
    pub chests: Vec<GameChest>,
    /// When the request was created; older requests are served first among
    /// equals.
    pub created_at: DateTime<Utc>,
    /// Invoked exactly once when the session reaches its completion stage.
    pub on_complete: Box<dyn Fn()>,
}

impl HelpstartRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requester: impl Into<String>,
        map: GameMap,
        difficulty: GameDifficulty,
        players: Vec<String>,
        chest_mode: ChestMode,
        chests: Vec<GameChest>,
        on_complete: impl Fn() + 'static,
    ) -> Self {
        Self {
            requester: requester.into(),
            map,
            difficulty,
            players,
            chest_mode,
            chests,
            created_at: Utc::now(),
            on_complete: Box::new(on_complete),
        }
    }

    /// A request is chestless when it either ignores chests or lists none.
    pub fn is_chestless(&self) -> bool {
        self.chest_mode == ChestMode::None || self.chests.is_empty()
    }
}

impl std::fmt::Debug for HelpstartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpstartRequest")
            .field("requester", &self.requester)
            .field("map", &self.map)
            .field("difficulty", &self.difficulty)
            .field("players", &self.players)
            .field("chest_mode", &self.chest_mode)
            .field("chests", &self.chests)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// The pending-request queue shared between the scheduler and the start
/// stage (which inspects the backlog to decide retry vs. give-up).
pub type RequestQueue = PriorityQueue<Rc<HelpstartRequest>>;

/// Build an empty request queue ordered by [`request_comparator`].
pub fn request_queue() -> RequestQueue {
    PriorityQueue::new(|a: &Rc<HelpstartRequest>, b: &Rc<HelpstartRequest>| {
        request_comparator(a, b)
    })
}
