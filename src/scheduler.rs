//! Ties the queue, the pool and the executor into one tick loop.
//!
//! The scheduler owns admission: once per tick it checks whether the
//! highest-priority request's bot demand fits the pool, and if so reserves
//! the bots, builds the session and hands it to the executor. A request that
//! does not fit stays queued and blocks admission for that tick; resource
//! exhaustion is "not yet", never an error.
//!
//! The caller drives `tick()` at a fixed cadence (the original ran at
//! 100 ms); nothing in here owns a timer or a thread.

use crate::bot::BotPool;
use crate::error::Result;
use crate::executor::{HelpstartExecutor, StageKey};
use crate::game::{GameDifficulty, GameMap};
use crate::notify::Notifier;
use crate::request::{HelpstartRequest, RequestQueue, request_queue};
use crate::session::HelpstartSession;
use rand::rngs::StdRng;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Party capacity: the requested players plus reserved bots always total
/// this many.
pub const MAX_PLAYERS: usize = 4;

/// Default cap on chest retries while other requests wait.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;

pub struct HelpstartScheduler {
    requests: Rc<RefCell<RequestQueue>>,
    pool: BotPool,
    executor: HelpstartExecutor,
}

impl HelpstartScheduler {
    pub fn new(
        pool: BotPool,
        notifier: Rc<dyn Notifier>,
        max_failed_attempts: u32,
        rng: StdRng,
    ) -> Self {
        let requests = Rc::new(RefCell::new(request_queue()));
        let executor =
            HelpstartExecutor::new(notifier, Rc::clone(&requests), max_failed_attempts, rng);
        Self {
            requests,
            pool,
            executor,
        }
    }

    /// Queue a request. It is admitted on a later tick, once enough bots
    /// are free and nothing outranks it.
    pub fn submit(&self, request: HelpstartRequest) {
        log::info!(
            "queued request from {} for {} ({} players)",
            request.requester,
            request.map,
            request.players.len()
        );
        self.requests.borrow_mut().push(Rc::new(request));
    }

    pub fn queued_requests(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn pool(&self) -> &BotPool {
        &self.pool
    }

    /// One scheduling tick: drop dead bots, admit whatever fits, then
    /// advance every active execution.
    pub fn tick(&mut self) -> Result<()> {
        self.pool.sweep_disconnected();

        loop {
            let needed = match self.requests.borrow().peek() {
                Some(request) => MAX_PLAYERS - request.players.len(),
                None => break,
            };
            if self.pool.available_count() < needed {
                break;
            }
            let transaction = self.pool.provide_bots(needed)?;
            let request = self.requests.borrow_mut().pop()?;
            let session = HelpstartSession::new(request, transaction)?;
            self.executor.execute(session);
        }

        self.executor.update();
        Ok(())
    }

    /// Drop every queued request and cooperatively cancel every active
    /// execution.
    pub fn cancel_all(&mut self) {
        self.requests.borrow_mut().clear();
        self.executor.cancel_all();
    }

    /// A point-in-time summary of the queue, the pool and the active
    /// sessions.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            queued_requests: self.queued_requests(),
            online_bots: self.pool.online_usernames(),
            available_bots: self.pool.available_count(),
            busy_bots: self.pool.busy_count(),
            active_sessions: self
                .executor
                .executions()
                .iter()
                .map(|execution| {
                    let request = &execution.session().request;
                    ActiveSessionStatus {
                        requester: request.requester.clone(),
                        map: request.map,
                        difficulty: request.difficulty,
                        players: request.players.clone(),
                        stage: execution.stage(),
                    }
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for HelpstartScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpstartScheduler")
            .field("queued", &self.queued_requests())
            .field("executor", &self.executor)
            .finish()
    }
}

/// Serializable status report, for dashboards and operator commands.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub queued_requests: usize,
    pub online_bots: Vec<String>,
    pub available_bots: usize,
    pub busy_bots: usize,
    pub active_sessions: Vec<ActiveSessionStatus>,
}

/// One active session, as reported by [`HelpstartScheduler::status`].
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionStatus {
    pub requester: String,
    pub map: GameMap,
    pub difficulty: GameDifficulty,
    pub players: Vec<String>,
    pub stage: StageKey,
}
