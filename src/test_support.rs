//! Shared test fixtures: a scriptable bot and a recording notifier.

use crate::bot::{Bot, BotPool, ChatMessage, ChatSubscription, SharedBot};
use crate::game::{GameChest, GameDifficulty, GameMap};
use crate::notify::Notifier;
use crate::request::{ChestMode, HelpstartRequest};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc;

/// A bot whose chat feed and connection state are driven by the test.
pub(crate) struct FakeBot {
    id: String,
    username: RefCell<Option<String>>,
    connected: Cell<bool>,
    sent: RefCell<Vec<String>>,
    chest_checks: RefCell<Vec<GameMap>>,
    difficulties: RefCell<Vec<GameDifficulty>>,
    chat_senders: RefCell<Vec<mpsc::Sender<ChatMessage>>>,
}

impl FakeBot {
    pub(crate) fn new(id: &str, username: &str) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_string(),
            username: RefCell::new(Some(username.to_string())),
            connected: Cell::new(true),
            sent: RefCell::new(Vec::new()),
            chest_checks: RefCell::new(Vec::new()),
            difficulties: RefCell::new(Vec::new()),
            chat_senders: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn shared(self: &Rc<Self>) -> SharedBot {
        Rc::clone(self) as SharedBot
    }

    /// Deliver one incoming chat line to every live subscription.
    pub(crate) fn push_chat(&self, plain: &str) {
        self.chat_senders
            .borrow_mut()
            .retain(|tx| tx.send(ChatMessage::new(plain, plain)).is_ok());
    }

    /// Simulate the transport losing its connection.
    pub(crate) fn drop_connection(&self) {
        self.connected.set(false);
        *self.username.borrow_mut() = None;
        self.chat_senders.borrow_mut().clear();
    }

    pub(crate) fn sent_lines(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub(crate) fn clear_sent(&self) {
        self.sent.borrow_mut().clear();
    }

    pub(crate) fn chest_checks(&self) -> Vec<GameMap> {
        self.chest_checks.borrow().clone()
    }

    pub(crate) fn difficulties(&self) -> Vec<GameDifficulty> {
        self.difficulties.borrow().clone()
    }
}

impl Bot for FakeBot {
    fn id(&self) -> &str {
        &self.id
    }

    fn username(&self) -> Option<String> {
        self.username.borrow().clone()
    }

    fn connected(&self) -> bool {
        self.connected.get()
    }

    fn chat(&self, line: &str) {
        self.sent.borrow_mut().push(line.to_string());
    }

    fn check_chest(&self, map: GameMap) {
        self.chest_checks.borrow_mut().push(map);
    }

    fn set_difficulty(&self, difficulty: GameDifficulty) {
        self.difficulties.borrow_mut().push(difficulty);
    }

    fn subscribe_chat(&self) -> ChatSubscription {
        let (tx, subscription) = ChatSubscription::channel();
        self.chat_senders.borrow_mut().push(tx);
        subscription
    }
}

/// Notifier capturing every message sent through it.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub(crate) fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _request: &HelpstartRequest, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// A Dead End request from "Requester" with the given players and chest
/// policy.
pub(crate) fn request(
    players: &[&str],
    chest_mode: ChestMode,
    chests: Vec<GameChest>,
) -> HelpstartRequest {
    HelpstartRequest::new(
        "Requester",
        GameMap::DeadEnd,
        GameDifficulty::Normal,
        players.iter().map(|name| name.to_string()).collect(),
        chest_mode,
        chests,
        || {},
    )
}

/// A pool populated with `count` connected fake bots named `Bot1..BotN`.
pub(crate) fn pool_with_bots(count: usize) -> (BotPool, Vec<Rc<FakeBot>>) {
    let pool = BotPool::new();
    let bots: Vec<Rc<FakeBot>> = (1..=count)
        .map(|index| FakeBot::new(&format!("bot-{index}"), &format!("Bot{index}")))
        .collect();
    for bot in &bots {
        pool.add_bot(bot.shared()).unwrap();
        bot.clear_sent();
    }
    (pool, bots)
}
