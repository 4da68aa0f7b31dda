use crate::bot::{Bot, BotPool, ChatMessage};
use crate::error::HelpstartError;
use crate::test_support::{FakeBot, pool_with_bots};

#[test]
fn add_bot_sends_setup_lines_and_registers() {
    let pool = BotPool::new();
    let bot = FakeBot::new("bot-1", "Bot1");
    pool.add_bot(bot.shared()).unwrap();

    assert_eq!(
        bot.sent_lines(),
        vec!["/language english", "/party disband", "/lobby arcade"]
    );
    assert_eq!(pool.online_count(), 1);
    assert_eq!(pool.available_count(), 1);
    assert_eq!(pool.busy_count(), 0);
}

#[test]
fn add_bot_rejects_duplicate_identifier() {
    let pool = BotPool::new();
    let bot = FakeBot::new("bot-1", "Bot1");
    pool.add_bot(bot.shared()).unwrap();

    let twin = FakeBot::new("bot-1", "Bot1Again");
    let err = pool.add_bot(twin.shared()).unwrap_err();
    assert!(matches!(err, HelpstartError::BotAlreadyRegistered(_)));
    assert_eq!(pool.online_count(), 1);
}

#[test]
fn add_bot_rejects_disconnected_bot() {
    let pool = BotPool::new();
    let bot = FakeBot::new("bot-1", "Bot1");
    bot.drop_connection();

    let err = pool.add_bot(bot.shared()).unwrap_err();
    assert!(matches!(err, HelpstartError::BotNotConnected(_)));
    assert_eq!(pool.online_count(), 0);
}

#[test]
fn provide_bots_moves_bots_from_available_to_busy() {
    let (pool, bots) = pool_with_bots(3);

    let transaction = pool.provide_bots(2).unwrap();
    assert_eq!(transaction.bots().len(), 2);
    // Reservation follows registration order.
    assert_eq!(transaction.bots()[0].id(), "bot-1");
    assert_eq!(transaction.bots()[1].id(), "bot-2");

    for bot in &bots[..2] {
        assert!(pool.is_busy(bot.id()));
        assert!(!pool.is_available(bot.id()));
    }
    assert!(pool.is_available("bot-3"));
    assert_eq!(pool.available_count(), 1);
    assert_eq!(pool.busy_count(), 2);
}

#[test]
fn provide_bots_fails_without_touching_state() {
    let (pool, _bots) = pool_with_bots(2);

    let err = pool.provide_bots(3).unwrap_err();
    assert!(matches!(
        err,
        HelpstartError::NotEnoughBots {
            requested: 3,
            available: 2
        }
    ));
    assert_eq!(pool.available_count(), 2);
    assert_eq!(pool.busy_count(), 0);
}

#[test]
fn ending_a_transaction_returns_connected_bots() {
    let (pool, _bots) = pool_with_bots(3);

    let transaction = pool.provide_bots(3).unwrap();
    assert_eq!(pool.available_count(), 0);

    transaction.end();
    assert_eq!(pool.available_count(), 3);
    assert_eq!(pool.busy_count(), 0);
    assert_eq!(pool.online_count(), 3);
}

#[test]
fn ending_a_transaction_purges_disconnected_bots() {
    let (pool, bots) = pool_with_bots(3);

    let transaction = pool.provide_bots(3).unwrap();
    bots[1].drop_connection();
    transaction.end();

    assert_eq!(pool.available_count(), 2);
    assert_eq!(pool.busy_count(), 0);
    assert!(!pool.is_online("bot-2"));
    assert!(pool.is_available("bot-1"));
    assert!(pool.is_available("bot-3"));
}

#[test]
fn transaction_end_is_idempotent() {
    let (pool, _bots) = pool_with_bots(2);

    let transaction = pool.provide_bots(1).unwrap();
    transaction.end();
    transaction.end();
    assert_eq!(pool.available_count(), 2);
    assert_eq!(pool.busy_count(), 0);
}

#[test]
fn dropping_a_transaction_releases_the_reservation() {
    let (pool, _bots) = pool_with_bots(2);

    {
        let _transaction = pool.provide_bots(2).unwrap();
        assert_eq!(pool.available_count(), 0);
    }
    assert_eq!(pool.available_count(), 2);
}

#[test]
fn no_bot_is_ever_available_and_busy_at_once() {
    let (pool, bots) = pool_with_bots(4);

    let first = pool.provide_bots(2).unwrap();
    let second = pool.provide_bots(1).unwrap();
    for bot in &bots {
        assert!(
            !(pool.is_available(bot.id()) && pool.is_busy(bot.id())),
            "bot {} in both sets",
            bot.id()
        );
    }

    first.end();
    second.end();
    for bot in &bots {
        assert!(pool.is_available(bot.id()));
        assert!(!pool.is_busy(bot.id()));
    }
}

#[test]
fn sweep_drops_disconnected_bots_from_every_set() {
    let (pool, bots) = pool_with_bots(3);
    let _transaction = pool.provide_bots(1).unwrap();

    bots[0].drop_connection(); // busy
    bots[2].drop_connection(); // available
    pool.sweep_disconnected();

    assert!(!pool.is_online("bot-1"));
    assert!(!pool.is_busy("bot-1"));
    assert!(!pool.is_online("bot-3"));
    assert!(!pool.is_available("bot-3"));
    assert!(pool.is_available("bot-2"));
    assert_eq!(pool.online_count(), 1);
}

#[test]
fn chat_subscription_drains_in_arrival_order() {
    let bot = FakeBot::new("bot-1", "Bot1");
    let subscription = bot.subscribe_chat();

    bot.push_chat("first");
    bot.push_chat("second");

    let drained = subscription.drain();
    assert_eq!(
        drained,
        vec![
            ChatMessage::new("first", "first"),
            ChatMessage::new("second", "second"),
        ]
    );
    assert!(subscription.drain().is_empty(), "no message seen twice");
}

#[test]
fn dropped_subscription_stops_receiving() {
    let bot = FakeBot::new("bot-1", "Bot1");
    let kept = bot.subscribe_chat();
    let dropped = bot.subscribe_chat();
    drop(dropped);

    bot.push_chat("hello");
    assert_eq!(kept.drain().len(), 1);
}
