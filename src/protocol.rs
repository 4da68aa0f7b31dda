//! Server-text classification.
//!
//! The only observable signal from the game server is its chat feed, so the
//! stage machine depends on recognizing a handful of known lines. All of the
//! brittle pattern matching is isolated here as a pure function from raw text
//! to a closed set of [`ServerEvent`]s; the stages themselves only ever match
//! on the enum.

use regex::Regex;
use std::sync::OnceLock;

/// A classified line from the server's chat feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The server rate-limited our commands (either phrasing).
    RateLimited,
    /// A party member disconnected.
    PartyDisconnected,
    /// A party member left the party.
    PartyLeft,
    /// We were kicked while joining a game server.
    KickedWhileJoining,
    /// A party invite arrived, naming who sent it.
    PartyInvite { inviter: String },
    /// Someone joined the party.
    PartyJoin,
    /// An invite was rejected because the target has us ignored.
    InviteIgnored,
    /// An invite was rejected for an unspecified reason.
    InviteUnable,
    /// The invite target is unknown to the server.
    InviteUnknown,
    /// The invite target is offline.
    InviteOffline,
    /// An outstanding invite expired unanswered.
    InviteExpired,
    /// We were placed back into a running game.
    SelfRejoin,
    /// Another player rejoined a running game.
    OtherRejoin,
    /// We joined a lobby as the party leader.
    GameJoin,
    /// A player quit the game.
    PlayerQuit,
    /// The game started.
    GameStart,
    /// The active chest is elsewhere; carries the named area.
    ChestHint { area: String },
    /// The server had no capacity to warp the party.
    NotEnoughServers,
}

struct Patterns {
    slow_down: Regex,
    command_spam: Regex,
    party_disconnected: Regex,
    party_left: Regex,
    kicked_joining: Regex,
    party_invite: Regex,
    party_join: Regex,
    invite_ignored: Regex,
    invite_unable: Regex,
    invite_unknown: Regex,
    invite_offline: Regex,
    invite_expired: Regex,
    self_rejoin: Regex,
    other_rejoin: Regex,
    game_join: Regex,
    player_quit: Regex,
    game_start: Regex,
    chest_hint: Regex,
    not_enough_servers: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| {
            Regex::new(pattern).expect("hard-coded server pattern must compile")
        };
        Patterns {
            slow_down: compile(r"^Woah there, slow down!$"),
            command_spam: compile(r"^You are sending commands too fast! Please slow down\.$"),
            party_disconnected: compile(
                r"^.+ has disconnected, they have 5 minutes to rejoin before they are removed from the party\.$",
            ),
            party_left: compile(r"^.+ has left the party\.$"),
            kicked_joining: compile(r"^You were kicked whilst joining that server!$"),
            party_invite: compile(
                "^-----------------------------------------------------\n\
                 (?:.* )?(.+) has invited you to join their party!\n\
                 You have 60 seconds to accept\\. Click here to join!\n\
                 -----------------------------------------------------$",
            ),
            party_join: compile(r"^(?:.+) joined the party\.$"),
            invite_ignored: compile(
                r"^You cannot invite that player since they have ignored you\.$",
            ),
            invite_unable: compile(r"^You cannot invite that player\.$"),
            invite_unknown: compile(r"^Couldn't find a player with that name!$"),
            invite_offline: compile(
                r"^You cannot invite that player since they're not online\.$",
            ),
            invite_expired: compile(r"^The party invite to .+ has expired\.$"),
            self_rejoin: compile(r"^To leave Zombies, type /lobby$"),
            other_rejoin: compile(r"^.+ rejoined\.$"),
            game_join: compile(
                r"^You joined as the party leader! Use the Party Options Menu to change game settings\.$",
            ),
            player_quit: compile(r"^(.+) has quit!$"),
            game_start: compile(r"^\s*Zombies\s*$"),
            chest_hint: compile(
                r"^This Lucky Chest is not active right now! Find the active Lucky Chest in the (.+)!$",
            ),
            not_enough_servers: compile(
                r"^There are not enough available servers! Please try again later\.$",
            ),
        }
    })
}

/// Classify one line of server chat.
///
/// Returns `None` for lines the state machine does not care about.
pub fn classify(plain: &str) -> Option<ServerEvent> {
    let p = patterns();

    if p.slow_down.is_match(plain) || p.command_spam.is_match(plain) {
        return Some(ServerEvent::RateLimited);
    }
    if p.party_disconnected.is_match(plain) {
        return Some(ServerEvent::PartyDisconnected);
    }
    if p.party_left.is_match(plain) {
        return Some(ServerEvent::PartyLeft);
    }
    if p.kicked_joining.is_match(plain) {
        return Some(ServerEvent::KickedWhileJoining);
    }
    if let Some(captures) = p.party_invite.captures(plain) {
        return Some(ServerEvent::PartyInvite {
            inviter: captures[1].to_string(),
        });
    }
    if p.party_join.is_match(plain) {
        return Some(ServerEvent::PartyJoin);
    }
    if p.invite_ignored.is_match(plain) {
        return Some(ServerEvent::InviteIgnored);
    }
    if p.invite_unable.is_match(plain) {
        return Some(ServerEvent::InviteUnable);
    }
    if p.invite_unknown.is_match(plain) {
        return Some(ServerEvent::InviteUnknown);
    }
    if p.invite_offline.is_match(plain) {
        return Some(ServerEvent::InviteOffline);
    }
    if p.invite_expired.is_match(plain) {
        return Some(ServerEvent::InviteExpired);
    }
    if p.self_rejoin.is_match(plain) {
        return Some(ServerEvent::SelfRejoin);
    }
    if p.other_rejoin.is_match(plain) {
        return Some(ServerEvent::OtherRejoin);
    }
    if p.game_join.is_match(plain) {
        return Some(ServerEvent::GameJoin);
    }
    if p.player_quit.is_match(plain) {
        return Some(ServerEvent::PlayerQuit);
    }
    if p.game_start.is_match(plain) {
        return Some(ServerEvent::GameStart);
    }
    if let Some(captures) = p.chest_hint.captures(plain) {
        return Some(ServerEvent::ChestHint {
            area: captures[1].to_string(),
        });
    }
    if p.not_enough_servers.is_match(plain) {
        return Some(ServerEvent::NotEnoughServers);
    }

    None
}

/// Build the party-invite box the way the server renders it. Used by tests
/// and by transports that need to synthesize feed lines.
pub fn render_party_invite(inviter: &str) -> String {
    format!(
        "-----------------------------------------------------\n\
         {inviter} has invited you to join their party!\n\
         You have 60 seconds to accept. Click here to join!\n\
         -----------------------------------------------------"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rate_limits() {
        assert_eq!(
            classify("Woah there, slow down!"),
            Some(ServerEvent::RateLimited)
        );
        assert_eq!(
            classify("You are sending commands too fast! Please slow down."),
            Some(ServerEvent::RateLimited)
        );
    }

    #[test]
    fn classifies_party_membership_changes() {
        assert_eq!(
            classify(
                "Steve has disconnected, they have 5 minutes to rejoin before they are removed from the party."
            ),
            Some(ServerEvent::PartyDisconnected)
        );
        assert_eq!(
            classify("Steve has left the party."),
            Some(ServerEvent::PartyLeft)
        );
        assert_eq!(
            classify("Steve joined the party."),
            Some(ServerEvent::PartyJoin)
        );
    }

    #[test]
    fn classifies_invite_box_with_and_without_rank_prefix() {
        let plain = render_party_invite("Leader1");
        assert_eq!(
            classify(&plain),
            Some(ServerEvent::PartyInvite {
                inviter: "Leader1".to_string()
            })
        );

        let ranked = render_party_invite("[MVP+] Leader1");
        assert_eq!(
            classify(&ranked),
            Some(ServerEvent::PartyInvite {
                inviter: "Leader1".to_string()
            })
        );
    }

    #[test]
    fn classifies_invite_failures() {
        assert_eq!(
            classify("You cannot invite that player since they have ignored you."),
            Some(ServerEvent::InviteIgnored)
        );
        assert_eq!(
            classify("You cannot invite that player."),
            Some(ServerEvent::InviteUnable)
        );
        assert_eq!(
            classify("Couldn't find a player with that name!"),
            Some(ServerEvent::InviteUnknown)
        );
        assert_eq!(
            classify("You cannot invite that player since they're not online."),
            Some(ServerEvent::InviteOffline)
        );
        assert_eq!(
            classify("The party invite to Steve has expired."),
            Some(ServerEvent::InviteExpired)
        );
    }

    #[test]
    fn classifies_game_flow_lines() {
        assert_eq!(
            classify("To leave Zombies, type /lobby"),
            Some(ServerEvent::SelfRejoin)
        );
        assert_eq!(classify("Steve rejoined."), Some(ServerEvent::OtherRejoin));
        assert_eq!(
            classify(
                "You joined as the party leader! Use the Party Options Menu to change game settings."
            ),
            Some(ServerEvent::GameJoin)
        );
        assert_eq!(classify("Steve has quit!"), Some(ServerEvent::PlayerQuit));
        assert_eq!(classify("    Zombies    "), Some(ServerEvent::GameStart));
        assert_eq!(
            classify("You were kicked whilst joining that server!"),
            Some(ServerEvent::KickedWhileJoining)
        );
        assert_eq!(
            classify("There are not enough available servers! Please try again later."),
            Some(ServerEvent::NotEnoughServers)
        );
    }

    #[test]
    fn classifies_chest_hint_with_area() {
        assert_eq!(
            classify(
                "This Lucky Chest is not active right now! Find the active Lucky Chest in the Power Station!"
            ),
            Some(ServerEvent::ChestHint {
                area: "Power Station".to_string()
            })
        );
    }

    #[test]
    fn ignores_ordinary_chat() {
        assert_eq!(classify("Party > Steve: hello"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("You are now in the Arcade lobby!"), None);
    }
}
