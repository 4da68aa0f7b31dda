//! Game data: maps, difficulties and chest locations.
//!
//! These are plain enumerations describing the Zombies arcade game the
//! sessions are started for. The intake layer validates user input against
//! them; the stages use them to build outgoing commands and to interpret
//! chest hints from the server feed.

use serde::{Deserialize, Serialize};

/// The selectable game maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMap {
    DeadEnd,
    BadBlood,
    AlienArcadium,
}

impl GameMap {
    /// Human-readable map name.
    pub fn display_name(self) -> &'static str {
        match self {
            GameMap::DeadEnd => "Dead End",
            GameMap::BadBlood => "Bad Blood",
            GameMap::AlienArcadium => "Alien Arcadium",
        }
    }

    /// The minigame identifier accepted by the server's `/play` command.
    pub fn minigame_name(self) -> &'static str {
        match self {
            GameMap::DeadEnd => "arcade_zombies_dead_end",
            GameMap::BadBlood => "arcade_zombies_bad_blood",
            GameMap::AlienArcadium => "arcade_zombies_alien_arcadium",
        }
    }

    /// The chest locations that exist on this map. Alien Arcadium has no
    /// chest concept, so sessions there never wait on a chest check.
    pub fn chests(self) -> &'static [GameChest] {
        match self {
            GameMap::DeadEnd => &[
                GameChest::Apartments,
                GameChest::Gallery,
                GameChest::Hotel,
                GameChest::Office,
                GameChest::PowerStation,
            ],
            GameMap::BadBlood => &[
                GameChest::Balcony,
                GameChest::Crypts,
                GameChest::Dungeon,
                GameChest::Library,
                GameChest::Mansion,
            ],
            GameMap::AlienArcadium => &[],
        }
    }
}

impl std::fmt::Display for GameMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The selectable game difficulties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameDifficulty {
    Normal,
    Hard,
    Rip,
}

impl GameDifficulty {
    /// Human-readable difficulty name.
    pub fn display_name(self) -> &'static str {
        match self {
            GameDifficulty::Normal => "Normal",
            GameDifficulty::Hard => "Hard",
            GameDifficulty::Rip => "RIP",
        }
    }
}

impl std::fmt::Display for GameDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Named chest locations across all maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameChest {
    Apartments,
    Gallery,
    Hotel,
    Office,
    PowerStation,
    Balcony,
    Crypts,
    Dungeon,
    Library,
    Mansion,
}

impl GameChest {
    /// Every chest location, across all maps.
    pub const ALL: [GameChest; 10] = [
        GameChest::Apartments,
        GameChest::Gallery,
        GameChest::Hotel,
        GameChest::Office,
        GameChest::PowerStation,
        GameChest::Balcony,
        GameChest::Crypts,
        GameChest::Dungeon,
        GameChest::Library,
        GameChest::Mansion,
    ];

    /// The chest name as it appears in server chest hints.
    pub fn display_name(self) -> &'static str {
        match self {
            GameChest::Apartments => "Apartments",
            GameChest::Gallery => "Gallery",
            GameChest::Hotel => "Hotel",
            GameChest::Office => "Office",
            GameChest::PowerStation => "Power Station",
            GameChest::Balcony => "Balcony",
            GameChest::Crypts => "Crypts",
            GameChest::Dungeon => "Dungeon",
            GameChest::Library => "Library",
            GameChest::Mansion => "Mansion",
        }
    }
}

impl std::fmt::Display for GameChest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
