//! Reward selectors - What is ready to be claimed

use crate::model::breeding::NeededPair;
use crate::model::mission::ActiveMission;
use crate::model::rewards::{Achievement, Quest, SeasonPass, SeasonReward, MIX_PET_CATEGORY};

/// Missions past their end time and not on the skip list
pub fn finished_missions<'a>(
    missions: &'a [ActiveMission],
    now: i64,
    skip_tasks: &[String],
) -> Vec<&'a ActiveMission> {
    missions
        .iter()
        .filter(|m| m.is_finished(now) && !is_listed(skip_tasks, &m.id.to_string()))
        .collect()
}

/// Daily quests not yet done and not on the skip list
pub fn pending_quests<'a>(quests: &'a [Quest], skip_tasks: &[String]) -> Vec<&'a Quest> {
    quests
        .iter()
        .filter(|q| !q.done && !is_listed(skip_tasks, &q.code))
        .collect()
}

/// Completed achievements whose reward has not been collected
pub fn claimable_achievements(achievements: &[Achievement]) -> Vec<u64> {
    achievements
        .iter()
        .filter(|a| a.completed && !a.claimed)
        .map(|a| a.quest_id)
        .collect()
}

/// Breeding pairs still missing from the collection achievements
pub fn needed_pairs(achievements: &[Achievement]) -> Vec<NeededPair> {
    achievements
        .iter()
        .filter(|a| a.category == MIX_PET_CATEGORY && !a.completed)
        .filter_map(|a| a.collection_code)
        .map(NeededPair::from_collection_code)
        .collect()
}

/// Free season-pass steps reached but not claimed
pub fn claimable_season_rewards(pass: &SeasonPass) -> Vec<&SeasonReward> {
    pass.free_rewards
        .iter()
        .filter(|r| r.step <= pass.current_step && !r.claimed)
        .collect()
}

fn is_listed(list: &[String], key: &str) -> bool {
    list.iter().any(|entry| entry.trim() == key)
}
