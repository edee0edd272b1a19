//! Battle Planner - Counter-team and defense-team selection for PVP
//!
//! For every opponent pet, in the order the opponent presents them, pick
//! the free pet with at least the same star. Ties go to higher star, then
//! higher level, then the class that counters the opponent pet. Once two
//! picks strictly outrank their counterpart the matchup phase stops; any
//! slot still open is filled with the strongest remaining pet.

use std::cmp::Reverse;

use crate::model::battle::{Opponent, OpponentPet};
use crate::model::pet::{PetId, PetUnit};

/// Strong picks needed to stop matching opponents one by one
const STRONG_PICKS_TARGET: usize = 2;

/// Three distinct pets sent into one battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleTeam {
    pub members: [PetUnit; 3],
    /// Picks whose star strictly exceeds the matched opponent pet
    pub strong_picks: usize,
}

impl BattleTeam {
    pub fn pet_ids(&self) -> [PetId; 3] {
        [
            self.members[0].pet_id,
            self.members[1].pet_id,
            self.members[2].pet_id,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelection {
    Team(BattleTeam),
    /// Fewer than three distinct pets available
    Insufficient,
}

/// Outcome of comparing the current defense team with the best one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefenseDecision {
    /// Current team already is the strongest three
    Keep,
    Set([PetId; 3]),
    Insufficient,
}

/// Pick a three-pet team against `opponent`
///
/// `roster` is the account's pet list. A pet id is never picked twice.
pub fn select_battle_team(roster: &[PetUnit], opponent: &Opponent) -> TeamSelection {
    let mut picked: Vec<usize> = Vec::with_capacity(3);
    let mut strong_picks = 0;

    for opponent_pet in &opponent.pets {
        if picked.len() == 3 || strong_picks >= STRONG_PICKS_TARGET {
            break;
        }

        if let Some(index) = best_counter(roster, &picked, opponent_pet) {
            if roster[index].star > opponent_pet.star {
                strong_picks += 1;
            }
            picked.push(index);
        }
    }

    while picked.len() < 3 {
        match strongest_free(roster, &picked) {
            Some(index) => picked.push(index),
            None => break,
        }
    }

    match picked.as_slice() {
        [a, b, c] => TeamSelection::Team(BattleTeam {
            members: [roster[*a].clone(), roster[*b].clone(), roster[*c].clone()],
            strong_picks,
        }),
        _ => TeamSelection::Insufficient,
    }
}

/// Choose the three strongest distinct pets as defenders
pub fn select_defense_team(roster: &[PetUnit], current: &[PetId]) -> DefenseDecision {
    let mut picked: Vec<usize> = Vec::with_capacity(3);
    while picked.len() < 3 {
        match strongest_free(roster, &picked) {
            Some(index) => picked.push(index),
            None => return DefenseDecision::Insufficient,
        }
    }

    let team = [
        roster[picked[0]].pet_id,
        roster[picked[1]].pet_id,
        roster[picked[2]].pet_id,
    ];
    if current.len() == 3 && current.iter().all(|id| team.contains(id)) {
        DefenseDecision::Keep
    } else {
        DefenseDecision::Set(team)
    }
}

fn is_free(roster: &[PetUnit], picked: &[usize], index: usize) -> bool {
    let pet_id = roster[index].pet_id;
    !picked.iter().any(|&p| roster[p].pet_id == pet_id)
}

fn best_counter(roster: &[PetUnit], picked: &[usize], opponent_pet: &OpponentPet) -> Option<usize> {
    roster
        .iter()
        .enumerate()
        .filter(|(i, unit)| is_free(roster, picked, *i) && unit.star >= opponent_pet.star)
        .max_by_key(|(i, unit)| {
            (
                unit.star,
                unit.level,
                unit.class.counters(&opponent_pet.class),
                Reverse(*i),
            )
        })
        .map(|(i, _)| i)
}

fn strongest_free(roster: &[PetUnit], picked: &[usize]) -> Option<usize> {
    roster
        .iter()
        .enumerate()
        .filter(|(i, _)| is_free(roster, picked, *i))
        .max_by_key(|(i, unit)| (unit.star, unit.level, Reverse(*i)))
        .map(|(i, _)| i)
}
