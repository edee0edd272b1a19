//! Mission Planner - Assign pet units to mission slots
//!
//! Candidates are tried from the end of the catalog backwards, so later
//! (typically higher tier) missions win ties. Each of the three slots is
//! filled on its own: the unit must match the slot class exactly and reach
//! the minimum star. Among eligible units the lowest star is taken first,
//! then inventory order, which keeps strong units free for stricter slots.
//! A mission is only selected when all three slots fill.

use std::collections::HashSet;

use crate::model::mission::{ActiveMission, MissionCatalog, MissionId, MissionTemplate};
use crate::model::pet::{PetId, PetPool, UnitIndex};

/// Pets chosen for one mission, slot by slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionAssignment {
    pub mission_id: MissionId,
    pub units: [UnitIndex; 3],
    pub pet_ids: [PetId; 3],
}

/// Stateless selector over an immutable catalog
#[derive(Debug, Clone, Copy)]
pub struct MissionPlanner<'a> {
    catalog: &'a MissionCatalog,
}

impl<'a> MissionPlanner<'a> {
    pub fn new(catalog: &'a MissionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a MissionCatalog {
        self.catalog
    }

    /// Pick the first fillable mission, scanning the catalog in reverse
    ///
    /// Missions in `skip` (already entered, or rejected this cycle) are
    /// never considered. Returns `None` when nothing can be filled.
    pub fn select_mission(
        &self,
        pool: &PetPool,
        skip: &HashSet<MissionId>,
    ) -> Option<MissionAssignment> {
        self.catalog
            .templates()
            .iter()
            .rev()
            .filter(|template| !skip.contains(&template.id))
            .find_map(|template| fill_slots(template, pool))
    }
}

fn fill_slots(template: &MissionTemplate, pool: &PetPool) -> Option<MissionAssignment> {
    let mut chosen: Vec<UnitIndex> = Vec::with_capacity(3);

    for slot in &template.slots {
        let (index, _) = pool
            .available()
            .filter(|(index, unit)| {
                !chosen.contains(index) && unit.class == slot.class && unit.star >= slot.min_star
            })
            .min_by_key(|(index, unit)| (unit.star, *index))?;
        chosen.push(index);
    }

    let units = [chosen[0], chosen[1], chosen[2]];
    let pet_ids = units.map(|index| pool.get(index).map(|unit| unit.pet_id));
    match pet_ids {
        [Some(a), Some(b), Some(c)] => Some(MissionAssignment {
            mission_id: template.id,
            units,
            pet_ids: [a, b, c],
        }),
        _ => None,
    }
}

/// One cycle's worth of mission entries
///
/// Wraps the planner in an explicit loop state: the pool of free units,
/// missions already running, and missions the backend refused this cycle.
/// The number of selections is bounded by the catalog size.
#[derive(Debug, Clone)]
pub struct MissionSession<'a> {
    planner: MissionPlanner<'a>,
    pool: PetPool,
    entered: HashSet<MissionId>,
    excluded: HashSet<MissionId>,
    attempts: usize,
}

impl<'a> MissionSession<'a> {
    /// Start a session from the account's current state
    ///
    /// Pets committed to `active` missions are removed from the pool, and
    /// those missions are never re-entered.
    pub fn new<I>(
        catalog: &'a MissionCatalog,
        mut pool: PetPool,
        active: &[ActiveMission],
        excluded: I,
    ) -> Self
    where
        I: IntoIterator<Item = MissionId>,
    {
        for mission in active {
            pool.reserve_committed(mission.committed.iter());
        }

        Self {
            planner: MissionPlanner::new(catalog),
            pool,
            entered: active.iter().map(|m| m.id).collect(),
            excluded: excluded.into_iter().collect(),
            attempts: 0,
        }
    }

    /// Next mission to try, or `None` once nothing more can be filled
    pub fn next_assignment(&mut self) -> Option<MissionAssignment> {
        if self.attempts >= self.planner.catalog().len() {
            return None;
        }
        self.attempts += 1;

        let skip: HashSet<MissionId> = self.entered.union(&self.excluded).copied().collect();
        self.planner.select_mission(&self.pool, &skip)
    }

    /// The backend accepted the entry: its pets stay busy for the cycle
    pub fn confirm(&mut self, assignment: &MissionAssignment) {
        for index in assignment.units {
            self.pool.mark_used(index);
        }
        self.entered.insert(assignment.mission_id);
    }

    /// The backend refused the entry: do not retry it this cycle
    pub fn reject(&mut self, assignment: &MissionAssignment) {
        self.excluded.insert(assignment.mission_id);
    }

    pub fn available_pets(&self) -> usize {
        self.pool.available_count()
    }

    pub fn excluded(&self) -> &HashSet<MissionId> {
        &self.excluded
    }
}
