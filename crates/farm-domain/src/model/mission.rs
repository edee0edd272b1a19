//! Mission - Static templates and the missions an account is running
//!
//! Templates come from the static catalog loaded once per process.
//! Active missions come from the backend on every cycle.

use super::pet::{PetClass, PetId};

/// Mission identifier as used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MissionId(u64);

impl MissionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for MissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constraint on one mission slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequirement {
    pub class: PetClass,
    pub min_star: u8,
}

impl SlotRequirement {
    pub fn new(class: PetClass, min_star: u8) -> Self {
        Self { class, min_star }
    }
}

/// A mission definition from the static catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionTemplate {
    pub id: MissionId,
    pub name: String,
    pub slots: [SlotRequirement; 3],
}

/// Ordered, immutable list of mission templates
///
/// Order matters: later entries are tried first when assigning pets.
#[derive(Debug, Clone, Default)]
pub struct MissionCatalog {
    templates: Vec<MissionTemplate>,
}

impl MissionCatalog {
    pub fn new(templates: Vec<MissionTemplate>) -> Self {
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: MissionId) -> Option<&MissionTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates in catalog order
    pub fn templates(&self) -> &[MissionTemplate] {
        &self.templates
    }
}

/// A mission the account has already entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMission {
    pub id: MissionId,
    pub name: String,
    /// Unix seconds at which the mission can be claimed
    pub end_time: i64,
    /// Pets sitting in the mission until it is claimed
    pub committed: Vec<PetId>,
}

impl ActiveMission {
    pub fn is_finished(&self, now: i64) -> bool {
        now > self.end_time
    }
}
