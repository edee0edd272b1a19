//! CatalogLoader - Load the static mission and pet catalogs from JSON

use std::path::Path;

use farm_domain::{MissionCatalog, MissionId, MissionTemplate, PetCatalog, PetClass, PetId, SlotRequirement};
use serde::Deserialize;
use shared::{CatalogError, FarmError};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MissionRecord {
    mission_id: u64,
    #[serde(default)]
    name: String,
    pet_1_class: String,
    pet_1_star: u8,
    pet_2_class: String,
    pet_2_star: u8,
    pet_3_class: String,
    pet_3_star: u8,
}

impl From<MissionRecord> for MissionTemplate {
    fn from(record: MissionRecord) -> Self {
        MissionTemplate {
            id: MissionId::new(record.mission_id),
            name: record.name,
            slots: [
                SlotRequirement::new(PetClass::parse(&record.pet_1_class), record.pet_1_star),
                SlotRequirement::new(PetClass::parse(&record.pet_2_class), record.pet_2_star),
                SlotRequirement::new(PetClass::parse(&record.pet_3_class), record.pet_3_star),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct PetRecord {
    pet_id: u64,
    star: u8,
    class: String,
}

/// Reads the catalogs once at start-up
#[derive(Debug, Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load mission templates, keeping file order
    pub fn load_missions(&self, path: &Path) -> Result<MissionCatalog, FarmError> {
        let content = read(path, "missions")?;
        self.parse_missions(&content)
    }

    /// Load the pet template lookup used to resolve opponents
    pub fn load_pets(&self, path: &Path) -> Result<PetCatalog, FarmError> {
        let content = read(path, "pets")?;
        self.parse_pets(&content)
    }

    pub fn parse_missions(&self, content: &str) -> Result<MissionCatalog, FarmError> {
        let records: Vec<MissionRecord> =
            serde_json::from_str(content).map_err(|e| invalid("missions", e))?;
        debug!("loaded {} mission templates", records.len());
        Ok(MissionCatalog::new(
            records.into_iter().map(MissionTemplate::from).collect(),
        ))
    }

    pub fn parse_pets(&self, content: &str) -> Result<PetCatalog, FarmError> {
        let records: Vec<PetRecord> =
            serde_json::from_str(content).map_err(|e| invalid("pets", e))?;
        debug!("loaded {} pet templates", records.len());
        Ok(records
            .into_iter()
            .map(|r| (PetId::new(r.pet_id), r.star, PetClass::parse(&r.class)))
            .collect())
    }
}

fn read(path: &Path, name: &str) -> Result<String, FarmError> {
    std::fs::read_to_string(path).map_err(|e| {
        CatalogError {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        }
        .into()
    })
}

fn invalid(name: &str, err: serde_json::Error) -> FarmError {
    CatalogError {
        name: name.to_string(),
        reason: err.to_string(),
    }
    .into()
}
