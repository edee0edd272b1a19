//! Battle - Opponent snapshots seen at matchmaking time

use std::collections::HashMap;

use super::pet::{PetClass, PetId};

/// One pet of an opponent's team, resolved against the pet catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentPet {
    pub pet_id: PetId,
    pub star: u8,
    pub class: PetClass,
    pub level: u32,
}

/// Another account's battle team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    /// Telegram id of the opponent, sent back with the attack
    pub id: u64,
    /// Up to three pets in the order the backend presents them
    pub pets: Vec<OpponentPet>,
}

/// Star and class of a pet template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetTemplate {
    pub star: u8,
    pub class: PetClass,
}

/// Static lookup from pet template id to (class, star)
///
/// Opponent snapshots only carry ids and levels.
#[derive(Debug, Clone, Default)]
pub struct PetCatalog {
    templates: HashMap<PetId, PetTemplate>,
}

impl PetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pet_id: PetId, star: u8, class: PetClass) {
        self.templates.insert(pet_id, PetTemplate { star, class });
    }

    pub fn get(&self, pet_id: PetId) -> Option<&PetTemplate> {
        self.templates.get(&pet_id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build an opponent, dropping pets whose template is unknown
    pub fn resolve_opponent<I>(&self, id: u64, pets: I) -> Opponent
    where
        I: IntoIterator<Item = (PetId, u32)>,
    {
        let pets = pets
            .into_iter()
            .filter_map(|(pet_id, level)| {
                self.get(pet_id).map(|t| OpponentPet {
                    pet_id,
                    star: t.star,
                    class: t.class.clone(),
                    level,
                })
            })
            .collect();
        Opponent { id, pets }
    }
}

impl FromIterator<(PetId, u8, PetClass)> for PetCatalog {
    fn from_iter<T: IntoIterator<Item = (PetId, u8, PetClass)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (pet_id, star, class) in iter {
            catalog.insert(pet_id, star, class);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_opponent_drops_unknown_templates() {
        let catalog: PetCatalog = vec![
            (PetId::new(10), 3, PetClass::Water),
            (PetId::new(11), 2, PetClass::Earth),
        ]
        .into_iter()
        .collect();

        let opponent = catalog.resolve_opponent(
            42,
            vec![(PetId::new(10), 7), (PetId::new(99), 3), (PetId::new(11), 1)],
        );

        assert_eq!(opponent.id, 42);
        assert_eq!(opponent.pets.len(), 2);
        assert_eq!(opponent.pets[0].star, 3);
        assert_eq!(opponent.pets[0].level, 7);
        assert_eq!(opponent.pets[1].class, PetClass::Earth);
    }
}
