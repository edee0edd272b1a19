//! Pet - The unit every planner assigns
//!
//! The backend reports pets as stacks (`pet_id` + `amount`). Planners work
//! on individual units, so a stack of three copies becomes three entries in
//! a [`PetPool`]. Units are never removed from the pool; they are flagged as
//! used so indices stay stable for the whole selection pass.

/// Pet template identifier as used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PetId(u64);

impl PetId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for PetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Elemental class of a pet
///
/// Earth beats Water, Water beats Wind, Wind beats Earth. Classes outside
/// that cycle are kept verbatim so missions can still match them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PetClass {
    Earth,
    Water,
    Wind,
    Other(String),
}

impl PetClass {
    /// Parse the backend's class label (case-insensitive for known classes)
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "earth" => PetClass::Earth,
            "water" => PetClass::Water,
            "wind" => PetClass::Wind,
            _ => PetClass::Other(label.trim().to_string()),
        }
    }

    /// The class this one has the advantage over
    pub fn beats(&self) -> Option<PetClass> {
        match self {
            PetClass::Earth => Some(PetClass::Water),
            PetClass::Water => Some(PetClass::Wind),
            PetClass::Wind => Some(PetClass::Earth),
            PetClass::Other(_) => None,
        }
    }

    /// Whether `self` has the class advantage against `other`
    pub fn counters(&self, other: &PetClass) -> bool {
        self.beats().as_ref() == Some(other)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PetClass::Earth => "Earth",
            PetClass::Water => "Water",
            PetClass::Wind => "Wind",
            PetClass::Other(label) => label,
        }
    }
}

impl From<&str> for PetClass {
    fn from(label: &str) -> Self {
        PetClass::parse(label)
    }
}

impl core::fmt::Display for PetClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack of identical pets as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetStack {
    pub pet_id: PetId,
    pub star: u8,
    pub class: PetClass,
    pub level: u32,
    pub amount: u32,
}

/// One assignable copy of a pet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetUnit {
    pub pet_id: PetId,
    pub star: u8,
    pub class: PetClass,
    pub level: u32,
}

impl PetUnit {
    pub fn new(pet_id: u64, star: u8, class: PetClass, level: u32) -> Self {
        Self {
            pet_id: PetId::new(pet_id),
            star,
            class,
            level,
        }
    }
}

/// Position of a unit inside a [`PetPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitIndex(pub usize);

/// Arena of pet units with a used flag per unit
#[derive(Debug, Clone, Default)]
pub struct PetPool {
    units: Vec<PetUnit>,
    used: Vec<bool>,
}

impl PetPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand backend stacks into individual units, keeping inventory order
    pub fn from_stacks<I>(stacks: I) -> Self
    where
        I: IntoIterator<Item = PetStack>,
    {
        let mut pool = Self::new();
        for stack in stacks {
            for _ in 0..stack.amount {
                pool.push(PetUnit {
                    pet_id: stack.pet_id,
                    star: stack.star,
                    class: stack.class.clone(),
                    level: stack.level,
                });
            }
        }
        pool
    }

    pub fn push(&mut self, unit: PetUnit) -> UnitIndex {
        self.units.push(unit);
        self.used.push(false);
        UnitIndex(self.units.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: UnitIndex) -> Option<&PetUnit> {
        self.units.get(index.0)
    }

    pub fn is_used(&self, index: UnitIndex) -> bool {
        self.used.get(index.0).copied().unwrap_or(true)
    }

    /// Flag a unit as committed for the rest of the cycle
    pub fn mark_used(&mut self, index: UnitIndex) {
        if let Some(flag) = self.used.get_mut(index.0) {
            *flag = true;
        }
    }

    /// Flag one unit per occurrence of each id as used
    ///
    /// Used for pets already sitting in an active mission. Ids that are not
    /// (or no longer) in the pool are ignored.
    pub fn reserve_committed<'a, I>(&mut self, pet_ids: I)
    where
        I: IntoIterator<Item = &'a PetId>,
    {
        for pet_id in pet_ids {
            let slot = self
                .units
                .iter()
                .enumerate()
                .find(|(i, unit)| unit.pet_id == *pet_id && !self.used[*i])
                .map(|(i, _)| i);
            if let Some(i) = slot {
                self.used[i] = true;
            }
        }
    }

    /// Units that are still free, in inventory order
    pub fn available(&self) -> impl Iterator<Item = (UnitIndex, &PetUnit)> {
        self.units
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.used[*i])
            .map(|(i, unit)| (UnitIndex(i), unit))
    }

    pub fn available_count(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }

    /// Every unit regardless of its used flag
    pub fn units(&self) -> &[PetUnit] {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(pet_id: u64, star: u8, class: PetClass, amount: u32) -> PetStack {
        PetStack {
            pet_id: PetId::new(pet_id),
            star,
            class,
            level: 1,
            amount,
        }
    }

    #[test]
    fn test_class_cycle() {
        assert!(PetClass::Earth.counters(&PetClass::Water));
        assert!(PetClass::Water.counters(&PetClass::Wind));
        assert!(PetClass::Wind.counters(&PetClass::Earth));
        assert!(!PetClass::Water.counters(&PetClass::Earth));
        assert!(!PetClass::Earth.counters(&PetClass::Earth));
    }

    #[test]
    fn test_class_parse() {
        assert_eq!(PetClass::parse("earth"), PetClass::Earth);
        assert_eq!(PetClass::parse(" Wind "), PetClass::Wind);
        assert_eq!(PetClass::parse("Light"), PetClass::Other("Light".into()));
        assert!(!PetClass::parse("Light").counters(&PetClass::Earth));
    }

    #[test]
    fn test_stacks_expand_into_units() {
        let pool = PetPool::from_stacks(vec![
            stack(101, 2, PetClass::Earth, 2),
            stack(102, 3, PetClass::Water, 1),
            stack(103, 1, PetClass::Wind, 0),
        ]);

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(UnitIndex(0)).unwrap().pet_id, PetId::new(101));
        assert_eq!(pool.get(UnitIndex(1)).unwrap().pet_id, PetId::new(101));
        assert_eq!(pool.get(UnitIndex(2)).unwrap().pet_id, PetId::new(102));
    }

    #[test]
    fn test_reserve_committed_counts_occurrences() {
        let mut pool = PetPool::from_stacks(vec![stack(101, 2, PetClass::Earth, 3)]);

        let committed = [PetId::new(101), PetId::new(101), PetId::new(999)];
        pool.reserve_committed(committed.iter());

        assert_eq!(pool.available_count(), 1);
        let free: Vec<_> = pool.available().map(|(i, _)| i).collect();
        assert_eq!(free, vec![UnitIndex(2)]);
    }

    #[test]
    fn test_mark_used_keeps_indices_stable() {
        let mut pool = PetPool::from_stacks(vec![
            stack(1, 1, PetClass::Earth, 1),
            stack(2, 1, PetClass::Earth, 1),
        ]);
        pool.mark_used(UnitIndex(0));

        assert!(pool.is_used(UnitIndex(0)));
        assert_eq!(pool.get(UnitIndex(1)).unwrap().pet_id, PetId::new(2));
        assert_eq!(pool.available_count(), 1);
    }
}
