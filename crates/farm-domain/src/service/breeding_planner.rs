//! Breeding Planner - Choose which DNA units to mix
//!
//! Every DNA unit sits in exactly one pool: mothers (female-capable) or
//! fathers (everything else). A pair always takes one unit from each, and
//! a unit is consumed at most once per planning run.
//!
//! Two policies:
//! - random: pair uniformly random units until either pool runs dry
//! - collection: only pairs an unfinished collection still needs

use crate::model::breeding::{DnaStack, NeededPair};

/// Source of uniform indices for the random policy
pub trait UnitPicker {
    /// Return an index in `0..upper`; `upper` is never zero
    fn pick(&mut self, upper: usize) -> usize;
}

/// A (father, mother) template pair to submit to the mix endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreedingPair {
    pub father: u64,
    pub mother: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DnaUnit {
    item_id: u64,
    can_mom: bool,
}

/// Arena of DNA units with a used flag per unit
#[derive(Debug, Clone, Default)]
pub struct BreedingPool {
    units: Vec<DnaUnit>,
    used: Vec<bool>,
}

impl BreedingPool {
    /// Expand stacks into units, leaving out anything on the skip list
    pub fn from_stacks(stacks: &[DnaStack], skip_list: &[String]) -> Self {
        let mut pool = Self::default();
        for stack in stacks.iter().filter(|s| !s.is_skipped(skip_list)) {
            for _ in 0..stack.amount {
                pool.units.push(DnaUnit {
                    item_id: stack.item_id,
                    can_mom: stack.can_mom,
                });
                pool.used.push(false);
            }
        }
        pool
    }

    pub fn free_mothers(&self) -> usize {
        self.free(true).count()
    }

    pub fn free_fathers(&self) -> usize {
        self.free(false).count()
    }

    fn free(&self, mothers: bool) -> impl Iterator<Item = usize> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter(move |(i, unit)| unit.can_mom == mothers && !self.used[*i])
            .map(|(i, _)| i)
    }

    fn find_free(&self, item_id: u64, mothers: bool) -> Option<usize> {
        self.free(mothers).find(|&i| self.units[i].item_id == item_id)
    }

    fn consume(&mut self, father: usize, mother: usize) -> BreedingPair {
        self.used[father] = true;
        self.used[mother] = true;
        BreedingPair {
            father: self.units[father].item_id,
            mother: self.units[mother].item_id,
        }
    }
}

/// Stateless breeding planner
#[derive(Debug, Clone, Copy, Default)]
pub struct BreedingPlanner;

impl BreedingPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Pair random units until one pool is empty
    ///
    /// Leftover units of the larger pool stay unpaired.
    pub fn random_pairs<P: UnitPicker>(
        &self,
        pool: &mut BreedingPool,
        picker: &mut P,
    ) -> Vec<BreedingPair> {
        let mut pairs = Vec::new();
        loop {
            let mothers: Vec<usize> = pool.free(true).collect();
            let fathers: Vec<usize> = pool.free(false).collect();
            if mothers.is_empty() || fathers.is_empty() {
                break;
            }

            let mother = mothers[picker.pick(mothers.len()).min(mothers.len() - 1)];
            let father = fathers[picker.pick(fathers.len()).min(fathers.len() - 1)];
            pairs.push(pool.consume(father, mother));
        }
        pairs
    }

    /// Pairs that complete unfinished collections, in the order requested
    ///
    /// A needed pair whose father or mother has no free unit left is
    /// skipped; nothing is retried.
    pub fn collection_pairs(
        &self,
        pool: &mut BreedingPool,
        needed: &[NeededPair],
    ) -> Vec<BreedingPair> {
        needed
            .iter()
            .filter_map(|pair| {
                let father = pool.find_free(pair.father, false)?;
                let mother = pool.find_free(pair.mother, true)?;
                Some(pool.consume(father, mother))
            })
            .collect()
    }
}
