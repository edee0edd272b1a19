//! Gacha - How many pulls to make and which milestone bonus to claim

use crate::model::rewards::GachaBonusProgress;

/// Batch size used whenever the balance allows it
const BULK_PULL: u32 = 10;

/// Per-currency draw counter capped by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GachaBudget {
    drawn: u32,
    cap: u32,
}

impl GachaBudget {
    pub fn new(cap: u32) -> Self {
        Self { drawn: 0, cap }
    }

    /// Size of the next pull for the given balance, or `None` to stop
    ///
    /// Pulls ten at a time while the balance allows it, single pulls
    /// otherwise. Stops on an empty balance or once the cap is reached.
    pub fn next_pull(&mut self, balance: u64) -> Option<u32> {
        if balance == 0 || self.drawn >= self.cap {
            return None;
        }
        let amount = if balance >= u64::from(BULK_PULL) { BULK_PULL } else { 1 };
        self.drawn += amount;
        Some(amount)
    }

    pub fn drawn(&self) -> u32 {
        self.drawn
    }
}

/// Milestone reward of a gacha bonus track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusReward {
    /// Extra gacha currency (`reward_no` 1)
    GodPower,
    /// Extra DNA (`reward_no` 2)
    Dna,
}

impl BonusReward {
    pub fn reward_no(self) -> u8 {
        match self {
            BonusReward::GodPower => 1,
            BonusReward::Dna => 2,
        }
    }
}

/// Pick the bonus to claim; the god-power milestone goes first
pub fn bonus_reward(progress: &GachaBonusProgress) -> Option<BonusReward> {
    if progress.current_step >= progress.step_bonus_god_power && !progress.claimed_god_power {
        Some(BonusReward::GodPower)
    } else if progress.current_step >= progress.step_bonus_dna && !progress.claimed_dna {
        Some(BonusReward::Dna)
    } else {
        None
    }
}
