//! Gacha draws and milestone bonuses

use farm_domain::{bonus_reward, GachaBonusProgress, GachaBudget, UnitPicker};
use shared::ApiError;
use tracing::{debug, info, warn};

use super::{tolerate, AccountCycle};
use crate::dto::{GachaRequest, UserInfo};
use crate::port::{GachaKind, GameGateway};

const KINDS: [GachaKind; 2] = [GachaKind::Common, GachaKind::Super];

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    /// Spend both gacha currencies, up to the configured cap each
    pub(super) async fn draw_gacha(&mut self, user: &UserInfo) -> Result<(), ApiError> {
        for kind in KINDS {
            self.draw_currency(kind, user.balance(kind.is_super())).await?;
        }
        Ok(())
    }

    async fn draw_currency(&mut self, kind: GachaKind, mut balance: u64) -> Result<(), ApiError> {
        let mut budget = GachaBudget::new(self.settings.max_amount_gacha);

        while let Some(amount) = budget.next_pull(balance) {
            self.pacer.gacha().await;
            let request = GachaRequest {
                amount,
                is_super: kind.is_super(),
            };
            let Some(draw) = tolerate("gacha draw", self.gateway.draw_gacha(request).await)? else {
                warn!("[{}] Can't get new pets", kind.label());
                break;
            };

            info!("[{}] Got {} new pets", kind.label(), amount);
            for pet in &draw.dna {
                info!(
                    "[{}] Pet: {} | Class: {} | Star: {}",
                    kind.label(),
                    pet.name,
                    pet.class,
                    pet.star
                );
            }
            self.report.pets_drawn += amount;
            balance = draw.balance(kind.is_super());
        }

        debug!(kind = kind.label(), drawn = budget.drawn(), "gacha done");
        Ok(())
    }

    /// Claim the next reached milestone of each bonus track
    pub(super) async fn claim_gacha_bonuses(&mut self) -> Result<(), ApiError> {
        for kind in KINDS {
            let Some(bonus) = tolerate("gacha bonus", self.gateway.gacha_bonus(kind).await)? else {
                continue;
            };

            let Some(reward) = bonus_reward(&GachaBonusProgress::from(&bonus)) else {
                debug!(kind = kind.label(), step = bonus.current_step, "no bonus ready");
                continue;
            };

            self.pacer.submit().await;
            let claimed = tolerate(
                "gacha bonus claim",
                self.gateway.claim_gacha_bonus(reward.reward_no()).await,
            )?;
            if claimed.is_some() {
                info!("[{}] Claimed gacha bonus {:?}", kind.label(), reward);
                self.report.bonuses_claimed += 1;
            }
        }
        Ok(())
    }
}
