//! PVP arena: season reward, defense team, attacks

use std::sync::Arc;

use farm_domain::{
    select_battle_team, select_defense_team, DefenseDecision, PetId, PetUnit, TeamSelection,
    UnitPicker,
};
use shared::ApiError;
use tracing::{debug, info, warn};

use super::{tolerate, AccountCycle};
use crate::dto::{AttackRequest, BattleInfo, DefenseTeamRequest, PetEntry};
use crate::port::GameGateway;

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    pub(super) async fn run_pvp(&mut self) -> Result<(), ApiError> {
        let Some(info) = tolerate("battle info", self.gateway.battle_info().await)? else {
            return Ok(());
        };
        info!("PVP Arena | Score: {} | Tier: {}", info.score, info.tier_name);

        if let Some(season_id) = info.unclaimed_season() {
            info!("Claiming PVP season reward: {}", season_id);
            if tolerate("pvp reward claim", self.gateway.claim_pvp_reward(season_id).await)?.is_some() {
                info!("PVP season reward claimed");
            }
        }

        if info.is_end_season {
            warn!("PVP season ended");
            return Ok(());
        }

        if info.defense_team.len() < 3 {
            self.ensure_defense(&info).await?;
        }
        self.attack_while_tickets_remain(&info).await
    }

    async fn roster(&self) -> Result<Option<Vec<PetUnit>>, ApiError> {
        let pets = tolerate("pet list", self.gateway.pets().await)?;
        Ok(pets.map(|pets| pets.iter().map(PetEntry::to_unit).collect()))
    }

    async fn ensure_defense(&mut self, info: &BattleInfo) -> Result<(), ApiError> {
        let Some(roster) = self.roster().await? else {
            return Ok(());
        };

        match select_defense_team(&roster, &info.defense_ids()) {
            DefenseDecision::Keep => debug!("defense team already optimal"),
            DefenseDecision::Insufficient => warn!("Not enough pets for a defense team"),
            DefenseDecision::Set(team) => {
                let request = DefenseTeamRequest::from(team);
                if tolerate("defense team", self.gateway.set_defense_team(request).await)?.is_some() {
                    info!("Defense team set: {}", join_ids(&team));
                }
            }
        }
        Ok(())
    }

    async fn attack_while_tickets_remain(&mut self, info: &BattleInfo) -> Result<(), ApiError> {
        let tickets = info.ticket.amount;
        if tickets == 0 {
            warn!("No tickets left for PVP");
            return Ok(());
        }
        let Some(roster) = self.roster().await? else {
            return Ok(());
        };

        let catalogs = Arc::clone(&self.catalogs);
        for round in 1..=tickets {
            info!("Match {} | Finding target...", round);
            let Some(board) = tolerate("opponents", self.gateway.opponents().await)? else {
                continue;
            };

            let opponent = catalogs.pets.resolve_opponent(
                board.opponent.telegram_id,
                board
                    .opponent
                    .pets
                    .iter()
                    .map(|p| (PetId::new(p.pet_id), p.level)),
            );
            let team = match select_battle_team(&roster, &opponent) {
                TeamSelection::Team(team) => team,
                TeamSelection::Insufficient => {
                    warn!("Not enough pets for a battle team");
                    break;
                }
            };

            info!("Match {} | Starting attack...", round);
            let request = AttackRequest::new(opponent.id, &team);
            match tolerate("attack", self.gateway.attack(request).await)? {
                Some(outcome) => {
                    info!(
                        "Attack: {} | Detail: {} | Point: {}",
                        if outcome.is_win { "Win" } else { "Lose" },
                        outcome.round_summary(),
                        outcome.score
                    );
                    if outcome.is_win {
                        self.report.battles_won += 1;
                    } else {
                        self.report.battles_lost += 1;
                    }
                    if outcome.ticket.amount == 0 {
                        info!("No enough tickets");
                        break;
                    }
                }
                None => warn!("Can't attack"),
            }

            self.pacer.attack().await;
        }
        Ok(())
    }
}

fn join_ids(ids: &[PetId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}
