//! Daily quests, clan membership, achievements and season pass

use farm_domain::{
    claimable_achievements, claimable_season_rewards, pending_quests, SeasonPass, UnitPicker,
};
use shared::ApiError;
use tracing::{info, warn};

use super::{tolerate, AccountCycle};
use crate::port::GameGateway;

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    pub(super) async fn collect_rewards(&mut self, current_clan: Option<u64>) -> Result<(), ApiError> {
        self.sync_clan(current_clan).await?;
        self.do_quests().await?;

        self.pacer.submit().await;
        self.claim_achievements().await?;

        self.pacer.submit().await;
        self.claim_season_passes().await
    }

    /// Move the account into the configured clan, leaving any other first
    async fn sync_clan(&mut self, current_clan: Option<u64>) -> Result<(), ApiError> {
        let Some(target) = self.settings.clan_id else {
            return Ok(());
        };

        match current_clan {
            Some(clan) if clan == target => return Ok(()),
            Some(clan) => {
                tolerate("clan quit", self.gateway.quit_clan(clan).await)?;
            }
            None => {}
        }

        if tolerate("clan join", self.gateway.join_clan(target).await)?.is_some() {
            info!("Joined clan {}", target);
        }
        Ok(())
    }

    async fn do_quests(&mut self) -> Result<(), ApiError> {
        info!("Checking for available quests...");
        let Some(board) = tolerate("quest list", self.gateway.quests().await)? else {
            return Ok(());
        };

        let quests = board.to_quests();
        let pending = pending_quests(&quests, &self.settings.skip_tasks);
        if pending.is_empty() {
            warn!("No quests to do");
            return Ok(());
        }

        for quest in pending {
            info!("Doing daily quest: {}", quest.code);
            match tolerate("quest check", self.gateway.check_quest(&quest.code).await)? {
                Some(check) if check.status => {
                    info!("Daily quest {} done", quest.code);
                    self.report.quests_done += 1;
                }
                _ => warn!("Daily quest {} failed", quest.code),
            }
            self.pacer.step().await;
        }
        Ok(())
    }

    async fn claim_achievements(&mut self) -> Result<(), ApiError> {
        info!("Checking for completed achievements...");
        let Some(board) = tolerate("achievement list", self.gateway.achievements().await)? else {
            return Ok(());
        };

        let ready = claimable_achievements(&board.to_achievements());
        if ready.is_empty() {
            warn!("No completed achievements found");
            return Ok(());
        }

        info!("Found completed achievements: {}", ready.len());
        for quest_id in ready {
            if tolerate("achievement claim", self.gateway.claim_achievement(quest_id).await)?.is_some() {
                info!("Claimed achievement {}", quest_id);
                self.report.achievements_claimed += 1;
            }
            self.pacer.step().await;
        }
        Ok(())
    }

    async fn claim_season_passes(&mut self) -> Result<(), ApiError> {
        info!("Checking for available season pass...");
        let Some(entries) = tolerate("season pass list", self.gateway.season_passes().await)? else {
            warn!("Can not get season pass");
            return Ok(());
        };
        if entries.is_empty() {
            warn!("Season pass not found");
            return Ok(());
        }

        for entry in &entries {
            let pass = SeasonPass::from(entry);
            info!(
                "Season pass {} | Current step: {} | {}",
                pass.season_id, pass.current_step, pass.title
            );

            for reward in claimable_season_rewards(&pass) {
                info!(
                    "Claiming season pass {} step {}: {} {}",
                    pass.season_id, reward.step, reward.amount, reward.name
                );
                self.pacer.step().await;
                let claimed = tolerate(
                    "season pass claim",
                    self.gateway.claim_season_pass(pass.season_id, reward.step).await,
                )?;
                if claimed.is_some() {
                    info!("Season pass step {} claimed", reward.step);
                    self.report.season_rewards_claimed += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::{cycle, FakeGame};
    use super::super::{Catalogs, CycleSettings};
    use crate::dto::{
        AchievementBoard, QuestBoard, QuestEntry, SeasonPassEntry, SeasonRewardEntry, UserInfo,
    };
    use serde_json::json;

    fn settings() -> CycleSettings {
        CycleSettings {
            max_amount_gacha: 0,
            auto_claim_bonus: false,
            auto_merge_pet: false,
            auto_pvp: false,
            ..Default::default()
        }
    }

    fn quest(code: &str, status: bool) -> QuestEntry {
        QuestEntry {
            quest_code: code.into(),
            status,
        }
    }

    #[tokio::test]
    async fn test_pending_quests_are_checked() {
        let game = FakeGame::default();
        game.set_quests(QuestBoard {
            quests: vec![quest("daily", false), quest("invite", false), quest("login", true)],
        });
        let settings = CycleSettings {
            skip_tasks: vec!["invite".into()],
            ..settings()
        };

        let report = cycle(&game, settings, Catalogs::default())
            .run()
            .await
            .unwrap();

        assert_eq!(game.calls_to("check_quest"), vec!["daily"]);
        assert_eq!(report.quests_done, 1);
    }

    #[tokio::test]
    async fn test_single_pending_quest_is_done() {
        let game = FakeGame::default();
        game.set_quests(QuestBoard {
            quests: vec![quest("daily", false)],
        });

        cycle(&game, settings(), Catalogs::default())
            .run()
            .await
            .unwrap();

        assert_eq!(game.calls_to("check_quest"), vec!["daily"]);
    }

    #[tokio::test]
    async fn test_clan_switch() {
        let game = FakeGame::default();
        game.set_user(UserInfo {
            clan_id: Some(7),
            ..Default::default()
        });
        let settings = CycleSettings {
            clan_id: Some(4463),
            ..settings()
        };

        cycle(&game, settings, Catalogs::default())
            .run()
            .await
            .unwrap();

        assert_eq!(game.calls_to("quit_clan"), vec!["7"]);
        assert_eq!(game.calls_to("join_clan"), vec!["4463"]);
    }

    #[tokio::test]
    async fn test_clan_untouched_without_target_or_when_member() {
        let game = FakeGame::default();
        cycle(&game, settings(), Catalogs::default())
            .run()
            .await
            .unwrap();
        assert!(game.calls_to("join_clan").is_empty());

        let member = FakeGame::default();
        member.set_user(UserInfo {
            clan_id: Some(4463),
            ..Default::default()
        });
        let settings = CycleSettings {
            clan_id: Some(4463),
            ..settings()
        };
        cycle(&member, settings, Catalogs::default())
            .run()
            .await
            .unwrap();
        assert!(member.calls_to("join_clan").is_empty());
        assert!(member.calls_to("quit_clan").is_empty());
    }

    #[tokio::test]
    async fn test_achievements_and_season_pass_claims() {
        let game = FakeGame::default();
        let board: AchievementBoard = serde_json::from_value(json!({
            "LEVEL": {"achievements": [
                {"quest_id": 1, "status": true, "claimed": false},
                {"quest_id": 2, "status": true, "claimed": true},
                {"quest_id": 3, "status": false, "claimed": false}
            ]}
        }))
        .unwrap();
        game.set_achievements(board);
        game.set_season_passes(vec![SeasonPassEntry {
            season_id: 5,
            current_step: 2,
            title: "Spring".into(),
            free_rewards: vec![
                SeasonRewardEntry {
                    step: 1,
                    is_claimed: true,
                    amount: 1,
                    name: "gold".into(),
                },
                SeasonRewardEntry {
                    step: 2,
                    is_claimed: false,
                    amount: 3,
                    name: "dna".into(),
                },
                SeasonRewardEntry {
                    step: 3,
                    is_claimed: false,
                    amount: 9,
                    name: "ticket".into(),
                },
            ],
        }]);

        let report = cycle(&game, settings(), Catalogs::default())
            .run()
            .await
            .unwrap();

        assert_eq!(game.calls_to("claim_achievement"), vec!["1"]);
        assert_eq!(game.calls_to("claim_season_pass"), vec!["5:2"]);
        assert_eq!(report.achievements_claimed, 1);
        assert_eq!(report.season_rewards_claimed, 1);
    }
}
