//! Missions: claim finished ones, then fill free slots until nothing fits

use std::sync::Arc;

use farm_domain::{
    finished_missions, ActiveMission, MissionId, MissionSession, PetPool, UnitPicker,
};
use shared::ApiError;
use tracing::{info, warn};

use super::{tolerate, AccountCycle};
use crate::dto::{EnterMissionRequest, PetEntry};
use crate::port::GameGateway;

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    pub(super) async fn handle_missions(&mut self) -> Result<(), ApiError> {
        info!("Checking for missions...");
        let Some(missions) = tolerate("mission list", self.gateway.missions().await)? else {
            warn!("Can't handle missions");
            return Ok(());
        };

        let active: Vec<ActiveMission> = missions.iter().map(ActiveMission::from).collect();
        let now = chrono::Utc::now().timestamp();
        for mission in finished_missions(&active, now, &self.settings.skip_tasks) {
            info!("Claiming mission {} | {}...", mission.id, mission.name);
            match tolerate("mission claim", self.gateway.claim_mission(mission.id.get()).await)? {
                Some(_) => {
                    info!("Claimed mission {} | {}", mission.id, mission.name);
                    self.report.missions_claimed += 1;
                }
                None => warn!("Claiming mission {} | {} failed", mission.id, mission.name),
            }
            self.pacer.submit().await;
        }

        info!("Checking for available missions to enter...");
        self.enter_missions().await
    }

    async fn enter_missions(&mut self) -> Result<(), ApiError> {
        let Some(pets) = tolerate("pet list", self.gateway.pets().await)? else {
            return Ok(());
        };
        let Some(missions) = tolerate("mission list", self.gateway.missions().await)? else {
            return Ok(());
        };

        let catalogs = Arc::clone(&self.catalogs);
        let active: Vec<ActiveMission> = missions.iter().map(ActiveMission::from).collect();
        let pool = PetPool::from_stacks(pets.iter().map(PetEntry::to_stack));
        let excluded = self.settings.skip_missions.iter().copied().map(MissionId::new);
        let mut session = MissionSession::new(&catalogs.missions, pool, &active, excluded);
        info!("Number of available pets: {}", session.available_pets());

        while let Some(assignment) = session.next_assignment() {
            self.pacer.submit().await;
            info!("Entering mission {} with available pets...", assignment.mission_id);

            let request = EnterMissionRequest::from(&assignment);
            match tolerate("mission enter", self.gateway.enter_mission(request).await)? {
                Some(_) => {
                    info!("Entered mission {}", assignment.mission_id);
                    session.confirm(&assignment);
                    self.report.missions_entered += 1;
                }
                None => {
                    warn!("Entering mission {} failed", assignment.mission_id);
                    session.reject(&assignment);
                }
            }
        }

        warn!("Cannot join another mission with current available pets");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::{cycle, FakeGame};
    use super::super::{Catalogs, CycleSettings};
    use crate::dto::{MissionEntry, PetEntry, PetRef};
    use farm_domain::{MissionCatalog, MissionId, MissionTemplate, PetClass, SlotRequirement};

    fn settings() -> CycleSettings {
        CycleSettings {
            max_amount_gacha: 0,
            auto_claim_bonus: false,
            auto_merge_pet: false,
            auto_pvp: false,
            ..Default::default()
        }
    }

    fn template(id: u64, slots: [(PetClass, u8); 3]) -> MissionTemplate {
        let [a, b, c] = slots;
        MissionTemplate {
            id: MissionId::new(id),
            name: format!("mission-{}", id),
            slots: [
                SlotRequirement::new(a.0, a.1),
                SlotRequirement::new(b.0, b.1),
                SlotRequirement::new(c.0, c.1),
            ],
        }
    }

    fn pet(pet_id: u64, star: u8, class: &str, amount: u32) -> PetEntry {
        PetEntry {
            pet_id,
            name: format!("pet-{}", pet_id),
            star,
            class: class.into(),
            level: 1,
            amount,
        }
    }

    fn catalogs(templates: Vec<MissionTemplate>) -> Catalogs {
        Catalogs {
            missions: MissionCatalog::new(templates),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_claims_finished_missions_except_skipped() {
        let game = FakeGame::default();
        game.set_missions(vec![
            MissionEntry {
                mission_id: 1,
                name: "old".into(),
                end_time: 10,
                pet_joined: None,
            },
            MissionEntry {
                mission_id: 2,
                name: "skipped".into(),
                end_time: 10,
                pet_joined: None,
            },
            MissionEntry {
                mission_id: 3,
                name: "running".into(),
                end_time: i64::MAX,
                pet_joined: None,
            },
        ]);
        let settings = CycleSettings {
            skip_tasks: vec!["2".into()],
            ..settings()
        };

        let report = cycle(&game, settings, Catalogs::default())
            .run()
            .await
            .unwrap();

        assert_eq!(game.calls_to("claim_mission"), vec!["1"]);
        assert_eq!(report.missions_claimed, 1);
    }

    #[tokio::test]
    async fn test_enters_missions_until_pets_run_out() {
        let game = FakeGame::default();
        game.set_pets(vec![pet(1, 2, "Earth", 2), pet(2, 3, "Water", 1), pet(3, 1, "Wind", 2)]);
        let catalog = catalogs(vec![
            template(10, [(PetClass::Earth, 1), (PetClass::Water, 2), (PetClass::Wind, 1)]),
            template(11, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Wind, 1)]),
        ]);

        let report = cycle(&game, settings(), catalog).run().await.unwrap();

        // reverse catalog order: 11 takes both Earth pets, so 10 cannot fill
        assert_eq!(game.calls_to("enter_mission"), vec!["11:1,1,3"]);
        assert_eq!(report.missions_entered, 1);
    }

    #[tokio::test]
    async fn test_rejected_mission_is_not_retried() {
        let game = FakeGame::default();
        game.set_pets(vec![pet(1, 3, "Earth", 3)]);
        game.reject_mission(11);
        let catalog = catalogs(vec![
            template(10, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Earth, 1)]),
            template(11, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Earth, 1)]),
        ]);

        let report = cycle(&game, settings(), catalog).run().await.unwrap();

        assert_eq!(game.calls_to("enter_mission"), vec!["11:1,1,1", "10:1,1,1"]);
        assert_eq!(report.missions_entered, 1);
    }

    #[tokio::test]
    async fn test_busy_pets_and_skipped_missions_are_respected() {
        let game = FakeGame::default();
        game.set_pets(vec![pet(1, 3, "Earth", 4)]);
        game.set_missions(vec![MissionEntry {
            mission_id: 12,
            name: "running".into(),
            end_time: i64::MAX,
            pet_joined: Some(vec![PetRef { pet_id: 1 }]),
        }]);
        let catalog = catalogs(vec![
            template(10, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Earth, 1)]),
            template(11, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Earth, 1)]),
            template(12, [(PetClass::Earth, 1), (PetClass::Earth, 1), (PetClass::Earth, 1)]),
        ]);
        let settings = CycleSettings {
            skip_missions: vec![11],
            ..settings()
        };

        cycle(&game, settings, catalog).run().await.unwrap();

        // 12 is running and holds one copy; 11 is skipped; 10 gets the other three
        assert_eq!(game.calls_to("enter_mission"), vec!["10:1,1,1"]);
    }

    #[tokio::test]
    async fn test_unfillable_mission_is_skipped() {
        let game = FakeGame::default();
        game.set_pets(vec![pet(1, 2, "Earth", 1), pet(2, 3, "Water", 1), pet(3, 1, "Wind", 1)]);
        let catalog = catalogs(vec![template(
            10,
            [(PetClass::Earth, 2), (PetClass::Water, 2), (PetClass::Wind, 2)],
        )]);

        let report = cycle(&game, settings(), catalog).run().await.unwrap();

        assert!(game.calls_to("enter_mission").is_empty());
        assert_eq!(report.missions_entered, 0);
    }
}
