//! Breeding: mix DNA pairs, randomly or for unfinished collections

use farm_domain::{needed_pairs, BreedingPair, BreedingPlanner, BreedingPool, DnaStack, UnitPicker};
use shared::ApiError;
use tracing::{info, warn};

use super::{tolerate, AccountCycle};
use crate::dto::MixRequest;
use crate::port::GameGateway;

impl<G, P> AccountCycle<G, P>
where
    G: GameGateway,
    P: UnitPicker + Send,
{
    pub(super) async fn breed(&mut self) -> Result<(), ApiError> {
        if self.settings.enable_advanced_merge {
            self.breed_collections().await
        } else {
            self.breed_random().await
        }
    }

    async fn load_pool(&self) -> Result<Option<BreedingPool>, ApiError> {
        let Some(dna) = tolerate("dna list", self.gateway.dna().await)? else {
            return Ok(None);
        };
        let stacks: Vec<DnaStack> = dna.iter().map(DnaStack::from).collect();
        let pool = BreedingPool::from_stacks(&stacks, &self.settings.skip_pets_dna);
        info!(
            "Available pets Male: {} | Female: {}",
            pool.free_fathers(),
            pool.free_mothers()
        );
        Ok(Some(pool))
    }

    async fn breed_random(&mut self) -> Result<(), ApiError> {
        let Some(mut pool) = self.load_pool().await? else {
            return Ok(());
        };
        if pool.free_mothers() == 0 {
            warn!("No female pets to mix");
            return Ok(());
        }

        let pairs = BreedingPlanner::new().random_pairs(&mut pool, &mut self.picker);
        if pairs.is_empty() {
            warn!("No couple left to mix");
            return Ok(());
        }
        self.submit_pairs(&pairs).await
    }

    async fn breed_collections(&mut self) -> Result<(), ApiError> {
        info!("Starting collection merge...");
        let Some(mut pool) = self.load_pool().await? else {
            return Ok(());
        };
        let Some(board) = tolerate("achievement list", self.gateway.achievements().await)? else {
            return Ok(());
        };

        let needed = needed_pairs(&board.to_achievements());
        info!("Found {} unfinished collections", needed.len());

        let pairs = BreedingPlanner::new().collection_pairs(&mut pool, &needed);
        if pairs.is_empty() {
            warn!("No pets to merge for collections");
            return Ok(());
        }
        self.submit_pairs(&pairs).await
    }

    /// Submit pairs one by one; failures are logged and not retried
    async fn submit_pairs(&mut self, pairs: &[BreedingPair]) -> Result<(), ApiError> {
        for pair in pairs {
            self.pacer.submit().await;
            info!("Mixing pets {} and {}", pair.father, pair.mother);

            let request = MixRequest {
                dad_id: pair.father,
                mom_id: pair.mother,
            };
            match tolerate("pet mix", self.gateway.mix_pets(request).await)? {
                Some(outcome) => {
                    match outcome.pet {
                        Some(pet) => info!(
                            "Mix successful! Name: {} | Star: {} | Class: {}",
                            pet.name, pet.star, pet.class
                        ),
                        None => info!("Mix successful!"),
                    }
                    self.report.pairs_mixed += 1;
                }
                None => warn!("Mixing {} and {} failed", pair.father, pair.mother),
            }
        }
        Ok(())
    }
}
