//! Pacer - Fixed delays between calls of one account

use std::time::Duration;

use shared::Pacing;

/// Performs every inter-step delay of an account cycle
#[derive(Debug, Clone)]
pub struct Pacer {
    pacing: Pacing,
}

impl Pacer {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    /// A pacer that never sleeps
    pub fn immediate() -> Self {
        Self::new(Pacing::immediate())
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Between cycle steps
    pub async fn step(&self) {
        pause(self.pacing.step()).await;
    }

    /// Between individual submissions
    pub async fn submit(&self) {
        pause(self.pacing.submit()).await;
    }

    pub async fn attack(&self) {
        pause(self.pacing.attack()).await;
    }

    pub async fn gacha(&self) {
        pause(self.pacing.gacha()).await;
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
