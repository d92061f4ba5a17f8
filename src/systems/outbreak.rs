use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    events::{FarmEvent, InfectionSource},
    rng::{RngExt, SystemRng},
    scenario::DiseaseConfig,
    world::World,
};

/// Late-round bird flu. Dormant until the countdown reaches the threshold,
/// then every interval each healthy chicken is rolled once for infection.
pub struct OutbreakSystem {
    config: DiseaseConfig,
    active: bool,
    since_sweep: f64,
}

impl OutbreakSystem {
    pub fn new(config: DiseaseConfig) -> Self {
        Self {
            config,
            active: false,
            since_sweep: 0.0,
        }
    }
}

impl System for OutbreakSystem {
    fn name(&self) -> &str {
        "outbreak"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if !self.active && ctx.remaining <= self.config.outbreak_threshold {
            self.active = true;
            self.since_sweep = 0.0;
            tracing::info!(remaining = ctx.remaining, "bird flu season has begun");
            world.push_event(FarmEvent::OutbreakStarted {
                remaining: ctx.remaining,
            });
        }
        if !self.active {
            return Ok(());
        }

        self.since_sweep += ctx.dt;
        if self.since_sweep <= self.config.outbreak_interval {
            return Ok(());
        }
        self.since_sweep = 0.0;

        let mut infected = 0usize;
        for id in world.chicken_ids() {
            let healthy = world
                .chicken(id)
                .map(|c| c.alive && !c.is_sick())
                .unwrap_or(false);
            if healthy
                && rng.roll(self.config.outbreak_probability)
                && world.infect(id, InfectionSource::Outbreak)
            {
                infected += 1;
            }
        }
        tracing::debug!(infected, "outbreak sweep");
        Ok(())
    }
}
