use anyhow::Result;
use glam::Vec2;

use crate::{
    components::Health,
    engine::{System, SystemContext},
    entity::{DeathCause, EntityId, LifecycleSignal},
    events::{FarmEvent, InfectionSource},
    rng::{RngExt, SystemRng},
    scenario::DiseaseConfig,
    world::World,
};

/// Sickness progression and bird-to-bird contagion.
pub struct DiseaseSystem {
    config: DiseaseConfig,
}

impl DiseaseSystem {
    pub fn new(config: DiseaseConfig) -> Self {
        Self { config }
    }

    fn progress(&self, dt: f32, world: &mut World) {
        let mut fatal = Vec::new();
        let mut critical = Vec::new();
        for id in world.chicken_ids() {
            let Some(chicken) = world.chickens.get_mut(&id) else {
                continue;
            };
            if !chicken.alive || !chicken.is_sick() {
                continue;
            }
            chicken.sickness_time += dt;
            if chicken.sickness_time > self.config.fatal_after {
                chicken.alive = false;
                fatal.push(id);
            } else if chicken.sickness_time > self.config.critical_after
                && chicken.health == Health::Sick
            {
                chicken.health = Health::Critical;
                critical.push(id);
            }
        }
        for id in critical {
            tracing::debug!(chicken = id.raw(), "sickness turned critical");
            world.push_event(FarmEvent::BecameCritical { chicken: id });
        }
        for id in fatal {
            world.queue(
                id,
                LifecycleSignal::Die {
                    cause: DeathCause::Disease,
                },
            );
        }
    }

    fn spread(&self, world: &mut World, rng: &mut SystemRng<'_>) {
        let mut carriers: Vec<Vec2> = Vec::new();
        let mut exposed: Vec<(EntityId, Vec2)> = Vec::new();
        for id in world.chicken_ids() {
            let Some(chicken) = world.chicken(id) else {
                continue;
            };
            if !chicken.alive {
                continue;
            }
            if chicken.is_sick() {
                carriers.push(chicken.position);
            } else {
                exposed.push((id, chicken.position));
            }
        }
        if carriers.is_empty() || exposed.is_empty() {
            return;
        }

        let radius = self.config.contagion_radius;
        let mut caught = vec![false; exposed.len()];
        for carrier in &carriers {
            for (index, (_, position)) in exposed.iter().enumerate() {
                if caught[index] || carrier.distance(*position) >= radius {
                    continue;
                }
                if rng.roll(self.config.contagion_probability) {
                    caught[index] = true;
                }
            }
        }

        for ((id, _), infected) in exposed.into_iter().zip(caught) {
            if infected {
                world.infect(id, InfectionSource::Contagion);
            }
        }
    }
}

impl System for DiseaseSystem {
    fn name(&self) -> &str {
        "disease"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if !super::chickens_ready(ctx) {
            return Ok(());
        }
        self.progress(ctx.dt as f32, world);
        self.spread(world, rng);
        Ok(())
    }
}
