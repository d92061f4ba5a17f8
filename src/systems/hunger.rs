use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    entity::{DeathCause, EntityId, LifecycleSignal},
    rng::SystemRng,
    world::World,
};

pub struct HungerSystem {
    decay_per_second: f32,
}

impl HungerSystem {
    pub fn new(decay_per_second: f32) -> Self {
        Self { decay_per_second }
    }
}

impl Default for HungerSystem {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl System for HungerSystem {
    fn name(&self) -> &str {
        "hunger"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if !super::chickens_ready(ctx) {
            return Ok(());
        }
        let loss = ctx.dt as f32 * self.decay_per_second;
        let mut starved: Vec<EntityId> = Vec::new();
        for id in world.chicken_ids() {
            let Some(chicken) = world.chickens.get_mut(&id) else {
                continue;
            };
            if !chicken.alive {
                continue;
            }
            chicken.hunger -= loss;
            if chicken.hunger <= 0.0 {
                chicken.hunger = 0.0;
                chicken.alive = false;
                starved.push(id);
            }
        }
        for id in starved {
            world.queue(
                id,
                LifecycleSignal::Die {
                    cause: DeathCause::Starvation,
                },
            );
        }
        Ok(())
    }
}
