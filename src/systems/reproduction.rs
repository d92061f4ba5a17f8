use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    entity::LifecycleSignal,
    rng::{RngExt, SystemRng},
    scenario::ReproductionConfig,
    world::World,
};

/// Healthy chickens whose egg deadline has passed try to lay; better-fed
/// birds succeed more often. The deadline is re-rolled whether or not the
/// attempt succeeds.
pub struct ReproductionSystem {
    config: ReproductionConfig,
}

impl ReproductionSystem {
    pub fn new(config: ReproductionConfig) -> Self {
        Self { config }
    }
}

impl System for ReproductionSystem {
    fn name(&self) -> &str {
        "reproduction"
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
        let mut layers = Vec::new();
        for id in world.chicken_ids() {
            let Some(chicken) = world.chickens.get_mut(&id) else {
                continue;
            };
            if !chicken.alive || chicken.is_sick() || ctx.clock < chicken.next_egg_at {
                continue;
            }
            chicken.reschedule_egg(ctx.clock, &self.config.egg_delay, rng);
            if rng.roll(self.config.lay_chance(chicken.hunger)) {
                layers.push((id, chicken.position));
            }
        }
        for (id, position) in layers {
            world.queue(id, LifecycleSignal::LayEgg { position });
        }
        Ok(())
    }
}
