use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    entity::LifecycleSignal,
    rng::SystemRng,
    world::World,
};

pub struct HatchingSystem;

impl HatchingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HatchingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HatchingSystem {
    fn name(&self) -> &str {
        "hatching"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mut hatched = Vec::new();
        for id in world.egg_ids() {
            if let Some(egg) = world.egg_mut(id) {
                if egg.try_hatch(ctx.clock) {
                    hatched.push((id, egg.position));
                }
            }
        }
        for (id, position) in hatched {
            world.queue(id, LifecycleSignal::Hatch { position });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{EngineBuilder, EngineSettings},
        entity::EntityId,
        scenario::{Scenario, SecondsRange},
    };
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn egg_hatches_once_into_a_chicken() {
        let mut scenario = Scenario::with_seed("hatching", 2);
        scenario.reproduction.hatch_delay = SecondsRange::fixed(3.0);
        let mut engine = EngineBuilder::new(EngineSettings::from_scenario(&scenario))
            .with_system(HatchingSystem::new())
            .build();
        let mut world = World::new(10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let egg = world.spawn_egg(
            Vec2::new(1.0, -2.0),
            EntityId::from_raw(u64::MAX),
            &scenario.reproduction,
            &mut rng,
        );

        let mut hatches = 0;
        for _ in 0..10 {
            hatches += engine.advance(&mut world, 0.5, 100.0).unwrap().committed.hatched;
        }
        assert_eq!(hatches, 1);
        assert!(world.egg(egg).is_none());
        assert_eq!(world.chicken_count(), 1);
        assert_eq!(world.chickens().next().unwrap().position, Vec2::new(1.0, -2.0));
    }
}
