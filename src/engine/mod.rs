use std::time::Instant;

use anyhow::{bail, Result};
use glam::Vec2;
use rand::Rng;

use crate::{
    assets::AssetCache,
    entity::EntityId,
    rng::{RngManager, SystemRng},
    scenario::{ChickenConfig, ReproductionConfig, Scenario},
    systems::{
        DiseaseSystem, HatchingSystem, HungerSystem, MovementSystem, OutbreakSystem,
        ReproductionSystem,
    },
    world::{CommitSummary, World},
};

const SPAWN_STREAM: &str = "spawn";

pub struct EngineSettings {
    pub seed: u64,
    pub chicken: ChickenConfig,
    pub reproduction: ReproductionConfig,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            seed: scenario.seed,
            chicken: scenario.chicken.clone(),
            reproduction: scenario.reproduction.clone(),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    assets: AssetCache,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            assets: AssetCache::preloaded(),
            systems: Vec::new(),
        }
    }

    /// Builder preloaded with the standard farm pipeline in update order.
    pub fn standard(scenario: &Scenario) -> Self {
        Self::new(EngineSettings::from_scenario(scenario))
            .with_system(HungerSystem::new(scenario.chicken.hunger_decay))
            .with_system(DiseaseSystem::new(scenario.disease.clone()))
            .with_system(MovementSystem::new(scenario.chicken.clone()))
            .with_system(ReproductionSystem::new(scenario.reproduction.clone()))
            .with_system(HatchingSystem::new())
            .with_system(OutbreakSystem::new(scenario.disease.clone()))
    }

    pub fn with_assets(mut self, assets: AssetCache) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            assets: self.assets,
            settings: self.settings,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: u64,
    pub clock: f64,
    pub chickens: usize,
    pub eggs: usize,
    pub committed: CommitSummary,
    pub systems: Vec<SystemRunReport>,
}

/// Advances the flock one frame at a time. Systems mutate entity state in
/// place and queue structural changes; the world commits them once every
/// system has run.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    assets: AssetCache,
    settings: EngineSettings,
}

impl Engine {
    pub fn assets_mut(&mut self) -> &mut AssetCache {
        &mut self.assets
    }

    /// Places the opening flock: the first bird in the middle of the pen, the
    /// rest scattered uniformly.
    pub fn populate(&mut self, world: &mut World, count: u32) -> Vec<EntityId> {
        let half = world.plane_size() / 2.0;
        let mut rng = self.rng.stream(SPAWN_STREAM);
        (0..count)
            .map(|index| {
                let position = if index == 0 || half <= 0.0 {
                    Vec2::ZERO
                } else {
                    Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
                };
                world.spawn_chicken(
                    position,
                    &self.settings.chicken,
                    &self.settings.reproduction,
                    &mut rng,
                )
            })
            .collect()
    }

    pub fn advance(&mut self, world: &mut World, dt: f64, remaining: f64) -> Result<TickReport> {
        if !dt.is_finite() || dt < 0.0 {
            bail!("frame duration must be a finite, non-negative number of seconds (got {dt})");
        }
        world.advance_clock(dt);

        let mut reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let ctx = SystemContext {
                tick: world.tick(),
                dt,
                clock: world.clock(),
                remaining,
                assets: &self.assets,
            };
            let mut rng_stream = self.rng.stream(system.name());
            let start = Instant::now();
            system.run(&ctx, world, &mut rng_stream)?;
            reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        let committed = world.commit(
            &self.settings.chicken,
            &self.settings.reproduction,
            &mut self.rng.stream(SPAWN_STREAM),
        );
        tracing::trace!(
            tick = world.tick(),
            chickens = world.chicken_count(),
            eggs = world.egg_count(),
            "tick complete"
        );

        Ok(TickReport {
            tick: world.tick(),
            clock: world.clock(),
            chickens: world.chicken_count(),
            eggs: world.egg_count(),
            committed,
            systems: reports,
        })
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    /// Frame duration in seconds.
    pub dt: f64,
    /// World clock after this frame's advance.
    pub clock: f64,
    /// Seconds left in the round.
    pub remaining: f64,
    pub assets: &'a AssetCache,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
