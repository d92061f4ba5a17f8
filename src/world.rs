use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::{
    components::{Chicken, Egg},
    entity::{DeathCause, Entity, EntityId, IdAllocator, LifecycleSignal},
    events::{FarmEvent, InfectionSource},
    scenario::{ChickenConfig, ReproductionConfig},
};

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub clock: f64,
    pub chickens: Vec<Chicken>,
    pub eggs: Vec<Egg>,
}

/// Structural changes applied by [`World::commit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub died: usize,
    pub laid: usize,
    pub hatched: usize,
}

pub struct World {
    ids: IdAllocator,
    tick: u64,
    clock: f64,
    plane_size: f32,
    pub(crate) chickens: HashMap<EntityId, Chicken>,
    pub(crate) eggs: HashMap<EntityId, Egg>,
    pending: Vec<(EntityId, LifecycleSignal)>,
    events: Vec<FarmEvent>,
}

impl World {
    pub fn new(plane_size: f32) -> Self {
        Self {
            ids: IdAllocator::default(),
            tick: 0,
            clock: 0.0,
            plane_size,
            chickens: HashMap::new(),
            eggs: HashMap::new(),
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the world was created.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn plane_size(&self) -> f32 {
        self.plane_size
    }

    pub(crate) fn advance_clock(&mut self, dt: f64) {
        self.tick += 1;
        self.clock += dt;
    }

    pub fn clamp_to_plane(&self, position: Vec2) -> Vec2 {
        let half = self.plane_size / 2.0;
        position.clamp(Vec2::splat(-half), Vec2::splat(half))
    }

    pub fn spawn_chicken<R: Rng>(
        &mut self,
        position: Vec2,
        chicken: &ChickenConfig,
        reproduction: &ReproductionConfig,
        rng: &mut R,
    ) -> EntityId {
        let id = self.ids.allocate();
        let position = self.clamp_to_plane(position);
        let spawned = Chicken::spawn(id, position, self.clock, chicken, reproduction, rng);
        self.chickens.insert(id, spawned);
        self.events.push(FarmEvent::Spawned {
            chicken: id,
            position,
        });
        id
    }

    pub fn spawn_egg<R: Rng>(
        &mut self,
        position: Vec2,
        laid_by: EntityId,
        reproduction: &ReproductionConfig,
        rng: &mut R,
    ) -> EntityId {
        let id = self.ids.allocate();
        let egg = Egg::lay(id, position, self.clock, reproduction, rng);
        self.events.push(FarmEvent::EggLaid {
            egg: id,
            by: laid_by,
            golden: egg.golden,
        });
        self.eggs.insert(id, egg);
        id
    }

    pub fn chicken_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.chickens.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn egg_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.eggs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn chicken(&self, id: EntityId) -> Option<&Chicken> {
        self.chickens.get(&id)
    }

    pub fn chicken_mut(&mut self, id: EntityId) -> Option<&mut Chicken> {
        self.chickens.get_mut(&id)
    }

    pub fn egg(&self, id: EntityId) -> Option<&Egg> {
        self.eggs.get(&id)
    }

    pub fn egg_mut(&mut self, id: EntityId) -> Option<&mut Egg> {
        self.eggs.get_mut(&id)
    }

    pub fn chickens(&self) -> impl Iterator<Item = &Chicken> {
        self.chickens.values()
    }

    pub fn eggs(&self) -> impl Iterator<Item = &Egg> {
        self.eggs.values()
    }

    pub fn chicken_count(&self) -> usize {
        self.chickens.values().filter(|c| c.alive).count()
    }

    pub fn egg_count(&self) -> usize {
        self.eggs.len()
    }

    pub fn remove_egg(&mut self, id: EntityId) -> Option<Egg> {
        self.eggs.remove(&id)
    }

    pub fn infect(&mut self, id: EntityId, source: InfectionSource) -> bool {
        let infected = self
            .chickens
            .get_mut(&id)
            .map(Chicken::infect)
            .unwrap_or(false);
        if infected {
            self.events.push(FarmEvent::Infected {
                chicken: id,
                source,
            });
        }
        infected
    }

    pub(crate) fn queue(&mut self, id: EntityId, signal: LifecycleSignal) {
        self.pending.push((id, signal));
    }

    /// Whatever entity carries `id`, chickens first.
    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        match self.chickens.get(&id) {
            Some(chicken) => Some(chicken as &dyn Entity),
            None => self.eggs.get(&id).map(|egg| egg as &dyn Entity),
        }
    }

    pub(crate) fn push_event(&mut self, event: FarmEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[FarmEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<FarmEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies queued lifecycle signals: deaths first, then new eggs, then
    /// hatches. Entities created here are first updated on the next tick.
    pub fn commit<R: Rng>(
        &mut self,
        chicken: &ChickenConfig,
        reproduction: &ReproductionConfig,
        rng: &mut R,
    ) -> CommitSummary {
        let pending = std::mem::take(&mut self.pending);
        let mut summary = CommitSummary::default();

        for (id, signal) in &pending {
            if let LifecycleSignal::Die { cause } = signal {
                if self.chickens.remove(id).is_some() {
                    summary.died += 1;
                    self.record_death(*id, *cause);
                }
            }
        }

        for (id, signal) in &pending {
            if let LifecycleSignal::LayEgg { position } = signal {
                let egg = self.spawn_egg(*position, *id, reproduction, rng);
                summary.laid += 1;
                tracing::debug!(chicken = id.raw(), egg = egg.raw(), "egg laid");
            }
        }

        for (id, signal) in &pending {
            if let LifecycleSignal::Hatch { position } = signal {
                if self.eggs.remove(id).is_none() {
                    continue;
                }
                let chick = self.spawn_chicken(*position, chicken, reproduction, rng);
                summary.hatched += 1;
                self.events.push(FarmEvent::Hatched {
                    egg: *id,
                    chicken: chick,
                });
                tracing::debug!(egg = id.raw(), chicken = chick.raw(), "egg hatched");
            }
        }

        summary
    }

    fn record_death(&mut self, id: EntityId, cause: DeathCause) {
        tracing::debug!(chicken = id.raw(), ?cause, "chicken died");
        self.events.push(FarmEvent::Died { chicken: id, cause });
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let mut chickens: Vec<Chicken> = self.chickens.values().cloned().collect();
        chickens.sort_by_key(|c| c.id);
        let mut eggs: Vec<Egg> = self.eggs.values().cloned().collect();
        eggs.sort_by_key(|e| e.id);
        WorldSnapshot {
            tick: self.tick,
            clock: self.clock,
            chickens,
            eggs,
        }
    }
}
