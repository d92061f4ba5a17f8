use anyhow::{ensure, Result};
use serde::Serialize;

use crate::{
    assets::AssetCache,
    economy::Economy,
    engine::{Engine, EngineBuilder, TickReport},
    entity::{EntityId, EntityKind},
    events::{FarmEvent, InfectionSource},
    scenario::{ActionPrices, Scenario},
    world::{World, WorldSnapshot},
};

#[derive(Debug, Clone, Serialize)]
pub struct FarmSnapshot {
    pub scenario: String,
    pub money: i64,
    pub elapsed: f64,
    pub remaining: f64,
    pub game_over: bool,
    #[serde(flatten)]
    pub world: WorldSnapshot,
}

/// Outcome of a click on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Harvested,
    Fed,
    Cured,
    Rejected,
}

/// One round of the game: the flock, its simulator, and the player's purse.
/// Player actions run between frames and report success as a plain bool.
pub struct Farm {
    scenario_name: String,
    world: World,
    engine: Engine,
    economy: Economy,
    prices: ActionPrices,
    finished: bool,
}

impl Farm {
    pub fn new(scenario: &Scenario) -> Result<Self> {
        Self::with_assets(scenario, AssetCache::preloaded())
    }

    pub fn with_assets(scenario: &Scenario, assets: AssetCache) -> Result<Self> {
        scenario.validate()?;
        let mut engine = EngineBuilder::standard(scenario).with_assets(assets).build();
        let mut world = World::new(scenario.plane_size);
        engine.populate(&mut world, scenario.initial_chickens);
        tracing::info!(
            scenario = %scenario.name,
            chickens = scenario.initial_chickens,
            round_seconds = scenario.economy.round_seconds,
            "farm opened"
        );
        Ok(Self {
            scenario_name: scenario.name.clone(),
            world,
            engine,
            economy: Economy::new(&scenario.economy),
            prices: scenario.actions.clone(),
            finished: false,
        })
    }

    /// Runs one frame. Returns `None` once the round is over.
    pub fn advance(&mut self, dt: f64) -> Result<Option<TickReport>> {
        ensure!(
            dt.is_finite() && dt >= 0.0,
            "frame duration must be a finite, non-negative number of seconds (got {dt})"
        );
        if self.finished {
            return Ok(None);
        }
        self.economy.tick(dt);
        let report = self
            .engine
            .advance(&mut self.world, dt, self.economy.remaining())?;
        if self.economy.is_over() {
            self.finished = true;
            tracing::info!(
                score = self.final_score(),
                money = self.economy.money_display(),
                "round over"
            );
        }
        Ok(Some(report))
    }

    pub fn feed(&mut self, id: EntityId) -> bool {
        let alive = self.world.chicken(id).map(|c| c.alive).unwrap_or(false);
        if !alive || !self.economy.spend(self.prices.feed_cost) {
            return false;
        }
        let Some(chicken) = self.world.chicken_mut(id) else {
            return false;
        };
        chicken.feed(self.prices.feed_amount);
        let hunger = chicken.hunger;
        self.world.push_event(FarmEvent::Fed { chicken: id, hunger });
        true
    }

    pub fn cure(&mut self, id: EntityId) -> bool {
        let curable = self
            .world
            .chicken(id)
            .map(|c| c.alive && c.is_sick())
            .unwrap_or(false);
        if !curable || !self.economy.spend(self.prices.cure_cost) {
            return false;
        }
        let cured = self
            .world
            .chicken_mut(id)
            .map(|c| c.cure())
            .unwrap_or(false);
        if cured {
            self.world.push_event(FarmEvent::Cured { chicken: id });
        }
        cured
    }

    pub fn harvest(&mut self, id: EntityId) -> bool {
        let available = self
            .world
            .egg(id)
            .map(|e| e.is_incubating())
            .unwrap_or(false);
        if !available || !self.economy.spend(self.prices.harvest_cost) {
            return false;
        }
        let Some(mut egg) = self.world.remove_egg(id) else {
            return false;
        };
        egg.harvest();
        let reward = if egg.golden {
            self.prices.golden_egg_reward
        } else {
            self.prices.egg_reward
        };
        self.economy.earn(reward);
        self.world.push_event(FarmEvent::Harvested {
            egg: id,
            reward,
            golden: egg.golden,
        });
        true
    }

    /// Click handling: eggs are sold, healthy chickens fed, sick ones cured.
    pub fn interact(&mut self, id: EntityId) -> Interaction {
        let target = self
            .world
            .entity(id)
            .filter(|entity| entity.is_live())
            .map(|entity| entity.kind());
        match target {
            Some(EntityKind::Egg) if self.harvest(id) => Interaction::Harvested,
            Some(EntityKind::Chicken) => {
                let sick = self.world.chicken(id).map(|c| c.is_sick()).unwrap_or(false);
                if sick && self.cure(id) {
                    Interaction::Cured
                } else if !sick && self.feed(id) {
                    Interaction::Fed
                } else {
                    Interaction::Rejected
                }
            }
            _ => Interaction::Rejected,
        }
    }

    pub fn infect(&mut self, id: EntityId) -> bool {
        self.world.infect(id, InfectionSource::Manual)
    }

    pub fn is_game_over(&self) -> bool {
        self.finished
    }

    pub fn final_score(&self) -> usize {
        self.world.chicken_count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn assets_mut(&mut self) -> &mut AssetCache {
        self.engine.assets_mut()
    }

    pub fn drain_events(&mut self) -> Vec<FarmEvent> {
        self.world.drain_events()
    }

    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot {
            scenario: self.scenario_name.clone(),
            money: self.economy.money_display(),
            elapsed: self.economy.elapsed(),
            remaining: self.economy.remaining(),
            game_over: self.finished,
            world: self.world.snapshot(),
        }
    }

    /// Plays frames of `dt` seconds until the round ends or `max_frames` ran,
    /// handing each frame's snapshot to `hook`. Returns the frames played.
    pub fn run_with_hook<F>(&mut self, dt: f64, max_frames: u64, mut hook: F) -> Result<u64>
    where
        F: FnMut(&mut Self),
    {
        let mut frames = 0;
        while frames < max_frames {
            if self.advance(dt)?.is_none() {
                break;
            }
            frames += 1;
            hook(self);
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Health;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scenario() -> Scenario {
        let mut scenario = Scenario::with_seed("farm", 21);
        scenario.disease.outbreak_threshold = 0.0;
        scenario
    }

    fn first_chicken(farm: &Farm) -> EntityId {
        farm.world().chicken_ids()[0]
    }

    #[test]
    fn opens_with_initial_flock() {
        let farm = Farm::new(&scenario()).unwrap();
        assert_eq!(farm.final_score(), 1);
        assert_eq!(farm.economy().money_display(), 0);
    }

    #[test]
    fn feed_requires_money() {
        let mut farm = Farm::new(&scenario()).unwrap();
        let id = first_chicken(&farm);
        assert!(!farm.feed(id));

        farm.advance(6.0).unwrap();
        let before = farm.world().chicken(id).unwrap().hunger;
        assert!(farm.feed(id));
        assert_eq!(farm.world().chicken(id).unwrap().hunger, (before + 30.0).min(100.0));
        assert_eq!(farm.economy().money(), 1.0);
    }

    #[test]
    fn cure_rejects_healthy_and_resets_sick() {
        let mut farm = Farm::new(&scenario()).unwrap();
        let id = first_chicken(&farm);
        farm.advance(16.0).unwrap();
        assert!(!farm.cure(id));
        assert_eq!(farm.economy().money(), 16.0);

        assert!(farm.infect(id));
        farm.advance(0.5).unwrap();
        assert!(farm.cure(id));
        let chicken = farm.world().chicken(id).unwrap();
        assert_eq!(chicken.health, Health::Healthy);
        assert_eq!(chicken.sickness_time, 0.0);
        assert_eq!(farm.economy().money(), 1.5);
    }

    #[test]
    fn interact_routes_by_target() {
        let mut farm = Farm::new(&scenario()).unwrap();
        let id = first_chicken(&farm);
        assert_eq!(farm.interact(id), Interaction::Rejected);
        farm.advance(18.0).unwrap();
        assert_eq!(farm.interact(id), Interaction::Fed);
        farm.infect(id);
        farm.advance(2.0).unwrap();
        assert_eq!(farm.interact(id), Interaction::Cured);
        assert_eq!(farm.economy().money_display(), 0);
        assert_eq!(farm.interact(EntityId::from_raw(10_000)), Interaction::Rejected);
    }

    #[test]
    fn harvest_pays_once() {
        let mut farm = Farm::new(&scenario()).unwrap();
        let hen = first_chicken(&farm);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let egg = farm
            .world
            .spawn_egg(Vec2::ZERO, hen, &scenario().reproduction, &mut rng);
        let golden = farm.world().egg(egg).unwrap().golden;

        assert!(farm.harvest(egg));
        let expected = if golden { 15.0 } else { 5.0 };
        assert_eq!(farm.economy().money(), expected);
        assert!(farm.world().egg(egg).is_none());
        assert!(!farm.harvest(egg));
        assert_eq!(farm.economy().money(), expected);
    }

    #[test]
    fn interact_sells_eggs_once() {
        let mut farm = Farm::new(&scenario()).unwrap();
        let hen = first_chicken(&farm);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let egg = farm
            .world
            .spawn_egg(Vec2::ONE, hen, &scenario().reproduction, &mut rng);

        assert_eq!(farm.interact(egg), Interaction::Harvested);
        assert_eq!(farm.interact(egg), Interaction::Rejected);
    }

    #[test]
    fn round_ends_and_further_frames_are_ignored() {
        let mut farm = Farm::new(&scenario()).unwrap();
        assert!(farm.advance(100.0).unwrap().is_some());
        assert!(farm.is_game_over());
        assert!(farm.advance(1.0).unwrap().is_none());
        assert!(farm.snapshot().game_over);
    }

    #[test]
    fn invalid_frame_leaves_state_untouched() {
        let mut farm = Farm::new(&scenario()).unwrap();
        assert!(farm.advance(-0.1).is_err());
        assert_eq!(farm.economy().elapsed(), 0.0);
    }
}
