use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    entity::{Entity, EntityId, EntityKind},
    rng::RngExt,
    scenario::{ChickenConfig, ReproductionConfig, SecondsRange},
};

pub const MAX_HUNGER: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Healthy,
    Sick,
    Critical,
}

impl Health {
    pub fn is_sick(self) -> bool {
        !matches!(self, Health::Healthy)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Chicken {
    pub id: EntityId,
    /// Ground-plane position: `x` is world x, `y` is world z.
    pub position: Vec2,
    pub direction: Vec2,
    pub target_direction: Vec2,
    /// Yaw in radians, only updated while walking.
    pub heading: f32,
    pub hunger: f32,
    pub alive: bool,
    pub moving: bool,
    pub move_cooldown: f64,
    pub health: Health,
    pub sickness_time: f32,
    pub next_egg_at: f64,
    /// Grey shade picked at spawn so the renderer can restore it after a cure.
    pub tint: f32,
}

impl Chicken {
    pub fn spawn<R: Rng>(
        id: EntityId,
        position: Vec2,
        now: f64,
        chicken: &ChickenConfig,
        reproduction: &ReproductionConfig,
        rng: &mut R,
    ) -> Self {
        let direction = rng.unit_direction();
        Self {
            id,
            position,
            direction,
            target_direction: direction,
            heading: 0.0,
            hunger: MAX_HUNGER,
            alive: true,
            moving: true,
            move_cooldown: rng.seconds(&chicken.initial_cooldown),
            health: Health::Healthy,
            sickness_time: 0.0,
            next_egg_at: now + rng.seconds(&reproduction.egg_delay),
            tint: rng.gen_range(0.3..=1.0),
        }
    }

    pub fn is_sick(&self) -> bool {
        self.health.is_sick()
    }

    /// Adds hunger points, capped at the maximum. Dead chickens stay dead.
    pub fn feed(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hunger = (self.hunger + amount).min(MAX_HUNGER);
        true
    }

    pub fn infect(&mut self) -> bool {
        if !self.alive || self.is_sick() {
            return false;
        }
        self.health = Health::Sick;
        self.sickness_time = 0.0;
        true
    }

    pub fn cure(&mut self) -> bool {
        if !self.alive || !self.is_sick() {
            return false;
        }
        self.health = Health::Healthy;
        self.sickness_time = 0.0;
        true
    }

    pub fn reschedule_egg(&mut self, now: f64, delay: &SecondsRange, rng: &mut impl Rng) {
        self.next_egg_at = now + rng.seconds(delay);
    }
}

impl Entity for Chicken {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Chicken
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_live(&self) -> bool {
        self.alive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EggState {
    Incubating,
    Hatched,
    Harvested,
}

#[derive(Debug, Clone, Serialize)]
pub struct Egg {
    pub id: EntityId,
    pub position: Vec2,
    pub laid_at: f64,
    pub hatch_at: f64,
    pub state: EggState,
    pub golden: bool,
}

impl Egg {
    pub fn lay<R: Rng>(
        id: EntityId,
        position: Vec2,
        now: f64,
        reproduction: &ReproductionConfig,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            position,
            laid_at: now,
            hatch_at: now + rng.seconds(&reproduction.hatch_delay),
            state: EggState::Incubating,
            golden: rng.roll(reproduction.golden_probability),
        }
    }

    pub fn is_incubating(&self) -> bool {
        self.state == EggState::Incubating
    }

    /// Marks the egg hatched if its deadline has passed.
    pub fn try_hatch(&mut self, now: f64) -> bool {
        if self.is_incubating() && now >= self.hatch_at {
            self.state = EggState::Hatched;
            true
        } else {
            false
        }
    }

    pub fn harvest(&mut self) -> bool {
        if !self.is_incubating() {
            return false;
        }
        self.state = EggState::Harvested;
        true
    }
}

impl Entity for Egg {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Egg
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_live(&self) -> bool {
        self.is_incubating()
    }
}
