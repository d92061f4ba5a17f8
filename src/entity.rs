use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Rebuilds an id handed out earlier, e.g. one a renderer stored on a
    /// hit-test mesh.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Chicken,
    Egg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Starvation,
    Disease,
}

/// Structural change requested by a system. Applied by the world after every
/// system has run for the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleSignal {
    LayEgg { position: Vec2 },
    Hatch { position: Vec2 },
    Die { cause: DeathCause },
}

/// Shared contract of simulated actors.
pub trait Entity {
    fn id(&self) -> EntityId;
    fn kind(&self) -> EntityKind;
    fn position(&self) -> Vec2;
    /// Whether the entity still takes part in the simulation.
    fn is_live(&self) -> bool;
}
