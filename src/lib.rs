pub mod assets;
pub mod autopilot;
pub mod components;
pub mod economy;
pub mod engine;
pub mod entity;
pub mod events;
pub mod farm;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod world;

pub use engine::{Engine, EngineBuilder, TickReport};
pub use farm::{Farm, FarmSnapshot, Interaction};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::World;
