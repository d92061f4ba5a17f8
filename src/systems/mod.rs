mod disease;
mod hatching;
mod hunger;
mod movement;
mod outbreak;
mod reproduction;

pub use disease::DiseaseSystem;
pub use hatching::HatchingSystem;
pub use hunger::HungerSystem;
pub use movement::{separation, MovementSystem};
pub use outbreak::OutbreakSystem;
pub use reproduction::ReproductionSystem;

use crate::{engine::SystemContext, entity::EntityKind};

/// Chickens stay frozen until the renderer has their model.
fn chickens_ready(ctx: &SystemContext) -> bool {
    ctx.assets.is_ready(EntityKind::Chicken)
}
