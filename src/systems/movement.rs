use std::f32::consts::FRAC_PI_2;

use anyhow::Result;
use glam::Vec2;

use crate::{
    engine::{System, SystemContext},
    entity::EntityId,
    rng::{RngExt, SystemRng},
    scenario::ChickenConfig,
    world::World,
};

const MIN_SEPARATION: f32 = 1e-4;
const MIN_HEADING_LENGTH_SQ: f32 = 1e-4;

/// Repulsion away from every neighbour closer than `min_distance`, each
/// contribution scaled by `(min_distance - dist) / min_distance`. Coincident
/// neighbours are skipped since they give no direction.
pub fn separation(
    position: Vec2,
    neighbours: impl IntoIterator<Item = Vec2>,
    min_distance: f32,
) -> Vec2 {
    neighbours
        .into_iter()
        .fold(Vec2::ZERO, |push, other| {
            let offset = position - other;
            let dist = offset.length();
            if dist < min_distance && dist > MIN_SEPARATION {
                push + offset / dist * ((min_distance - dist) / min_distance)
            } else {
                push
            }
        })
}

/// Intermittent wandering with smoothed turns. Neighbour positions are
/// sampled once per tick; the pairwise scan is quadratic in flock size.
pub struct MovementSystem {
    config: ChickenConfig,
}

impl MovementSystem {
    pub fn new(config: ChickenConfig) -> Self {
        Self { config }
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
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
        let dt = ctx.dt as f32;
        let half = world.plane_size() / 2.0;
        let bounds = (Vec2::splat(-half), Vec2::splat(half));

        let ids = world.chicken_ids();
        let flock: Vec<(EntityId, Vec2)> = ids
            .iter()
            .filter_map(|id| world.chicken(*id))
            .filter(|c| c.alive)
            .map(|c| (c.id, c.position))
            .collect();

        for id in ids {
            let Some(chicken) = world.chickens.get_mut(&id) else {
                continue;
            };
            if !chicken.alive {
                continue;
            }

            chicken.move_cooldown -= ctx.dt;
            if chicken.move_cooldown <= 0.0 {
                chicken.moving = rng.roll(self.config.move_probability);
                chicken.target_direction = rng.unit_direction();
                chicken.move_cooldown = rng.seconds(&self.config.wander_cooldown);
            }

            chicken.direction = chicken
                .direction
                .lerp(chicken.target_direction, self.config.turn_blend);
            if !chicken.moving {
                continue;
            }

            let mut delta = chicken.direction * self.config.move_speed * dt;
            let neighbours = flock
                .iter()
                .filter(|(other, _)| *other != id)
                .map(|(_, position)| *position);
            let push = separation(chicken.position, neighbours, self.config.separation_distance);
            delta += push * dt * self.config.separation_strength;

            chicken.position = (chicken.position + delta).clamp(bounds.0, bounds.1);

            if chicken.direction.length_squared() > MIN_HEADING_LENGTH_SQ {
                chicken.heading = chicken.direction.x.atan2(chicken.direction.y) + FRAC_PI_2;
            }
        }
        Ok(())
    }
}
