// Gameplay tuning grouped by concern. Every field has a default so partial
// TOML overrides are accepted.

pub mod economy;
pub mod physics;
pub mod player;
pub mod world;

pub use economy::EconomyTuning;
pub use physics::PhysicsTuning;
pub use player::PlayerTuning;
pub use world::WorldTuning;

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub physics: PhysicsTuning,
    pub economy: EconomyTuning,
    pub world: WorldTuning,
}

/// A tuning value the procedural spawner cannot work with.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTuning {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for InvalidTuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), InvalidTuning> {
    Err(InvalidTuning {
        field,
        reason: reason.into(),
    })
}

impl Tuning {
    /// Rejects ranges that would be empty or non-finite when sampled at spawn time.
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        let world = &self.world;

        if !(world.asteroid_min_radius.is_finite() && world.asteroid_min_radius > 0.0) {
            return invalid("world.asteroid_min_radius", "must be a positive number");
        }
        if !world.asteroid_max_radius.is_finite() {
            return invalid("world.asteroid_max_radius", "must be a finite number");
        }
        if world.asteroid_min_radius > world.asteroid_max_radius {
            return invalid(
                "world.asteroid_min_radius",
                format!(
                    "{} exceeds asteroid_max_radius {}",
                    world.asteroid_min_radius, world.asteroid_max_radius
                ),
            );
        }

        if world.asteroid_min_vertices < 3 {
            return invalid("world.asteroid_min_vertices", "an outline needs at least 3 vertices");
        }
        if world.asteroid_min_vertices > world.asteroid_max_vertices {
            return invalid(
                "world.asteroid_min_vertices",
                format!(
                    "{} exceeds asteroid_max_vertices {}",
                    world.asteroid_min_vertices, world.asteroid_max_vertices
                ),
            );
        }

        let diameter = world.asteroid_max_radius * 2.0;
        if !(world.width.is_finite() && world.width > diameter) {
            return invalid(
                "world.width",
                format!("must be finite and wider than the largest asteroid ({diameter})"),
            );
        }
        if !(world.height.is_finite() && world.height > diameter) {
            return invalid(
                "world.height",
                format!("must be finite and taller than the largest asteroid ({diameter})"),
            );
        }

        if !(world.asteroid_drift.is_finite() && world.asteroid_drift >= 0.0) {
            return invalid("world.asteroid_drift", "must be zero or a positive number");
        }
        if !world.min_spawn_distance.is_finite() {
            return invalid("world.min_spawn_distance", "must be a finite number");
        }
        if !self.economy.station_max_inventory.is_finite() {
            return invalid("economy.station_max_inventory", "must be a finite number");
        }
        if !self.physics.particle_burst_speed.is_finite() {
            return invalid("physics.particle_burst_speed", "must be a finite number");
        }

        Ok(())
    }
}
