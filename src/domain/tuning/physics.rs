use serde::Deserialize;

/// Gravity, decay and scoring constants for the asteroid/particle simulation.

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity constant shared by the black hole and the singularity.
    pub gravity_constant: f32,

    pub black_hole_mass: f32,

    /// Anything closer than this to the black hole center is absorbed.
    pub event_horizon: f32,

    /// Added to the squared distance so the pull stays finite near the center.
    pub softening: f32,

    /// Virtual mass of the player's gravity well. Independent of ship mass.
    pub singularity_mass: f32,

    /// Scales the reactive pull the ship feels from held asteroids.
    pub singularity_drag: f32,

    pub asteroid_friction: f32,

    pub particle_friction: f32,

    /// Particles inside this radius are pushed away from the black hole.
    pub particle_repulsion_radius: f32,

    /// Outward acceleration at the black hole center; falls to zero at the radius.
    pub particle_repulsion_strength: f32,

    pub particles_per_asteroid: usize,

    /// Upper bound of the randomized particle burst speed.
    pub particle_burst_speed: f32,

    /// Particle lifetime in ticks.
    pub particle_life: f32,

    pub particle_radius: f32,

    /// Score awarded per unit of absorbed asteroid mass.
    pub score_per_mass: f32,

    /// Hull damage per unit of asteroid mass on impact.
    pub damage_per_mass: f32,

    /// Speed the ship is knocked back with after touching an asteroid.
    pub knockback_speed: f32,

    /// Asteroids at or above this mass produce the large explosion cue.
    pub large_explosion_mass: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity_constant: 0.5,
            black_hole_mass: 5000.0,
            event_horizon: 50.0,
            softening: 100.0,
            singularity_mass: 2000.0,
            singularity_drag: 0.05,
            asteroid_friction: 0.995,
            particle_friction: 0.98,
            particle_repulsion_radius: 300.0,
            particle_repulsion_strength: 0.5,
            particles_per_asteroid: 5,
            particle_burst_speed: 4.0,
            particle_life: 600.0,
            particle_radius: 3.0,
            score_per_mass: 10.0,
            damage_per_mass: 0.5,
            knockback_speed: 5.0,
            large_explosion_mass: 25.0,
        }
    }
}
