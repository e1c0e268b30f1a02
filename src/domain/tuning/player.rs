use serde::Deserialize;

/// Gameplay tuning for the player ship.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
/// All rates are per tick; the simulation assumes a fixed tick interval.

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision radius in world units.
    pub radius: f32,

    /// Ship mass used for the singularity reaction drag.
    pub mass: f32,

    /// Heading change per tick while a rotate key is held (radians).
    pub rotation_step: f32,

    /// Base forward acceleration per tick before the thruster multiplier.
    pub thrust: f32,

    /// Backward thrust as a fraction of forward thrust.
    pub reverse_factor: f32,

    /// Per-tick multiplicative velocity damping.
    pub friction: f32,

    /// Fraction of speed kept when bouncing off a world edge.
    pub boundary_restitution: f32,

    /// Fuel burned per tick of active thrust.
    pub fuel_per_thrust_tick: f32,

    pub max_fuel: f32,

    /// Hull integrity before the hull upgrade.
    pub base_integrity: f32,

    /// Radius inside which particles are pulled into the cargo hold.
    pub vacuum_range: f32,

    /// Spawn offset below the black hole, in world units.
    pub spawn_offset: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            mass: 10.0,
            rotation_step: 0.08,
            thrust: 0.25,
            reverse_factor: 0.5,
            friction: 0.98,
            boundary_restitution: 0.5,
            fuel_per_thrust_tick: 0.02,
            max_fuel: 100.0,
            base_integrity: 100.0,
            vacuum_range: 60.0,
            spawn_offset: 700.0,
        }
    }
}
