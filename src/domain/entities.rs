// Simulation entities. Every physical body embeds a `Body` instead of
// inheriting from a base type.

use crate::domain::tuning::PlayerTuning;
use crate::domain::vector::Vec2;

/// Spatial and physical attributes shared by all bodies.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub mass: f32,
}

impl Body {
    pub fn new(id: u64, pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            angle: 0.0,
            mass,
        }
    }

    /// Multiplicative per-tick velocity damping followed by position integration.
    pub fn damp_and_integrate(&mut self, friction: f32) {
        self.vel = self.vel * friction;
        self.pos += self.vel;
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub fuel: f32,
    pub max_fuel: f32,
    /// Hull health; zero means destroyed.
    pub integrity: f32,
    pub max_integrity: f32,
    pub singularity_active: bool,
    pub singularity_radius: f32,
    pub singularity_strength: f32,
    pub vacuum_range: f32,
    pub cargo: u32,
    pub max_cargo: u32,
    pub credits: u64,
    /// Thrust multiplier derived from the thrusters upgrade.
    pub thrust_multiplier: f32,
    /// True while thrust was applied during the last tick.
    pub thrusting: bool,
}

impl Player {
    /// Fresh ship at `pos` with level-1 attributes. Upgrade effects are applied separately.
    pub fn new(id: u64, pos: Vec2, tuning: &PlayerTuning) -> Self {
        let mut body = Body::new(id, pos, tuning.radius, tuning.mass);
        // Spawn sits at +Y from the black hole; facing +Y makes the first thrust point away from it.
        body.angle = std::f32::consts::FRAC_PI_2;
        Self {
            body,
            fuel: tuning.max_fuel,
            max_fuel: tuning.max_fuel,
            integrity: tuning.base_integrity,
            max_integrity: tuning.base_integrity,
            singularity_active: false,
            singularity_radius: 200.0,
            singularity_strength: 1.0,
            vacuum_range: tuning.vacuum_range,
            cargo: 0,
            max_cargo: 50,
            credits: 0,
            thrust_multiplier: 1.2,
            thrusting: false,
        }
    }

    pub fn spare_cargo(&self) -> u32 {
        self.max_cargo.saturating_sub(self.cargo)
    }

    pub fn is_destroyed(&self) -> bool {
        self.integrity <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.integrity = (self.integrity - amount).max(0.0);
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub body: Body,
    /// Base worth shown to the player; the rounded spawn mass.
    pub value: u32,
    pub color: String,
    /// Radius scale factors for an irregular outline, one per vertex.
    pub shape: Vec<f32>,
    /// Display spin per tick.
    pub spin: f32,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub body: Body,
    /// Remaining ticks; removed at or below zero.
    pub life: f32,
    pub max_life: f32,
    pub color: String,
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct Station {
    pub body: Body,
    pub name: String,
    pub color: String,
    /// Static per-station pricing modifier.
    pub price_multiplier: f32,
    pub inventory: f32,
    pub max_inventory: f32,
}

impl Station {
    /// Inventory as a fraction of capacity, in `0.0..=1.0`.
    pub fn saturation(&self) -> f32 {
        if self.max_inventory <= 0.0 {
            return 1.0;
        }
        (self.inventory / self.max_inventory).clamp(0.0, 1.0)
    }
}
