// Domain-level game state, player input and read-only snapshot types.

use crate::domain::entities::{Asteroid, Particle, Player, Station};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Docked { station_id: u64 },
    GameOver,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    /// Cumulative mass-derived score delivered to the black hole.
    pub score: u64,
    pub sector: u32,
    /// Lifetime particle count collected into cargo.
    pub collected: u64,
    /// Particles collected in the current sector.
    pub sector_collected: u64,
    /// Quota for the current sector, derived from its initial asteroid count.
    pub particles_needed: u64,
}

/// Held controls, sampled at tick start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub ability: bool,
}

/// Input as seen by the simulation: held keys plus one-shot requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub held: PlayerInput,
    /// Cleared by the station step once consumed.
    pub dock_requested: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub radius: f32,
    pub fuel: f32,
    pub max_fuel: f32,
    pub integrity: f32,
    pub max_integrity: f32,
    pub singularity_active: bool,
    pub singularity_radius: f32,
    pub singularity_strength: f32,
    pub cargo: u32,
    pub max_cargo: u32,
    pub credits: u64,
    pub thrusting: bool,
}

#[derive(Debug, Clone)]
pub struct AsteroidSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub radius: f32,
    pub value: u32,
    pub color: String,
    pub shape: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct ParticleSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Remaining life as a fraction, for fade-out.
    pub life: f32,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct StationSnapshot {
    pub id: u64,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub radius: f32,
    pub color: String,
    pub inventory: f32,
    pub max_inventory: f32,
    pub unit_price: u64,
}

#[derive(Debug, Clone)]
pub struct UpgradeSnapshot {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub price: u64,
}

/// Immutable view of a session between ticks.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub state: GameState,
    pub stats: GameStats,
    pub player: PlayerSnapshot,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
    pub stations: Vec<StationSnapshot>,
    pub upgrades: Vec<UpgradeSnapshot>,
    /// Station offered for docking this tick, if any.
    pub dockable_station: Option<u64>,
    pub black_hole_x: f32,
    pub black_hole_y: f32,
    pub event_horizon: f32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.body.id,
            x: p.body.pos.x,
            y: p.body.pos.y,
            vx: p.body.vel.x,
            vy: p.body.vel.y,
            angle: p.body.angle,
            radius: p.body.radius,
            fuel: p.fuel,
            max_fuel: p.max_fuel,
            integrity: p.integrity,
            max_integrity: p.max_integrity,
            singularity_active: p.singularity_active,
            singularity_radius: p.singularity_radius,
            singularity_strength: p.singularity_strength,
            cargo: p.cargo,
            max_cargo: p.max_cargo,
            credits: p.credits,
            thrusting: p.thrusting,
        }
    }
}

impl From<&Asteroid> for AsteroidSnapshot {
    fn from(a: &Asteroid) -> Self {
        Self {
            id: a.body.id,
            x: a.body.pos.x,
            y: a.body.pos.y,
            angle: a.body.angle,
            radius: a.body.radius,
            value: a.value,
            color: a.color.clone(),
            shape: a.shape.clone(),
        }
    }
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self {
            id: p.body.id,
            x: p.body.pos.x,
            y: p.body.pos.y,
            radius: p.body.radius,
            life: if p.max_life > 0.0 {
                (p.life / p.max_life).clamp(0.0, 1.0)
            } else {
                0.0
            },
            color: p.color.clone(),
        }
    }
}

impl StationSnapshot {
    pub fn new(s: &Station, unit_price: u64) -> Self {
        Self {
            id: s.body.id,
            name: s.name.clone(),
            x: s.body.pos.x,
            y: s.body.pos.y,
            angle: s.body.angle,
            radius: s.body.radius,
            color: s.color.clone(),
            inventory: s.inventory,
            max_inventory: s.max_inventory,
            unit_price,
        }
    }
}
