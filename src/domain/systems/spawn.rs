// Procedural content. Every function draws from the caller's RNG so a seeded
// session produces the same field, stations and particle bursts.

use crate::domain::entities::{Asteroid, Body, Particle, Station};
use crate::domain::tuning::{EconomyTuning, PhysicsTuning, WorldTuning};
use crate::domain::vector::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

const ASTEROID_COLORS: [&str; 4] = ["#8d8d8d", "#a1887f", "#78909c", "#bcaaa4"];
const PARTICLE_COLORS: [&str; 3] = ["#b388ff", "#e040fb", "#7c4dff"];
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Keep-out zones for asteroid placement.
#[derive(Debug, Clone, Copy)]
pub struct SpawnExclusion {
    pub black_hole: Vec2,
    pub player: Vec2,
    pub player_clearance: f32,
}

fn take_id(next_id: &mut u64) -> u64 {
    let id = *next_id;
    *next_id = next_id.wrapping_add(1);
    id
}

pub fn spawn_asteroid_field<R: Rng + ?Sized>(
    rng: &mut R,
    next_id: &mut u64,
    count: usize,
    exclusion: SpawnExclusion,
    tuning: &WorldTuning,
) -> Vec<Asteroid> {
    (0..count)
        .map(|_| spawn_asteroid(rng, next_id, exclusion, tuning))
        .collect()
}

fn spawn_asteroid<R: Rng + ?Sized>(
    rng: &mut R,
    next_id: &mut u64,
    exclusion: SpawnExclusion,
    tuning: &WorldTuning,
) -> Asteroid {
    let radius = rng.random_range(tuning.asteroid_min_radius..=tuning.asteroid_max_radius);
    let pos = place_asteroid(rng, radius, exclusion, tuning);

    let vertices = rng.random_range(tuning.asteroid_min_vertices..=tuning.asteroid_max_vertices);
    let shape = (0..vertices).map(|_| rng.random_range(0.7..1.3)).collect();

    let mut body = Body::new(take_id(next_id), pos, radius, radius);
    body.angle = rng.random_range(0.0..TAU);
    if tuning.asteroid_drift > 0.0 {
        body.vel = Vec2::from_angle(rng.random_range(0.0..TAU))
            * rng.random_range(0.0..tuning.asteroid_drift);
    }

    Asteroid {
        value: body.mass.round() as u32,
        color: ASTEROID_COLORS[rng.random_range(0..ASTEROID_COLORS.len())].to_string(),
        shape,
        spin: rng.random_range(-0.02..0.02),
        body,
    }
}

fn place_asteroid<R: Rng + ?Sized>(
    rng: &mut R,
    radius: f32,
    exclusion: SpawnExclusion,
    tuning: &WorldTuning,
) -> Vec2 {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(radius..(tuning.width - radius).max(radius + 1.0)),
            rng.random_range(radius..(tuning.height - radius).max(radius + 1.0)),
        );
        let clear_of_hole =
            candidate.distance(exclusion.black_hole) >= tuning.min_spawn_distance;
        let clear_of_player =
            candidate.distance(exclusion.player) >= exclusion.player_clearance + radius;
        if clear_of_hole && clear_of_player {
            return candidate;
        }
    }

    // Crowded or tiny world: fall back to a ring just outside the safe distance.
    exclusion.black_hole
        + Vec2::from_angle(rng.random_range(0.0..TAU)) * (tuning.min_spawn_distance + radius)
}

pub fn spawn_stations<R: Rng + ?Sized>(
    rng: &mut R,
    next_id: &mut u64,
    world: &WorldTuning,
    economy: &EconomyTuning,
) -> Vec<Station> {
    let layout: [(&str, &str, f32, f32, f32); 3] = [
        ("Helios Exchange", "#f5a623", 1.0, 0.15, 0.15),
        ("Kepler Depot", "#4fc3f7", 1.2, 0.85, 0.2),
        ("Vantage Outpost", "#81c784", 0.9, 0.5, 0.88),
    ];

    layout
        .into_iter()
        .map(|(name, color, price_multiplier, fx, fy)| {
            let pos = Vec2::new(world.width * fx, world.height * fy);
            Station {
                body: Body::new(take_id(next_id), pos, world.station_radius, 1000.0),
                name: name.to_string(),
                color: color.to_string(),
                price_multiplier,
                inventory: economy.station_max_inventory * rng.random_range(0.2..0.8),
                max_inventory: economy.station_max_inventory,
            }
        })
        .collect()
}

/// Spawns `tuning.particles_per_asteroid` particles at `origin` flying outward.
pub fn spawn_particle_burst<R: Rng + ?Sized>(
    rng: &mut R,
    next_id: &mut u64,
    origin: Vec2,
    tuning: &PhysicsTuning,
    particles: &mut Vec<Particle>,
) {
    for _ in 0..tuning.particles_per_asteroid {
        let speed = rng.random_range(0.5..=1.0) * tuning.particle_burst_speed;
        let mut body = Body::new(take_id(next_id), origin, tuning.particle_radius, 1.0);
        body.vel = Vec2::from_angle(rng.random_range(0.0..TAU)) * speed;
        particles.push(Particle {
            body,
            life: tuning.particle_life,
            max_life: tuning.particle_life,
            color: PARTICLE_COLORS[rng.random_range(0..PARTICLE_COLORS.len())].to_string(),
        });
    }
}
