use crate::domain::economy::floor_whole;
use crate::domain::entities::{Asteroid, Particle, Player};
use crate::domain::events::{DeathCause, SimEvent};
use crate::domain::state::GameStats;
use crate::domain::systems::spawn::spawn_particle_burst;
use crate::domain::tuning::PhysicsTuning;
use crate::domain::vector::Vec2;
use rand::Rng;
use tracing::debug;

/// Inverse-square acceleration with softening so the pull stays finite at zero distance.
pub fn attraction(gravity: f32, mass: f32, distance: f32, softening: f32) -> f32 {
    gravity * mass / (distance * distance + softening)
}

/// Advances every asteroid one tick: absorption, gravity, the player's
/// singularity, integration and ship collisions.
///
/// Returns `Some(DeathCause::Collision)` when an impact destroys the ship.
#[allow(clippy::too_many_arguments)]
pub fn tick_asteroids<R: Rng + ?Sized>(
    asteroids: &mut Vec<Asteroid>,
    particles: &mut Vec<Particle>,
    player: &mut Player,
    stats: &mut GameStats,
    black_hole: Vec2,
    rng: &mut R,
    next_id: &mut u64,
    cfg: &PhysicsTuning,
    events: &mut Vec<SimEvent>,
) -> Option<DeathCause> {
    let mut death = None;

    asteroids.retain_mut(|asteroid| {
        let to_hole = black_hole - asteroid.body.pos;
        let distance = to_hole.length();

        if distance < cfg.event_horizon {
            let score =
                floor_whole(f64::from(asteroid.body.mass) * f64::from(cfg.score_per_mass));
            stats.score += score;
            spawn_particle_burst(rng, next_id, asteroid.body.pos, cfg, particles);
            debug!(
                asteroid_id = asteroid.body.id,
                mass = asteroid.body.mass,
                score,
                "asteroid absorbed"
            );
            events.push(SimEvent::AsteroidAbsorbed {
                asteroid_id: asteroid.body.id,
                mass: asteroid.body.mass,
                score,
            });
            return false;
        }

        // black hole pull
        let pull = attraction(
            cfg.gravity_constant,
            cfg.black_hole_mass,
            distance,
            cfg.softening,
        );
        asteroid.body.vel += to_hole.normalize_or_zero() * pull;

        // singularity pull, with a damped reaction on the ship
        if player.singularity_active {
            let to_ship = player.body.pos - asteroid.body.pos;
            let ship_distance = to_ship.length();
            if ship_distance < player.singularity_radius {
                let dir = to_ship.normalize_or_zero();
                let accel = attraction(
                    cfg.gravity_constant,
                    cfg.singularity_mass * player.singularity_strength,
                    ship_distance,
                    cfg.softening,
                );
                asteroid.body.vel += dir * accel;

                let force = accel * asteroid.body.mass;
                if player.body.mass > 0.0 {
                    player.body.vel -= dir * (force / player.body.mass * cfg.singularity_drag);
                }
            }
        }

        asteroid.body.angle += asteroid.spin;
        asteroid.body.damp_and_integrate(cfg.asteroid_friction);

        if death.is_none() && !player.is_destroyed() && asteroid.body.overlaps(&player.body) {
            if let Some(cause) = collide_with_player(asteroid, player, cfg, events) {
                death = Some(cause);
            }
        }

        true
    });

    death
}

// Asteroids act as immovable against the ship: only the ship is displaced.
fn collide_with_player(
    asteroid: &Asteroid,
    player: &mut Player,
    cfg: &PhysicsTuning,
    events: &mut Vec<SimEvent>,
) -> Option<DeathCause> {
    let mut normal = (player.body.pos - asteroid.body.pos).normalize_or_zero();
    if normal == Vec2::ZERO {
        normal = -Vec2::from_angle(player.body.angle);
    }

    player.body.pos = asteroid.body.pos + normal * (asteroid.body.radius + player.body.radius);
    player.body.vel = normal * cfg.knockback_speed;

    let damage = asteroid.body.mass * cfg.damage_per_mass;
    player.take_damage(damage);
    events.push(SimEvent::PlayerHit {
        asteroid_id: asteroid.body.id,
        damage,
    });

    if player.is_destroyed() {
        events.push(SimEvent::PlayerDestroyed {
            cause: DeathCause::Collision,
        });
        return Some(DeathCause::Collision);
    }
    None
}
