use crate::domain::entities::{Particle, Player};
use crate::domain::events::SimEvent;
use crate::domain::state::GameStats;
use crate::domain::tuning::PhysicsTuning;
use crate::domain::vector::Vec2;

/// Repels, ages and moves particles, then vacuums them into the cargo hold.
///
/// A particle in vacuum range while the hold is full stays in the world until it
/// expires or space frees up. A destroyed ship collects nothing. Returns the number
/// collected this tick.
pub fn tick_particles(
    particles: &mut Vec<Particle>,
    player: &mut Player,
    stats: &mut GameStats,
    black_hole: Vec2,
    cfg: &PhysicsTuning,
    events: &mut Vec<SimEvent>,
) -> u32 {
    let mut collected = 0;

    particles.retain_mut(|particle| {
        // Linear push away from the hole: strongest at the center, zero at the radius.
        let from_hole = particle.body.pos - black_hole;
        let distance = from_hole.length();
        if distance < cfg.particle_repulsion_radius {
            let push =
                cfg.particle_repulsion_strength * (1.0 - distance / cfg.particle_repulsion_radius);
            particle.body.vel += from_hole.normalize_or_zero() * push;
        }

        particle.life -= 1.0;
        particle.body.pos += particle.body.vel;
        particle.body.vel = particle.body.vel * cfg.particle_friction;

        let in_range = particle.body.pos.distance(player.body.pos) < player.vacuum_range;
        if in_range && !player.is_destroyed() && player.spare_cargo() > 0 {
            player.cargo += 1;
            stats.collected += 1;
            stats.sector_collected += 1;
            collected += 1;
            events.push(SimEvent::ParticleCollected {
                particle_id: particle.body.id,
            });
            return false;
        }

        !particle.is_expired()
    });

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Body;
    use crate::domain::tuning::PlayerTuning;

    const HOLE: Vec2 = Vec2::new(1500.0, 1500.0);

    fn particle(id: u64, pos: Vec2, life: f32) -> Particle {
        Particle {
            body: Body::new(id, pos, 3.0, 1.0),
            life,
            max_life: 600.0,
            color: "#b388ff".to_string(),
        }
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(1, pos, &PlayerTuning::default())
    }

    #[test]
    fn when_particle_is_near_the_hole_then_it_is_pushed_outward() {
        let cfg = PhysicsTuning::default();
        let mut particles = vec![particle(1, HOLE + Vec2::new(60.0, 0.0), 100.0)];
        let mut player = player_at(Vec2::new(100.0, 100.0));
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert!(particles[0].body.vel.x > 0.0);
        assert!(particles[0].body.pos.x > HOLE.x + 60.0);
        assert_eq!(particles[0].life, 99.0);
    }

    #[test]
    fn push_is_stronger_closer_to_the_center() {
        let cfg = PhysicsTuning::default();
        let mut particles = vec![
            particle(1, HOLE + Vec2::new(60.0, 0.0), 100.0),
            particle(2, HOLE + Vec2::new(250.0, 0.0), 100.0),
        ];
        let mut player = player_at(Vec2::new(100.0, 100.0));
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert!(particles[0].body.vel.x > particles[1].body.vel.x);
    }

    #[test]
    fn when_particle_is_in_vacuum_range_then_it_is_collected() {
        let cfg = PhysicsTuning::default();
        let ship = Vec2::new(100.0, 100.0);
        let mut particles = vec![particle(1, ship + Vec2::new(10.0, 0.0), 100.0)];
        let mut player = player_at(ship);
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        let collected =
            tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert_eq!(collected, 1);
        assert!(particles.is_empty());
        assert_eq!(player.cargo, 1);
        assert_eq!(stats.collected, 1);
        assert_eq!(events, vec![SimEvent::ParticleCollected { particle_id: 1 }]);
    }

    #[test]
    fn when_hold_is_full_then_particle_stays_in_the_world() {
        let cfg = PhysicsTuning::default();
        let ship = Vec2::new(100.0, 100.0);
        let mut particles = vec![particle(1, ship + Vec2::new(10.0, 0.0), 100.0)];
        let mut player = player_at(ship);
        player.cargo = player.max_cargo;
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert_eq!(particles.len(), 1);
        assert_eq!(player.cargo, player.max_cargo);
        assert_eq!(stats.collected, 0);
    }

    #[test]
    fn when_life_runs_out_then_particle_is_removed_without_reward() {
        let cfg = PhysicsTuning::default();
        let mut particles = vec![particle(1, Vec2::new(2500.0, 2500.0), 1.0)];
        let mut player = player_at(Vec2::new(100.0, 100.0));
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert!(particles.is_empty());
        assert_eq!(player.cargo, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn cargo_never_exceeds_capacity_when_many_particles_are_in_range() {
        let cfg = PhysicsTuning::default();
        let ship = Vec2::new(100.0, 100.0);
        let mut particles: Vec<Particle> = (0..80)
            .map(|i| particle(i, ship + Vec2::new(5.0, 0.0), 100.0))
            .collect();
        let mut player = player_at(ship);
        player.cargo = player.max_cargo - 3;
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        let collected =
            tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert_eq!(collected, 3);
        assert_eq!(player.cargo, player.max_cargo);
        assert_eq!(particles.len(), 77);
    }

    #[test]
    fn when_ship_is_destroyed_then_particles_in_range_are_left_alone() {
        let cfg = PhysicsTuning::default();
        let ship = Vec2::new(500.0, 500.0);
        let mut particles = vec![particle(1, ship, 100.0)];
        let mut player = player_at(ship);
        player.integrity = 0.0;
        let mut stats = GameStats::default();
        let mut events = Vec::new();

        let collected =
            tick_particles(&mut particles, &mut player, &mut stats, HOLE, &cfg, &mut events);

        assert_eq!(collected, 0);
        assert_eq!(player.cargo, 0);
        assert_eq!(particles.len(), 1);
        assert!(events.is_empty());
    }
}
