// The simulation world: owns every entity and advances them one tick at a time.

use crate::domain::entities::{Asteroid, Particle, Player, Station};
use crate::domain::events::{DeathCause, SimEvent};
use crate::domain::state::{GameStats, InputState};
use crate::domain::systems::spawn::{self, SpawnExclusion};
use crate::domain::systems::{asteroids, check_event_horizon, particles, ship_movement, stations};
use crate::domain::tuning::Tuning;
use crate::domain::upgrades::UpgradeSet;
use crate::domain::vector::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const PLAYER_ID: u64 = 1;
// Keep freshly spawned asteroids from landing on the ship.
const PLAYER_SPAWN_CLEARANCE: f32 = 150.0;

/// What the session must react to after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Docked { station_id: u64 },
    Destroyed { cause: DeathCause },
}

#[derive(Debug)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
    pub outcome: TickOutcome,
    pub collected: u32,
}

pub struct World {
    pub(crate) tuning: Tuning,
    pub(crate) player: Player,
    pub(crate) asteroids: Vec<Asteroid>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) stations: Vec<Station>,
    pub(crate) stats: GameStats,
    pub(crate) dockable_station: Option<u64>,
    black_hole: Vec2,
    next_id: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Builds a sector-1 world. The same seed always yields the same world.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let black_hole = Vec2::new(tuning.world.width / 2.0, tuning.world.height / 2.0);
        let mut next_id = PLAYER_ID + 1;
        let stations = spawn::spawn_stations(&mut rng, &mut next_id, &tuning.world, &tuning.economy);
        let player = Player::new(
            PLAYER_ID,
            black_hole + Vec2::new(0.0, tuning.player.spawn_offset),
            &tuning.player,
        );

        let mut world = Self {
            tuning,
            player,
            asteroids: Vec::new(),
            particles: Vec::new(),
            stations,
            stats: GameStats::default(),
            dockable_station: None,
            black_hole,
            next_id,
            rng,
        };
        world.spawn_sector(1);
        world
    }

    pub fn black_hole(&self) -> Vec2 {
        self.black_hole
    }

    pub fn station(&self, station_id: u64) -> Option<&Station> {
        self.stations.iter().find(|s| s.body.id == station_id)
    }

    pub fn field_cleared(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Replaces the asteroid field for `sector` and resets the sector quota.
    pub fn spawn_sector(&mut self, sector: u32) {
        let world = &self.tuning.world;
        let count =
            world.base_asteroid_count + world.asteroids_per_sector * sector.saturating_sub(1) as usize;
        let exclusion = SpawnExclusion {
            black_hole: self.black_hole,
            player: self.player.body.pos,
            player_clearance: PLAYER_SPAWN_CLEARANCE,
        };

        self.asteroids =
            spawn::spawn_asteroid_field(&mut self.rng, &mut self.next_id, count, exclusion, world);
        self.particles.clear();
        self.stats.sector = sector;
        self.stats.sector_collected = 0;
        self.stats.particles_needed =
            (count * self.tuning.physics.particles_per_asteroid / 2) as u64;
        debug!(sector, asteroids = count, "sector spawned");
    }

    /// Puts a fresh ship at the spawn point and rebuilds sector 1.
    ///
    /// Credits survive. Upgrade effects are reapplied and the hull starts full.
    pub fn reset(&mut self, upgrades: &UpgradeSet) {
        let credits = self.player.credits;
        let spawn = self.black_hole + Vec2::new(0.0, self.tuning.player.spawn_offset);
        self.player = Player::new(PLAYER_ID, spawn, &self.tuning.player);
        upgrades.apply_effects(&mut self.player, &self.tuning.player);
        self.player.integrity = self.player.max_integrity;
        self.player.credits = credits;

        self.stats = GameStats::default();
        self.dockable_station = None;
        self.spawn_sector(1);
    }

    /// Advances the world by one tick.
    pub fn tick(&mut self, input: &mut InputState) -> TickReport {
        let mut events = Vec::new();
        let mut outcome = TickOutcome::Continue;
        let had_asteroids = !self.asteroids.is_empty();
        let tuning = self.tuning;

        // 1. ship
        ship_movement::tick_player(&mut self.player, &input.held, &tuning.player, &tuning.world);

        // 2. stations and docking (one-shot input is always consumed)
        self.dockable_station =
            stations::tick_stations(&mut self.stations, &self.player, &tuning.economy, &tuning.world);
        if std::mem::take(&mut input.dock_requested) {
            if let Some(station_id) = self.dockable_station {
                events.push(SimEvent::Docked { station_id });
                outcome = TickOutcome::Docked { station_id };
            }
        }

        // 3. asteroids
        let collision = asteroids::tick_asteroids(
            &mut self.asteroids,
            &mut self.particles,
            &mut self.player,
            &mut self.stats,
            self.black_hole,
            &mut self.rng,
            &mut self.next_id,
            &tuning.physics,
            &mut events,
        );

        // 4. particles
        let collected = particles::tick_particles(
            &mut self.particles,
            &mut self.player,
            &mut self.stats,
            self.black_hole,
            &tuning.physics,
            &mut events,
        );

        if had_asteroids && self.asteroids.is_empty() {
            events.push(SimEvent::SectorCleared {
                sector: self.stats.sector,
            });
        }

        // 5. terminal check; destruction wins over a same-tick dock
        if let Some(cause) = collision {
            outcome = TickOutcome::Destroyed { cause };
        } else if check_event_horizon(&mut self.player, self.black_hole, tuning.physics.event_horizon)
        {
            events.push(SimEvent::PlayerDestroyed {
                cause: DeathCause::EventHorizon,
            });
            outcome = TickOutcome::Destroyed {
                cause: DeathCause::EventHorizon,
            };
        }

        TickReport {
            events,
            outcome,
            collected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::PlayerInput;

    fn world() -> World {
        World::new(Tuning::default(), 42)
    }

    #[test]
    fn when_world_is_created_then_sector_one_is_populated() {
        let w = world();
        let tuning = Tuning::default();

        assert_eq!(w.stats.sector, 1);
        assert_eq!(w.asteroids.len(), tuning.world.base_asteroid_count);
        assert_eq!(
            w.stats.particles_needed,
            (tuning.world.base_asteroid_count * tuning.physics.particles_per_asteroid / 2) as u64
        );
        assert_eq!(w.stations.len(), 3);
        assert!(w.particles.is_empty());
    }

    #[test]
    fn when_seed_is_fixed_then_ticks_are_deterministic() {
        let run = || {
            let mut w = world();
            let mut input = InputState {
                held: PlayerInput {
                    thrust_forward: true,
                    ability: true,
                    ..PlayerInput::default()
                },
                dock_requested: false,
            };
            for _ in 0..120 {
                w.tick(&mut input);
            }
            (
                w.player.body.pos,
                w.stats.score,
                w.asteroids.iter().map(|a| a.body.pos).collect::<Vec<_>>(),
            )
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn when_fresh_ship_thrusts_forward_then_it_moves_away_from_the_black_hole() {
        let mut w = world();
        w.asteroids.clear();
        let start = w.player.body.pos.distance(w.black_hole);
        let mut input = InputState {
            held: PlayerInput {
                thrust_forward: true,
                ..PlayerInput::default()
            },
            dock_requested: false,
        };

        for _ in 0..30 {
            w.tick(&mut input);
        }

        assert!(w.player.body.pos.distance(w.black_hole) > start);
    }

    #[test]
    fn when_a_collision_destroys_the_ship_then_nearby_particles_are_not_collected() {
        let mut w = world();
        let ship = w.player.body.pos;
        w.asteroids.truncate(1);
        w.asteroids[0].body = crate::domain::entities::Body::new(
            w.asteroids[0].body.id,
            ship + Vec2::new(20.0, 0.0),
            20.0,
            20.0,
        );
        w.player.integrity = 5.0;
        w.particles.push(Particle {
            body: crate::domain::entities::Body::new(900, ship, 3.0, 1.0),
            life: 100.0,
            max_life: 100.0,
            color: "#b388ff".to_string(),
        });

        let report = w.tick(&mut InputState::default());

        assert_eq!(
            report.outcome,
            TickOutcome::Destroyed {
                cause: DeathCause::Collision
            }
        );
        assert_eq!(report.collected, 0);
        assert_eq!(w.player.cargo, 0);
        assert_eq!(w.stats.collected, 0);
        assert_eq!(w.particles.len(), 1);
    }

    #[test]
    fn when_ship_enters_the_horizon_then_it_is_destroyed_regardless_of_hull() {
        let mut w = world();
        w.asteroids.clear();
        w.player.body.pos = w.black_hole + Vec2::new(10.0, 0.0);
        w.player.integrity = 100.0;

        let report = w.tick(&mut InputState::default());

        assert_eq!(
            report.outcome,
            TickOutcome::Destroyed {
                cause: DeathCause::EventHorizon
            }
        );
        assert_eq!(w.player.integrity, 0.0);
    }

    #[test]
    fn when_dock_is_requested_near_a_station_then_outcome_is_docked_and_request_is_cleared() {
        let mut w = world();
        let station = w.stations[0].clone();
        w.player.body.pos = station.body.pos + Vec2::new(station.body.radius + 10.0, 0.0);
        let mut input = InputState {
            dock_requested: true,
            ..InputState::default()
        };

        let report = w.tick(&mut input);

        assert_eq!(
            report.outcome,
            TickOutcome::Docked {
                station_id: station.body.id
            }
        );
        assert!(!input.dock_requested);
    }

    #[test]
    fn when_dock_is_requested_far_from_stations_then_request_is_dropped() {
        let mut w = world();
        let mut input = InputState {
            dock_requested: true,
            ..InputState::default()
        };

        let report = w.tick(&mut input);

        assert_eq!(report.outcome, TickOutcome::Continue);
        assert!(!input.dock_requested);
    }

    #[test]
    fn when_last_asteroid_is_absorbed_then_sector_cleared_fires() {
        let mut w = world();
        w.asteroids.truncate(1);
        w.asteroids[0].body.pos = w.black_hole + Vec2::new(5.0, 0.0);
        let before = w.particles.len();

        let report = w.tick(&mut InputState::default());

        assert!(report.events.contains(&SimEvent::SectorCleared { sector: 1 }));
        assert!(w.field_cleared());
        assert_eq!(
            w.particles.len(),
            before + w.tuning.physics.particles_per_asteroid
        );
    }

    #[test]
    fn integrity_never_rises_during_play_and_cargo_stays_within_capacity() {
        let mut w = world();
        let mut input = InputState {
            held: PlayerInput {
                thrust_forward: true,
                rotate_left: true,
                ability: true,
                ..PlayerInput::default()
            },
            dock_requested: false,
        };
        let mut last_integrity = w.player.integrity;
        for _ in 0..600 {
            let report = w.tick(&mut input);
            assert!(w.player.integrity <= last_integrity);
            assert!(w.player.cargo <= w.player.max_cargo);
            last_integrity = w.player.integrity;
            if matches!(report.outcome, TickOutcome::Destroyed { .. }) {
                break;
            }
        }
    }

    #[test]
    fn when_world_is_reset_with_kept_credits_then_only_credits_survive() {
        let mut w = world();
        w.player.credits = 321;
        w.player.cargo = 9;
        w.player.integrity = 10.0;
        w.stats.score = 5000;
        w.spawn_sector(3);

        w.reset(&UpgradeSet::default());

        assert_eq!(w.player.credits, 321);
        assert_eq!(w.player.cargo, 0);
        assert_eq!(w.player.integrity, w.player.max_integrity);
        assert_eq!(w.stats.score, 0);
        assert_eq!(w.stats.sector, 1);
    }
}
