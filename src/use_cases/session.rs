// Game state machine for a single player session.

use super::types::{SessionCommand, SessionOutput};
use super::world::{TickOutcome, World};
use crate::domain::economy::{self, TransactionError};
use crate::domain::events::{AudioCue, AudioCueTracker, ExplosionSize, SimEvent};
use crate::domain::ports::{NarrativeEvent, NarrativeRequest};
use crate::domain::state::{
    AsteroidSnapshot, GameState, InputState, ParticleSnapshot, PlayerSnapshot, StationSnapshot,
    UpgradeSnapshot, WorldSnapshot,
};
use crate::domain::tuning::Tuning;
use crate::domain::upgrades::UpgradeSet;
use crate::domain::vector::Vec2;
use tracing::{debug, info};

pub struct GameSession {
    state: GameState,
    world: World,
    upgrades: UpgradeSet,
    input: InputState,
    audio: AudioCueTracker,
}

impl GameSession {
    /// New session waiting in the menu. `seed` drives all procedural content.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::Menu,
            world: World::new(tuning, seed),
            upgrades: UpgradeSet::default(),
            input: InputState::default(),
            audio: AudioCueTracker::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn upgrades(&self) -> &UpgradeSet {
        &self.upgrades
    }

    /// Applies one command. Commands that do not fit the current state are ignored.
    pub fn apply_command(&mut self, command: SessionCommand, out: &mut SessionOutput) {
        match (command, self.state) {
            (SessionCommand::Input(held), _) => {
                self.input.held = held;
            }
            (SessionCommand::Dock, GameState::Playing) => {
                self.input.dock_requested = true;
            }
            (SessionCommand::Start, GameState::Menu) => {
                // The menu world has never ticked, so it is already a fresh sector 1.
                self.begin_play(out);
            }
            (SessionCommand::Restart, GameState::GameOver) => {
                // Credits and upgrades carry over; the run itself starts fresh.
                self.world.reset(&self.upgrades);
                self.begin_play(out);
            }
            (SessionCommand::Undock, GameState::Docked { station_id }) => {
                info!(station_id, "undocked");
                self.transition(GameState::Playing);
            }
            (SessionCommand::SellCargo, GameState::Docked { station_id }) => {
                let tuning = self.world.tuning.economy;
                let World {
                    player, stations, ..
                } = &mut self.world;
                let result = match stations.iter_mut().find(|s| s.body.id == station_id) {
                    Some(station) => economy::sell_cargo(player, station, &tuning),
                    None => Err(TransactionError::NothingToSell),
                };
                log_transaction("sell", result);
            }
            (SessionCommand::Repair, GameState::Docked { .. }) => {
                let tuning = self.world.tuning.economy;
                log_transaction("repair", economy::repair(&mut self.world.player, &tuning));
            }
            (SessionCommand::Refuel, GameState::Docked { .. }) => {
                let tuning = self.world.tuning.economy;
                log_transaction("refuel", economy::refuel(&mut self.world.player, &tuning));
            }
            (SessionCommand::PurchaseUpgrade(id), GameState::Docked { .. }) => {
                let tuning = self.world.tuning;
                let result = economy::purchase_upgrade(
                    &mut self.world.player,
                    &mut self.upgrades,
                    id,
                    &tuning.economy,
                    &tuning.player,
                );
                if result.is_ok() {
                    debug!(upgrade = id.as_str(), level = self.upgrades.level(id), "upgrade bought");
                }
                log_transaction("upgrade", result);
            }
            (SessionCommand::NextLevel, GameState::Playing) if self.world.field_cleared() => {
                let sector = self.world.stats.sector + 1;
                self.world.spawn_sector(sector);
                info!(sector, "jumped to next sector");
            }
            (command, state) => {
                debug!(?command, ?state, "command ignored in current state");
            }
        }
    }

    /// Advances the simulation one tick. Only the PLAYING state simulates.
    pub fn tick(&mut self, out: &mut SessionOutput) {
        if self.state != GameState::Playing {
            return;
        }

        let report = self.world.tick(&mut self.input);
        let player = &self.world.player;
        self.audio.update(
            player.thrusting,
            player.singularity_active,
            player.singularity_strength,
            &mut out.cues,
        );

        let large_mass = self.world.tuning.physics.large_explosion_mass;
        for event in &report.events {
            match event {
                SimEvent::AsteroidAbsorbed { mass, .. } => {
                    let size = if *mass >= large_mass {
                        ExplosionSize::Large
                    } else {
                        ExplosionSize::Small
                    };
                    out.cues.push(AudioCue::Explosion { size });
                }
                SimEvent::SectorCleared { sector } => {
                    info!(sector, "sector cleared");
                    out.narrative.push(self.narrative_request(NarrativeEvent::Success));
                }
                _ => {}
            }
        }
        if report.collected > 0 {
            out.cues.push(AudioCue::Collect);
        }
        out.events.extend(report.events);

        match report.outcome {
            TickOutcome::Continue => {}
            TickOutcome::Docked { station_id } => {
                self.world.player.body.vel = Vec2::ZERO;
                self.audio.silence(&mut out.cues);
                info!(station_id, "docked");
                self.transition(GameState::Docked { station_id });
            }
            TickOutcome::Destroyed { cause } => {
                self.audio.silence(&mut out.cues);
                out.cues.push(AudioCue::Explosion {
                    size: ExplosionSize::Large,
                });
                info!(?cause, score = self.world.stats.score, "ship destroyed");
                self.transition(GameState::GameOver);
                out.narrative.push(self.narrative_request(NarrativeEvent::Fail));
            }
        }
    }

    /// Read-only view for renderers and HUDs.
    pub fn snapshot(&self) -> WorldSnapshot {
        let tuning = &self.world.tuning;
        WorldSnapshot {
            state: self.state,
            stats: self.world.stats.clone(),
            player: PlayerSnapshot::from(&self.world.player),
            asteroids: self.world.asteroids.iter().map(AsteroidSnapshot::from).collect(),
            particles: self.world.particles.iter().map(ParticleSnapshot::from).collect(),
            stations: self
                .world
                .stations
                .iter()
                .map(|s| StationSnapshot::new(s, economy::unit_price(s, &tuning.economy)))
                .collect(),
            upgrades: self
                .upgrades
                .iter()
                .map(|u| UpgradeSnapshot {
                    id: u.id.as_str(),
                    name: u.name,
                    description: u.description,
                    level: u.level,
                    max_level: u.max_level,
                    price: u.price(tuning.economy.upgrade_cost_growth),
                })
                .collect(),
            dockable_station: self.world.dockable_station,
            black_hole_x: self.world.black_hole().x,
            black_hole_y: self.world.black_hole().y,
            event_horizon: tuning.physics.event_horizon,
        }
    }

    fn begin_play(&mut self, out: &mut SessionOutput) {
        self.input = InputState::default();
        self.audio = AudioCueTracker::default();
        self.transition(GameState::Playing);
        out.narrative.push(self.narrative_request(NarrativeEvent::Start));
    }

    fn transition(&mut self, next: GameState) {
        info!(from = ?self.state, to = ?next, "game state changed");
        self.state = next;
    }

    fn narrative_request(&self, event: NarrativeEvent) -> NarrativeRequest {
        NarrativeRequest {
            level: self.world.stats.sector,
            score: self.world.stats.score,
            event,
        }
    }
}

// Rejections are a normal "disabled action" outcome, not an error.
fn log_transaction(kind: &'static str, result: Result<u64, TransactionError>) {
    match result {
        Ok(credits) => debug!(kind, credits, "transaction completed"),
        Err(reason) => debug!(kind, ?reason, "transaction rejected"),
    }
}
