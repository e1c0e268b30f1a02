// Wire protocol DTOs and conversions for public game server messages.

use crate::domain::ports::NarrativeMessage;
use crate::domain::state::{
    AsteroidSnapshot, ParticleSnapshot, PlayerSnapshot, StationSnapshot, UpgradeSnapshot,
};
use crate::domain::{
    AudioCue, DeathCause, ExplosionSize, GameState, GameStats, PlayerInput, SimEvent, UpgradeId,
};
use crate::use_cases::{NarrativeLog, SessionCommand, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Session the connection is attached to.
    Identity { session_id: String, seed: u64 },
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Game state machine transitions.
    GameState(GameStateDto),
    // Bounded narrative history, most recent last.
    Narrative(NarrativeLogDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Held controls, sent whenever they change.
    Input(PlayerInputDto),
    // One-shot UI command.
    Command(CommandDto),
}

/// Held-key state sent by the client.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PlayerInputDto {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub ability: bool,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            rotate_left: input.rotate_left,
            rotate_right: input.rotate_right,
            thrust_forward: input.thrust_forward,
            thrust_backward: input.thrust_backward,
            ability: input.ability,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandDto {
    Dock,
    Start,
    Restart,
    Undock,
    SellCargo,
    Repair,
    Refuel,
    PurchaseUpgrade { upgrade_id: String },
    NextLevel,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProtocolError {
    UnknownUpgrade(String),
}

impl TryFrom<CommandDto> for SessionCommand {
    type Error = ProtocolError;

    fn try_from(command: CommandDto) -> Result<Self, Self::Error> {
        Ok(match command {
            CommandDto::Dock => SessionCommand::Dock,
            CommandDto::Start => SessionCommand::Start,
            CommandDto::Restart => SessionCommand::Restart,
            CommandDto::Undock => SessionCommand::Undock,
            CommandDto::SellCargo => SessionCommand::SellCargo,
            CommandDto::Repair => SessionCommand::Repair,
            CommandDto::Refuel => SessionCommand::Refuel,
            CommandDto::PurchaseUpgrade { upgrade_id } => match UpgradeId::parse(&upgrade_id) {
                Some(id) => SessionCommand::PurchaseUpgrade(id),
                None => return Err(ProtocolError::UnknownUpgrade(upgrade_id)),
            },
            CommandDto::NextLevel => SessionCommand::NextLevel,
        })
    }
}

/// Game state sent to clients for UI flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameStateDto {
    Menu,
    Playing,
    Docked { station_id: u64 },
    GameOver,
}

impl From<GameState> for GameStateDto {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Menu => GameStateDto::Menu,
            GameState::Playing => GameStateDto::Playing,
            GameState::Docked { station_id } => GameStateDto::Docked { station_id },
            GameState::GameOver => GameStateDto::GameOver,
        }
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub state: GameStateDto,
    pub stats: StatsDto,
    pub player: PlayerDto,
    pub asteroids: Vec<AsteroidDto>,
    pub particles: Vec<ParticleDto>,
    pub stations: Vec<StationDto>,
    pub upgrades: Vec<UpgradeDto>,
    pub dockable_station: Option<u64>,
    pub black_hole: BlackHoleDto,
    // Audio toggles raised during this tick.
    pub cues: Vec<AudioCueDto>,
    // Simulation events raised since the previous update.
    pub events: Vec<SimEventDto>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        let snapshot = update.snapshot;
        Self {
            tick: update.tick,
            state: snapshot.state.into(),
            stats: StatsDto::from(&snapshot.stats),
            player: PlayerDto::from(&snapshot.player),
            asteroids: snapshot.asteroids.iter().map(AsteroidDto::from).collect(),
            particles: snapshot.particles.iter().map(ParticleDto::from).collect(),
            stations: snapshot.stations.iter().map(StationDto::from).collect(),
            upgrades: snapshot.upgrades.iter().map(UpgradeDto::from).collect(),
            dockable_station: snapshot.dockable_station,
            black_hole: BlackHoleDto {
                x: snapshot.black_hole_x,
                y: snapshot.black_hole_y,
                event_horizon: snapshot.event_horizon,
            },
            cues: update.cues.into_iter().map(AudioCueDto::from).collect(),
            events: update.events.into_iter().map(SimEventDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsDto {
    pub score: u64,
    pub sector: u32,
    pub collected: u64,
    pub sector_collected: u64,
    pub particles_needed: u64,
}

impl From<&GameStats> for StatsDto {
    fn from(stats: &GameStats) -> Self {
        Self {
            score: stats.score,
            sector: stats.sector,
            collected: stats.collected,
            sector_collected: stats.sector_collected,
            particles_needed: stats.particles_needed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: String,
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
    pub cargo: u32,
    pub max_cargo: u32,
    pub credits: u64,
    pub thrusting: bool,
}

impl From<&PlayerSnapshot> for PlayerDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            angle: p.angle,
            radius: p.radius,
            fuel: p.fuel,
            max_fuel: p.max_fuel,
            integrity: p.integrity,
            max_integrity: p.max_integrity,
            singularity_active: p.singularity_active,
            singularity_radius: p.singularity_radius,
            cargo: p.cargo,
            max_cargo: p.max_cargo,
            credits: p.credits,
            thrusting: p.thrusting,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AsteroidDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub radius: f32,
    pub value: u32,
    pub color: String,
    // Per-vertex radius factors of the irregular outline.
    pub shape: Vec<f32>,
}

impl From<&AsteroidSnapshot> for AsteroidDto {
    fn from(a: &AsteroidSnapshot) -> Self {
        Self {
            id: a.id.to_string(),
            x: a.x,
            y: a.y,
            rot: a.angle,
            radius: a.radius,
            value: a.value,
            color: a.color.clone(),
            shape: a.shape.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub life: f32,
    pub color: String,
}

impl From<&ParticleSnapshot> for ParticleDto {
    fn from(p: &ParticleSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            radius: p.radius,
            life: p.life,
            color: p.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub radius: f32,
    pub color: String,
    pub inventory: f32,
    pub max_inventory: f32,
    pub unit_price: u64,
}

impl From<&StationSnapshot> for StationDto {
    fn from(s: &StationSnapshot) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            x: s.x,
            y: s.y,
            rot: s.angle,
            radius: s.radius,
            color: s.color.clone(),
            inventory: s.inventory,
            max_inventory: s.max_inventory,
            unit_price: s.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeDto {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub price: u64,
}

impl From<&UpgradeSnapshot> for UpgradeDto {
    fn from(u: &UpgradeSnapshot) -> Self {
        Self {
            id: u.id,
            name: u.name,
            description: u.description,
            level: u.level,
            max_level: u.max_level,
            price: u.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlackHoleDto {
    pub x: f32,
    pub y: f32,
    pub event_horizon: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum AudioCueDto {
    Thrust { on: bool },
    Singularity { on: bool, intensity: f32 },
    Explosion { size: &'static str },
    Collect,
}

impl From<AudioCue> for AudioCueDto {
    fn from(cue: AudioCue) -> Self {
        match cue {
            AudioCue::Thrust { on } => AudioCueDto::Thrust { on },
            AudioCue::Singularity { on, intensity } => AudioCueDto::Singularity { on, intensity },
            AudioCue::Explosion { size } => AudioCueDto::Explosion {
                size: match size {
                    ExplosionSize::Small => "small",
                    ExplosionSize::Large => "large",
                },
            },
            AudioCue::Collect => AudioCueDto::Collect,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEventDto {
    AsteroidAbsorbed { asteroid_id: String, mass: f32, score: u64 },
    ParticleCollected { particle_id: String },
    PlayerHit { asteroid_id: String, damage: f32 },
    PlayerDestroyed { cause: &'static str },
    Docked { station_id: u64 },
    SectorCleared { sector: u32 },
}

impl From<SimEvent> for SimEventDto {
    fn from(event: SimEvent) -> Self {
        match event {
            SimEvent::AsteroidAbsorbed {
                asteroid_id,
                mass,
                score,
            } => SimEventDto::AsteroidAbsorbed {
                asteroid_id: asteroid_id.to_string(),
                mass,
                score,
            },
            SimEvent::ParticleCollected { particle_id } => SimEventDto::ParticleCollected {
                particle_id: particle_id.to_string(),
            },
            SimEvent::PlayerHit {
                asteroid_id,
                damage,
            } => SimEventDto::PlayerHit {
                asteroid_id: asteroid_id.to_string(),
                damage,
            },
            SimEvent::PlayerDestroyed { cause } => SimEventDto::PlayerDestroyed {
                cause: match cause {
                    DeathCause::Collision => "collision",
                    DeathCause::EventHorizon => "event_horizon",
                },
            },
            SimEvent::Docked { station_id } => SimEventDto::Docked { station_id },
            SimEvent::SectorCleared { sector } => SimEventDto::SectorCleared { sector },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeEntryDto {
    pub text: String,
    pub sender: String,
    pub timestamp: u64,
}

impl From<&NarrativeMessage> for NarrativeEntryDto {
    fn from(message: &NarrativeMessage) -> Self {
        Self {
            text: message.text.clone(),
            sender: message.sender.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeLogDto {
    pub entries: Vec<NarrativeEntryDto>,
}

impl From<&NarrativeLog> for NarrativeLogDto {
    fn from(log: &NarrativeLog) -> Self {
        Self {
            entries: log.entries().map(NarrativeEntryDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tuning;
    use crate::use_cases::GameSession;

    #[test]
    fn when_input_omits_keys_then_they_default_to_released() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Input","data":{"thrust_forward":true}}"#)
                .expect("valid input");

        let ClientMessage::Input(dto) = msg else {
            panic!("expected input");
        };
        let input = PlayerInput::from(dto);
        assert!(input.thrust_forward);
        assert!(!input.ability);
        assert!(!input.rotate_left);
    }

    #[test]
    fn when_purchase_names_a_known_upgrade_then_command_is_built() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"Command","data":{"kind":"purchase_upgrade","upgrade_id":"hull"}}"#,
        )
        .expect("valid command");

        let ClientMessage::Command(dto) = msg else {
            panic!("expected command");
        };
        let command = SessionCommand::try_from(dto).expect("known upgrade");
        assert!(matches!(
            command,
            SessionCommand::PurchaseUpgrade(UpgradeId::Hull)
        ));
    }

    #[test]
    fn when_purchase_names_an_unknown_upgrade_then_conversion_fails() {
        let dto = CommandDto::PurchaseUpgrade {
            upgrade_id: "warp_drive".to_string(),
        };

        assert_eq!(
            SessionCommand::try_from(dto).err(),
            Some(ProtocolError::UnknownUpgrade("warp_drive".to_string()))
        );
    }

    #[test]
    fn when_unit_command_is_sent_then_it_parses_without_payload() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Command","data":{"kind":"sell_cargo"}}"#)
                .expect("valid command");

        assert!(matches!(msg, ClientMessage::Command(CommandDto::SellCargo)));
    }

    #[test]
    fn server_messages_use_type_and_data_envelope() {
        let msg = ServerMessage::GameState(GameState::Docked { station_id: 4 }.into());
        let json = serde_json::to_value(&msg).expect("serializable");

        assert_eq!(json["type"], "GameState");
        assert_eq!(json["data"]["Docked"]["station_id"], 4);

        let cue = serde_json::to_value(AudioCueDto::from(AudioCue::Explosion {
            size: ExplosionSize::Large,
        }))
        .expect("serializable");
        assert_eq!(cue["cue"], "explosion");
        assert_eq!(cue["size"], "large");
    }

    #[test]
    fn when_world_update_carries_events_then_they_are_serialized_next_to_cues() {
        let update = WorldUpdate {
            tick: 12,
            snapshot: GameSession::new(Tuning::default(), 5).snapshot(),
            cues: vec![AudioCue::Collect],
            events: vec![
                SimEvent::ParticleCollected { particle_id: 40 },
                SimEvent::PlayerDestroyed {
                    cause: DeathCause::EventHorizon,
                },
            ],
        };

        let json = serde_json::to_value(ServerMessage::WorldUpdate(update.into()))
            .expect("serializable");

        let events = &json["data"]["events"];
        assert_eq!(events[0]["event"], "particle_collected");
        assert_eq!(events[0]["particle_id"], "40");
        assert_eq!(events[1]["event"], "player_destroyed");
        assert_eq!(events[1]["cause"], "event_horizon");
        assert_eq!(json["data"]["cues"][0]["cue"], "collect");
    }
}
