// Domain layer: core simulation types and rules.

pub mod economy;
pub mod entities;
pub mod events;
pub mod ports;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod upgrades;
pub mod vector;

pub use entities::{Asteroid, Body, Particle, Player, Station};
pub use events::{AudioCue, DeathCause, ExplosionSize, SimEvent};
pub use state::{GameState, GameStats, InputState, PlayerInput, WorldSnapshot};
pub use tuning::Tuning;
pub use upgrades::{UpgradeId, UpgradeSet};
pub use vector::Vec2;
