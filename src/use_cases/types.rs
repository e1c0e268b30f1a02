// Use-case level inputs/outputs for the game loop.

use crate::domain::ports::NarrativeRequest;
use crate::domain::{AudioCue, PlayerInput, SimEvent, UpgradeId, WorldSnapshot};

/// Commands from the input collaborator. `Input` carries held keys; everything
/// else is a one-shot request.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Input(PlayerInput),
    Dock,
    Start,
    Restart,
    Undock,
    SellCargo,
    Repair,
    Refuel,
    PurchaseUpgrade(UpgradeId),
    NextLevel,
}

/// Side effects produced while applying commands and ticking.
#[derive(Debug, Default)]
pub struct SessionOutput {
    pub events: Vec<SimEvent>,
    pub cues: Vec<AudioCue>,
    pub narrative: Vec<NarrativeRequest>,
}

impl SessionOutput {
    pub fn clear(&mut self) {
        self.events.clear();
        self.cues.clear();
        self.narrative.clear();
    }
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub snapshot: WorldSnapshot,
    pub cues: Vec<AudioCue>,
    pub events: Vec<SimEvent>,
}
