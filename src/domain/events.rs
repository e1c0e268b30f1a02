// Events emitted by the simulation for downstream consumers (narrative, audio, logs).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Collision,
    EventHorizon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    AsteroidAbsorbed {
        asteroid_id: u64,
        mass: f32,
        score: u64,
    },
    ParticleCollected {
        particle_id: u64,
    },
    PlayerHit {
        asteroid_id: u64,
        damage: f32,
    },
    PlayerDestroyed {
        cause: DeathCause,
    },
    Docked {
        station_id: u64,
    },
    /// The last asteroid of the sector was absorbed.
    SectorCleared {
        sector: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Large,
}

/// Fire-and-forget sound cues. Thrust and singularity are level toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    Thrust { on: bool },
    Singularity { on: bool, intensity: f32 },
    Explosion { size: ExplosionSize },
    Collect,
}

/// Turns continuous per-tick state into on/off edges.
#[derive(Debug, Default)]
pub struct AudioCueTracker {
    thrusting: bool,
    singularity: bool,
}

impl AudioCueTracker {
    pub fn update(
        &mut self,
        thrusting: bool,
        singularity: bool,
        intensity: f32,
        cues: &mut Vec<AudioCue>,
    ) {
        if thrusting != self.thrusting {
            self.thrusting = thrusting;
            cues.push(AudioCue::Thrust { on: thrusting });
        }
        if singularity != self.singularity {
            self.singularity = singularity;
            cues.push(AudioCue::Singularity {
                on: singularity,
                intensity,
            });
        }
    }

    /// Emits "off" edges for anything still playing (e.g. on game over or docking).
    pub fn silence(&mut self, cues: &mut Vec<AudioCue>) {
        self.update(false, false, 0.0, cues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_state_is_held_then_only_edges_emit_cues() {
        let mut tracker = AudioCueTracker::default();
        let mut cues = Vec::new();

        tracker.update(true, false, 1.0, &mut cues);
        tracker.update(true, false, 1.0, &mut cues);
        tracker.update(true, true, 1.5, &mut cues);
        tracker.update(false, true, 1.5, &mut cues);

        assert_eq!(
            cues,
            vec![
                AudioCue::Thrust { on: true },
                AudioCue::Singularity {
                    on: true,
                    intensity: 1.5
                },
                AudioCue::Thrust { on: false },
            ]
        );
    }

    #[test]
    fn silence_turns_everything_off_once() {
        let mut tracker = AudioCueTracker::default();
        let mut cues = Vec::new();
        tracker.update(true, true, 1.0, &mut cues);
        cues.clear();

        tracker.silence(&mut cues);
        tracker.silence(&mut cues);

        assert_eq!(cues.len(), 2);
    }
}
