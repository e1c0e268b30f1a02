use super::narrative::{NarrativeLog, narrate};
use super::session::GameSession;
use super::types::{SessionCommand, SessionOutput, WorldUpdate};
use crate::domain::GameState;
use crate::domain::ports::{Clock, NarrativeMessage, NarrativeService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, info};

/// Collaborators used to turn narrative requests into log lines.
#[derive(Clone)]
pub struct Narrator {
    pub service: Arc<dyn NarrativeService>,
    pub clock: Arc<dyn Clock>,
}

/// Output side of a session task.
pub struct SessionPublishers {
    pub world_tx: broadcast::Sender<WorldUpdate>,
    pub state_tx: watch::Sender<GameState>,
    pub narrative_tx: watch::Sender<NarrativeLog>,
}

pub async fn session_task(
    mut session: GameSession,
    mut command_rx: mpsc::Receiver<SessionCommand>,
    publishers: SessionPublishers,
    narrator: Narrator,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut tick: u64 = 0;
    let mut out = SessionOutput::default();
    // Narrative results land here from detached tasks; the tick never waits on them.
    let (narrative_done_tx, mut narrative_done_rx) = mpsc::unbounded_channel::<NarrativeMessage>();

    publish_state(&publishers.state_tx, session.state());

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly when the session is removed.
                break;
            }
            Some(message) = narrative_done_rx.recv() => {
                debug!(sender = %message.sender, "narrative received");
                publishers.narrative_tx.send_modify(|log| log.push(message));
                continue;
            }
            _ = interval.tick() => {}
        }

        out.clear();
        while let Ok(command) = command_rx.try_recv() {
            session.apply_command(command, &mut out);
        }
        session.tick(&mut out);
        tick += 1;

        for request in out.narrative.drain(..) {
            info!(event = request.event.as_str(), level = request.level, "narrative requested");
            let narrator = narrator.clone();
            let done_tx = narrative_done_tx.clone();
            tokio::spawn(async move {
                let message =
                    narrate(narrator.service.as_ref(), request, narrator.clock.as_ref()).await;
                let _ = done_tx.send(message);
            });
        }

        publish_state(&publishers.state_tx, session.state());

        let _ = publishers.world_tx.send(WorldUpdate {
            tick,
            snapshot: session.snapshot(),
            cues: std::mem::take(&mut out.cues),
            events: std::mem::take(&mut out.events),
        });
    }

    info!(tick, "session task stopped");
}

fn publish_state(state_tx: &watch::Sender<GameState>, state: GameState) {
    state_tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    });
}
