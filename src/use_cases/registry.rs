// Session orchestration for spawning and managing game worlds.

use super::game::{Narrator, SessionPublishers, session_task};
use super::narrative::NarrativeLog;
use super::session::GameSession;
use super::types::{SessionCommand, WorldUpdate};
use crate::domain::{GameState, Tuning};
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

type SessionMap = Arc<RwLock<HashMap<String, SessionHandle>>>;

/// Shared configuration for spawning session worlds.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Capacity for inbound player commands.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Gameplay constants applied to every new world.
    pub tuning: Tuning,
    /// How long a session may go without a connected client before it is removed.
    pub idle_timeout: Duration,
}

/// Errors returned by session registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Session already exists and cannot be re-created.
    AlreadyExists,
}

/// Per-session channels.
#[derive(Clone)]
pub struct SessionHandle {
    /// Identifier clients use to target this session.
    pub session_id: Arc<str>,
    /// Seed the world was generated from.
    pub seed: u64,
    /// Sender for commands into the session task.
    pub command_tx: mpsc::Sender<SessionCommand>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized world update.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    /// Watch sender for game state transitions.
    pub state_tx: watch::Sender<GameState>,
    /// Watch sender for the bounded narrative log.
    pub narrative_tx: watch::Sender<NarrativeLog>,
    shutdown: Arc<Notify>,
}

/// Thread-safe registry for active sessions.
pub struct SessionRegistry {
    settings: SessionSettings,
    narrator: Narrator,
    sessions: SessionMap,
}

impl SessionRegistry {
    pub fn new(settings: SessionSettings, narrator: Narrator) -> Self {
        Self {
            settings,
            narrator,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a new session and spawns its world task.
    pub async fn create_session(
        &self,
        session_id: String,
        seed: u64,
    ) -> Result<SessionHandle, RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return Err(RegistryError::AlreadyExists);
        }

        let (command_tx, command_rx) =
            mpsc::channel::<SessionCommand>(self.settings.input_channel_capacity);
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(self.settings.world_broadcast_capacity);
        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.world_broadcast_capacity);
        let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let (state_tx, _state_rx) = watch::channel::<GameState>(GameState::Menu);
        let (narrative_tx, _narrative_rx) = watch::channel::<NarrativeLog>(NarrativeLog::default());
        let shutdown = Arc::new(Notify::new());

        // Spawn the authoritative world loop for this session.
        tokio::spawn(session_task(
            GameSession::new(self.settings.tuning, seed),
            command_rx,
            SessionPublishers {
                world_tx: world_tx.clone(),
                state_tx: state_tx.clone(),
                narrative_tx: narrative_tx.clone(),
            },
            self.narrator.clone(),
            self.settings.tick_interval,
            shutdown.clone(),
        ));

        let session = SessionHandle {
            session_id: Arc::from(session_id.as_str()),
            seed,
            command_tx,
            world_tx,
            world_bytes_tx,
            world_latest_tx,
            state_tx,
            narrative_tx,
            shutdown,
        };

        tokio::spawn(idle_watcher(
            self.sessions.clone(),
            session.session_id.clone(),
            self.settings.idle_timeout,
        ));

        info!(session_id = %session_id, seed, "session created");
        sessions.insert(session_id, session.clone());
        Ok(session)
    }

    /// Returns a session handle for the provided id, if it exists.
    pub async fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Stops the session task and forgets the session. Returns false if it was unknown.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.shutdown.notify_one();
                info!(session_id, "session removed");
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Removes the session once no client has been subscribed for `idle_timeout`.
///
/// Covers sessions created over HTTP that nobody joins, and private sessions whose
/// WebSocket upgrade never completed. Exits when the session is removed elsewhere.
async fn idle_watcher(sessions: SessionMap, session_id: Arc<str>, idle_timeout: Duration) {
    let period = (idle_timeout / 4).clamp(Duration::from_millis(5), Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    let mut idle_since = Instant::now();

    loop {
        interval.tick().await;

        let clients = {
            let sessions = sessions.read().await;
            match sessions.get(session_id.as_ref()) {
                // A same-named session created later has its own watcher.
                Some(handle) if Arc::ptr_eq(&handle.session_id, &session_id) => {
                    handle.world_bytes_tx.receiver_count()
                }
                _ => {
                    debug!(session_id = %session_id, "idle watcher exiting");
                    return;
                }
            }
        };

        if clients > 0 {
            idle_since = Instant::now();
            continue;
        }
        if idle_since.elapsed() < idle_timeout {
            continue;
        }

        let mut sessions = sessions.write().await;
        let still_ours = sessions
            .get(session_id.as_ref())
            .is_some_and(|handle| Arc::ptr_eq(&handle.session_id, &session_id));
        if !still_ours {
            return;
        }
        if let Some(session) = sessions.remove(session_id.as_ref()) {
            session.shutdown.notify_one();
            info!(
                session_id = %session_id,
                idle_ms = idle_timeout.as_millis(),
                "idle session removed"
            );
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        Clock, NarrativeError, NarrativeMessage, NarrativeRequest, NarrativeService,
    };
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl NarrativeService for Offline {
        async fn generate(
            &self,
            _request: NarrativeRequest,
        ) -> Result<NarrativeMessage, NarrativeError> {
            Err(NarrativeError::NotConfigured)
        }
    }

    struct ZeroClock;

    impl Clock for ZeroClock {
        fn now_epoch_seconds(&self) -> u64 {
            0
        }
    }

    fn registry() -> SessionRegistry {
        registry_with_idle_timeout(Duration::from_secs(60))
    }

    fn registry_with_idle_timeout(idle_timeout: Duration) -> SessionRegistry {
        SessionRegistry::new(
            SessionSettings {
                input_channel_capacity: 16,
                world_broadcast_capacity: 16,
                tick_interval: Duration::from_millis(10),
                tuning: Tuning::default(),
                idle_timeout,
            },
            Narrator {
                service: Arc::new(Offline),
                clock: Arc::new(ZeroClock),
            },
        )
    }

    #[tokio::test]
    async fn when_session_id_is_taken_then_create_returns_already_exists() {
        let registry = registry();
        registry
            .create_session("alpha".to_string(), 1)
            .await
            .expect("first create succeeds");

        let second = registry.create_session("alpha".to_string(), 2).await;

        assert!(matches!(second, Err(RegistryError::AlreadyExists)));
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn when_session_is_removed_then_lookup_fails_and_task_stops() {
        let registry = registry();
        let handle = registry
            .create_session("beta".to_string(), 9)
            .await
            .expect("create succeeds");
        let mut world_rx = handle.world_tx.subscribe();
        drop(handle);

        assert!(registry.remove_session("beta").await);
        assert!(registry.get_session("beta").await.is_none());
        assert!(!registry.remove_session("beta").await);

        // Once the task exits every sender is dropped and the receiver drains to Closed.
        let closed = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match world_rx.recv().await {
                    Err(broadcast::error::RecvError::Closed) => break,
                    _ => continue,
                }
            }
        })
        .await;
        assert!(closed.is_ok());
    }

    #[tokio::test]
    async fn when_session_has_no_clients_past_idle_timeout_then_it_is_reclaimed() {
        let registry = registry_with_idle_timeout(Duration::from_millis(50));
        let handle = registry
            .create_session("gamma".to_string(), 3)
            .await
            .expect("create succeeds");
        let mut world_rx = handle.world_tx.subscribe();
        drop(handle);

        let reclaimed = tokio::time::timeout(Duration::from_secs(2), async {
            while registry.get_session("gamma").await.is_some() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(reclaimed.is_ok());
        assert_eq!(registry.session_count().await, 0);

        // The world task is shut down along with the entry.
        let closed = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Err(broadcast::error::RecvError::Closed) = world_rx.recv().await {
                    break;
                }
            }
        })
        .await;
        assert!(closed.is_ok());
    }

    #[tokio::test]
    async fn when_a_client_is_subscribed_then_the_session_is_kept() {
        let registry = registry_with_idle_timeout(Duration::from_millis(50));
        let handle = registry
            .create_session("delta".to_string(), 4)
            .await
            .expect("create succeeds");
        let _client = handle.world_bytes_tx.subscribe();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(registry.get_session("delta").await.is_some());
    }
}
