use crate::domain::GameState;
use crate::interface_adapters::http::error_response;
use crate::interface_adapters::protocol::{
    ClientMessage, GameStateDto, NarrativeLogDto, ServerMessage, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{self, rand_id};
use crate::use_cases::{
    NarrativeLog, SessionCommand, SessionHandle, SessionRegistry, WorldUpdate,
};

use axum::{
    Error,
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    CommandsClosed,
    WorldUpdatesClosed,
    SessionClosed,
}

#[derive(Debug, serde::Deserialize)]
pub struct SessionQuery {
    // The session the client wants to attach to; a private one is created when absent.
    #[serde(default)]
    session_id: Option<String>,
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each world update once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_session_serializer(session: &SessionHandle) {
    tokio::spawn(world_update_serializer(
        session.world_tx.subscribe(),
        session.world_bytes_tx.clone(),
        session.world_latest_tx.clone(),
    ));
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> impl IntoResponse {
    let registry = state.session_registry.clone();

    let (session, private) = match query.session_id {
        Some(session_id) => match registry.get_session(&session_id).await {
            Some(session) => (session, false),
            None => return error_response(StatusCode::NOT_FOUND, "session not found"),
        },
        None => {
            // Private sessions end with the socket that created them. If the upgrade
            // never completes, the registry's idle watcher reclaims them.
            match registry
                .create_session(rng::session_id(), rng::world_seed())
                .await
            {
                Ok(session) => {
                    spawn_session_serializer(&session);
                    (session, true)
                }
                Err(e) => {
                    error!(error = ?e, "failed to create private session");
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "failed to create session",
                    );
                }
            }
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session, registry, private))
}

async fn handle_socket(
    socket: WebSocket,
    session: SessionHandle,
    registry: Arc<SessionRegistry>,
    private: bool,
) {
    // Separate connection id for correlating logs across one socket's lifetime.
    let conn_id = rand_id();
    let span = info_span!("conn", conn_id, session_id = %session.session_id);
    serve_socket(socket, session, registry, private)
        .instrument(span)
        .await
}

async fn serve_socket(
    mut socket: WebSocket,
    session: SessionHandle,
    registry: Arc<SessionRegistry>,
    private: bool,
) {
    let mut ctx = match bootstrap_connection(&mut socket, &session).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = ?e, "failed to bootstrap connection");
            let _ = socket.close().await;
            if private {
                registry.remove_session(&session.session_id).await;
            }
            return;
        }
    };

    info!(private, "client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    if private {
        registry.remove_session(&session.session_id).await;
    }
    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        lag_recovery_count = ctx.lag_recovery_count,
        "connection stats"
    );
    info!("client disconnected");
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub command_tx: mpsc::Sender<SessionCommand>,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    pub state_rx: watch::Receiver<GameState>,
    pub narrative_rx: watch::Receiver<NarrativeLog>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,

    pub last_command_full_log: Instant,
    pub last_world_lag_log: Instant,
    pub last_invalid_input_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    session: &SessionHandle,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* doing anything else (awaits) to not miss packets.
    let world_bytes_rx = session.world_bytes_tx.subscribe();
    let world_latest_rx = session.world_latest_tx.subscribe();
    let mut state_rx = session.state_tx.subscribe();
    let mut narrative_rx = session.narrative_tx.subscribe();

    let mut bytes_out = send_message(
        socket,
        &ServerMessage::Identity {
            session_id: session.session_id.to_string(),
            seed: session.seed,
        },
    )
    .await?;

    // Clone as soon as we borrow to avoid holding the lock across an await.
    let initial_state = *state_rx.borrow_and_update();
    bytes_out += send_message(socket, &ServerMessage::GameState(initial_state.into())).await?;

    let initial_log = NarrativeLogDto::from(&*narrative_rx.borrow_and_update());
    let mut msgs_out = 2;
    if !initial_log.entries.is_empty() {
        bytes_out += send_message(socket, &ServerMessage::Narrative(initial_log)).await?;
        msgs_out += 1;
    }

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        command_tx: session.command_tx.clone(),
        world_bytes_rx,
        world_latest_rx,
        state_rx,
        narrative_rx,
        lag_recovery_count: 0,

        msgs_in: 0,
        msgs_out,
        bytes_in: 0,
        bytes_out: bytes_out as u64,

        invalid_json: 0,

        last_command_full_log: now,
        last_world_lag_log: now,
        last_invalid_input_log: now,

        close_frame: None,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

fn forward_command(
    command_tx: &mpsc::Sender<SessionCommand>,
    command: SessionCommand,
    last_command_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match command_tx.try_send(command) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            if should_log(last_command_full_log) {
                warn!(command = ?dropped, "command channel full; dropping command");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::CommandsClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        command_tx,
        world_bytes_rx,
        world_latest_rx,
        state_rx,
        narrative_rx,
        lag_recovery_count,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        last_command_full_log,
        last_world_lag_log,
        last_invalid_input_log,
        close_frame,
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    incoming,
                    command_tx,
                    msgs_in,
                    bytes_in,
                    invalid_json,
                    last_command_full_log,
                    last_invalid_input_log,
                    close_frame,
                ) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            world_msg = world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_world_lag_log) {
                            warn!(missed = n, "world updates lagged; sending snapshot");
                        }

                        // Resync strategy: send the latest world snapshot.
                        let latest = world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            match forward_bytes(latest, socket, msgs_out, bytes_out).await {
                                LoopControl::Continue => false,
                                LoopControl::Disconnect => true,
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }

            changed_state = state_rx.changed() => {
                match changed_state {
                    Ok(()) => {
                        let state = GameStateDto::from(*state_rx.borrow_and_update());
                        match forward_message(&ServerMessage::GameState(state), socket, msgs_out, bytes_out).await {
                            LoopControl::Continue => false,
                            LoopControl::Disconnect => true,
                        }
                    }
                    Err(_) => {
                        warn!("game state channel closed; disconnecting");
                        fatal = Some(NetError::SessionClosed);
                        true
                    }
                }
            }

            changed_log = narrative_rx.changed() => {
                match changed_log {
                    Ok(()) => {
                        let log = NarrativeLogDto::from(&*narrative_rx.borrow_and_update());
                        match forward_message(&ServerMessage::Narrative(log), socket, msgs_out, bytes_out).await {
                            LoopControl::Continue => false,
                            LoopControl::Disconnect => true,
                        }
                    }
                    // The session task is gone.
                    Err(_) => {
                        fatal = Some(NetError::SessionClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    command_tx: &mpsc::Sender<SessionCommand>,
    msgs_in: &mut u64,
    bytes_in: &mut u64,
    invalid_json: &mut u32,
    last_command_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Input(input)) => forward_command(
                        command_tx,
                        SessionCommand::Input(input.into()),
                        last_command_full_log,
                    ),
                    Ok(ClientMessage::Command(command)) => match SessionCommand::try_from(command) {
                        Ok(command) => forward_command(command_tx, command, last_command_full_log),
                        Err(e) => {
                            if should_log(last_invalid_input_log) {
                                warn!(error = ?e, "invalid command ignored");
                            }
                            Ok(LoopControl::Continue)
                        }
                    },
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_bytes(
    msg: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = msg.len();
    match socket.send(Message::Text(msg)).await.map_err(NetError::Ws) {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            warn!(error = ?err, "failed to send world update");
            LoopControl::Disconnect
        }
    }
}

async fn forward_message(
    msg: &ServerMessage,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    match send_message(socket, msg).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send message");
            LoopControl::Disconnect
        }
    }
}
