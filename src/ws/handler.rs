//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::game::{PlayerId, SimCommand, SimHandle};
use crate::util::rate_limit::SessionRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Gateway errors, only ever logged
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("WebSocket send failed: {0}")]
    Send(#[from] axum::Error),
}

impl ClientMsg {
    /// Translate a client message into a simulation command for `player_id`
    pub fn into_command(self, player_id: PlayerId) -> SimCommand {
        match self {
            ClientMsg::Movement(input) => SimCommand::Movement(player_id, input),
            ClientMsg::Shoot { angle } => SimCommand::Shoot(player_id, angle),
        }
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let player_id = state.allocate_player_id();
    debug!(player_id = %player_id, "WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, player_id, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, player_id: PlayerId, state: AppState) {
    info!(player_id = %player_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Subscribe first so the first state update after joining is not missed
    let snapshot_rx = state.sim.subscribe();

    let greeting = [
        ServerMsg::Welcome { player_id },
        ServerMsg::MapData((*state.world_map).clone()),
    ];
    for msg in &greeting {
        if let Err(e) = send_msg(&mut ws_sink, msg).await {
            error!(player_id = %player_id, error = %e, "Failed to send greeting");
            return;
        }
    }

    if !state.sim.send(SimCommand::Connect(player_id)).await {
        error!(player_id = %player_id, "Simulation loop is not running");
        return;
    }

    let rate_limiter = SessionRateLimiter::new(state.config.input_rate_limit);
    run_session(
        player_id,
        ws_sink,
        ws_stream,
        &state.sim,
        snapshot_rx,
        rate_limiter,
    )
    .await;

    // Late inputs already queued become no-ops once this is applied
    let _ = state.sim.send(SimCommand::Disconnect(player_id)).await;

    info!(player_id = %player_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    player_id: PlayerId,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    sim: &SimHandle,
    mut snapshot_rx: broadcast::Receiver<ServerMsg>,
    rate_limiter: SessionRateLimiter,
) {
    // Spawn writer task: broadcast snapshots -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(msg) => {
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        player_id = %player_id,
                        lagged_count = n,
                        "Client lagged, skipping {} snapshots", n
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(player_id = %player_id, "Snapshot channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> simulation queue
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(player_id = %player_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        if !sim.send(client_msg.into_command(player_id)).await {
                            debug!(player_id = %player_id, "Command channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(player_id = %player_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(player_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(player_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                debug!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), GatewayError> {
    let json = serde_json::to_string(msg)?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}
