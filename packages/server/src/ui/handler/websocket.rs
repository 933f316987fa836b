//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::SessionId,
    infrastructure::dto::conversion::{ClientEvent, DecodeError, decode_client_frame},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the session's channel into its WebSocket sink.
///
/// Frames are written in the order they were queued, which keeps delivery
/// FIFO per sender-to-target path.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this session to receive routed events
    let (tx, rx) = mpsc::unbounded_channel();

    // Assign a session id and queue the `connection` greeting
    let session_id = match state.connect_client_usecase.execute(tx).await {
        Ok(connection) => connection.id,
        Err(e) => {
            tracing::error!("Failed to set up new connection: {}", e);
            return;
        }
    };
    tracing::info!("Session '{}' connected", session_id);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let session_id_clone = session_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on session '{}': {}", session_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(&state_clone, &session_id_clone, text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let left_rooms = state.disconnect_client_usecase.execute(&session_id).await;
    tracing::info!(
        "Session '{}' disconnected and left {} room(s)",
        session_id,
        left_rooms.len()
    );
}

/// Decode one text frame and dispatch it to the matching use case.
///
/// Frames for unknown events are ignored. Malformed frames and invalid
/// payloads are answered with an `error` event to the sender only.
pub(crate) async fn handle_text_frame(state: &AppState, session_id: &SessionId, text: &str) {
    tracing::debug!("Received text from '{}': {}", session_id, text);

    match decode_client_frame(text) {
        Ok(ClientEvent::Register(address)) => {
            if let Err(e) = state
                .register_address_usecase
                .execute(session_id, address)
                .await
            {
                tracing::warn!("Failed to register session '{}': {}", session_id, e);
            }
        }
        Ok(ClientEvent::Trade(trade)) => {
            if let Err(e) = state.relay_event_usecase.relay(session_id, trade).await {
                tracing::warn!("Failed to relay event from '{}': {}", session_id, e);
            }
        }
        Err(DecodeError::UnknownEvent(name)) => {
            tracing::debug!("Ignoring unknown event '{}' from '{}'", name, session_id);
        }
        Err(e) => {
            tracing::warn!("Rejected frame from '{}': {}", session_id, e);
            let event = e.event_name().map(str::to_string);
            if let Err(push_err) = state
                .relay_event_usecase
                .reject(session_id, event, e.to_string())
                .await
            {
                tracing::warn!(
                    "Failed to send error event to '{}': {}",
                    session_id,
                    push_err
                );
            }
        }
    }
}
