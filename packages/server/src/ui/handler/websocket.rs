//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::time::{MissedTickBehavior, interval, timeout};

use crate::{
    domain::{ConnectionInfo, MailboxReceiver, MessageContent, RoomId, UserId, Username},
    infrastructure::dto::websocket::{ServerFrame, decode_inbound},
    ui::{
        error::{ApiError, ApiResult},
        state::AppState,
    },
    usecase::SendMessageInput,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub room_id: Option<String>,
}

impl ConnectQuery {
    /// String -> Domain Model
    fn parse(self) -> ApiResult<(UserId, Username, RoomId)> {
        let (Some(user_id), Some(username), Some(room_id)) =
            (self.user_id, self.username, self.room_id)
        else {
            return Err(ApiError::BadRequest(
                "user_id, username and room_id are required".to_string(),
            ));
        };
        Ok((
            UserId::new(user_id)?,
            Username::new(username)?,
            RoomId::new(room_id)?,
        ))
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> ApiResult<Response> {
    let (user_id, username, room_id) = query.parse().inspect_err(|e| {
        tracing::warn!("Rejected WebSocket connection: {}", e);
    })?;

    // Register before upgrading so a duplicate connection is refused with 409
    let (info, mailbox) = state
        .connect_participant_usecase
        .execute(user_id, username, room_id)
        .await
        .inspect_err(|e| tracing::warn!("{}. Rejecting connection.", e))?;

    let failed_state = state.clone();
    let failed_info = info.clone();
    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!("WebSocket upgrade failed for '{}': {}", failed_info.user_id, e);
            tokio::spawn(async move {
                failed_state
                    .disconnect_participant_usecase
                    .execute(&failed_info)
                    .await;
            });
        })
        .on_upgrade(move |socket| handle_socket(socket, state, info, mailbox)))
}

/// Spawns a task that drains the connection's mailbox into the WebSocket sink.
///
/// A ping goes out every `heartbeat` so that a silent peer is noticed by the
/// receiving side. The loop ends when the mailbox is closed, which happens when
/// the hub drops the connection (disconnect or eviction). The socket is then closed.
fn pusher_loop(
    mut mailbox: MailboxReceiver,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
    heartbeat: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(heartbeat);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                delivery = mailbox.recv() => {
                    let Some(delivery) = delivery else { break };
                    let frame = ServerFrame::from(delivery.as_ref());
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to encode frame: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        return;
                    }
                }
                _ = ticker.tick() => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        return;
                    }
                }
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    info: ConnectionInfo,
    mailbox: MailboxReceiver,
) {
    let (sender, mut receiver) = socket.split();

    let heartbeat = state.heartbeat_interval;
    // Any frame (including a pong) counts as a sign of life
    let idle_limit = heartbeat * 2;
    let state_clone = state.clone();
    let info_clone = info.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        loop {
            let msg = match timeout(idle_limit, receiver.next()).await {
                Ok(Some(Ok(msg))) => msg,
                Ok(Some(Err(e))) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        "No frames from '{}' for {:?}. Dropping connection.",
                        info_clone.user_id,
                        idle_limit
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let Some(raw) = decode_inbound(text.as_str()) else {
                        tracing::warn!("Ignoring unrecognized frame from '{}'", info_clone.user_id);
                        continue;
                    };
                    let content = match MessageContent::new(raw) {
                        Ok(content) => content,
                        Err(e) => {
                            tracing::warn!("Invalid message from '{}': {}", info_clone.user_id, e);
                            continue;
                        }
                    };

                    let input = SendMessageInput {
                        user_id: info_clone.user_id.clone(),
                        username: Some(info_clone.username.clone()),
                        content,
                        room_id: info_clone.room_id.clone(),
                        message_type: None,
                    };
                    if let Err(e) = state_clone.send_message_usecase.execute(input).await {
                        tracing::warn!("Failed to send message: {}", e);
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Pong(_) => {
                    tracing::debug!("Received pong from '{}'", info_clone.user_id);
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", info_clone.user_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push mailbox items to this client
    let mut send_task = pusher_loop(mailbox, sender, heartbeat);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state.disconnect_participant_usecase.execute(&info).await {
        tracing::info!("Client '{}' left room '{}'", info.user_id, info.room_id);
    }
}
