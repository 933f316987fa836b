//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `ServerEvent` をワイヤーフォーマットにエンコードし、クライアントへ送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信にのみ使用します。
//! チャンネルは FIFO なので、同一送信元から同一宛先へのイベント順序は保たれます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, PusherChannel, ServerEvent, SessionId},
    infrastructure::dto::conversion::encode_server_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(session_id.clone(), tx).await;
/// pusher.push_to(&session_id, &ServerEvent::Connection { socket_id }).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: session_id, Value: そのセッションの送信チャンネル
    clients: Mutex<HashMap<SessionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
    encode_server_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
        clients.insert(session_id, sender);
    }

    async fn unregister_client(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(session_id).is_some() {
            tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
        }
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(session_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(session_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to session '{}'", event.name(), session_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[SessionId],
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError> {
        if targets.is_empty() {
            return Ok(0);
        }

        let frame = encode(event)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            match clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => match sender.send(frame.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => tracing::warn!(
                        "Failed to push '{}' to session '{}': {}",
                        event.name(),
                        target,
                        e
                    ),
                },
                // 宛先選定後に切断されたセッション
                None => tracing::debug!("Session '{}' left before broadcast, skipping", target),
            }
        }

        Ok(delivered)
    }
}
