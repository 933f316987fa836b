//! UseCase: クライアント切断処理

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, MessagePusher, SessionId, WalletAddress};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 接続を全ルームから外し、送信チャンネルを破棄する
    ///
    /// 冪等。既に削除済みの接続に対しては空のリストを返す。
    ///
    /// # Returns
    ///
    /// 退出したルームのアドレス一覧
    pub async fn execute(&self, session_id: &SessionId) -> Vec<WalletAddress> {
        let left_rooms = match self.registry.remove_connection(session_id).await {
            Some(connection) => connection.rooms.into_iter().collect(),
            None => {
                tracing::debug!("Session '{}' was already removed", session_id);
                Vec::new()
            }
        };
        self.message_pusher.unregister_client(session_id).await;
        left_rooms
    }
}
