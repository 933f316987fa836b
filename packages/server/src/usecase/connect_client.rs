//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - セッション ID の払い出しと `connection` イベントの送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続に一意な ID が割り当てられ、本人にだけ通知される
//! - 異常系：`connection` イベントの送信失敗時は登録を取り消す

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionRegistry, MessagePusher, PusherChannel, ServerEvent, SessionIdFactory,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 接続を登録し、本人に `connection` イベントを送る
    ///
    /// # Arguments
    ///
    /// * `sender` - このクライアントへの送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 払い出したセッション ID を持つ接続
    /// * `Err(ConnectError)` - `connection` イベントを送れなかった
    pub async fn execute(&self, sender: PusherChannel) -> Result<Connection, ConnectError> {
        let session_id = SessionIdFactory::generate();

        // 1. Registry に接続を追加（まだどのルームにも属さない）
        let connection = self.registry.add_connection(session_id.clone()).await;

        // 2. MessagePusher に送信チャンネルを登録
        self.message_pusher
            .register_client(session_id.clone(), sender)
            .await;

        // 3. 本人にだけ connection イベントを送る
        let greeting = ServerEvent::Connection {
            socket_id: session_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&session_id, &greeting).await {
            self.registry.remove_connection(&session_id).await;
            self.message_pusher.unregister_client(&session_id).await;
            return Err(ConnectError::GreetingFailed(e));
        }

        Ok(connection)
    }
}
