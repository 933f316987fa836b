//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信を抽象化します。WebSocket 以外のトランスポートや
//! テスト用のフェイクに差し替えられます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, ServerEvent, SessionId};

/// 接続ごとの送信チャンネル（エンコード済みフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// 送信チャンネルを登録解除（冪等）
    async fn unregister_client(&self, session_id: &SessionId);

    /// 単一クライアントへ送信
    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数クライアントへ送信
    ///
    /// 個々の送信失敗は許容し、実際に送信できた数を返す。
    async fn broadcast(
        &self,
        targets: &[SessionId],
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError>;
}
