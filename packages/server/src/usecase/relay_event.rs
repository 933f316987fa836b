//! UseCase: ルームへのルーティングとトレードイベントの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::route() / relay() / reject()
//!
//! ### なぜこのテストが必要か
//! - 中継ルール（buy_request → new_request など）と宛先ルームの選定が
//!   リレーの中核であり、ルーム間の分離・複数タブへの配信・順序を保証する必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：宛先ルームの全メンバーへの配信
//! - エッジケース：宛先がオフライン（メンバー 0）、送信者自身が宛先ルームにいる

use std::sync::Arc;

use crate::domain::{
    ConnectionRegistry, MessagePusher, ServerEvent, SessionId, TradeEvent, WalletAddress,
};

use super::error::RelayError;

/// ルーティングと中継のユースケース
pub struct RelayEventUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayEventUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルームの現メンバー全員にイベントを送る
    ///
    /// 呼び出し時点のメンバーにのみ届く（fire-and-forget）。メンバーがいなければ
    /// 何もしない。
    ///
    /// # Returns
    ///
    /// 配信対象になったセッション ID のリスト
    pub async fn route(
        &self,
        room: &WalletAddress,
        event: &ServerEvent,
    ) -> Result<Vec<SessionId>, RelayError> {
        let members = self.registry.members_of(room).await;
        if members.is_empty() {
            tracing::debug!(
                "Room '{}' has no members, dropping '{}'",
                room,
                event.name()
            );
            return Ok(members);
        }

        let delivered = self.message_pusher.broadcast(&members, event).await?;
        tracing::debug!(
            "Routed '{}' to room '{}' ({}/{} delivered)",
            event.name(),
            room,
            delivered,
            members.len()
        );
        Ok(members)
    }

    /// トレードイベントを宛先ルームへ中継する
    pub async fn relay(
        &self,
        from: &SessionId,
        trade: TradeEvent,
    ) -> Result<Vec<SessionId>, RelayError> {
        let kind = trade.kind();
        let recipient = trade.recipient().clone();
        let event = trade.into_server_event();

        tracing::info!(
            "Relaying '{}' from session '{}' to room '{}' as '{}'",
            kind.event_name(),
            from,
            recipient,
            event.name()
        );
        self.route(&recipient, &event).await
    }

    /// 受理できなかったフレームについて送信者本人に error イベントを返す
    pub async fn reject(
        &self,
        to: &SessionId,
        event: Option<String>,
        message: String,
    ) -> Result<(), RelayError> {
        let error = ServerEvent::Error { event, message };
        self.message_pusher.push_to(to, &error).await?;
        Ok(())
    }
}
