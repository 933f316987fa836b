//! UseCase layer errors.

use thiserror::Error;

use crate::domain::{MessagePushError, RegistryError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// connection イベントを送れなかった（接続は登録解除済み）
    #[error("failed to greet new connection: {0}")]
    GreetingFailed(#[from] MessagePushError),
}

/// register 処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// ルーティング・中継処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Push(#[from] MessagePushError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
