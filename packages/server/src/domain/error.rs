//! Domain layer errors.

use thiserror::Error;

/// Value Object の不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("wallet address must not be empty")]
    EmptyWalletAddress,

    #[error("session id must not be empty")]
    EmptySessionId,
}

/// ドメインイベントのペイロード検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeEventError {
    #[error("payload must be a JSON object")]
    PayloadNotObject,

    #[error("payload is missing recipient field '{0}'")]
    MissingRecipient(&'static str),

    #[error("recipient field '{0}' must be a non-empty string")]
    InvalidRecipient(&'static str),
}

/// ConnectionRegistry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}
