//! WebSocket frame DTOs.
//!
//! Every frame in either direction is a JSON text message:
//!
//! ```json
//! {"event": "buy_request", "data": {"farmer": "0xAAA", "buyer": "0xBBB", "tokenId": 1}}
//! {"event": "connection", "data": {"socketId": "6f9c..."}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event envelope shared by inbound and outbound frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// `data` of the `connection` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub socket_id: String,
}

/// `data` of the `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Name of the rejected event, `null` when the frame could not be parsed.
    pub event: Option<String>,
    pub message: String,
}
