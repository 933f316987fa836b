//! Conversion logic between wire frames and domain types.

use agrirelay_shared::time::timestamp_to_rfc3339;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::{
    Room, ServerEvent, TradeEvent, TradeEventError, TradeEventKind, WalletAddress,
};

use super::{
    http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket::{ConnectionData, ErrorData, Frame},
};

/// Name of the inbound event that joins a room.
pub const REGISTER_EVENT: &str = "register";

/// A decoded client frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Register(WalletAddress),
    Trade(TradeEvent),
}

/// Why an inbound frame was not turned into a [`ClientEvent`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("invalid 'register' payload: {0}")]
    InvalidRegister(String),

    #[error("invalid '{event}' payload: {source}")]
    InvalidTrade {
        event: &'static str,
        source: TradeEventError,
    },
}

impl DecodeError {
    /// The event name the frame carried, if it got that far.
    pub fn event_name(&self) -> Option<&str> {
        match self {
            DecodeError::MalformedFrame(_) => None,
            DecodeError::UnknownEvent(name) => Some(name.as_str()),
            DecodeError::InvalidRegister(_) => Some(REGISTER_EVENT),
            DecodeError::InvalidTrade { event, .. } => Some(*event),
        }
    }
}

// ========================================
// Wire → Domain
// ========================================

/// Decode a text frame sent by a client.
pub fn decode_client_frame(text: &str) -> Result<ClientEvent, DecodeError> {
    let frame: Frame = serde_json::from_str(text)?;

    if frame.event == REGISTER_EVENT {
        let Value::String(address) = frame.data else {
            return Err(DecodeError::InvalidRegister(
                "address must be a string".to_string(),
            ));
        };
        let address =
            WalletAddress::new(address).map_err(|e| DecodeError::InvalidRegister(e.to_string()))?;
        return Ok(ClientEvent::Register(address));
    }

    let kind = TradeEventKind::from_event_name(&frame.event)
        .ok_or_else(|| DecodeError::UnknownEvent(frame.event.clone()))?;
    TradeEvent::new(kind, frame.data)
        .map(ClientEvent::Trade)
        .map_err(|source| DecodeError::InvalidTrade {
            event: kind.event_name(),
            source,
        })
}

// ========================================
// Domain → Wire
// ========================================

impl From<&ServerEvent> for Frame {
    fn from(event: &ServerEvent) -> Self {
        let data = match event {
            ServerEvent::Connection { socket_id } => json!(ConnectionData {
                socket_id: socket_id.to_string(),
            }),
            ServerEvent::NewRequest(payload)
            | ServerEvent::AcceptRequest(payload)
            | ServerEvent::PaymentSuccess(payload) => Value::Object(payload.clone()),
            ServerEvent::Error { event, message } => json!(ErrorData {
                event: event.clone(),
                message: message.clone(),
            }),
        };

        Self {
            event: event.name().to_string(),
            data,
        }
    }
}

/// Encode an outbound event as a text frame.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Frame::from(event))
}

impl From<Room> for RoomSummaryDto {
    fn from(room: Room) -> Self {
        Self {
            address: room.address.into_string(),
            members: room
                .members
                .into_iter()
                .map(|member| member.session_id.into_string())
                .collect(),
        }
    }
}

impl From<Room> for RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            address: room.address.into_string(),
            members: room
                .members
                .into_iter()
                .map(|member| MemberDetailDto {
                    socket_id: member.session_id.into_string(),
                    connected_at: timestamp_to_rfc3339(member.connected_at.value()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomMember, SessionId, Timestamp};

    #[test]
    fn test_decode_register() {
        // テスト項目: register フレームは WalletAddress にデコードされる
        // given (前提条件):
        let text = r#"{"event":"register","data":"0xAAA"}"#;

        // when (操作):
        let result = decode_client_frame(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            ClientEvent::Register(WalletAddress::new("0xAAA".to_string()).unwrap())
        );
    }

    #[test]
    fn test_decode_register_rejects_non_string_and_empty() {
        // テスト項目: 文字列でない・空のアドレスでの register は拒否される
        // given (前提条件):
        let cases = [
            r#"{"event":"register","data":{"address":"0xAAA"}}"#,
            r#"{"event":"register"}"#,
            r#"{"event":"register","data":""}"#,
        ];

        for text in cases {
            // when (操作):
            let result = decode_client_frame(text);

            // then (期待する結果):
            let err = result.unwrap_err();
            assert!(matches!(err, DecodeError::InvalidRegister(_)), "{text}");
            assert_eq!(err.event_name(), Some("register"));
        }
    }

    #[test]
    fn test_decode_buy_request_keeps_payload() {
        // テスト項目: buy_request のペイロードは未知のフィールドも含めて保持される
        // given (前提条件):
        let text = r#"{"event":"buy_request","data":{"farmer":"0xF","buyer":"0xB","tokenId":7,"amountToken":10}}"#;

        // when (操作):
        let ClientEvent::Trade(event) = decode_client_frame(text).unwrap() else {
            panic!("expected trade event");
        };

        // then (期待する結果):
        assert_eq!(event.kind(), TradeEventKind::BuyRequest);
        assert_eq!(event.recipient().as_str(), "0xF");
        assert_eq!(
            Value::Object(event.payload().clone()),
            json!({"farmer": "0xF", "buyer": "0xB", "tokenId": 7, "amountToken": 10})
        );
    }

    #[test]
    fn test_decode_trade_without_recipient() {
        // テスト項目: 宛先フィールドの無い accept_request は InvalidTrade になる
        // given (前提条件):
        let text = r#"{"event":"accept_request","data":{"farmer":"0xAAA","price":250}}"#;

        // when (操作):
        let err = decode_client_frame(text).unwrap_err();

        // then (期待する結果):
        assert!(matches!(
            err,
            DecodeError::InvalidTrade {
                event: "accept_request",
                source: TradeEventError::MissingRecipient("buyer"),
            }
        ));
        assert_eq!(err.event_name(), Some("accept_request"));
    }

    #[test]
    fn test_decode_unknown_event() {
        // テスト項目: 未知のイベント名は UnknownEvent になる
        // when (操作):
        let err = decode_client_frame(r#"{"event":"chat","data":"hi"}"#).unwrap_err();

        // then (期待する結果):
        assert!(matches!(err, DecodeError::UnknownEvent(ref name) if name == "chat"));
    }

    #[test]
    fn test_decode_malformed_frame() {
        // テスト項目: JSON でない・event の無いフレームは MalformedFrame になる
        // given (前提条件):
        let cases = ["hello", r#"{"data":"0xAAA"}"#, "[1,2,3]"];

        for text in cases {
            // when (操作):
            let err = decode_client_frame(text).unwrap_err();

            // then (期待する結果):
            assert!(matches!(err, DecodeError::MalformedFrame(_)), "{text}");
            assert_eq!(err.event_name(), None);
        }
    }

    #[test]
    fn test_encode_error_event() {
        // テスト項目: error イベントは event と message を持つ
        // given (前提条件):
        let event = ServerEvent::Error {
            event: None,
            message: "malformed frame".to_string(),
        };

        // when (操作):
        let text = encode_server_event(&event).unwrap();

        // then (期待する結果):
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({"event": "error", "data": {"event": null, "message": "malformed frame"}})
        );
    }

    #[test]
    fn test_room_to_detail_dto() {
        // テスト項目: Room から詳細 DTO への変換で接続時刻が RFC 3339 になる
        // given (前提条件):
        let room = Room {
            address: WalletAddress::new("0xAAA".to_string()).unwrap(),
            members: vec![RoomMember {
                session_id: SessionId::new("s1".to_string()).unwrap(),
                connected_at: Timestamp::new(0),
            }],
        };

        // when (操作):
        let dto = RoomDetailDto::from(room);

        // then (期待する結果):
        assert_eq!(dto.address, "0xAAA");
        assert_eq!(
            dto.members,
            vec![MemberDetailDto {
                socket_id: "s1".to_string(),
                connected_at: "1970-01-01T00:00:00.000Z".to_string(),
            }]
        );
    }
}
