//! Domain events relayed between buyers and farmers.
//!
//! The relay understands the three trade events structurally (by name and
//! recipient field) and never interprets the rest of the payload.

use serde_json::{Map, Value};

use super::{SessionId, TradeEventError, WalletAddress};

/// The three trade events a client may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeEventKind {
    /// Buyer proposes a purchase to a farmer.
    BuyRequest,
    /// Farmer accepts a proposal, usually with a price.
    AcceptRequest,
    /// A completed on-chain payment, reported to the farmer.
    PaymentSuccess,
}

impl TradeEventKind {
    pub const ALL: [TradeEventKind; 3] = [
        TradeEventKind::BuyRequest,
        TradeEventKind::AcceptRequest,
        TradeEventKind::PaymentSuccess,
    ];

    /// Look up a kind by its inbound event name.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_name() == name)
    }

    /// Name of the event as emitted by the sender.
    pub fn event_name(&self) -> &'static str {
        match self {
            TradeEventKind::BuyRequest => "buy_request",
            TradeEventKind::AcceptRequest => "accept_request",
            TradeEventKind::PaymentSuccess => "payment_success",
        }
    }

    /// Payload field holding the recipient's wallet address.
    pub fn recipient_field(&self) -> &'static str {
        match self {
            TradeEventKind::BuyRequest => "farmer",
            TradeEventKind::AcceptRequest => "buyer",
            TradeEventKind::PaymentSuccess => "farmer",
        }
    }
}

/// A validated trade event: the kind, its recipient, and the untouched payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    kind: TradeEventKind,
    recipient: WalletAddress,
    payload: Map<String, Value>,
}

impl TradeEvent {
    /// Validate a raw payload for the given kind.
    ///
    /// The payload must be an object whose recipient field is a non-empty
    /// string. Every other field is kept as-is.
    pub fn new(kind: TradeEventKind, payload: Value) -> Result<Self, TradeEventError> {
        let Value::Object(payload) = payload else {
            return Err(TradeEventError::PayloadNotObject);
        };

        let field = kind.recipient_field();
        let recipient = match payload.get(field) {
            None | Some(Value::Null) => return Err(TradeEventError::MissingRecipient(field)),
            Some(Value::String(address)) => WalletAddress::new(address.clone())
                .map_err(|_| TradeEventError::InvalidRecipient(field))?,
            Some(_) => return Err(TradeEventError::InvalidRecipient(field)),
        };

        Ok(Self {
            kind,
            recipient,
            payload,
        })
    }

    pub fn kind(&self) -> TradeEventKind {
        self.kind
    }

    pub fn recipient(&self) -> &WalletAddress {
        &self.recipient
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Translate into the event the recipient room receives.
    ///
    /// `buy_request` becomes `new_request`; the other two keep their name.
    pub fn into_server_event(self) -> ServerEvent {
        match self.kind {
            TradeEventKind::BuyRequest => ServerEvent::NewRequest(self.payload),
            TradeEventKind::AcceptRequest => ServerEvent::AcceptRequest(self.payload),
            TradeEventKind::PaymentSuccess => ServerEvent::PaymentSuccess(self.payload),
        }
    }
}

/// Events pushed from the relay to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Sent once to a client right after the handshake.
    Connection { socket_id: SessionId },
    NewRequest(Map<String, Value>),
    AcceptRequest(Map<String, Value>),
    PaymentSuccess(Map<String, Value>),
    /// Sent back to the emitter of a frame the relay rejected.
    Error {
        event: Option<String>,
        message: String,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connection { .. } => "connection",
            ServerEvent::NewRequest(_) => "new_request",
            ServerEvent::AcceptRequest(_) => "accept_request",
            ServerEvent::PaymentSuccess(_) => "payment_success",
            ServerEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_event_name_known_and_unknown() {
        // テスト項目: 既知のイベント名だけが TradeEventKind に解決される
        // then (期待する結果):
        assert_eq!(
            TradeEventKind::from_event_name("buy_request"),
            Some(TradeEventKind::BuyRequest)
        );
        assert_eq!(
            TradeEventKind::from_event_name("accept_request"),
            Some(TradeEventKind::AcceptRequest)
        );
        assert_eq!(
            TradeEventKind::from_event_name("payment_success"),
            Some(TradeEventKind::PaymentSuccess)
        );
        assert_eq!(TradeEventKind::from_event_name("new_request"), None);
        assert_eq!(TradeEventKind::from_event_name("register"), None);
    }

    #[test]
    fn test_buy_request_translates_to_new_request() {
        // テスト項目: buy_request は farmer 宛ての new_request になり、ペイロードはそのまま
        // given (前提条件):
        let payload = json!({"farmer": "0xF", "buyer": "0xB", "tokenId": 7, "amountToken": 10});

        // when (操作):
        let event = TradeEvent::new(TradeEventKind::BuyRequest, payload.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(event.recipient().as_str(), "0xF");
        let server_event = event.into_server_event();
        assert_eq!(server_event.name(), "new_request");
        assert_eq!(
            server_event,
            ServerEvent::NewRequest(payload.as_object().unwrap().clone())
        );
    }

    #[test]
    fn test_accept_request_is_addressed_to_buyer() {
        // テスト項目: accept_request は buyer 宛て
        // given (前提条件):
        let payload = json!({"farmer": "0xAAA", "buyer": "0xBBB", "price": 250});

        // when (操作):
        let event = TradeEvent::new(TradeEventKind::AcceptRequest, payload).unwrap();

        // then (期待する結果):
        assert_eq!(event.recipient().as_str(), "0xBBB");
        assert_eq!(event.into_server_event().name(), "accept_request");
    }

    #[test]
    fn test_payment_success_is_addressed_to_farmer() {
        // テスト項目: payment_success は farmer 宛て
        // given (前提条件):
        let payload = json!({"farmer": "0xAAA", "tokenId": 1});

        // when (操作):
        let event = TradeEvent::new(TradeEventKind::PaymentSuccess, payload).unwrap();

        // then (期待する結果):
        assert_eq!(event.kind(), TradeEventKind::PaymentSuccess);
        assert_eq!(event.recipient().as_str(), "0xAAA");
        assert_eq!(event.payload().get("tokenId"), Some(&json!(1)));
    }

    #[test]
    fn test_missing_recipient_is_rejected() {
        // テスト項目: 宛先フィールドが無い・null の場合はエラー
        // given (前提条件):
        let cases = [json!({"buyer": "0xB"}), json!({"farmer": null})];

        for payload in cases {
            // when (操作):
            let result = TradeEvent::new(TradeEventKind::BuyRequest, payload);

            // then (期待する結果):
            assert_eq!(result, Err(TradeEventError::MissingRecipient("farmer")));
        }
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        // テスト項目: 宛先が文字列でない・空文字列の場合はエラー
        // given (前提条件):
        let cases = [json!({"buyer": 42}), json!({"buyer": ""})];

        for payload in cases {
            // when (操作):
            let result = TradeEvent::new(TradeEventKind::AcceptRequest, payload);

            // then (期待する結果):
            assert_eq!(result, Err(TradeEventError::InvalidRecipient("buyer")));
        }
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        // テスト項目: オブジェクト以外のペイロードはエラー
        // when (操作):
        let result = TradeEvent::new(TradeEventKind::PaymentSuccess, json!("0xAAA"));

        // then (期待する結果):
        assert_eq!(result, Err(TradeEventError::PayloadNotObject));
    }
}
