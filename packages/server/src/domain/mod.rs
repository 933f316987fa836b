//! Domain layer: value objects, entities, events and the ports the use cases
//! depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod registry;
pub mod value_object;

pub use entity::{Connection, Room, RoomMember};
pub use error::{MessagePushError, RegistryError, TradeEventError, ValueObjectError};
pub use event::{ServerEvent, TradeEvent, TradeEventKind};
pub use pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use value_object::{SessionId, SessionIdFactory, Timestamp, WalletAddress};

#[cfg(test)]
pub use pusher::MockMessagePusher;
