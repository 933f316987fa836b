//! Entities held by the connection registry.

use std::collections::BTreeSet;

use super::{SessionId, Timestamp, WalletAddress};

/// One live client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: SessionId,
    /// Rooms this connection explicitly joined
    pub rooms: BTreeSet<WalletAddress>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: SessionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            rooms: BTreeSet::new(),
            connected_at,
        }
    }

    /// Join a room. Returns `false` when already a member.
    pub fn join(&mut self, address: WalletAddress) -> bool {
        self.rooms.insert(address)
    }
}

/// A member entry as seen from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub session_id: SessionId,
    pub connected_at: Timestamp,
}

/// Snapshot of a non-empty room.
///
/// Rooms are not stored on their own: they are derived from connection
/// membership and vanish with their last member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub address: WalletAddress,
    pub members: Vec<RoomMember>,
}
