//! InMemory ConnectionRegistry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! 接続テーブルとルーム索引の 2 つの HashMap を 1 つの Mutex で保護します。
//! 両者は常に同じロック区間で更新されるため、不整合は観測されません。

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use agrirelay_shared::time::Clock;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionRegistry, RegistryError, Room, RoomMember, SessionId, Timestamp,
    WalletAddress,
};

#[derive(Default)]
struct RegistryState {
    /// session_id -> 接続
    connections: HashMap<SessionId, Connection>,
    /// address -> 所属している session_id（空集合は保持しない）
    rooms: HashMap<WalletAddress, BTreeSet<SessionId>>,
}

impl RegistryState {
    fn snapshot_room(&self, address: &WalletAddress, members: &BTreeSet<SessionId>) -> Room {
        Room {
            address: address.clone(),
            members: members
                .iter()
                .filter_map(|id| {
                    self.connections.get(id).map(|connection| RoomMember {
                        session_id: id.clone(),
                        connected_at: connection.connected_at,
                    })
                })
                .collect(),
        }
    }
}

/// インメモリ ConnectionRegistry 実装
pub struct InMemoryConnectionRegistry {
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    ///
    /// `clock` は接続時刻の記録に使われます。
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            clock,
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add_connection(&self, session_id: SessionId) -> Connection {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection = Connection::new(session_id.clone(), connected_at);

        let mut state = self.state.lock().await;
        state.connections.insert(session_id, connection.clone());
        connection
    }

    async fn join_room(
        &self,
        session_id: &SessionId,
        address: WalletAddress,
    ) -> Result<bool, RegistryError> {
        let mut state = self.state.lock().await;

        let connection = state
            .connections
            .get_mut(session_id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(session_id.to_string()))?;
        if !connection.join(address.clone()) {
            return Ok(false);
        }

        state
            .rooms
            .entry(address)
            .or_default()
            .insert(session_id.clone());
        Ok(true)
    }

    async fn remove_connection(&self, session_id: &SessionId) -> Option<Connection> {
        let mut state = self.state.lock().await;

        let connection = state.connections.remove(session_id)?;
        for address in &connection.rooms {
            if let Some(members) = state.rooms.get_mut(address) {
                members.remove(session_id);
                if members.is_empty() {
                    state.rooms.remove(address);
                    tracing::debug!("Room '{}' is now empty and was dropped", address);
                }
            }
        }
        Some(connection)
    }

    async fn members_of(&self, address: &WalletAddress) -> Vec<SessionId> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(address)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn rooms(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        let mut rooms: Vec<Room> = state
            .rooms
            .iter()
            .map(|(address, members)| state.snapshot_room(address, members))
            .collect();

        // Sort by address for consistent ordering
        rooms.sort_by(|a, b| a.address.cmp(&b.address));
        rooms
    }

    async fn room(&self, address: &WalletAddress) -> Option<Room> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(address)
            .map(|members| state.snapshot_room(address, members))
    }

    async fn count_connections(&self) -> usize {
        let state = self.state.lock().await;
        state.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrirelay_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続の追加・削除とルーム参加
    // - ルームが所属から導出され、空になったら消えること
    // - 削除・参加の冪等性
    //
    // 【どのようなシナリオをテストするか】
    // 1. 同じアドレスに複数接続が参加できる（複数タブ）
    // 2. 切断で全ルームから抜ける
    // 3. 未登録接続の削除・参加
    // ========================================

    fn create_test_registry() -> InMemoryConnectionRegistry {
        InMemoryConnectionRegistry::new(Arc::new(FixedClock::new(1_000)))
    }

    fn session(id: &str) -> SessionId {
        SessionId::new(id.to_string()).unwrap()
    }

    fn address(value: &str) -> WalletAddress {
        WalletAddress::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_add_connection_records_connected_at() {
        // テスト項目: 接続追加時に Clock の時刻が記録され、ルームには所属しない
        // given (前提条件):
        let registry = create_test_registry();

        // when (操作):
        let connection = registry.add_connection(session("s1")).await;

        // then (期待する結果):
        assert_eq!(connection.connected_at, Timestamp::new(1_000));
        assert!(connection.rooms.is_empty());
        assert_eq!(registry.count_connections().await, 1);
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_room_multiple_connections_same_address() {
        // テスト項目: 同じアドレスに複数の接続が参加できる
        // given (前提条件):
        let registry = create_test_registry();
        registry.add_connection(session("tab1")).await;
        registry.add_connection(session("tab2")).await;

        // when (操作):
        registry.join_room(&session("tab1"), address("0xAAA")).await.unwrap();
        registry.join_room(&session("tab2"), address("0xAAA")).await.unwrap();

        // then (期待する結果):
        let members = registry.members_of(&address("0xAAA")).await;
        assert_eq!(members, vec![session("tab1"), session("tab2")]);
    }

    #[tokio::test]
    async fn test_join_room_is_idempotent() {
        // テスト項目: 同じルームへの二重参加は追加の効果を持たない
        // given (前提条件):
        let registry = create_test_registry();
        registry.add_connection(session("s1")).await;

        // when (操作):
        let first = registry.join_room(&session("s1"), address("0xAAA")).await;
        let second = registry.join_room(&session("s1"), address("0xAAA")).await;

        // then (期待する結果):
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert_eq!(registry.members_of(&address("0xAAA")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_join_room_unknown_connection() {
        // テスト項目: 未登録の接続はルームに参加できない
        // given (前提条件):
        let registry = create_test_registry();

        // when (操作):
        let result = registry.join_room(&session("ghost"), address("0xAAA")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RegistryError::ConnectionNotFound("ghost".to_string()))
        );
        assert!(registry.room(&address("0xAAA")).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_connection_leaves_every_room() {
        // テスト項目: 切断すると参加していた全ルームから抜け、空のルームは消える
        // given (前提条件):
        let registry = create_test_registry();
        registry.add_connection(session("s1")).await;
        registry.add_connection(session("s2")).await;
        registry.join_room(&session("s1"), address("0xAAA")).await.unwrap();
        registry.join_room(&session("s1"), address("0xBBB")).await.unwrap();
        registry.join_room(&session("s2"), address("0xBBB")).await.unwrap();

        // when (操作):
        let removed = registry.remove_connection(&session("s1")).await;

        // then (期待する結果):
        let removed = removed.unwrap();
        assert_eq!(removed.rooms.len(), 2);
        assert!(registry.room(&address("0xAAA")).await.is_none());
        assert_eq!(
            registry.members_of(&address("0xBBB")).await,
            vec![session("s2")]
        );
        assert_eq!(registry.count_connections().await, 1);
    }

    #[tokio::test]
    async fn test_remove_connection_is_idempotent() {
        // テスト項目: 同じ接続を二度削除してもエラーにならない
        // given (前提条件):
        let registry = create_test_registry();
        registry.add_connection(session("s1")).await;
        registry.join_room(&session("s1"), address("0xAAA")).await.unwrap();

        // when (操作):
        let first = registry.remove_connection(&session("s1")).await;
        let second = registry.remove_connection(&session("s1")).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.members_of(&address("0xAAA")).await.is_empty());
    }

    #[tokio::test]
    async fn test_rooms_sorted_with_members() {
        // テスト項目: ルーム一覧はアドレス順で、メンバーの接続時刻を含む
        // given (前提条件):
        let registry = create_test_registry();
        registry.add_connection(session("s1")).await;
        registry.add_connection(session("s2")).await;
        registry.join_room(&session("s1"), address("0xCCC")).await.unwrap();
        registry.join_room(&session("s2"), address("0xAAA")).await.unwrap();

        // when (操作):
        let rooms = registry.rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].address, address("0xAAA"));
        assert_eq!(rooms[1].address, address("0xCCC"));
        assert_eq!(
            rooms[0].members,
            vec![RoomMember {
                session_id: session("s2"),
                connected_at: Timestamp::new(1_000),
            }]
        );
    }
}
