//! ConnectionRegistry trait 定義
//!
//! 接続とルーム所属の管理インターフェース。具体的な実装は Infrastructure 層が
//! 提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Connection, RegistryError, Room, SessionId, WalletAddress};

/// 接続とルーム所属を管理するレジストリ
///
/// ルームは接続の所属から導出されるビューであり、最後のメンバーが抜けた時点で
/// 消滅する。各メソッドは一度のロック取得内で完結し、途中状態は観測されない。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 新しい接続を登録（どのルームにも所属しない状態）
    async fn add_connection(&self, session_id: SessionId) -> Connection;

    /// 接続をルームに参加させる
    ///
    /// 新たに参加した場合は `true`、既に参加済みなら `false`（冪等）。
    async fn join_room(
        &self,
        session_id: &SessionId,
        address: WalletAddress,
    ) -> Result<bool, RegistryError>;

    /// 接続を削除し、全ルームから退出させる（冪等）
    ///
    /// 削除された接続を返す。未登録なら `None`。
    async fn remove_connection(&self, session_id: &SessionId) -> Option<Connection>;

    /// ルームに現在所属している接続の ID を取得
    async fn members_of(&self, address: &WalletAddress) -> Vec<SessionId>;

    /// 空でない全ルームを取得（アドレス順）
    async fn rooms(&self) -> Vec<Room>;

    /// 指定アドレスのルームを取得。メンバーがいなければ `None`。
    async fn room(&self, address: &WalletAddress) -> Option<Room>;

    /// 接続数を取得
    async fn count_connections(&self) -> usize;
}
