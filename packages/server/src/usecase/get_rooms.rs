//! UseCase: ルーム一覧・詳細の取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Room, WalletAddress};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// メンバーのいる全ルーム（アドレス順）
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, address: String) -> Result<Room, GetRoomDetailError> {
        let address = WalletAddress::new(address).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.registry
            .room(&address)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
