//! UseCase: ウォレットアドレスの登録（ルーム参加）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, SessionId, WalletAddress};

use super::error::RegisterError;

/// 接続を自分のウォレットアドレスのルームに参加させるユースケース
///
/// 同じアドレスに複数の接続（複数タブなど）が参加でき、全員が中継対象になる。
pub struct RegisterAddressUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl RegisterAddressUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// # Returns
    ///
    /// * `Ok(true)` - 新たに参加した
    /// * `Ok(false)` - 既に参加済み（何もしない）
    /// * `Err(RegisterError)` - 接続が既に切断されている
    pub async fn execute(
        &self,
        session_id: &SessionId,
        address: WalletAddress,
    ) -> Result<bool, RegisterError> {
        let joined = self.registry.join_room(session_id, address.clone()).await?;
        if joined {
            tracing::info!("Session '{}' joined room '{}'", session_id, address);
        } else {
            tracing::debug!("Session '{}' already in room '{}'", session_id, address);
        }
        Ok(joined)
    }
}
