//! Shared application state handed to every axum handler.

use std::sync::Arc;

use crate::{
    domain::{ConnectionRegistry, MessagePusher},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        RegisterAddressUseCase, RelayEventUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: ConnectClientUseCase,
    pub register_address_usecase: RegisterAddressUseCase,
    pub relay_event_usecase: RelayEventUseCase,
    pub disconnect_client_usecase: DisconnectClientUseCase,
    pub get_rooms_usecase: GetRoomsUseCase,
    pub get_room_detail_usecase: GetRoomDetailUseCase,
}

impl AppState {
    /// Build every use case over one registry and one pusher.
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connect_client_usecase: ConnectClientUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            ),
            register_address_usecase: RegisterAddressUseCase::new(registry.clone()),
            relay_event_usecase: RelayEventUseCase::new(registry.clone(), message_pusher.clone()),
            disconnect_client_usecase: DisconnectClientUseCase::new(
                registry.clone(),
                message_pusher,
            ),
            get_rooms_usecase: GetRoomsUseCase::new(registry.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(registry),
        }
    }
}
