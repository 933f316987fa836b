//! UseCase layer: one struct per operation the relay exposes.

mod connect_client;
mod disconnect_client;
mod error;
mod get_rooms;
mod register_address;
mod relay_event;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, GetRoomDetailError, RegisterError, RelayError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use register_address::RegisterAddressUseCase;
pub use relay_event::RelayEventUseCase;
