//! WebSocket relay server: routes, handlers and shared state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
pub use signal::shutdown_signal;
pub use state::AppState;
