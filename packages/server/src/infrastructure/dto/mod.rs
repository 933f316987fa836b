//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs
//! - `conversion`: wire <-> domain conversion

pub mod conversion;
pub mod http;
pub mod websocket;
