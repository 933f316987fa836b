//! Real-time trade-request relay.
//!
//! Clients register under a wallet address and the server routes
//! `buy_request`, `accept_request` and `payment_success` events to the
//! room of the counterparty named in the payload.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
