//! Utilities shared by the Agrirelay binaries: logger setup and time helpers.

pub mod logger;
pub mod time;
