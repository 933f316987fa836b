pub mod connection;

pub use connection::InMemoryConnectionRegistry;
