//! Database initialization, schema and seed data

pub mod init;
pub mod seed;

pub use init::*;
pub use seed::*;
