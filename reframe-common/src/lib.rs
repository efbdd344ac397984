//! # Reframe Common Library
//!
//! Shared code for the Reframe coaching service:
//! - Domain models (users, sessions, journal entries, nudges)
//! - Database initialization, schema and seed data
//! - Configuration loading
//! - Identity token verification
//! - Date formatting helpers

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod time;

pub use error::{Error, Result};
