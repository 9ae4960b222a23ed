//! PostgreSQL repositories

pub mod user;
