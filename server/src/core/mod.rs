//! Core application infrastructure

pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;

pub use crate::app::CoreApp;
pub use cli::{CliConfig, Commands, SystemCommands};
pub use config::{AppConfig, CacheConfig, PostgresConfig, ServerConfig};
pub use shutdown::ShutdownService;
