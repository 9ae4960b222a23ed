use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::{CacheBackendType, EvictionPolicy};
use super::constants::{
    ENV_CACHE_BACKEND, ENV_CACHE_EVICTION_POLICY, ENV_CACHE_MAX_ENTRIES, ENV_CACHE_REDIS_URL,
    ENV_CONFIG, ENV_HOST, ENV_PORT, ENV_POSTGRES_MAX_CONNECTIONS, ENV_POSTGRES_URL,
};

#[derive(Parser)]
#[command(name = "userbase")]
#[command(version, about = "User management service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    // Database options
    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Maximum PostgreSQL pool size
    #[arg(long, global = true, env = ENV_POSTGRES_MAX_CONNECTIONS)]
    pub postgres_max_connections: Option<u32>,

    // Cache options
    /// Cache backend (memory or redis)
    #[arg(long, global = true, env = ENV_CACHE_BACKEND, value_parser = parse_cache_backend_type)]
    pub cache_backend: Option<CacheBackendType>,

    /// Maximum number of cache entries
    #[arg(long, global = true, env = ENV_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: Option<u64>,

    /// Cache eviction policy (tinylfu or lru)
    #[arg(long, global = true, env = ENV_CACHE_EVICTION_POLICY, value_parser = parse_eviction_policy)]
    pub cache_eviction_policy: Option<EvictionPolicy>,

    /// Redis-compatible cache URL, e.g. redis://host:port/db
    #[arg(long, global = true, env = ENV_CACHE_REDIS_URL)]
    pub cache_redis_url: Option<String>,
}

/// Parse cache backend type from CLI/env string
fn parse_cache_backend_type(s: &str) -> Result<CacheBackendType, String> {
    match s.to_lowercase().as_str() {
        "memory" => Ok(CacheBackendType::Memory),
        "redis" => Ok(CacheBackendType::Redis),
        _ => Err(format!(
            "Invalid cache backend '{}'. Valid options: memory, redis",
            s
        )),
    }
}

/// Parse eviction policy from CLI/env string
fn parse_eviction_policy(s: &str) -> Result<EvictionPolicy, String> {
    match s.to_lowercase().as_str() {
        "tinylfu" => Ok(EvictionPolicy::TinyLfu),
        "lru" => Ok(EvictionPolicy::Lru),
        _ => Err(format!(
            "Invalid eviction policy '{}'. Valid options: tinylfu, lru",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Database maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum SystemCommands {
    /// Apply the embedded schema, then an optional extra schema file
    Init {
        /// SQL file executed after the embedded schema
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Truncate the users table and restart its id sequence. Requires confirmation.
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub postgres_max_connections: Option<u32>,
    pub cache_backend: Option<CacheBackendType>,
    pub cache_max_entries: Option<u64>,
    pub cache_eviction_policy: Option<EvictionPolicy>,
    pub cache_redis_url: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            postgres_url: cli.postgres_url,
            postgres_max_connections: cli.postgres_max_connections,
            cache_backend: cli.cache_backend,
            cache_max_entries: cli.cache_max_entries,
            cache_eviction_policy: cli.cache_eviction_policy,
            cache_redis_url: cli.cache_redis_url,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["userbase"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["userbase", "start", "--port", "9000", "--cache-backend", "REDIS"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::Start));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.cache_backend, Some(CacheBackendType::Redis));
    }

    #[test]
    fn test_system_init_with_schema() {
        let cli = Cli::try_parse_from(["userbase", "system", "init", "--schema", "schema.sql"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::System {
                command: SystemCommands::Init {
                    schema: Some(PathBuf::from("schema.sql"))
                }
            })
        );
    }

    #[test]
    fn test_system_reset_yes() {
        let cli = Cli::try_parse_from(["userbase", "system", "reset", "-y"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::System {
                command: SystemCommands::Reset { yes: true }
            })
        );
    }

    #[test]
    fn test_invalid_eviction_policy() {
        assert!(Cli::try_parse_from(["userbase", "--cache-eviction-policy", "fifo"]).is_err());
        assert_eq!(parse_eviction_policy("LRU"), Ok(EvictionPolicy::Lru));
        assert!(parse_cache_backend_type("disk").is_err());
    }
}
