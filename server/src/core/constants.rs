// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Userbase";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "userbase";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".userbase";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "userbase.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "USERBASE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "USERBASE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "USERBASE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "USERBASE_LOG";

/// Environment variable for log output format (`compact` or `json`)
pub const ENV_LOG_FORMAT: &str = "USERBASE_LOG_FORMAT";

/// Log filter used when neither USERBASE_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "userbase=info,userbase_server=info,tower_http=warn";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "USERBASE_POSTGRES_URL";

/// Environment variable for PostgreSQL max pool size
pub const ENV_POSTGRES_MAX_CONNECTIONS: &str = "USERBASE_POSTGRES_MAX_CONNECTIONS";

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between background `SELECT 1` health checks
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Cache
// =============================================================================

/// Environment variable for cache backend
pub const ENV_CACHE_BACKEND: &str = "USERBASE_CACHE_BACKEND";

/// Environment variable for cache max entries
pub const ENV_CACHE_MAX_ENTRIES: &str = "USERBASE_CACHE_MAX_ENTRIES";

/// Environment variable for cache eviction policy
pub const ENV_CACHE_EVICTION_POLICY: &str = "USERBASE_CACHE_EVICTION_POLICY";

/// Environment variable for Redis-compatible cache URL
pub const ENV_CACHE_REDIS_URL: &str = "USERBASE_CACHE_REDIS_URL";

/// Default cache max entries
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 100_000;

/// Default Redis URL (works with Redis, Valkey, Dragonfly)
pub const DEFAULT_CACHE_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Redis pool size
pub const REDIS_POOL_MAX_SIZE: usize = 32;

/// Redis connect/wait/recycle timeout in seconds
pub const REDIS_TIMEOUT_SECS: u64 = 5;

/// Cache key version (bump on schema changes to invalidate all cached data)
pub const CACHE_KEY_VERSION: &str = "v1";

/// Cache TTL for a user row (5 min)
pub const CACHE_TTL_USER: u64 = 300;
