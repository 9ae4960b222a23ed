//! Core application

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, DEFAULT_LOG_FILTER, ENV_LOG, ENV_LOG_FORMAT};
use crate::core::shutdown::ShutdownService;
use crate::data::{CacheService, PostgresService};
use crate::domain::UserService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<PostgresService>,
    pub cache: Arc<CacheService>,
    pub users: UserService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::System {
                command: system_cmd,
            }) => Self::handle_system_command(&cli_config, system_cmd).await,
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let (database, cache) = tokio::try_join!(
            async {
                PostgresService::init(&config.postgres)
                    .await
                    .context("Failed to initialize PostgreSQL")
            },
            async {
                CacheService::new(&config.cache)
                    .await
                    .context("Failed to initialize cache service")
            },
        )?;

        let database = Arc::new(database);
        cache
            .health_check()
            .await
            .context("Cache health check failed")?;
        let cache = Arc::new(cache);
        tracing::debug!(backend = cache.backend_name(), "Cache initialized");

        let users = UserService::new(database.pool().clone(), cache.clone());
        let shutdown = ShutdownService::new().with_database(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
            cache,
            users,
        })
    }

    async fn handle_system_command(cli: &CliConfig, cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Init { schema } => Self::init_schema(cli, schema.as_deref()).await,
            SystemCommands::Reset { yes } => Self::reset_data(cli, yes).await,
        }
    }

    /// Connecting applies the embedded migrations; an extra file runs after them
    async fn init_schema(cli: &CliConfig, schema: Option<&Path>) -> Result<()> {
        let app = Self::init(cli).await?;

        if let Some(path) = schema {
            app.database
                .init_schema_file(path)
                .await
                .with_context(|| format!("Failed to apply schema file: {}", path.display()))?;
            println!("Applied: {}", path.display());
        }

        let users_table = app
            .database
            .table_exists("users")
            .await
            .context("Failed to inspect schema")?;
        app.database.close().await;

        if !users_table {
            anyhow::bail!("Migrations ran but the users table is missing");
        }
        println!("Schema is up to date.");
        Ok(())
    }

    async fn reset_data(cli: &CliConfig, skip_confirm: bool) -> Result<()> {
        println!("This will permanently delete every user and restart the ID sequence.");

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        let app = Self::init(cli).await?;
        app.database
            .reset()
            .await
            .context("Failed to truncate users table")?;
        let flushed = app.cache.flush().await.context("Failed to flush cache")?;
        app.database.close().await;

        println!("Reset complete ({} cache entries dropped).", flushed);
        Ok(())
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        let json = std::env::var(ENV_LOG_FORMAT)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if json {
            tracing_subscriber::fmt()
                .json()
                .with_current_span(false)
                .with_env_filter(filter)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_ansi(true)
                .compact()
                .with_env_filter(filter)
                .init();
        }
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            host = %app.config.server.host,
            port = app.config.server.port,
            cache = app.cache.backend_name(),
            "{} started",
            APP_NAME
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_health_check_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
