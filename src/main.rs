use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use revo_sport_api::app::{build_router, AppState};
use revo_sport_api::auth::{generate_token, Role};
use revo_sport_api::config::config;
use revo_sport_api::database::DatabaseManager;
use revo_sport_api::storage::OneDriveClient;

#[derive(Parser)]
#[command(name = "revo-sport-api", version, about = "Revo Sport rehabilitation API server")]
struct Cli {
    /// Listen port (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Bind address (overrides API_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Apply pending migrations before serving, regardless of the preset
    #[arg(long)]
    migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a signed bearer token for local testing
    Token {
        /// user e-mail
        #[arg(long)]
        sub: String,

        #[arg(long, value_parser = parse_role, default_value = "therapist")]
        role: Role,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    match s {
        "owner" => Ok(Role::Owner),
        "therapist" => Ok(Role::Therapist),
        other => Err(format!("unknown role '{other}' (owner | therapist)")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, GRAPH_*
    let _ = dotenvy::dotenv();

    let config = config();
    let default_filter = if config.api.enable_request_logging {
        "revo_sport_api=info,tower_http=info"
    } else {
        "revo_sport_api=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let cli = Cli::parse();

    if let Some(Command::Token { sub, role }) = cli.command {
        let ttl = chrono::Duration::minutes(config.security.jwt_expiry_minutes);
        let token = generate_token(&config.security.jwt_secret, &sub, role, ttl)?;
        println!("{token}");
        return Ok(());
    }

    tracing::info!("Starting Revo Sport API in {:?} mode", config.environment);

    let db = DatabaseManager::from_env(config)?;
    if cli.migrate || config.database.run_migrations {
        db.run_migrations().await.context("running migrations")?;
        tracing::info!("Migrations applied");
    }

    let onedrive = OneDriveClient::from_config(&config.storage)?;
    if onedrive.is_none() {
        tracing::warn!("[MEDIA] Graph credentials missing, file store disabled");
    }

    let app = build_router(AppState::new(db.clone(), config.clone(), onedrive));

    let bind = cli.bind.unwrap_or_else(|| config.api.bind.clone());
    let port = cli.port.unwrap_or(config.api.port);
    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Revo Sport API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
