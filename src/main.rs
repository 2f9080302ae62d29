use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cabin::auth::password;
use cabin::config::AppConfig;
use cabin::server::{app, AppState};
use cabin::store::Store;

#[derive(Debug, Parser)]
#[command(name = "cabin", version, about = "Self-hosted headless CMS")]
struct Cli {
    /// Admin username for initial setup (fallback: ADMIN_USER)
    #[arg(short = 'u', long)]
    admin_user: Option<String>,

    /// Admin password for initial setup (fallback: ADMIN_PASSWORD)
    #[arg(short = 'p', long)]
    admin_password: Option<String>,

    /// Directory where the database is stored
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ADMIN_USER, CABIN_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cabin=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let admin_user = cli
        .admin_user
        .or_else(|| std::env::var("ADMIN_USER").ok())
        .context("admin username required: pass --admin-user or set ADMIN_USER")?;
    let admin_password = cli
        .admin_password
        .or_else(|| std::env::var("ADMIN_PASSWORD").ok())
        .context("admin password required: pass --admin-password or set ADMIN_PASSWORD")?;

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;
    let db_path = config.data_dir.join("cabin.db");
    let store = Store::open(&db_path)
        .await
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    ensure_admin_user(&store, &admin_user, &admin_password).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Cabin CMS listening on http://{}", addr);

    let state = AppState::new(config, store);
    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

/// Create the admin account on first start; on later starts, verify the
/// supplied password against the stored hash before serving anything.
async fn ensure_admin_user(store: &Store, username: &str, password_text: &str) -> anyhow::Result<()> {
    match store.find_user(username).await? {
        Some(user) => {
            if !password::verify_password(password_text, &user.password_hash) {
                bail!(
                    "admin user '{}' exists but the supplied password does not match",
                    username
                );
            }
            info!("Admin user '{}' verified", username);
        }
        None => {
            let hash = password::hash_password(password_text)
                .context("failed to hash admin password")?;
            store.insert_user(username, &hash, "admin").await?;
            info!("Admin user '{}' created", username);
        }
    }
    Ok(())
}
