/// Cadence Server - catalog API with scheduled release activation
use cadence_core::{CatalogStore, ReleaseSweeper, SystemClock};
use cadence_server::{api, config::ServerConfig, jobs::ReleaseScheduler, state::AppState};
use cadence_storage::LocalCatalog;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence catalog server with scheduled releases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the release scheduler
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Run one release sweep and exit
    Sweep {
        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Fix drifted album track counts and exit
    Reconcile {
        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_server=info,cadence_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(load_config(config.as_ref())?).await?;
        }
        Commands::Sweep { config } => {
            sweep(load_config(config.as_ref())?).await?;
        }
        Commands::Reconcile { config } => {
            reconcile(load_config(config.as_ref())?).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::load_from(path)?,
        None => ServerConfig::load()?,
    };
    config.validate()?;
    Ok(config)
}

async fn open_catalog(config: &ServerConfig) -> anyhow::Result<Arc<LocalCatalog>> {
    let pool = cadence_storage::create_pool(&config.storage.database_url).await?;
    cadence_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    Ok(Arc::new(LocalCatalog::new(pool, Arc::new(SystemClock))))
}

fn build_scheduler(config: &ServerConfig, catalog: Arc<LocalCatalog>) -> Arc<ReleaseScheduler> {
    Arc::new(ReleaseScheduler::new(
        catalog,
        config.release.sweep_interval(),
        config.release.sweep_timeout(),
    ))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let catalog = open_catalog(&config).await?;

    if config.release.reconcile_on_startup {
        let corrected = catalog.reconcile_track_counts().await?;
        tracing::info!(corrected, "Album track counts reconciled");
    }

    let scheduler = build_scheduler(&config, Arc::clone(&catalog));

    // Catch up on releases that passed while the server was down
    if config.release.sweep_on_startup {
        scheduler.run_once().await;
    }

    let scheduler_handle = Arc::clone(&scheduler).start();

    let app_state = AppState::new(catalog, scheduler);
    let app = api::router(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler_handle.stop().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
}

async fn sweep(config: ServerConfig) -> anyhow::Result<()> {
    let catalog = open_catalog(&config).await?;

    let report = tokio::time::timeout(config.release.sweep_timeout(), catalog.run_release_sweep())
        .await
        .map_err(|_| anyhow::anyhow!("Release sweep timed out"))??;

    println!("Release sweep at {}:", report.swept_at.to_rfc3339());
    println!("  albums activated:            {}", report.albums_activated);
    println!(
        "  standalone tracks activated: {}",
        report.standalone_tracks_activated
    );
    println!(
        "  attached tracks synced:      {}",
        report.attached_tracks_synced
    );

    Ok(())
}

async fn reconcile(config: ServerConfig) -> anyhow::Result<()> {
    let catalog = open_catalog(&config).await?;

    let corrected = catalog.reconcile_track_counts().await?;
    println!("Albums corrected: {corrected}");

    Ok(())
}
