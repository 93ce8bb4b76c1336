mod api;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lodestone_core::{
    load_config, validate_config, Allocator, Director, HttpAllocator, HttpPlayerNotifier,
    HttpTicketBackend, NoopNotifier, NotificationGateway, PlayerNotifier, TicketAssigner,
    TicketSource,
};

use api::create_router;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("LODESTONE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        version = VERSION,
        profiles = config.profiles.len(),
        "Configuration loaded successfully"
    );

    // Create ticket backend client (pool queries and assignments)
    let backend = Arc::new(
        HttpTicketBackend::new(
            config.backend.url.as_str(),
            Duration::from_secs(config.backend.timeout_secs),
        )
        .context("Failed to create ticket backend client")?,
    );
    info!("Ticket backend: {}", config.backend.url);

    // Create allocator client
    let allocator: Arc<dyn Allocator> = Arc::new(
        HttpAllocator::new(
            config.allocator.url.as_str(),
            Duration::from_secs(config.allocator.timeout_secs),
        )
        .context("Failed to create allocator client")?,
    );
    info!("Allocator: {}", config.allocator.url);

    // Create player notifier if configured
    let gateway = match &config.notifier {
        Some(notifier_config) => {
            info!("Player notifier: {}", notifier_config.url);
            let notifier: Arc<dyn PlayerNotifier> = Arc::new(
                HttpPlayerNotifier::new(
                    notifier_config.url.as_str(),
                    Duration::from_secs(notifier_config.timeout_secs),
                )
                .context("Failed to create notifier client")?,
            );
            NotificationGateway::with_max_in_flight(notifier, notifier_config.max_in_flight)
        }
        None => {
            info!("No notifier configured, player notifications are dropped");
            NotificationGateway::new(Arc::new(NoopNotifier))
        }
    };

    // Create the director
    let director = Arc::new(Director::new(
        config.director.clone(),
        config.profiles.clone(),
        Arc::clone(&backend) as Arc<dyn TicketSource>,
        backend as Arc<dyn TicketAssigner>,
        allocator,
        gateway,
    ));

    // Spawn the decision loop
    let runner = {
        let director = Arc::clone(&director);
        tokio::spawn(async move { director.run().await })
    };
    info!("Director loop started");

    // Create router
    let app = create_router(Arc::clone(&director));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting status server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the decision loop after the current cycle
    info!("Shutting down...");
    director.shutdown();
    let _ = runner.await;
    info!("Director stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
