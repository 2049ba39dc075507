use std::time::Duration;

use tracing::{error, info};

use fileshare::web::{AppState, WebServer};
use fileshare::{Config, FileRegistry, FileService, FileStorage, SessionManager};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = fileshare::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        fileshare::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("FileShare stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> fileshare::Result<()> {
    config.validate()?;

    info!("FileShare starting");

    let registry = FileRegistry::open(&config.registry).await?;
    let storage = FileStorage::open(&config.files.storage_path).await?;
    info!("File storage at {}", config.files.storage_path);

    let files = FileService::new(registry, storage)
        .with_max_file_size(config.files.max_upload_bytes());
    let sessions = SessionManager::new(Duration::from_secs(config.session.ttl_secs));
    let state = AppState::new(files, sessions, config.web.public_url.clone());

    let server = WebServer::new(&config.web, state)?;
    info!("Share links use {}", config.web.public_url);

    server.run().await?;
    Ok(())
}
