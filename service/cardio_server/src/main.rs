use cardio_risk::RiskPredictor;
use cardio_server::{app, AppState, ServerConfig};
use cardio_store::{FileStore, MemoryStore};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("cardio_server: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let predictor = RiskPredictor::from_dir(&config.artifact_dir)
        .with_positive_class(config.positive_class.clone());
    if let Err(e) = predictor.loader().load() {
        log::warn!(
            "starting without model artifacts ({e}); predictions fall back until {} is fixed",
            config.artifact_dir.display()
        );
    }

    let state = match &config.data_dir {
        Some(dir) => AppState::new(predictor, FileStore::open(dir)?),
        None => {
            log::info!("no data directory configured, assessments are kept in memory");
            AppState::new(predictor, MemoryStore::new())
        }
    };

    let router = app(state, &config.allowed_origins());
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("cardio_server listening on http://{}", config.bind);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
    }
    log::info!("shutting down");
}
