use clap::Parser;
use log::LevelFilter;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Front-end origins allowed when none are configured
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone, Parser)]
#[command(
    name = "cardio_server",
    version,
    about = "Cardio Care assessment and risk prediction API",
    long_about = "cardio_server scores submitted health assessments for cardiovascular risk\n\
        and stores them per user.\n\n\
        The trained model and scaler are read from model.json and scaler.json in the\n\
        artifact directory. If they cannot be loaded the server still starts and\n\
        returns clearly labeled fallback verdicts until they become available.\n\n\
        EXAMPLES:\n\
        \n  cardio_server --artifact-dir ml_model               Serve with in-memory storage\n\
        \n  cardio_server --data-dir /var/lib/cardio -vv        Persist records as JSON files"
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CARDIO_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Directory holding model.json and scaler.json
    #[arg(long, env = "CARDIO_ARTIFACT_DIR", default_value = "ml_model")]
    pub artifact_dir: PathBuf,

    /// Directory for assessment records; kept in memory when omitted
    #[arg(long, env = "CARDIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Class label whose probability is reported as the risk score
    #[arg(long, env = "CARDIO_POSITIVE_CLASS", default_value = cardio_risk::DEFAULT_POSITIVE_CLASS)]
    pub positive_class: String,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "cors-origin", env = "CARDIO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ServerConfig {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        if self.cors_origins.is_empty() {
            DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            self.cors_origins.clone()
        }
    }
}
