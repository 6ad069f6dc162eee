use clap::Parser;
use log::error;
use resident_votes::commands::{self, Cli};
use resident_votes::config::Config;

#[tokio::main]
async fn main() {
    // Load .env and initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = commands::run(cli, config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
