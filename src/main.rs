use ballotbleach::commands::{self, Cli};
use ballotbleach::config::AppConfig;
use clap::Parser;
use log::{error, info};
use std::process;

#[tokio::main]
async fn main() {
    // .env has to be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    cli.apply_to(&mut config);

    let command = cli.selected_command();
    info!("Running {} against {}", command, config.data_file.display());

    if let Err(why) = commands::handle_command(&config, command).await {
        error!("Command {} failed: {}", command, why);
        process::exit(1);
    }
}
