mod app;
mod config;
mod logging;
mod render;

use clap::Parser;

use config::{AppConfig, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;
    logging::initialize(config.log_destination, config.verbose);
    app::run(config)
}
