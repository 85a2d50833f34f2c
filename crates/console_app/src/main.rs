use std::path::PathBuf;

use clap::Parser;
use console_app::config::DEFAULT_CONFIG_FILE;
use console_app::{AppConfig, ConfigOrigin, LogTarget};
use console_logging::console_info;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "admin-console")]
#[command(about = "Terminal admin console for the marketplace backend")]
struct Args {
    /// RON config file; defaults apply when it does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log destination, overriding the config file
    #[arg(long, value_enum)]
    log: Option<LogTarget>,

    /// Backend base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (mut config, origin) = AppConfig::load(&args.config)?;
    if let Some(log) = args.log {
        config.log = log;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    console_logging::initialize(config.log.into(), level);
    match origin {
        ConfigOrigin::File => console_info!("Loaded config from {:?}", args.config),
        ConfigOrigin::Defaults => console_info!("No config at {:?}; using defaults", args.config),
    }

    console_app::run(config)
}
