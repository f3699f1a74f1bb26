#[macro_use]
extern crate tracing;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use directories::ProjectDirs;
use endlesswm::cli::{Cli, Sub};
use endlesswm::layout::Options;
use endlesswm_config::Config;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "endlesswm=debug,endlesswm_config=debug,info";

fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "endlesswm")?;
    Some(dirs.config_dir().join("config.kdl"))
}

/// Loads the config at `path`, or the default location. A missing default config is not an
/// error; the built-in defaults are used instead.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let explicit = path.is_some();
    let Some(path) = path.or_else(default_config_path) else {
        warn!("error getting the config directory, using the default config");
        return Ok(Config::default());
    };

    if !explicit && !path.exists() {
        info!("{path:?} does not exist, using the default config");
        return Ok(Config::default());
    }

    Config::load(&path).map_err(|err| anyhow!("{err:?}"))
}

fn main() -> anyhow::Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    if let Some(Sub::Validate { config }) = cli.subcommand {
        load_config(config.or(cli.config)).context("config is invalid")?;
        info!("config is valid");
        return Ok(());
    }

    let _client = tracy_client::Client::start();

    info!("starting version {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config)?;
    let options = Options::from_config(&config);
    info!(
        "grid: horizontal={} minimize-empty-space={} floating-dialogs={} spacing={}",
        options.horizontal,
        options.minimize_empty_space,
        options.floating_dialogs,
        options.window_spacing,
    );
    debug!("{} binds configured", config.binds.0.len());

    bail!("no compositor backend is built in; embed endlesswm::state::State in one")
}
