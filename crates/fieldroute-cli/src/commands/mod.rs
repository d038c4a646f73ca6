//! Command implementations

mod check_in;
mod check_out;
mod config;
mod optimize;
mod status;

use crate::cli::{Cli, Commands, PositionArgs};
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use fieldroute_core::config::LayeredConfig;
use fieldroute_core::models::{Coordinate, Position};
use fieldroute_core::ports::{Clock, KeyValueStore, SystemClock};
use fieldroute_store::{FileKeyValueStore, StaticLocationSource};
use fieldroute_tracking::GeolocationProvider;
use std::path::Path;
use std::sync::Arc;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Optimize(args) => optimize::execute(args, &config, &output).await,
        Commands::CheckIn(args) => check_in::execute(args, &config, &output).await,
        Commands::CheckOut(args) => check_out::execute(args, &config, &output).await,
        Commands::Status(args) => status::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Resolve configuration: defaults, then the config file, then environment,
/// then command-line flags
fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if cli.config.exists() {
        config = config
            .load_from_file(&cli.config)
            .map_err(|e| errors::from_domain(&e))?;
    } else {
        tracing::debug!(path = %cli.config.display(), "No config file, using defaults");
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli.config_overrides());
    Ok(config)
}

/// Open the file store under the configured data directory
fn open_store(config: &LayeredConfig) -> Result<Arc<dyn KeyValueStore>> {
    let dir: &Path = &config.data_dir.value;
    let store = FileKeyValueStore::open(dir)
        .map_err(|e| errors::data_dir_unavailable(dir, &e.to_string()))?;
    Ok(Arc::new(store))
}

/// Provider fed by the position given on the command line. Without one the
/// source reports the location as unavailable.
fn position_provider(
    args: &PositionArgs,
    config: &LayeredConfig,
    clock: Arc<dyn Clock>,
) -> Result<GeolocationProvider> {
    let source = match args.coordinate() {
        Some((lat, lon)) => {
            let coordinate = Coordinate::new(lat, lon);
            if !coordinate.is_valid() {
                return Err(errors::invalid_coordinate(lat, lon).into());
            }
            StaticLocationSource::fixed(Position::new(coordinate, args.accuracy, clock.now_epoch_ms()))
        }
        None => StaticLocationSource::failing(fieldroute_core::GeolocationError::Unavailable {
            reason: "no position supplied".to_string(),
        }),
    };

    Ok(GeolocationProvider::new(Arc::new(source), clock).with_options(config.geolocation_options()))
}

/// Position used to stamp a visit. Absent when none was supplied; a visit is
/// still recorded without one.
async fn visit_position(args: &PositionArgs, config: &LayeredConfig) -> Result<Option<Position>> {
    if args.coordinate().is_none() {
        return Ok(None);
    }

    let provider = position_provider(args, config, Arc::new(SystemClock))?;
    match provider.get_position().await {
        Ok(position) => Ok(Some(position)),
        Err(err) => Err(errors::location_failed(&err).into()),
    }
}
