//! Optimize command implementation

use super::position_provider;
use crate::cli::OptimizeArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{OptimizeOutput, StopRow};
use anyhow::Result;
use fieldroute_core::config::LayeredConfig;
use fieldroute_core::models::{PriorityTier, Site};
use fieldroute_core::ports::SystemClock;
use fieldroute_geo::{
    eligible_sites, format_distance, optimize_route, route_bounds, total_route_distance,
    RouteSession,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub async fn execute(args: OptimizeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let sites = load_sites(&args.sites)?;
    let min_priority: PriorityTier = args.min_priority.into();

    let candidates = match args.service {
        Some(service) => eligible_sites(&sites, service.into(), min_priority),
        None => sites.iter().filter(|s| s.priority.at_least(min_priority)).cloned().collect(),
    };
    let skipped_completed = candidates.iter().filter(|s| s.completed_today).count();

    let provider = position_provider(&args.position, config, Arc::new(SystemClock))?;
    if let Err(err) = provider.get_position().await {
        tracing::debug!(error = %err, "Location request failed before optimizing");
    }
    let position = provider.last_position();

    let stops = optimize_route(position.as_ref(), &candidates).map_err(|e| errors::from_domain(&e))?;
    let start = position.map(|p| p.coordinate);

    let total = total_route_distance(&stops, start);
    let bounds = route_bounds(&stops);

    let mut session = RouteSession::new();
    session.activate(stops);
    let progress = session.progress();

    if output.is_json() {
        output.result(OptimizeOutput {
            start,
            skipped_completed,
            stops: session.stops().to_vec(),
            progress,
            total_distance_meters: total,
            bounds,
        })?;
        return Ok(());
    }

    output.section("Optimized Route");
    output.table(session.stops().iter().map(StopRow::from).collect())?;

    output.section("Summary");
    output.kv("Stops", progress.total);
    output.kv("Total Distance", format_distance(total));
    if skipped_completed > 0 {
        output.kv("Already Serviced Today", skipped_completed);
    }
    if let Some(bounds) = bounds {
        output.kv(
            "Bounds",
            format!(
                "{:.5},{:.5} to {:.5},{:.5}",
                bounds.south_west.latitude,
                bounds.south_west.longitude,
                bounds.north_east.latitude,
                bounds.north_east.longitude
            ),
        );
    }
    if let Some(next) = session.next_stop() {
        output.success(format!("Next stop: {}", next.site.name));
    } else {
        output.info("Nothing left to service");
    }

    Ok(())
}

/// Load sites from a JSON array
fn load_sites(path: &Path) -> Result<Vec<Site>> {
    if !path.exists() {
        return Err(errors::sites_file_not_found(path).into());
    }

    let content = fs::read_to_string(path)?;
    let sites: Vec<Site> = serde_json::from_str(&content)
        .map_err(|e| errors::invalid_sites_file(path, &e.to_string()))?;

    tracing::debug!(count = sites.len(), path = %path.display(), "Loaded sites");
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_sites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sites.json");
        fs::write(
            &path,
            r#"[
                {"id": "lot-1", "name": "Lot 1", "priority": "high",
                 "coordinate": {"latitude": 44.97, "longitude": -93.26}},
                {"id": "walk-2", "name": "Walk 2", "serviceCapability": "shovel", "completedToday": true}
            ]"#,
        )
        .unwrap();

        let sites = load_sites(&path).unwrap();

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].priority, PriorityTier::High);
        assert!(sites[0].coordinate.is_some());
        assert!(sites[1].completed_today);
        assert!(sites[1].coordinate.is_none());
    }

    #[test]
    fn test_load_sites_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let err = load_sites(&missing).unwrap_err();
        assert_eq!(err.downcast::<errors::CliError>().unwrap().message, "Sites file not found");

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        let err = load_sites(&broken).unwrap_err();
        assert_eq!(err.downcast::<errors::CliError>().unwrap().message, "Invalid sites file");
    }
}
