//! Check-in command implementation

use super::{open_store, visit_position};
use crate::cli::CheckInArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::CheckInOutput;
use anyhow::Result;
use fieldroute_core::config::LayeredConfig;
use fieldroute_core::models::{SiteId, WorkCategory};
use fieldroute_core::ports::{Clock, SystemClock};
use fieldroute_core::FieldrouteError;
use fieldroute_tracking::{format_elapsed_ms, CheckInMachine};
use std::sync::Arc;

pub async fn execute(args: CheckInArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let category: WorkCategory = args.crew.into();
    let position = visit_position(&args.position, config).await?;
    let clock = Arc::new(SystemClock);

    let mut machine = CheckInMachine::load(&args.worker, category, open_store(config)?, clock.clone())
        .with_policy(config.check_in_policy.value);

    let service = args.service.map(Into::into).unwrap_or_else(|| category.default_service());
    let site_name = args.site_name.unwrap_or_else(|| args.site_id.clone());

    let replaced = match machine.check_in(SiteId::new(args.site_id), site_name, service, position.as_ref()) {
        Ok(replaced) => replaced,
        Err(FieldrouteError::AlreadyCheckedIn { site_id, site_name }) => {
            return Err(errors::already_checked_in(&site_id, &site_name, category.slug()).into());
        }
        Err(e) => return Err(e.into()),
    };

    let Some(visit) = machine.state().active().cloned() else {
        anyhow::bail!("Check-in did not open a visit");
    };

    if output.is_json() {
        output.result(CheckInOutput {
            worker: args.worker,
            crew: category.to_string(),
            visit,
            replaced,
        })?;
        return Ok(());
    }

    if let Some(previous) = replaced {
        let lost = (clock.now() - previous.checked_in_at).num_milliseconds().max(0) as u64;
        output.warning(format!(
            "Replaced open check-in at {} ({} unlogged)",
            previous.site_name,
            format_elapsed_ms(lost)
        ));
    }

    output.success(format!("Checked in at {}", visit.site_name));
    output.kv("Crew", category);
    output.kv("Service", format!("{:?}", service).to_lowercase());
    output.kv("Since", visit.checked_in_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(coordinate) = visit.check_in_coordinate {
        output.kv("Position", format!("{:.5}, {:.5}", coordinate.latitude, coordinate.longitude));
    }

    Ok(())
}
