//! Status command implementation

use super::open_store;
use crate::cli::StatusArgs;
use crate::output::OutputWriter;
use crate::output_types::{CrewStatus, StatusOutput};
use anyhow::Result;
use fieldroute_core::config::LayeredConfig;
use fieldroute_core::models::WorkCategory;
use fieldroute_core::ports::SystemClock;
use fieldroute_tracking::{CheckInMachine, WorkerCheckIns};
use std::sync::Arc;

pub fn execute(args: StatusArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let crews = WorkerCheckIns::load(
        &args.worker,
        open_store(config)?,
        Arc::new(SystemClock),
        config.check_in_policy.value,
    );

    let categories: Vec<WorkCategory> = match args.crew {
        Some(crew) => vec![crew.into()],
        None => WorkCategory::ALL.to_vec(),
    };
    let statuses: Vec<CrewStatus> =
        categories.into_iter().map(|category| crew_status(crews.get(category))).collect();

    if output.is_json() {
        output.result(StatusOutput { worker: args.worker, crews: statuses })?;
        return Ok(());
    }

    output.section(format!("Worker {}", args.worker));
    for status in statuses {
        output.section(format!("{} crew", status.crew));
        match (status.site_name, status.checked_in_at) {
            (Some(site_name), Some(since)) => {
                output.kv("Status", "Checked in");
                output.kv("Site", site_name);
                output.kv("Since", since.format("%Y-%m-%d %H:%M:%S UTC"));
                output.kv("Elapsed", status.elapsed);
            }
            _ => output.kv("Status", "Not checked in"),
        }
    }

    Ok(())
}

fn crew_status(machine: &CheckInMachine) -> CrewStatus {
    let state = machine.state();
    CrewStatus {
        crew: machine.category().to_string(),
        checked_in: state.is_checked_in(),
        site_id: state.site_id().map(|id| id.to_string()),
        site_name: state.site_name().map(str::to_string),
        service_type: state.service_type(),
        checked_in_at: state.check_in_time(),
        elapsed_ms: machine.elapsed_millis(),
        elapsed: machine.format_elapsed(),
    }
}
