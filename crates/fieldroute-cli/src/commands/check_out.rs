//! Check-out command implementation

use super::{open_store, visit_position};
use crate::cli::CheckOutArgs;
use crate::output::OutputWriter;
use crate::output_types::CheckOutOutput;
use anyhow::Result;
use fieldroute_core::config::LayeredConfig;
use fieldroute_core::models::WorkCategory;
use fieldroute_core::ports::SystemClock;
use fieldroute_tracking::{format_elapsed_ms, CheckInMachine};
use std::sync::Arc;

pub async fn execute(args: CheckOutArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let category: WorkCategory = args.crew.into();
    let position = visit_position(&args.position, config).await?;

    let mut machine =
        CheckInMachine::load(&args.worker, category, open_store(config)?, Arc::new(SystemClock));
    let visit = machine.check_out(position.as_ref());

    if output.is_json() {
        output.result(CheckOutOutput {
            worker: args.worker,
            crew: category.to_string(),
            visit,
        })?;
        return Ok(());
    }

    match visit {
        Some(visit) => {
            output.success(format!("Checked out of {}", visit.site_name));
            output.kv("Crew", category);
            output.kv("Time On Site", format_elapsed_ms(visit.duration_ms));
            output.kv("Checked In", visit.checked_in_at.format("%Y-%m-%d %H:%M:%S UTC"));
            output.kv("Checked Out", visit.checked_out_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => {
            output.info(format!("The {} crew was not checked in", category));
        }
    }

    Ok(())
}
