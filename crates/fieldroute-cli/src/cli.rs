use clap::{Args, Parser, Subcommand};
use fieldroute_core::config::CliConfigOverrides;
use fieldroute_core::models::{CheckInPolicy, PriorityTier, ServiceType, WorkCategory};
use std::path::PathBuf;

/// Fieldroute - Route planning and check-ins for snow removal crews
#[derive(Parser, Debug)]
#[command(name = "fieldroute")]
#[command(about = "Route planning and check-ins for snow removal crews", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML); skipped when it does not exist
    #[arg(long, global = true, default_value = "fieldroute.toml")]
    pub config: PathBuf,

    /// Directory holding persisted check-in state
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// What to do when checking in while already checked in
    #[arg(long, global = true)]
    pub policy: Option<PolicyArg>,

    /// Location request timeout in milliseconds
    #[arg(long, global = true)]
    pub location_timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            check_in_policy: self.policy.map(Into::into),
            data_dir: self.data_dir.clone(),
            location_timeout_ms: self.location_timeout_ms,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a visiting order for a list of sites
    Optimize(OptimizeArgs),

    /// Start a visit at a site
    CheckIn(CheckInArgs),

    /// Finish the open visit
    CheckOut(CheckOutArgs),

    /// Show a worker's check-in state
    Status(StatusArgs),

    /// Show resolved configuration and where each value came from
    Config,
}

/// Device position supplied by the operator
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    /// Current latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Current longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Reported accuracy of the position in meters
    #[arg(long, default_value = "10")]
    pub accuracy: f64,
}

impl PositionArgs {
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// JSON file containing an array of sites
    #[arg(long)]
    pub sites: PathBuf,

    #[command(flatten)]
    pub position: PositionArgs,

    /// Only route sites that accept this service
    #[arg(long)]
    pub service: Option<ServiceArg>,

    /// Skip sites less urgent than this tier
    #[arg(long, default_value = "low")]
    pub min_priority: PriorityArg,
}

#[derive(Parser, Debug)]
pub struct CheckInArgs {
    /// Worker identifier
    #[arg(long)]
    pub worker: String,

    /// Crew the visit is logged under
    #[arg(long)]
    pub crew: CrewArg,

    /// Site identifier
    #[arg(long)]
    pub site_id: String,

    /// Site display name (defaults to the identifier)
    #[arg(long)]
    pub site_name: Option<String>,

    /// Service performed (defaults to the crew's usual service)
    #[arg(long)]
    pub service: Option<ServiceArg>,

    #[command(flatten)]
    pub position: PositionArgs,
}

#[derive(Parser, Debug)]
pub struct CheckOutArgs {
    /// Worker identifier
    #[arg(long)]
    pub worker: String,

    /// Crew the visit is logged under
    #[arg(long)]
    pub crew: CrewArg,

    #[command(flatten)]
    pub position: PositionArgs,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Worker identifier
    #[arg(long)]
    pub worker: String,

    /// Show only this crew
    #[arg(long)]
    pub crew: Option<CrewArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CrewArg {
    Plow,
    Shovel,
}

impl From<CrewArg> for WorkCategory {
    fn from(arg: CrewArg) -> Self {
        match arg {
            CrewArg::Plow => WorkCategory::PlowCrew,
            CrewArg::Shovel => WorkCategory::ShovelCrew,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ServiceArg {
    Plowing,
    Shoveling,
    Salting,
}

impl From<ServiceArg> for ServiceType {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Plowing => ServiceType::Plowing,
            ServiceArg::Shoveling => ServiceType::Shoveling,
            ServiceArg::Salting => ServiceType::Salting,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PriorityArg {
    High,
    Normal,
    Low,
}

impl From<PriorityArg> for PriorityTier {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => PriorityTier::High,
            PriorityArg::Normal => PriorityTier::Normal,
            PriorityArg::Low => PriorityTier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PolicyArg {
    /// Refuse a second check-in until the first is closed
    Reject,
    /// Discard the open visit and start the new one
    Replace,
}

impl From<PolicyArg> for CheckInPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => CheckInPolicy::Reject,
            PolicyArg::Replace => CheckInPolicy::Replace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optimize_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "fieldroute", "optimize", "--sites", "sites.json", "--lat", "44.97", "--lon", "-93.26",
            "--service", "plowing",
        ])
        .unwrap();

        let Commands::Optimize(args) = cli.command else { panic!("expected optimize") };
        assert_eq!(args.position.coordinate(), Some((44.97, -93.26)));
        assert!(matches!(args.service, Some(ServiceArg::Plowing)));
        assert!(matches!(args.min_priority, PriorityArg::Low));
    }

    #[test]
    fn test_lat_requires_lon() {
        let result = Cli::try_parse_from([
            "fieldroute", "check-out", "--worker", "w-1", "--crew", "plow", "--lat", "44.9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "fieldroute", "--policy", "replace", "--data-dir", "/tmp/fr", "status", "--worker", "w-1",
        ])
        .unwrap();

        let overrides = cli.config_overrides();
        assert_eq!(overrides.check_in_policy, Some(CheckInPolicy::Replace));
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/tmp/fr")));
        assert!(overrides.high_accuracy.is_none());
    }
}
