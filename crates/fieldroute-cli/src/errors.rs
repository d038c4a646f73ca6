use console::style;
use fieldroute_core::{FieldrouteError, GeolocationError};
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for an optimize run without a position
pub fn no_position() -> CliError {
    CliError::new("No current position")
        .with_context("Routes are ordered from where the crew is now, and no position is known.")
        .with_suggestion("Pass the truck position: --lat 44.97 --lon -93.26")
        .with_help("Run: fieldroute optimize --help")
}

/// Create error for a position outside WGS 84 bounds
pub fn invalid_coordinate(lat: f64, lon: f64) -> CliError {
    CliError::new("Invalid coordinate")
        .with_context(format!(
            "Latitude must be within ±90 and longitude within ±180.\n\nGot: {}, {}",
            lat, lon
        ))
        .with_suggestion("Check that latitude and longitude are not swapped")
}

/// Create error for a failed location request
pub fn location_failed(error: &GeolocationError) -> CliError {
    match error {
        GeolocationError::PermissionDenied => CliError::new("Location permission denied")
            .with_context("The location service refused to report a position.")
            .with_suggestion("Grant location access to this application")
            .with_suggestion("Or pass the position directly with --lat and --lon"),
        GeolocationError::Timeout { timeout_ms } => CliError::new("Location request timed out")
            .with_context(format!("No position arrived within {}ms.", timeout_ms))
            .with_suggestion("Retry from an open area with a clear view of the sky")
            .with_suggestion("Or raise the limit: --location-timeout-ms 30000"),
        GeolocationError::Unavailable { reason } => CliError::new("Location unavailable")
            .with_context(format!("Error: {}", reason))
            .with_suggestion("Retry in a moment")
            .with_suggestion("Or pass the position directly with --lat and --lon"),
    }
}

/// Create error for a second check-in under the reject policy
pub fn already_checked_in(site_id: &str, site_name: &str, crew: &str) -> CliError {
    CliError::new("Already checked in")
        .with_context(format!(
            "The {} crew is still checked in at {} ({}).",
            crew, site_name, site_id
        ))
        .with_suggestion(format!("Check out first: fieldroute check-out --crew {}", crew))
        .with_suggestion("Or let the new check-in replace the open one: --policy replace")
        .with_help("Run: fieldroute check-in --help")
}

/// Create error for missing sites file
pub fn sites_file_not_found(path: &Path) -> CliError {
    CliError::new("Sites file not found")
        .with_context(format!("The specified sites file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help("Run: fieldroute optimize --help")
}

/// Create error for a sites file that does not parse
pub fn invalid_sites_file(path: &Path, reason: &str) -> CliError {
    CliError::new("Invalid sites file")
        .with_context(format!(
            "Expected a JSON array of sites.\n\nPath: {}\nReason: {}",
            path.display(),
            reason
        ))
        .with_suggestion(r#"Each site needs at least "id" and "name""#)
        .with_suggestion(r#"Coordinates are written as "coordinate": {"latitude": .., "longitude": ..}"#)
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check fieldroute.toml for syntax errors")
        .with_suggestion("Or point at another file: --config path/to/fieldroute.toml")
        .with_help("Run: fieldroute config")
}

/// Create error for a data directory that cannot be used
pub fn data_dir_unavailable(dir: &Path, reason: &str) -> CliError {
    CliError::new("Cannot open data directory")
        .with_context(format!("Path: {}\nReason: {}", dir.display(), reason))
        .with_suggestion("Check directory permissions")
        .with_suggestion("Or choose another location: --data-dir <path> or FIELDROUTE_DATA_DIR")
}

/// Map a domain error onto a user-facing error
pub fn from_domain(error: &FieldrouteError) -> CliError {
    match error {
        FieldrouteError::NoPositionAvailable => no_position(),
        FieldrouteError::Geolocation(err) => location_failed(err),
        FieldrouteError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        FieldrouteError::Storage { key, reason } => CliError::new("Storage failure")
            .with_context(format!("Key: {}\nReason: {}", key, reason))
            .with_suggestion("Check free disk space and directory permissions"),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(domain) = error.downcast_ref::<FieldrouteError>() {
        return from_domain(domain);
    }

    let message = error.to_string();

    // Try to provide context based on error message
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.to_lowercase().contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
