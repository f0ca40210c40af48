//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::device::ConsentPolicy;

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Short summary of the defect
    #[arg(short, long)]
    pub title: String,

    /// Longer free-form description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Where the equipment is (or use --gps to fill this from the device)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Reporting laboratory (falls back to the configured default)
    #[arg(long)]
    pub lab: Option<String>,

    /// Attach this image file as the photo
    #[arg(short, long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Fill the location field from the device position
    #[arg(short, long)]
    pub gps: bool,

    /// Grant every permission request without prompting
    #[arg(long, conflicts_with = "assume_no")]
    pub assume_yes: bool,

    /// Deny every permission request without prompting
    #[arg(long)]
    pub assume_no: bool,
}

impl ReportCommand {
    /// The consent policy the permission flags select.
    #[must_use]
    pub fn consent_policy(&self) -> ConsentPolicy {
        if self.assume_yes {
            ConsentPolicy::AlwaysGrant
        } else if self.assume_no {
            ConsentPolicy::AlwaysDeny
        } else {
            ConsentPolicy::Prompt
        }
    }
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Maximum number of records to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(assume_yes: bool, assume_no: bool) -> ReportCommand {
        ReportCommand {
            title: "Broken pump".to_string(),
            description: String::new(),
            location: None,
            lab: None,
            photo: None,
            gps: false,
            assume_yes,
            assume_no,
        }
    }

    #[test]
    fn test_consent_policy_defaults_to_prompt() {
        assert_eq!(report(false, false).consent_policy(), ConsentPolicy::Prompt);
    }

    #[test]
    fn test_consent_policy_assume_yes() {
        assert_eq!(
            report(true, false).consent_policy(),
            ConsentPolicy::AlwaysGrant
        );
    }

    #[test]
    fn test_consent_policy_assume_no() {
        assert_eq!(
            report(false, true).consent_policy(),
            ConsentPolicy::AlwaysDeny
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_report_command_debug() {
        let cmd = report(false, false);
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("title"));
        assert!(debug_str.contains("Broken pump"));
    }

    #[test]
    fn test_history_command_debug() {
        let cmd = HistoryCommand {
            limit: 20,
            format: OutputFormat::Table,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("limit"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_output_format_debug() {
        let format = OutputFormat::Json;
        let debug_str = format!("{format:?}");
        assert_eq!(debug_str, "Json");
    }

    #[test]
    fn test_output_format_clone() {
        let format = OutputFormat::Table;
        let cloned = format;
        assert_eq!(format, cloned);
    }
}
