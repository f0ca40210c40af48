//! `faultrep` - CLI for faultline
//!
//! This binary provides the command-line interface for submitting defect
//! reports and browsing the report history.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use faultline::cli::{Cli, Command, ConfigCommand, HistoryCommand, OutputFormat, ReportCommand};
use faultline::defect::Defect;
use faultline::device::{DeviceCamera, DeviceLocation, FileCamera};
use faultline::workflow::{HistoryOutcome, LocationOutcome, PhotoOutcome, SubmitOutcome};
use faultline::{init_logging, Config, HttpApi, Workflow};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Report(report_cmd) => handle_report(&config, report_cmd).await,
        Command::History(history_cmd) => handle_history(&config, &history_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_report(
    config: &Config,
    cmd: ReportCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpApi::new(&config.api.base_url, config.api_timeout())?;
    let policy = cmd.consent_policy();

    let camera = match &cmd.photo {
        Some(path) => FileCamera::new(path),
        None => FileCamera::unattached(),
    };
    let location = match config.fixed_position() {
        Some(position) => DeviceLocation::fixed(position.latitude, position.longitude, policy),
        None => DeviceLocation::geoip(
            &config.location.geoip_url,
            config.location_timeout(),
            policy,
        )?,
    };

    let workflow = Workflow::new(Arc::new(api))
        .with_location_provider(Arc::new(location))
        .with_camera_provider(Arc::new(DeviceCamera::new(camera, policy)));

    workflow.set_title(&cmd.title);
    workflow.set_description(&cmd.description);
    if let Some(location) = &cmd.location {
        workflow.set_location(location);
    }
    if let Some(lab) = cmd.lab.or_else(|| config.report.default_lab.clone()) {
        workflow.set_lab(lab);
    }

    if cmd.gps {
        match workflow.request_location().await {
            LocationOutcome::Updated(position) => println!("Location set to {position}."),
            LocationOutcome::Denied => {
                println!("Location permission denied; the location field was left alone.");
            }
            LocationOutcome::Failed(reason) => {
                println!("Could not read the device position: {reason}");
            }
        }
    }

    if cmd.photo.is_some() {
        match workflow.capture_photo().await {
            PhotoOutcome::Attached => println!("Photo attached."),
            PhotoOutcome::Cancelled => println!("Photo capture cancelled."),
            PhotoOutcome::Denied => println!("Camera permission denied; no photo attached."),
            PhotoOutcome::Failed(reason) => println!("Photo capture failed: {reason}"),
        }
    }

    match workflow.submit().await {
        SubmitOutcome::Saved(defect) => {
            match &defect.id {
                Some(id) => println!("Defect saved (id {id})."),
                None => println!("Defect saved."),
            }
            Ok(())
        }
        SubmitOutcome::MissingFields(fields) => {
            let names: Vec<_> = fields.iter().map(ToString::to_string).collect();
            eprintln!("Missing required fields: {}.", names.join(", "));
            std::process::exit(1);
        }
        SubmitOutcome::Rejected(reason) => {
            eprintln!("Submission failed: {reason}");
            std::process::exit(1);
        }
        SubmitOutcome::AlreadySubmitting => {
            eprintln!("Another submission is already in flight.");
            std::process::exit(1);
        }
    }
}

async fn handle_history(
    config: &Config,
    cmd: &HistoryCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpApi::new(&config.api.base_url, config.api_timeout())?;
    let workflow = Workflow::new(Arc::new(api));

    if workflow.load_history().await == HistoryOutcome::Unavailable {
        println!("History is unavailable right now; the backend could not be reached.");
        return Ok(());
    }

    let history = workflow.history();
    if history.is_empty() {
        println!("No defects reported yet.");
        return Ok(());
    }

    let shown: Vec<_> = history.iter().take(cmd.limit).cloned().collect();
    match cmd.format {
        OutputFormat::Plain => print_history_plain(&shown),
        OutputFormat::Table => print_history_table(&shown),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
    }

    if history.len() > shown.len() {
        println!();
        println!("Showing {} of {} records.", shown.len(), history.len());
    }
    Ok(())
}

fn print_history_table(defects: &[Defect]) {
    println!("{:<30} {:<16} {:<24} CREATED", "TITLE", "LAB", "LOCATION");
    for defect in defects {
        let created = defect
            .created_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:<30} {:<16} {:<24} {}",
            truncated(&defect.title, 29),
            truncated(&defect.lab, 15),
            truncated(&defect.location, 23),
            created
        );
    }
}

fn print_history_plain(defects: &[Defect]) {
    for defect in defects {
        println!("{} [{}]", defect.title, defect.lab);
        println!("  location: {}", defect.location);
        if !defect.description.is_empty() {
            println!("  {}", defect.description);
        }
        if let Some(position) = defect.position() {
            println!("  coordinates: {position}");
        }
        if let Some(photo) = &defect.photo {
            println!("  photo: attached ({} bytes encoded)", photo.encoded_len());
        }
        if let Some(created) = defect.created_at {
            println!("  reported: {}", created.format("%Y-%m-%d %H:%M"));
        }
        println!();
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

async fn handle_status(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    use faultline::DefectApi;

    let api = HttpApi::new(&config.api.base_url, config.api_timeout())?;
    let probe = api.list_defects().await;

    if json {
        let status = serde_json::json!({
            "endpoint": api.base_url(),
            "timeout_secs": config.api.timeout_secs,
            "reachable": probe.is_ok(),
            "records": probe.as_ref().ok().map(Vec::len),
            "error": probe.as_ref().err().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("faultrep status");
        println!("---------------");
        println!("Endpoint:  {}", api.base_url());
        println!("Timeout:   {}s", config.api.timeout_secs);
        match probe {
            Ok(defects) => println!("Backend:   reachable ({} records)", defects.len()),
            Err(error) => println!("Backend:   unreachable ({error})"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[api]");
                println!("  Base URL:        {}", config.api.base_url);
                println!("  Timeout (s):     {}", config.api.timeout_secs);
                println!();
                println!("[location]");
                println!("  GeoIP URL:       {}", config.location.geoip_url);
                println!("  Timeout (s):     {}", config.location.timeout_secs);
                match config.fixed_position() {
                    Some(position) => println!("  Fixed position:  {position}"),
                    None => println!("  Fixed position:  (not set)"),
                }
                println!();
                println!("[report]");
                println!(
                    "  Default lab:     {}",
                    config.report.default_lab.as_deref().unwrap_or("(not set)")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
