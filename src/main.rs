mod ephemeris;
mod feed;
mod geolocation;
mod kinematics;
mod tracker;
mod web;

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use crate::ephemeris::Ephemeris;
use crate::feed::{format_epoch, parse_oem};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "iss-o-mat")]
#[command(about = "ISS trajectory, speed and ground location service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Validate a local OEM XML file
    Validate { file: String },
    /// Fetch the feed once and print where the station is now
    Now {
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Validate { file } => validate(&file),
        Commands::Now { config } => now(config.as_deref()).await,
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match path {
        None => Some(Config::default()),
        Some(path) => match Config::from_file(path) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                None
            }
        },
    }
}

async fn serve(config_path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let tracker = match web::build_tracker(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error creating clients: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config, tracker).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let xml = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ephemeris = match parse_oem(&xml) {
        Ok(doc) => Ephemeris::from(doc),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Feed is valid ({} state vectors)",
        ephemeris.index.len()
    );
    if let Some(name) = &ephemeris.metadata.object_name {
        println!("  object: {}", name);
    }
    if let Some(frame) = &ephemeris.metadata.ref_frame {
        println!("  frame:  {}", frame);
    }
    if let (Ok(first), Ok(last)) = (ephemeris.index.first(), ephemeris.index.last()) {
        println!(
            "  span:   {} .. {}",
            format_epoch(&first.epoch),
            format_epoch(&last.epoch)
        );
    }
    ExitCode::SUCCESS
}

async fn now(config_path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let tracker = match web::build_tracker(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error creating clients: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = tracker.refresh().await {
        eprintln!("Refresh failed: {}", e);
        return ExitCode::FAILURE;
    }

    match tracker.now().await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error encoding report: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Lookup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
