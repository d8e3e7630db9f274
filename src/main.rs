mod config;
mod display;
mod event;
mod export;
mod parser;
mod slots;
mod web;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::load_config;
use display::{print_slot_report, write_report_to_file};
use export::export_slots_to_csv;
use parser::load_slots;
use slots::{validate_with, SlotBoard, TimePolicy};

#[derive(Parser)]
#[command(version, about = "Slot configuration checker and form service")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a slot file (CSV or JSON) and print the warnings
    Check {
        file: PathBuf,
        /// Reject times that are not a real HH:MM clock time
        #[arg(long)]
        strict: bool,
        /// Also write the report to this text file
        #[arg(long)]
        report: Option<String>,
    },
    /// Re-export a slot file as CSV
    Export { input: PathBuf, output: PathBuf },
    /// Serve the slot configuration form
    Web {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let config = load_config()?;

    match args.cmd {
        Command::Check { file, strict, report } => {
            let policy = if strict { TimePolicy::Strict } else { config.time_policy };
            let slots = load_slots(&file)?;
            tracing::info!(count = slots.len(), path = %file.display(), "loaded slots");

            let result = validate_with(&slots, policy)?;
            let title = file.display().to_string();
            print_slot_report(&title, &slots, &result);

            if let Some(out) = report {
                write_report_to_file(&title, &slots, &result, &out)?;
                println!("Report saved to: {}", out);
            }

            if !result.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Export { input, output } => {
            let slots = load_slots(&input)?;
            export_slots_to_csv(&slots, &output)?;
            println!("Exported {} slots to {}", slots.len(), output.display());
        }
        Command::Web { port } => {
            let port = port.unwrap_or(config.port);
            let board = SlotBoard::new(config.resize_policy, config.time_policy);

            println!("Starting web server on port {}...", port);
            println!("Access the form at http://localhost:{}", port);

            web::start_server(config.bind_address, port, board).await?;
        }
    }

    Ok(())
}
