mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "planner-ics")]
#[command(about = "Schedule planner text to ICS calendar export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract enrolled courses from pasted planner text into JSON
    Parse {
        /// Text file with the pasted page, `-` for stdin
        input: PathBuf,

        /// Output file path, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Semester start date (YYYY-MM-DD); with --end, wraps the courses in an export envelope
        #[arg(short = 's', long, requires = "end")]
        start: Option<String>,

        /// Semester end date (YYYY-MM-DD), inclusive
        #[arg(short = 'e', long, requires = "start")]
        end: Option<String>,
    },

    /// Generate an ICS calendar from course JSON (array or export envelope)
    Generate {
        /// JSON file, `-` for stdin
        input: PathBuf,

        /// Semester start date (YYYY-MM-DD), overrides the envelope
        #[arg(short = 's', long)]
        start: Option<String>,

        /// Semester end date (YYYY-MM-DD), overrides the envelope
        #[arg(short = 'e', long)]
        end: Option<String>,

        /// Output file path, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail instead of skipping courses with unreadable times
        #[arg(long)]
        strict_times: bool,
    },

    /// Parse planner text and generate the ICS calendar in one step
    Convert {
        /// Text file with the pasted page, `-` for stdin
        input: PathBuf,

        /// Semester start date (YYYY-MM-DD)
        #[arg(short = 's', long)]
        start: String,

        /// Semester end date (YYYY-MM-DD), inclusive
        #[arg(short = 'e', long)]
        end: String,

        /// Output file path, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail instead of skipping courses with unreadable times
        #[arg(long)]
        strict_times: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // log level
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("planner_ics_cli={log_level},planner_ics_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Parse {
            input,
            output,
            start,
            end,
        } => commands::parse_command(commands::ParseParams {
            input,
            output,
            start,
            end,
        }),

        Commands::Generate {
            input,
            start,
            end,
            output,
            strict_times,
        } => commands::generate_command(commands::GenerateParams {
            input,
            start,
            end,
            output,
            strict_times,
        }),

        Commands::Convert {
            input,
            start,
            end,
            output,
            strict_times,
        } => commands::convert_command(commands::ConvertParams {
            input,
            start,
            end,
            output,
            strict_times,
        }),
    }
}
