//! RAI CLI: responsible-AI assessments, lifecycle gates and compliance
//! reports from the terminal.

mod commands;

use clap::Parser;
use rai_compliance::{ReportFormat, ReportType};
use rai_core::model::{LifecyclePhase, Principle};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// RAI: Responsible-AI assessment toolkit
#[derive(Parser, Debug)]
#[command(name = "rai", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (config lookup and relative paths)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run an RAI assessment on an AI system
    Assess {
        /// Path to system profile JSON/YAML file
        #[arg(short, long)]
        system_profile: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "rai_assessment.json")]
        output: PathBuf,

        /// Output format: json, markdown or html
        #[arg(short, long, default_value = "json")]
        format: ReportFormat,

        /// Principles to evaluate (repeatable; all when omitted)
        #[arg(short, long = "principle")]
        principles: Vec<Principle>,
    },
    /// Generate an Algorithmic Impact Assessment
    Aia {
        /// Path to system profile JSON/YAML file
        #[arg(short, long)]
        system_profile: PathBuf,

        /// Output file path; the extension picks the format
        #[arg(short, long, default_value = "aia_report.json")]
        output: PathBuf,

        /// Risk assessment JSON to include in section 4
        #[arg(long)]
        risk_assessment: Option<PathBuf>,
    },
    /// Check lifecycle checkpoints and optionally move to another phase
    Lifecycle {
        /// Path to system profile JSON/YAML file
        #[arg(short, long)]
        system_profile: PathBuf,

        /// Phase to check instead of the profile's current phase
        #[arg(short, long)]
        phase: Option<LifecyclePhase>,

        /// Evidence JSON file
        #[arg(short, long)]
        evidence: Option<PathBuf>,

        /// Record a transition to this phase after verification
        #[arg(long, requires = "authorized_by")]
        transition_to: Option<LifecyclePhase>,

        /// Who authorized the transition
        #[arg(long)]
        authorized_by: Option<String>,
    },
    /// Check regulatory compliance
    Compliance {
        /// Regulation: gdpr, eu_ai_act, lgpd or all
        #[arg(short, long)]
        regulation: String,

        /// Path to system profile JSON/YAML file
        #[arg(short, long)]
        system_profile: PathBuf,

        /// Evidence JSON file
        #[arg(short, long)]
        evidence: Option<PathBuf>,

        /// Also write a Markdown compliance report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report generation
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Write a system profile template
    Init {
        /// Output file path
        #[arg(short, long, default_value = "system_profile.json")]
        output: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ReportAction {
    /// Render a report from a saved assessment (AIA report JSON)
    Generate {
        /// Path to assessment results JSON
        #[arg(short, long)]
        assessment: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "report.md")]
        output: PathBuf,

        /// Output format: markdown, html or json
        #[arg(short, long, default_value = "markdown")]
        format: ReportFormat,

        /// Report type: aia, audit, summary or compliance
        #[arg(short = 't', long = "type", default_value = "summary")]
        report_type: ReportType,

        /// Evidence JSON file (compliance reports only)
        #[arg(short, long)]
        evidence: Option<PathBuf>,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show the current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "rai", "rai")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "rai.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace).await
}
