use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use gitk_graph::git::{log_format, FileLog, LogSource, StdinLog};
use gitk_graph::{GraphConfig, HistoryController, HistoryView};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding `git log` output; stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Field delimiter of the log, overriding the config
    #[arg(short, long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the `git log --pretty` argument matching the delimiter and exit
    #[arg(long)]
    print_format: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One line per commit with an ASCII lane marker
    Text,
    /// The full history view as pretty JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GraphConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GraphConfig::load(),
    };
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }

    if args.print_format {
        println!("{}", log_format(config.delimiter));
        return Ok(());
    }

    let controller = HistoryController::new(&config).context("invalid configuration")?;
    let source: Box<dyn LogSource> = match &args.input {
        Some(path) => Box::new(FileLog::new(path)),
        None => Box::new(StdinLog),
    };
    debug!("Reading history from {}", source.describe());

    let view = controller
        .refresh(source.as_ref())
        .await
        .context("failed to build commit graph")?;

    if view.partial_history {
        warn!("History is truncated: some parents are outside the loaded range");
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view.as_ref())?),
        OutputFormat::Text => print_text(&view),
    }
    Ok(())
}

fn print_text(view: &HistoryView) {
    let width = view.layout.lane_count.max(1) * 2;
    for (position, commit) in view.rows() {
        let mut marker = vec![' '; width];
        let slot = ((position.column * 2.0).round() as usize).min(width - 1);
        marker[slot] = '*';
        let marker: String = marker.into_iter().collect();

        let refs: Vec<&str> = commit.refs.iter().map(|r| r.name.as_str()).collect();
        let decoration = if refs.is_empty() {
            String::new()
        } else {
            format!(" ({})", refs.join(", "))
        };

        println!(
            "{} {} {} {} {}{}",
            marker, commit.short_hash, commit.date, commit.author, commit.subject, decoration
        );
    }
}
