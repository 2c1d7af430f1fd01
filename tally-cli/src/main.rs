use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_core::{CategoryDirectory, ExpenseRecord};
use tally_ingest::read_messages_csv;
use tally_parse::{parse_message, parse_record};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod output;
mod state;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Parse free-text expense messages")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one message, e.g. `tally parse "12.50 @deli #lunch"`
    Parse {
        message: String,

        /// Category directory CSV (overrides config)
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Print the record as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Owner id for the record (default: from config)
        #[arg(long)]
        user_id: Option<i64>,
    },

    /// Parse every message in a CSV (or stdin with `-`) and emit JSON lines
    Batch {
        /// Message CSV with a `message` column, or `-` for one message per stdin line
        #[arg(long)]
        csv: PathBuf,

        /// Category directory CSV (overrides config)
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Owner id for rows without one (default: from config)
        #[arg(long)]
        user_id: Option<i64>,
    },

    /// List the category directory
    Categories {
        /// Category directory CSV (overrides config)
        #[arg(long)]
        directory: Option<PathBuf>,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Parse {
            message,
            directory,
            json,
            user_id,
        } => {
            let cfg = config::load_config()?;
            let dir = cfg.directory(directory.as_deref())?;
            let parsed = parse_message(&message, &dir);

            if json {
                let record =
                    ExpenseRecord::from_parsed(user_id.unwrap_or(cfg.user_id), &message, &parsed);
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", output::render_parsed(&parsed, cfg.tz()?));
            }
        }

        Command::Batch {
            csv,
            directory,
            user_id,
        } => {
            let cfg = config::load_config()?;
            let dir = cfg.directory(directory.as_deref())?;
            let user_id = user_id.unwrap_or(cfg.user_id);

            let count = if csv.as_os_str() == "-" {
                batch_stdin(&dir, user_id).await?
            } else {
                batch_csv(&csv, &dir, user_id)?
            };
            info!("parsed {} messages", count);
        }

        Command::Categories { directory } => {
            let cfg = config::load_config()?;
            let dir = cfg.directory(directory.as_deref())?;
            if dir.is_empty() {
                bail!("category directory is empty");
            }
            print!("{}", output::render_directory(&dir));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn batch_csv(path: &Path, dir: &CategoryDirectory, default_user: i64) -> Result<usize> {
    if !path.exists() {
        bail!("CSV not found: {}", path.display());
    }
    let rows = read_messages_csv(path).with_context(|| format!("parsing {}", path.display()))?;

    for row in &rows {
        let record = parse_record(row.user_id.unwrap_or(default_user), &row.message, dir);
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(rows.len())
}

async fn batch_stdin(dir: &CategoryDirectory, user_id: i64) -> Result<usize> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut count = 0usize;

    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(user_id, &line, dir);
        println!("{}", serde_json::to_string(&record)?);
        count += 1;
    }
    Ok(count)
}
