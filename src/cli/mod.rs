use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::store::{datafile, MemoryStore};

pub mod contacts;
pub mod display;
pub mod stats;
pub mod tasks;

pub use contacts::{run_contacts, run_log, run_show};
pub use stats::run_stats;
pub use tasks::{run_done, run_reschedule, run_today};

#[derive(Parser)]
#[command(name = "followup")]
#[command(about = "Personal CRM: who to contact and what is due")]
#[command(version)]
pub struct Cli {
    /// Data file to load (overrides config and FOLLOWUP_DATA)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,
    /// Evaluate as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<String>,
    /// Log filter, e.g. "info" or "followup=debug"
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List contacts with search, filter and sort
    Contacts(ContactsArgs),
    /// Show a contact with its history and tasks
    Show(ShowArgs),
    /// Overdue, VIP focus, routine and upcoming tasks
    Today,
    /// Toggle a task between pending and completed
    Done(DoneArgs),
    /// Move a task to another day
    Reschedule(RescheduleArgs),
    /// Record an interaction with a contact
    Log(LogArgs),
    /// Summary statistics
    Stats,
}

#[derive(Args)]
pub struct ContactsArgs {
    /// Text to match against name, company, title, phone, tags and notes
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// all, s, a, b, c, overdue or favorite
    #[arg(short, long, default_value = "all")]
    pub filter: String,
    /// name, recent or level
    #[arg(short, long, default_value = "level")]
    pub sort: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Contact name or UUID
    pub identifier: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task UUID or its first characters
    pub task: String,
}

#[derive(Args)]
pub struct RescheduleArgs {
    /// Task UUID or its first characters
    pub task: String,
    /// today, tomorrow, +Nd, +Nw or YYYY-MM-DD
    pub date: String,
    /// Due time (HH:MM)
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Contact name or UUID
    pub identifier: String,
    /// call, meeting, chat, visit, gift or other
    pub kind: String,
    pub content: String,
    /// Interaction date, defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Promises made during the interaction
    #[arg(long)]
    pub promises: Option<String>,
    /// Suggested next step
    #[arg(long)]
    pub next: Option<String>,
}

/// The evaluation instant, captured once per run and passed down.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl Clock {
    pub fn resolve(today: Option<&str>) -> Result<Self> {
        let now = Utc::now();
        let today = match today {
            Some(s) => datafile::parse_day(s)?,
            None => Local::now().date_naive(),
        };
        Ok(Self { today, now })
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    let clock = Clock::resolve(cli.today.as_deref())?;
    let mut store = open_store(cli.data, &config, &clock)?;

    match cli.command {
        Commands::Contacts(args) => run_contacts(&store, &args, &clock),
        Commands::Show(args) => run_show(&store, &args.identifier, &clock),
        Commands::Today => run_today(&store, &clock),
        Commands::Done(args) => run_done(&mut store, &args.task, &clock),
        Commands::Reschedule(args) => run_reschedule(&mut store, &args, &clock),
        Commands::Log(args) => run_log(&mut store, &args, &clock),
        Commands::Stats => run_stats(&store, &clock),
    }
}

fn open_store(data: Option<PathBuf>, config: &Config, clock: &Clock) -> Result<MemoryStore> {
    let path = match data {
        Some(path) => path,
        None => config.data_path()?,
    };
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no data file, starting empty");
        return Ok(MemoryStore::new());
    }
    datafile::load(&path, config.default_frequency_days, clock.now)
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
            .context("initialising logging")
    })
    .map(|_| ())
}
