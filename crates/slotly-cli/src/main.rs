//! `slotly` CLI - check a store's delivery/pickup availability from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a stored configuration and print its canonical form
//! slotly normalize -c store.json
//!
//! # Is a date available? (exit code 2 when it is not)
//! slotly check -c store.json 2025-06-12 --now 2025-06-10T14:00:00Z
//!
//! # Every available date within the store's horizon
//! slotly expand -c store.json
//!
//! # Month preview, as the admin calendar renders it
//! slotly calendar -c store.json --month 2025-06
//!
//! # Re-check the date picked on an orders/create webhook payload
//! slotly order -c store.json -i order.json
//! ```
//!
//! `--config` and `--now` may also come from `SLOTLY_CONFIG` and `SLOTLY_NOW`
//! (a `.env` file is honoured). Set `SLOTLY_LOG` or pass `-v` for engine logs.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::json;
use slotly_engine::{
    default_horizon, evaluate, expand_available_dates, extract_selection, month_view,
    normalize_configuration_json, validate_selection, MonthView, OrderPayload,
    SchedulingConfiguration, SelectionError,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code when the date asked about is not available.
const EXIT_UNAVAILABLE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "slotly",
    version,
    about = "Delivery and pickup date availability for Slotly stores"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store configuration JSON as saved in the shop metafield (stdin if omitted)
    #[arg(short, long, global = true, env = "SLOTLY_CONFIG")]
    config: Option<PathBuf>,

    /// Evaluation instant, RFC 3339 (defaults to the current time)
    #[arg(long, global = true, env = "SLOTLY_NOW", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Log engine decisions to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration and print its canonical form
    Normalize,
    /// Check whether one date (YYYY-MM-DD) can be selected
    Check {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// List every available date from today through the horizon
    Expand {
        /// Days ahead to enumerate (defaults to the store's furthest day, max 365)
        #[arg(long, allow_negative_numbers = true)]
        horizon: Option<i64>,
        /// Print a JSON array instead of one date per line
        #[arg(long)]
        json: bool,
    },
    /// Print a month preview (available days numbered, closed days as --)
    Calendar {
        /// Month to show as YYYY-MM (defaults to the store's current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
    /// Re-check the schedule selected on an order webhook payload
    Order {
        /// Order JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    // A missing .env is fine; explicit environment always wins.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = cli.now.unwrap_or_else(Utc::now);
    debug!(%now, "evaluation instant");

    match cli.command {
        Commands::Normalize => {
            let config = load_config(cli.config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { date } => {
            let config = load_config(cli.config.as_deref())?;
            let verdict = evaluate(&config, date, now)
                .with_context(|| format!("Failed to evaluate {}", date))?;
            let output = json!({
                "date": date,
                "available": verdict.available,
                "reason": verdict.reason,
                "message": verdict.reason.message(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(exit_for(verdict.available))
        }
        Commands::Expand { horizon, json } => {
            let config = load_config(cli.config.as_deref())?;
            let horizon = horizon.unwrap_or_else(|| i64::from(default_horizon(&config)));
            let dates: Vec<NaiveDate> = expand_available_dates(&config, now, horizon)
                .context("Failed to expand available dates")?
                .collect();
            info!(count = dates.len(), horizon, "expanded available dates");

            if json {
                println!("{}", serde_json::to_string(&dates)?);
            } else {
                for date in &dates {
                    println!("{}", date);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Calendar { month } => {
            let config = load_config(cli.config.as_deref())?;
            let (year, month) = month.unwrap_or_else(|| {
                let today = now.with_timezone(&config.timezone).date_naive();
                (today.year(), today.month())
            });
            let view = month_view(&config, now, year, month)
                .with_context(|| format!("Failed to build calendar for {}-{:02}", year, month))?;
            print!("{}", render_month(&view));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Order { input } => {
            let Some(config_path) = cli.config.as_deref() else {
                bail!("--config is required for `order` (the order is read from --input or stdin)");
            };
            let config = load_config(Some(config_path))?;
            let raw = read_input(input.as_deref())?;
            let order: OrderPayload =
                serde_json::from_str(&raw).context("Failed to parse order JSON")?;
            check_order(&config, &order, now)
        }
    }
}

fn check_order(
    config: &SchedulingConfiguration,
    order: &OrderPayload,
    now: DateTime<Utc>,
) -> Result<ExitCode> {
    let Some(selection) = extract_selection(order) else {
        println!("{}", json!({ "scheduled": false }));
        return Ok(ExitCode::SUCCESS);
    };

    let (accepted, reason, error) = match validate_selection(config, &selection, now) {
        Ok(_) => (true, None, None),
        Err(SelectionError::InvalidCandidate(e)) => {
            return Err(e).context("Failed to evaluate the order's date");
        }
        Err(e) => {
            let reason = match &e {
                SelectionError::Unavailable { reason, .. } => Some(*reason),
                _ => None,
            };
            (false, reason, Some(e.to_string()))
        }
    };

    let output = json!({
        "scheduled": true,
        "schedule_type": selection.schedule_type,
        "date": selection.date,
        "accepted": accepted,
        "reason": reason,
        "error": error,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(exit_for(accepted))
}

fn exit_for(available: bool) -> ExitCode {
    if available {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_UNAVAILABLE)
    }
}

/// `-v` wins over `SLOTLY_LOG`; without either only warnings are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("SLOTLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<SchedulingConfiguration> {
    let raw = read_input(path)?;
    normalize_configuration_json(&raw).context("Invalid store configuration")
}

fn render_month(view: &MonthView) -> String {
    let title = NaiveDate::from_ymd_opt(view.year, view.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();

    let mut out = format!("{:^20}\nMo Tu We Th Fr Sa Su\n", title);
    let mut cells: Vec<String> = vec!["  ".to_string(); view.leading_blanks as usize];
    cells.extend(view.days.iter().map(|day| {
        if day.verdict.available {
            format!("{:>2}", day.date.day())
        } else {
            "--".to_string()
        }
    }));

    for week in cells.chunks(7) {
        out.push_str(week.join(" ").trim_end());
        out.push('\n');
    }

    let open = view.available_dates().count();
    out.push_str(&format!("{} of {} days available\n", open, view.days.len()));
    out
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 instant ({err})"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_month(raw: &str) -> Result<(i32, u32), String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
