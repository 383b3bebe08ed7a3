mod cli;
mod config;
mod render;
mod store;

use anyhow::{bail, Context, Result};
use billing_engine::{advance, next_occurrence, occurrence_history, sort_by_next_occurrence};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ScheduleArgs};
use config::Config;
use store::Entry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // The only system clock read; everything below uses `config.clock`.
    let config = Config::from_cli(&cli, Utc::now())?;

    match &cli.command {
        Command::List => list(&config),
        Command::Show { id } => show(&config, id),
        Command::Next(args) => {
            let (start, end) = schedule_dates(&config, args)?;
            let next = next_occurrence(start, args.cycle, end, config.clock);
            if config.json {
                print_json(&json!({
                    "next": next,
                    "label": billing_engine::relative_label(next, config.clock),
                }))
            } else {
                println!("{}", render::next_text(next, config.clock, &config.format));
                Ok(())
            }
        }
        Command::History(args) => {
            let (start, end) = schedule_dates(&config, args)?;
            let history = occurrence_history(start, args.cycle, end, config.clock);
            if config.json {
                print_json(&json!({ "history": history }))
            } else {
                if !history.is_empty() {
                    println!("{}", render::dates_text(&history, &config.format));
                }
                Ok(())
            }
        }
        Command::Advance { date, cycle, count } => {
            let date = config
                .parse_date(date)
                .with_context(|| format!("invalid date '{}'", date))?;
            let result = advance(date, *cycle, *count);
            if config.json {
                print_json(&render::advance_json(date, *cycle, *count, result))
            } else {
                println!("{}", result);
                Ok(())
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "billing_engine_cli=debug,billing_engine=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn schedule_dates(
    config: &Config,
    args: &ScheduleArgs,
) -> Result<(NaiveDate, Option<NaiveDate>)> {
    let start = config
        .parse_date(&args.start)
        .with_context(|| format!("invalid --start value '{}'", args.start))?;
    let end = args
        .end
        .as_deref()
        .map(|end| {
            config
                .parse_date(end)
                .with_context(|| format!("invalid --end value '{}'", end))
        })
        .transpose()?;
    Ok((start, end))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let entries = store::load(&config.file, config.timezone)?;

    let mut subscriptions = Vec::new();
    let mut invalid = Vec::new();
    for entry in entries {
        match entry {
            Entry::Ready(sub) => subscriptions.push(sub),
            Entry::Invalid { id, error } => invalid.push((id, error)),
        }
    }
    sort_by_next_occurrence(&mut subscriptions, config.clock);

    if config.json {
        let rows: Vec<Value> = subscriptions
            .iter()
            .map(|sub| render::list_json(sub, config.clock))
            .chain(invalid.iter().map(|(id, error)| render::invalid_json(id, error)))
            .collect();
        return print_json(&Value::Array(rows));
    }

    for sub in &subscriptions {
        println!("{}", render::list_row(sub, config.clock, &config.format));
    }
    for (id, error) in &invalid {
        println!("{}", render::invalid_row(id, error));
    }
    Ok(())
}

fn show(config: &Config, id: &str) -> Result<()> {
    let entries = store::load(&config.file, config.timezone)?;
    let Some(entry) = entries.iter().find(|entry| entry.id() == id) else {
        bail!("subscription '{}' not found", id);
    };

    match entry {
        Entry::Ready(sub) if config.json => print_json(&render::detail_json(sub, config.clock)),
        Entry::Ready(sub) => {
            println!("{}", render::detail(sub, config.clock, &config.format));
            Ok(())
        }
        Entry::Invalid { id, error } if config.json => print_json(&render::invalid_json(id, error)),
        Entry::Invalid { id, error } => {
            println!("{}", render::invalid_row(id, error));
            Ok(())
        }
    }
}
