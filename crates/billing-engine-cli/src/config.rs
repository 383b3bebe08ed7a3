//! Run configuration resolved once from flags and environment.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use billing_engine::{parse_date, parse_date_in, EvaluationClock, FormatOptions, ScheduleError};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct Config {
    pub file: PathBuf,
    pub clock: EvaluationClock,
    /// Calendar for instants; `None` is the host zone.
    pub timezone: Option<Tz>,
    pub format: FormatOptions,
    pub json: bool,
}

impl Config {
    /// Build the run configuration. `system_now` is the single system clock
    /// reading for this run; it is ignored when `--now` is given.
    pub fn from_cli(cli: &Cli, system_now: DateTime<Utc>) -> Result<Self> {
        let timezone = cli
            .timezone
            .as_deref()
            .map(parse_timezone)
            .transpose()?;
        let clock = resolve_clock(cli.now.as_deref(), timezone, system_now)?;

        tracing::debug!(today = %clock.today(), timezone = ?timezone, "evaluation clock");

        Ok(Self {
            file: cli.file.clone(),
            clock,
            timezone,
            format: FormatOptions::with_month(cli.month),
            json: cli.json,
        })
    }

    /// Parse a date argument on the caller's calendar.
    pub fn parse_date(&self, s: &str) -> std::result::Result<NaiveDate, ScheduleError> {
        match self.timezone {
            Some(tz) => parse_date_in(s, &tz),
            None => parse_date_in(s, &Local),
        }
    }
}

fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| anyhow!("invalid timezone '{}'", s))
}

/// Turn `--now` (or the system reading) into the caller's local calendar.
///
/// Instants with an offset are read in `timezone` when one is given, else in
/// the host zone. Plain dates and naive timestamps are taken as local.
pub fn resolve_clock(
    now: Option<&str>,
    timezone: Option<Tz>,
    system_now: DateTime<Utc>,
) -> Result<EvaluationClock> {
    let Some(raw) = now.map(str::trim) else {
        return Ok(match timezone {
            Some(tz) => EvaluationClock::from_datetime(&system_now.with_timezone(&tz)),
            None => EvaluationClock::from_datetime(&system_now.with_timezone(&Local)),
        });
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(match timezone {
            Some(tz) => EvaluationClock::from_datetime(&instant.with_timezone(&tz)),
            None => EvaluationClock::from_datetime(&instant.with_timezone(&Local)),
        });
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(EvaluationClock::at(local));
    }

    let date = parse_date(raw).with_context(|| format!("invalid --now value '{}'", raw))?;
    Ok(EvaluationClock::on(date))
}
