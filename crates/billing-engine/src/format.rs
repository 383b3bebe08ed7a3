//! Display formatting shared by list rows, detail summaries and history rows.
//!
//! Dates render in the en-US Gregorian pattern. The default options produce
//! `Jan 5, 2024`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle::BillingCycle;

/// How the month is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthStyle {
    /// `Jan`
    #[default]
    Short,
    /// `January`
    Long,
    /// `1`
    Numeric,
}

/// How the day of month is written. Only the numeric form exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStyle {
    #[default]
    Numeric,
}

/// How the year is written. Only the numeric form exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearStyle {
    #[default]
    Numeric,
}

/// Options for [`format_local_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub month: MonthStyle,
    pub day: DayStyle,
    pub year: YearStyle,
}

impl FormatOptions {
    pub fn with_month(month: MonthStyle) -> Self {
        Self {
            month,
            ..Self::default()
        }
    }
}

impl FromStr for MonthStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(MonthStyle::Short),
            "long" => Ok(MonthStyle::Long),
            "numeric" => Ok(MonthStyle::Numeric),
            other => Err(format!(
                "unknown month style '{other}' (expected short, long or numeric)"
            )),
        }
    }
}

impl fmt::Display for MonthStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MonthStyle::Short => "short",
            MonthStyle::Long => "long",
            MonthStyle::Numeric => "numeric",
        })
    }
}

/// Format a calendar date for display.
///
/// # Examples
///
/// ```
/// use billing_engine::format::{format_local_date, FormatOptions, MonthStyle};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(format_local_date(date, &FormatOptions::default()), "Jan 5, 2024");
/// assert_eq!(
///     format_local_date(date, &FormatOptions::with_month(MonthStyle::Numeric)),
///     "1/5/2024"
/// );
/// ```
pub fn format_local_date(date: NaiveDate, options: &FormatOptions) -> String {
    // Day and year styles only have the numeric form.
    let pattern = match (options.month, options.day, options.year) {
        (MonthStyle::Short, DayStyle::Numeric, YearStyle::Numeric) => "%b %-d, %Y",
        (MonthStyle::Long, DayStyle::Numeric, YearStyle::Numeric) => "%B %-d, %Y",
        (MonthStyle::Numeric, DayStyle::Numeric, YearStyle::Numeric) => "%-m/%-d/%Y",
    };
    date.format(pattern).to_string()
}

/// Numeric amount display, e.g. `"EUR 10.00"`.
pub fn format_amount(currency: &str, price: f64) -> String {
    format!("{} {:.2}", currency, price)
}

/// Cycle description for detail views, e.g. `"Every month"`.
pub fn describe_cycle(cycle: BillingCycle) -> String {
    format!("Every {}", cycle)
}
