use std::path::PathBuf;

use billing_engine::{BillingCycle, MonthStyle};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "billing")]
#[command(version, about = "Inspect recurring subscription billing schedules")]
pub struct Cli {
    /// JSON file holding the subscription records
    #[arg(
        long,
        global = true,
        env = "BILLING_SUBSCRIPTIONS",
        default_value = "subscriptions.json"
    )]
    pub file: PathBuf,

    /// Evaluate as of this date or RFC 3339 instant instead of the system clock
    #[arg(long, global = true, env = "BILLING_NOW", value_name = "DATE")]
    pub now: Option<String>,

    /// IANA timezone whose calendar defines "today" (defaults to the host zone)
    #[arg(long, global = true, env = "BILLING_TZ", value_name = "ZONE")]
    pub timezone: Option<String>,

    /// Month style for displayed dates: short, long or numeric
    #[arg(long, global = true, env = "BILLING_MONTH_STYLE", default_value = "short")]
    pub month: MonthStyle,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List subscriptions ordered by next payment, ended ones last
    List,

    /// Show one subscription with its payment history
    Show {
        /// Subscription id
        id: String,
    },

    /// Compute the next occurrence of an ad-hoc schedule
    Next(ScheduleArgs),

    /// List past occurrences of an ad-hoc schedule, most recent first
    History(ScheduleArgs),

    /// Move a date by a number of billing cycles
    Advance {
        /// Anchor date (YYYY-MM-DD or RFC 3339)
        date: String,

        /// week, month, quarter or year
        cycle: BillingCycle,

        /// Number of cycles, may be negative
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    /// Anchor start date
    #[arg(long)]
    pub start: String,

    /// week, month, quarter or year
    #[arg(long)]
    pub cycle: BillingCycle,

    /// Optional inclusive end date
    #[arg(long)]
    pub end: Option<String>,
}
