use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[clap(author, version)]
pub struct Arguments {
    /// Specify path for config file. Built-in shift table is used when omitted.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: ArgumentsCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ArgumentsCommand {
    /// Summarize booked appointments of a month per day.
    Calendar {
        #[clap(flatten)]
        month: MonthArguments,

        /// Specify path for appointments JSON.
        #[clap(short, long)]
        appointments: PathBuf,

        /// Skip invalid records instead of failing.
        #[clap(long)]
        skip_invalid: bool,
    },

    /// Show the shift window of a day.
    Window {
        #[clap(long)]
        year: i32,

        #[clap(long)]
        month: u8,

        #[clap(long)]
        day: u8,
    },

    /// Try to admit a new appointment into a month.
    Admit {
        #[clap(flatten)]
        month: MonthArguments,

        /// Specify path for already booked appointments JSON.
        #[clap(short, long)]
        appointments: PathBuf,

        /// Skip invalid records instead of failing.
        #[clap(long)]
        skip_invalid: bool,

        #[clap(long)]
        id: String,

        #[clap(long)]
        day: u8,

        #[clap(long)]
        hour: u8,

        #[clap(long)]
        minute: u8,
    },
}

/// Year and month in JST. The current month is used when omitted.
#[derive(Debug, Clone, Args)]
pub struct MonthArguments {
    #[clap(long, requires = "month")]
    pub year: Option<i32>,

    #[clap(long, requires = "year")]
    pub month: Option<u8>,
}
