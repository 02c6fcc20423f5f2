//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use tanklog_domain::model::ItemRef;
use tanklog_types::{CargoType, ClockTime, OutputFormat, MAX_COMPARTMENT_COUNT};

#[derive(Parser)]
#[command(name = "tanklog")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Daily work log for fuel tanker drivers")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the state file. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Day a command applies to
#[derive(Args, Clone, Copy, Debug)]
pub struct DayArg {
    /// Date (YYYY-MM-DD). Defaults to today.
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,
}

impl DayArg {
    pub fn resolve(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a day's log, creating it if it does not exist yet
    Day {
        /// Date (YYYY-MM-DD). Defaults to today.
        date: Option<NaiveDate>,
    },

    /// Show logged days and total hours for a month
    Month {
        /// Month (YYYY-MM). Defaults to the current month.
        month: Option<String>,
    },

    /// Select driver, truck and trailer for a day
    Assign {
        #[command(flatten)]
        day: DayArg,

        /// Driver name or id ("" clears)
        #[arg(long)]
        driver: Option<String>,

        /// Truck plate or id ("" clears)
        #[arg(long)]
        truck: Option<String>,

        /// Trailer plate or id ("" clears)
        #[arg(long)]
        trailer: Option<String>,
    },

    /// Set shift start and end times
    Shift {
        #[command(flatten)]
        day: DayArg,

        /// Start time (HH:MM)
        #[arg(long, short = 's', conflicts_with = "clear_start")]
        start: Option<ClockTime>,

        /// End time (HH:MM); earlier than start means the next day
        #[arg(long, short = 'e', conflicts_with = "clear_end")]
        end: Option<ClockTime>,

        /// Remove the start time
        #[arg(long)]
        clear_start: bool,

        /// Remove the end time
        #[arg(long)]
        clear_end: bool,
    },

    /// Set or clear the day's notes
    Notes {
        #[command(flatten)]
        day: DayArg,

        /// Note text; omit to clear
        text: Option<String>,
    },

    /// Manage jobs
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },

    /// Manage drops within a job
    Drop {
        #[command(subcommand)]
        command: DropCommand,
    },

    /// Manage cargo within a drop
    Cargo {
        #[command(subcommand)]
        command: CargoCommand,
    },

    /// Manage drivers
    Driver {
        #[command(subcommand)]
        command: DriverCommand,
    },

    /// Manage trucks
    Truck {
        #[command(subcommand)]
        command: TruckCommand,
    },

    /// Manage trailers
    Trailer {
        #[command(subcommand)]
        command: TrailerCommand,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set compartment count for new trailers
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_COMPARTMENT_COUNT as i64))]
        set_compartments: Option<u32>,

        /// Set liters per compartment for new trailers
        #[arg(long)]
        set_liters: Option<f64>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Add a job
    Add {
        #[command(flatten)]
        day: DayArg,

        /// Job number (defaults to JOB-n)
        #[arg(long, short = 'n')]
        number: Option<String>,

        /// Customer account
        #[arg(long, short = 'a')]
        account: Option<String>,
    },

    /// Edit a job
    Edit {
        #[command(flatten)]
        day: DayArg,

        /// Job position (1-based) or id
        job: ItemRef,

        #[arg(long, short = 'n')]
        number: Option<String>,

        #[arg(long, short = 'a')]
        account: Option<String>,
    },

    /// Remove a job and everything in it
    Remove {
        #[command(flatten)]
        day: DayArg,

        /// Job position (1-based) or id
        job: ItemRef,
    },
}

#[derive(Subcommand)]
pub enum DropCommand {
    /// Add a drop to a job
    Add {
        #[command(flatten)]
        day: DayArg,

        /// Job position (1-based) or id
        job: ItemRef,

        /// Customer name (defaults to the job's account)
        #[arg(long, short = 'c')]
        customer: Option<String>,

        /// Delivery address
        #[arg(long, short = 'a')]
        address: Option<String>,
    },

    /// Edit a drop
    Edit {
        #[command(flatten)]
        day: DayArg,

        job: ItemRef,

        /// Drop position (1-based) or id
        drop: ItemRef,

        #[arg(long, short = 'c')]
        customer: Option<String>,

        #[arg(long, short = 'a')]
        address: Option<String>,
    },

    /// Remove a drop and release its compartments
    Remove {
        #[command(flatten)]
        day: DayArg,

        job: ItemRef,

        drop: ItemRef,
    },
}

#[derive(Subcommand)]
pub enum CargoCommand {
    /// Add cargo to a drop
    Add {
        #[command(flatten)]
        day: DayArg,

        job: ItemRef,

        drop: ItemRef,

        /// Product carried
        #[arg(long = "type", short = 't', value_enum)]
        cargo_type: Option<CargoType>,

        /// Volume in liters
        #[arg(long, short = 'l')]
        liters: Option<f64>,

        /// Compartment number (defaults to the lowest free one)
        #[arg(long, short = 'c')]
        compartment: Option<u32>,
    },

    /// Edit cargo
    Edit {
        #[command(flatten)]
        day: DayArg,

        job: ItemRef,

        drop: ItemRef,

        /// Cargo position (1-based) or id
        cargo: ItemRef,

        #[arg(long = "type", short = 't', value_enum)]
        cargo_type: Option<CargoType>,

        #[arg(long, short = 'l')]
        liters: Option<f64>,

        #[arg(long, short = 'c')]
        compartment: Option<u32>,
    },

    /// Remove cargo and free its compartment
    Remove {
        #[command(flatten)]
        day: DayArg,

        job: ItemRef,

        drop: ItemRef,

        cargo: ItemRef,
    },
}

#[derive(Subcommand)]
pub enum DriverCommand {
    /// Register a driver
    Add { name: String },
    /// List drivers
    List,
}

#[derive(Subcommand)]
pub enum TruckCommand {
    /// Register a truck
    Add { plate: String },
    /// List trucks
    List,
}

#[derive(Subcommand)]
pub enum TrailerCommand {
    /// Register a trailer
    Add {
        plate: String,

        /// Number of compartments. Uses config value if not specified.
        #[arg(
            long,
            short = 'c',
            value_parser = clap::value_parser!(u32).range(1..=MAX_COMPARTMENT_COUNT as i64)
        )]
        compartments: Option<u32>,

        /// Capacity of each compartment in liters. Uses config value if not specified.
        #[arg(long, short = 'l')]
        liters: Option<f64>,
    },
    /// List trailers
    List,
}
