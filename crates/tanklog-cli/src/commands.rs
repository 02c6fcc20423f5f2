//! Command handlers

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::cli::{
    CargoCommand, Cli, Commands, DriverCommand, DropCommand, JobCommand, TrailerCommand,
    TruckCommand,
};
use crate::output::{
    output_day, output_drivers, output_month, output_outcome, output_trailers, output_trucks,
};
use tanklog_app::config::Config;
use tanklog_app::repository::open_session;
use tanklog_app::session::Session;
use tanklog_app::summary::{DaySummary, MonthSummary};
use tanklog_domain::model::{
    Assignment, CargoDraft, CargoPatch, DropDraft, DropPatch, EditOutcome, JobPatch,
    ShiftPatch,
};
use tanklog_domain::repository::StateRepository;
use tanklog_store::{Action, LogEdit};
use tanklog_types::{parse_date, AppState, Error, OutputFormat, Result};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Config {
            show,
            set_data_dir,
            set_output,
            set_compartments,
            set_liters,
            reset,
        } => cmd_config(show, set_data_dir, set_output, set_compartments, set_liters, reset),

        command => {
            let mut session = open_session(&config)?;
            run(&mut session, &config, command, output_format)
        }
    }
}

fn run<R: StateRepository>(
    session: &mut Session<R>,
    config: &Config,
    command: Commands,
    output_format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Day { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            cmd_day(session, date, output_format)
        }

        Commands::Month { month } => {
            let (year, month) = match month {
                Some(m) => parse_month(&m)?,
                None => {
                    let today = chrono::Local::now().date_naive();
                    (today.year(), today.month())
                }
            };
            output_month(output_format, &MonthSummary::build(session.state(), year, month))
        }

        Commands::Assign {
            day,
            driver,
            truck,
            trailer,
        } => {
            let state = session.state();
            let assignment = Assignment {
                driver_id: driver.map(|key| resolve_driver(state, &key)).transpose()?,
                truck_id: truck.map(|key| resolve_truck(state, &key)).transpose()?,
                trailer_id: trailer.map(|key| resolve_trailer(state, &key)).transpose()?,
            };
            edit_and_show(session, day.resolve(), LogEdit::Assign(assignment), output_format)
        }

        Commands::Shift {
            day,
            start,
            end,
            clear_start,
            clear_end,
        } => {
            let patch = ShiftPatch {
                start_time: if clear_start { Some(None) } else { start.map(Some) },
                end_time: if clear_end { Some(None) } else { end.map(Some) },
            };
            edit_and_show(session, day.resolve(), LogEdit::Shift(patch), output_format)
        }

        Commands::Notes { day, text } => {
            edit_and_show(session, day.resolve(), LogEdit::Notes(text), output_format)
        }

        Commands::Job { command } => cmd_job(session, command, output_format),
        Commands::Drop { command } => cmd_drop(session, command, output_format),
        Commands::Cargo { command } => cmd_cargo(session, command, output_format),

        Commands::Driver { command } => match command {
            DriverCommand::Add { name } => {
                let outcome = session.apply(Action::AddDriver { name })?;
                output_outcome(output_format, &outcome)
            }
            DriverCommand::List => output_drivers(output_format, &session.state().drivers),
        },

        Commands::Truck { command } => match command {
            TruckCommand::Add { plate } => {
                let outcome = session.apply(Action::AddTruck { plate })?;
                output_outcome(output_format, &outcome)
            }
            TruckCommand::List => output_trucks(output_format, &session.state().trucks),
        },

        Commands::Trailer { command } => match command {
            TrailerCommand::Add {
                plate,
                compartments,
                liters,
            } => {
                let outcome = session.apply(Action::AddTrailer {
                    plate,
                    compartment_count: Some(
                        compartments.unwrap_or(config.default_compartment_count),
                    ),
                    max_per_compartment_liters: Some(
                        liters.unwrap_or(config.default_max_per_compartment_liters),
                    ),
                })?;
                output_outcome(output_format, &outcome)
            }
            TrailerCommand::List => output_trailers(output_format, &session.state().trailers),
        },

        // Handled before the session is opened
        Commands::Config { .. } => Ok(()),
    }
}

fn cmd_day<R: StateRepository>(
    session: &mut Session<R>,
    date: NaiveDate,
    output_format: OutputFormat,
) -> Result<()> {
    session.select_date(date)?;
    show_day(session, date, output_format)
}

fn show_day<R: StateRepository>(
    session: &Session<R>,
    date: NaiveDate,
    output_format: OutputFormat,
) -> Result<()> {
    let state = session.state();
    let log = tanklog_store::find_work_log(state, date).ok_or_else(|| Error::UnknownReference {
        kind: "work log",
        key: date.to_string(),
    })?;
    output_day(output_format, &DaySummary::build(state, log))
}

/// Apply an edit to a day's log, report the outcome and show the day if it changed
fn edit_and_show<R: StateRepository>(
    session: &mut Session<R>,
    date: NaiveDate,
    edit: LogEdit,
    output_format: OutputFormat,
) -> Result<()> {
    let outcome = apply_edit(session, date, edit)?;
    output_outcome(output_format, &outcome)?;
    if outcome.is_change() && output_format == OutputFormat::Table {
        show_day(session, date, output_format)?;
    }
    Ok(())
}

fn apply_edit<R: StateRepository>(
    session: &mut Session<R>,
    date: NaiveDate,
    edit: LogEdit,
) -> Result<EditOutcome> {
    debug!(%date, ?edit, "applying edit");
    session.apply(Action::Edit { date, edit })
}

fn cmd_job<R: StateRepository>(
    session: &mut Session<R>,
    command: JobCommand,
    output_format: OutputFormat,
) -> Result<()> {
    match command {
        JobCommand::Add {
            day,
            number,
            account,
        } => {
            let patch = JobPatch {
                job_number: number,
                customer_account: account,
            };
            edit_and_show(session, day.resolve(), LogEdit::AddJob { patch }, output_format)
        }
        JobCommand::Edit {
            day,
            job,
            number,
            account,
        } => {
            let patch = JobPatch {
                job_number: number,
                customer_account: account,
            };
            edit_and_show(session, day.resolve(), LogEdit::UpdateJob { job, patch }, output_format)
        }
        JobCommand::Remove { day, job } => {
            edit_and_show(session, day.resolve(), LogEdit::RemoveJob { job }, output_format)
        }
    }
}

fn cmd_drop<R: StateRepository>(
    session: &mut Session<R>,
    command: DropCommand,
    output_format: OutputFormat,
) -> Result<()> {
    match command {
        DropCommand::Add {
            day,
            job,
            customer,
            address,
        } => {
            let draft = DropDraft {
                customer_name: customer,
                delivery_address: address,
            };
            edit_and_show(session, day.resolve(), LogEdit::AddDrop { job, draft }, output_format)
        }
        DropCommand::Edit {
            day,
            job,
            drop,
            customer,
            address,
        } => {
            let patch = DropPatch {
                customer_name: customer,
                delivery_address: address,
            };
            edit_and_show(
                session,
                day.resolve(),
                LogEdit::UpdateDrop { job, drop, patch },
                output_format,
            )
        }
        DropCommand::Remove { day, job, drop } => {
            edit_and_show(session, day.resolve(), LogEdit::RemoveDrop { job, drop }, output_format)
        }
    }
}

fn cmd_cargo<R: StateRepository>(
    session: &mut Session<R>,
    command: CargoCommand,
    output_format: OutputFormat,
) -> Result<()> {
    match command {
        CargoCommand::Add {
            day,
            job,
            drop,
            cargo_type,
            liters,
            compartment,
        } => {
            let draft = CargoDraft {
                cargo_type,
                liters,
                compartment,
            };
            edit_and_show(
                session,
                day.resolve(),
                LogEdit::AddCargo { job, drop, draft },
                output_format,
            )
        }
        CargoCommand::Edit {
            day,
            job,
            drop,
            cargo,
            cargo_type,
            liters,
            compartment,
        } => {
            let patch = CargoPatch {
                cargo_type,
                liters,
                compartment,
            };
            edit_and_show(
                session,
                day.resolve(),
                LogEdit::UpdateCargo {
                    job,
                    drop,
                    cargo,
                    patch,
                },
                output_format,
            )
        }
        CargoCommand::Remove {
            day,
            job,
            drop,
            cargo,
        } => edit_and_show(
            session,
            day.resolve(),
            LogEdit::RemoveCargo { job, drop, cargo },
            output_format,
        ),
    }
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<std::path::PathBuf>,
    set_output: Option<OutputFormat>,
    set_compartments: Option<u32>,
    set_liters: Option<f64>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(count) = set_compartments.filter(|c| *c > 0) {
        config.default_compartment_count = count;
        modified = true;
    }

    if let Some(liters) = set_liters.filter(|l| l.is_finite() && *l > 0.0) {
        config.default_max_per_compartment_liters = liters;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

/// Parse `YYYY-MM` into year and month
fn parse_month(value: &str) -> Result<(i32, u32)> {
    let first = parse_date(&format!("{}-01", value.trim()))?;
    Ok((first.year(), first.month()))
}

/// Empty keys pass through so the assignment clears the field
fn resolve_key<'a>(
    kind: &'static str,
    key: &str,
    mut candidates: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Ok(String::new());
    }
    candidates
        .find(|(id, label)| *id == key || label.eq_ignore_ascii_case(key))
        .map(|(id, _)| id.to_string())
        .ok_or_else(|| Error::UnknownReference {
            kind,
            key: key.to_string(),
        })
}

fn resolve_driver(state: &AppState, key: &str) -> Result<String> {
    resolve_key(
        "driver",
        key,
        state.drivers.iter().map(|d| (d.id.as_str(), d.name.as_str())),
    )
}

fn resolve_truck(state: &AppState, key: &str) -> Result<String> {
    resolve_key(
        "truck",
        key,
        state.trucks.iter().map(|t| (t.id.as_str(), t.plate.as_str())),
    )
}

fn resolve_trailer(state: &AppState, key: &str) -> Result<String> {
    resolve_key(
        "trailer",
        key,
        state.trailers.iter().map(|t| (t.id.as_str(), t.plate.as_str())),
    )
}
