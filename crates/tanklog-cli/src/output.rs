//! Output formatting module

use serde::Serialize;

use tanklog_app::summary::{DaySummary, MonthSummary};
use tanklog_domain::model::EditOutcome;
use tanklog_types::{ClockTime, Driver, OutputFormat, Result, Trailer, Truck};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn time_or_dash(time: Option<ClockTime>) -> String {
    time.map(|t| t.to_string()).unwrap_or_else(|| "--:--".to_string())
}

fn compartment_list(compartments: &[u32]) -> String {
    if compartments.is_empty() {
        return "none".to_string();
    }
    compartments
        .iter()
        .map(|c| format!("C{}", c))
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}~", cut)
    }
}

pub fn output_outcome(output_format: OutputFormat, outcome: &EditOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(outcome);
    }
    match outcome {
        EditOutcome::Applied => println!("Updated"),
        EditOutcome::Created { id } => println!("Created {}", id),
        EditOutcome::Refused { refusal } => println!("Refused: {}", refusal),
        EditOutcome::NotFound { .. } => println!("Not found: {}", outcome),
    }
    Ok(())
}

pub fn output_day(output_format: OutputFormat, day: &DaySummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(day);
    }

    println!("\nWork Log {}", day.date);
    println!("====================");
    println!("Driver:    {}", or_dash(day.driver.as_deref()));
    println!("Truck:     {}", or_dash(day.truck.as_deref()));
    println!(
        "Trailer:   {} ({} compartments)",
        or_dash(day.trailer.as_deref()),
        day.compartment_count
    );
    println!(
        "Shift:     {} - {}  ({})",
        time_or_dash(day.start_time),
        time_or_dash(day.end_time),
        day.duration.label
    );
    println!("Total:     {:.0} L", day.total_liters);

    if day.jobs.is_empty() {
        println!("\nNo jobs recorded.");
    }

    for job in &day.jobs {
        println!(
            "\n[{}] {}  {}  {:.0} L  (free: {}{})",
            job.position,
            job.job_number,
            or_dash(Some(job.customer_account.as_str())),
            job.liters,
            compartment_list(&job.free_compartments),
            if job.can_add_drop { "" } else { ", no more drops" }
        );
        for drop in &job.drops {
            println!(
                "  {}. {}  {}",
                drop.position,
                truncate(or_dash(Some(drop.customer_name.as_str())), 30),
                truncate(&drop.delivery_address, 40)
            );
            for (i, cargo) in drop.cargos.iter().enumerate() {
                println!(
                    "       {}. C{}  {:<12} {:>8.0} L",
                    i + 1,
                    cargo.compartment,
                    cargo.cargo_type.label(),
                    cargo.liters
                );
            }
        }
    }

    let loaded: Vec<_> = day.compartments.iter().filter(|c| c.liters > 0.0).collect();
    if !loaded.is_empty() {
        println!("\n--- Compartments ---");
        for load in loaded {
            match (load.capacity_liters, load.load_ratio_percent) {
                (Some(cap), Some(pct)) => println!(
                    "C{}  {:>8.0} / {:.0} L  {:>5.1}%{}",
                    load.compartment,
                    load.liters,
                    cap,
                    pct,
                    if load.is_overfilled { "  OVERFILLED" } else { "" }
                ),
                _ => println!("C{}  {:>8.0} L", load.compartment, load.liters),
            }
        }
    }

    if let Some(ref notes) = day.notes {
        println!("\nNotes:");
        println!("{}", notes);
    }

    Ok(())
}

pub fn output_month(output_format: OutputFormat, month: &MonthSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(month);
    }

    println!("\nMonth {}-{:02}", month.year, month.month);
    println!("=============");
    if month.days.is_empty() {
        println!("No logged days.");
        return Ok(());
    }

    println!(
        "{:<12} {:>9} {:>5} {:>6} {:>10}",
        "Date", "Hours", "Jobs", "Drops", "Liters"
    );
    println!("{}", "-".repeat(46));
    for day in &month.days {
        println!(
            "{:<12} {:>9} {:>5} {:>6} {:>10.0}",
            day.date.to_string(),
            day.duration.label,
            day.jobs,
            day.drops,
            day.total_liters
        );
    }
    println!("{}", "-".repeat(46));
    println!(
        "{:<12} {:>9} {:>5} {:>6} {:>10.0}",
        "Total", month.total_label, "", "", month.total_liters
    );
    println!("Worked days: {} of {}", month.worked_days, month.days.len());

    Ok(())
}

pub fn output_drivers(output_format: OutputFormat, drivers: &[Driver]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(drivers);
    }
    println!("{:<38} Name", "ID");
    for driver in drivers {
        println!("{:<38} {}", driver.id, driver.name);
    }
    Ok(())
}

pub fn output_trucks(output_format: OutputFormat, trucks: &[Truck]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(trucks);
    }
    println!("{:<38} Plate", "ID");
    for truck in trucks {
        println!("{:<38} {}", truck.id, truck.plate);
    }
    Ok(())
}

pub fn output_trailers(output_format: OutputFormat, trailers: &[Trailer]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(trailers);
    }
    println!("{:<38} {:<12} {:>5} {:>10}", "ID", "Plate", "Comp", "L/comp");
    for trailer in trailers {
        println!(
            "{:<38} {:<12} {:>5} {:>10.0}",
            trailer.id, trailer.plate, trailer.compartment_count, trailer.max_per_compartment_liters
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long customer name", 8), "a long ~");
    }

    #[test]
    fn test_compartment_list() {
        assert_eq!(compartment_list(&[1, 3, 6]), "C1 C3 C6");
        assert_eq!(compartment_list(&[]), "none");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(time_or_dash(ClockTime::from_hm(6, 5)), "06:05");
        assert_eq!(time_or_dash(None), "--:--");
    }
}
