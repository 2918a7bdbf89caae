use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use portion_core::dates;
use portion_core::weight::TimeRange;

use super::Service;
use super::helpers::{LBS_PER_KG, json_error, no_neg_zero, parse_date, print_json, weight_to_lbs};

pub(crate) fn cmd_weight_log(
    svc: &Service,
    value: f64,
    unit: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let lbs = weight_to_lbs(value, unit)?;
    let date = parse_date(date, svc.today())?;
    let entry = svc.log_weight(lbs, Some(date))?;

    if json {
        return print_json(&entry);
    }
    println!(
        "Logged {:.1} lbs ({:.1} kg) for {}",
        entry.weight,
        entry.weight / LBS_PER_KG,
        dates::format_date(entry.date)
    );
    Ok(())
}

pub(crate) fn cmd_weight_history(svc: &Service, range: &str, json: bool) -> Result<()> {
    let range: TimeRange = range.parse()?;
    let entries = svc.weight_history(range)?;

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        eprintln!("No weight entries found. Use `portion weight log` to record your weight.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct WeightRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight (lbs)")]
        lbs: String,
        #[tabled(rename = "Weight (kg)")]
        kg: String,
    }

    let rows: Vec<WeightRow> = entries
        .iter()
        .map(|e| WeightRow {
            date: dates::format_date(e.date),
            lbs: format!("{:.1}", e.weight),
            kg: format!("{:.1}", e.weight / LBS_PER_KG),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

pub(crate) fn cmd_weight_delete(svc: &Service, date: &str, json: bool) -> Result<()> {
    let date = parse_date(Some(date.to_string()), svc.today())?;

    if !svc.delete_weight(date)? {
        let message = format!("No weight entry for {date}");
        if json {
            println!("{}", json_error(&message));
        } else {
            eprintln!("{message}");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": date }));
    } else {
        println!("Deleted weight entry for {date}");
    }
    Ok(())
}

pub(crate) fn cmd_weight_stats(svc: &Service, range: &str, json: bool) -> Result<()> {
    let range: TimeRange = range.parse()?;
    let stats = svc.weight_stats(range)?;

    if json {
        return print_json(&stats);
    }

    println!("=== Weight ({range}, {} entries) ===\n", stats.entries);
    match stats.current {
        Some(current) => println!("  Current: {current:.1} lbs"),
        None => println!("  Current: -"),
    }
    if let Some(goal) = stats.goal {
        println!("  Goal:    {goal:.1} lbs");
    }
    if let Some(remaining) = stats.remaining {
        let remaining = no_neg_zero(remaining);
        println!("  To go:   {remaining:.1} lbs");
    }
    if let Some(change) = stats.change {
        let sign = if change.change > 0.0 { "+" } else { "" };
        println!(
            "  Change:  {sign}{:.1} lbs ({sign}{:.1}%)",
            no_neg_zero(change.change),
            no_neg_zero(change.percentage)
        );
    }
    if let Some(trend) = stats.trend {
        println!(
            "  Trend:   {:.1} → {:.1} lbs ({:+.2} per entry)",
            trend.start, trend.end, trend.slope
        );
    }
    Ok(())
}
