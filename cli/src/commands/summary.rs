use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use portion_core::adherence::daily_adherence;
use portion_core::dates;
use portion_core::models::{DailyRecord, FoodCategory, TargetSet};
use portion_core::targets::alcohol_off_plan;

use super::Service;
use super::helpers::{format_units, parse_date, print_json};

#[derive(Serialize)]
struct DayView<'a> {
    date: NaiveDate,
    adherence: u32,
    record: &'a DailyRecord,
    targets: &'a TargetSet,
}

pub(crate) fn cmd_today(svc: &Service, date: Option<String>, json: bool) -> Result<()> {
    let Some(profile) = svc.profile()? else {
        bail!("No profile found. Run `portion setup` first");
    };
    let date = parse_date(date, svc.today())?;
    let record = svc.record_for(date)?;
    let amounts = record.category_amounts();
    let adherence = daily_adherence(&amounts, &profile.targets);

    if json {
        return print_json(&DayView {
            date,
            adherence,
            record: &record,
            targets: &profile.targets,
        });
    }

    #[derive(Tabled)]
    struct PortionRow {
        #[tabled(rename = "Food group")]
        category: &'static str,
        #[tabled(rename = "Logged")]
        logged: String,
        #[tabled(rename = "Target")]
        target: u32,
        #[tabled(rename = "Left")]
        left: String,
    }

    let rows: Vec<PortionRow> = FoodCategory::ALL
        .iter()
        .map(|&category| {
            let logged = amounts.get(category);
            let target = profile.targets.get(category);
            PortionRow {
                category: category.label(),
                logged: format_units(logged),
                target,
                left: format_units((f64::from(target) - logged).max(0.0)),
            }
        })
        .collect();

    println!("=== {date} ===\n");
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!("  Exercise: {}", if record.exercise { "yes" } else { "no" });
    println!("  Adherence: {adherence}%");

    let drinks = record.portions_logged(FoodCategory::Alcohol);
    if alcohol_off_plan(drinks) {
        eprintln!("Note: {drinks} drinks is above the on-plan limit");
    }
    Ok(())
}

pub(crate) fn cmd_history(svc: &Service, days: usize, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Adherence")]
        adherence: String,
        #[tabled(rename = "Water")]
        water: u32,
        #[tabled(rename = "Exercise")]
        exercise: &'static str,
    }

    let history = svc.history(Some(days))?;

    if json {
        return print_json(&history);
    }

    if history.is_empty() {
        eprintln!("No days logged yet");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = history
        .iter()
        .map(|d| HistoryRow {
            date: dates::format_date(d.date),
            adherence: format!("{}%", d.adherence),
            water: d.water,
            exercise: if d.exercise { "yes" } else { "" },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!("Scored against your current targets.");

    Ok(())
}

pub(crate) fn cmd_adherence(svc: &Service, json: bool) -> Result<()> {
    let summary = svc.adherence_summary()?;

    if json {
        return print_json(&summary);
    }
    println!("  Today:      {:>3}%", summary.today);
    println!("  This week:  {:>3}%", summary.week);
    println!("  This month: {:>3}%", summary.month);
    Ok(())
}
