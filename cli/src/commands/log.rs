use anyhow::Result;
use std::process;

use portion_core::models::{DailyRecord, FoodCategory, ServingSize};

use super::Service;
use super::helpers::{format_units, json_error, parse_date, print_json};

fn progress_line(svc: &Service, record: &DailyRecord, category: FoodCategory) -> Result<String> {
    let logged = format_units(record.category_amounts().get(category));
    let target = svc
        .profile()?
        .map_or(0, |p| p.targets.get(category));
    Ok(format!("{}: {logged} / {target}", category.label()))
}

pub(crate) fn cmd_log(
    svc: &Service,
    category: &str,
    size: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let category: FoodCategory = category.parse()?;
    let size: ServingSize = size.parse()?;
    let date = parse_date(date, svc.today())?;

    let record = svc.log_portion(date, category, size)?;

    if json {
        return print_json(&record);
    }
    println!("Logged for {date}. {}", progress_line(svc, &record, category)?);
    Ok(())
}

pub(crate) fn cmd_unlog(
    svc: &Service,
    category: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let category: FoodCategory = category.parse()?;
    let date = parse_date(date, svc.today())?;

    if !svc.remove_portion(date, category)? {
        let message = format!("No {} portions logged for {date}", category.label());
        if json {
            println!("{}", json_error(&message));
        } else {
            eprintln!("{message}");
        }
        process::exit(2);
    }

    let record = svc.record_for(date)?;
    if json {
        return print_json(&record);
    }
    println!("Removed one portion. {}", progress_line(svc, &record, category)?);
    Ok(())
}

pub(crate) fn cmd_water(svc: &Service, glasses: u32, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date, svc.today())?;
    let record = svc.set_water(date, glasses)?;

    if json {
        return print_json(&record);
    }
    println!("{}", progress_line(svc, &record, FoodCategory::Water)?);
    Ok(())
}

pub(crate) fn cmd_exercise(svc: &Service, done: bool, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date, svc.today())?;
    let record = svc.set_exercise(date, done)?;

    if json {
        return print_json(&record);
    }
    if record.exercise {
        println!("Exercise recorded for {date}");
    } else {
        println!("Exercise cleared for {date}");
    }
    Ok(())
}
