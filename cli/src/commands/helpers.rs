use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use portion_core::dates;
use portion_core::models::{FoodCategory, Profile, TargetSet};
use portion_core::targets::alcohol_off_plan;

pub(crate) const LBS_PER_KG: f64 = 2.20462;

/// Resolve a date argument against `today`.
pub(crate) fn parse_date(date_str: Option<String>, today: NaiveDate) -> Result<NaiveDate> {
    match date_str.as_deref() {
        None | Some("today") => Ok(today),
        Some("yesterday") => Ok(dates::shift_days(today, -1)),
        Some("tomorrow") => Ok(dates::shift_days(today, 1)),
        Some(s) => dates::parse_date(s).context("Use YYYY-MM-DD or today/yesterday/tomorrow"),
    }
}

/// Convert a weight in `unit` to pounds, the stored unit.
pub(crate) fn weight_to_lbs(value: f64, unit: &str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        bail!("Weight must be greater than 0");
    }
    match unit.to_lowercase().as_str() {
        "lbs" | "lb" => Ok(value),
        "kg" => {
            let lbs = value * LBS_PER_KG;
            eprintln!("Converting {value:.1} kg → {lbs:.1} lbs");
            Ok(lbs)
        }
        _ => bail!("Invalid unit '{unit}'. Use 'lbs' or 'kg'"),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Portion units without trailing zeros: 2, 1.5, 0.75.
pub(crate) fn format_units(units: f64) -> String {
    let s = format!("{:.2}", no_neg_zero(units));
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn print_targets_table(targets: &TargetSet) {
    #[derive(Tabled)]
    struct TargetRow {
        #[tabled(rename = "Food group")]
        category: &'static str,
        #[tabled(rename = "Portions/day")]
        target: u32,
    }

    let rows: Vec<TargetRow> = targets
        .iter()
        .map(|(category, target)| TargetRow {
            category: category.label(),
            target,
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_profile_summary(profile: &Profile) {
    println!(
        "Profile: {}, {:.1} lbs, goal {}, size {}",
        profile.sex, profile.current_weight, profile.goal, profile.size_category
    );
    if let Some(goal_weight) = profile.goal_weight {
        println!("  Goal weight: {goal_weight:.1} lbs");
    }
    let alcohol = profile.targets.get(FoodCategory::Alcohol);
    if alcohol_off_plan(alcohol) {
        eprintln!("Note: {alcohol} drinks a day is above the on-plan limit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_parse_date_none() {
        assert_eq!(parse_date(None, today()).unwrap(), today());
    }

    #[test]
    fn test_parse_date_keywords() {
        assert_eq!(parse_date(Some("today".to_string()), today()).unwrap(), today());
        assert_eq!(
            parse_date(Some("yesterday".to_string()), today()).unwrap(),
            today() - chrono::Duration::days(1)
        );
        assert_eq!(
            parse_date(Some("tomorrow".to_string()), today()).unwrap(),
            today() + chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string()), today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        let err = parse_date(Some("nope".to_string()), today()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("today/yesterday/tomorrow"));
        assert!(message.contains("Invalid date 'nope'"));
        assert!(parse_date(Some("2026/10/14".to_string()), today()).is_err());
    }

    #[test]
    fn test_weight_to_lbs() {
        assert!((weight_to_lbs(180.0, "lbs").unwrap() - 180.0).abs() < f64::EPSILON);
        assert!((weight_to_lbs(100.0, "KG").unwrap() - 220.462).abs() < 1e-9);
        assert!(weight_to_lbs(0.0, "lbs").is_err());
        assert!(weight_to_lbs(80.0, "stone").is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(2.0), "2");
        assert_eq!(format_units(1.5), "1.5");
        assert_eq!(format_units(0.75), "0.75");
        assert_eq!(format_units(0.0), "0");
        assert_eq!(format_units(-0.0), "0");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("boom"), r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
    }
}
