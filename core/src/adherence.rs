//! Adherence scoring: capped achieved portions over target portions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::models::{CategoryAmounts, DailyRecord, FoodCategory, TargetSet};

/// Percentage 0..=100 for one day. Each category counts at most its own
/// target, and a target set of all zeros scores 0.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn daily_adherence(amounts: &CategoryAmounts, targets: &TargetSet) -> u32 {
    let mut achieved = 0.0;
    let mut possible = 0.0;
    for category in FoodCategory::ALL {
        let target = f64::from(targets.get(category));
        achieved += amounts.get(category).min(target);
        possible += target;
    }
    if possible <= 0.0 {
        return 0;
    }
    (100.0 * achieved / possible).round().clamp(0.0, 100.0) as u32
}

/// Mean of the per-day percentages for every record dated on or after
/// `start`. Days are equally weighted; totals are never pooled.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn period_adherence(records: &[DailyRecord], targets: &TargetSet, start: NaiveDate) -> u32 {
    let scores: Vec<u32> = records
        .iter()
        .filter(|r| r.date >= start)
        .map(|r| daily_adherence(&r.category_amounts(), targets))
        .collect();
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().sum();
    (f64::from(sum) / scores.len() as f64).round() as u32
}

/// Since the most recent Sunday.
#[must_use]
pub fn weekly_adherence(records: &[DailyRecord], targets: &TargetSet, today: NaiveDate) -> u32 {
    period_adherence(records, targets, dates::week_start(today))
}

/// Since the first of the month.
#[must_use]
pub fn monthly_adherence(records: &[DailyRecord], targets: &TargetSet, today: NaiveDate) -> u32 {
    period_adherence(records, targets, dates::month_start(today))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdherenceSummary {
    pub today: u32,
    pub week: u32,
    pub month: u32,
}

/// Today's score comes from today's record alone; a missing record scores 0.
#[must_use]
pub fn summarize(records: &[DailyRecord], targets: &TargetSet, today: NaiveDate) -> AdherenceSummary {
    let today_score = records
        .iter()
        .find(|r| r.date == today)
        .map_or(0, |r| daily_adherence(&r.category_amounts(), targets));
    AdherenceSummary {
        today: today_score,
        week: weekly_adherence(records, targets, today),
        month: monthly_adherence(records, targets, today),
    }
}
