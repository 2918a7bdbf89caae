//! Weight history analytics.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::models::{Profile, WeightEntry};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    #[default]
    #[serde(rename = "30days")]
    Days30,
    #[serde(rename = "60days")]
    Days60,
    #[serde(rename = "90days")]
    Days90,
    All,
}

impl TimeRange {
    /// Oldest timestamp included, relative to `now_millis`.
    #[must_use]
    pub const fn cutoff(self, now_millis: i64) -> i64 {
        let days = match self {
            TimeRange::Week => 7,
            TimeRange::Days30 => 30,
            TimeRange::Days60 => 60,
            TimeRange::Days90 => 90,
            TimeRange::All => return i64::MIN,
        };
        now_millis - days * DAY_MILLIS
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeRange::Week => "week",
            TimeRange::Days30 => "30days",
            TimeRange::Days60 => "60days",
            TimeRange::Days90 => "90days",
            TimeRange::All => "all",
        })
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "week" | "7" | "7days" => Ok(TimeRange::Week),
            "30" | "30days" | "month" => Ok(TimeRange::Days30),
            "60" | "60days" => Ok(TimeRange::Days60),
            "90" | "90days" => Ok(TimeRange::Days90),
            "all" => Ok(TimeRange::All),
            _ => bail!("Invalid time range '{s}'. Must be one of: week, 30days, 60days, 90days, all"),
        }
    }
}

#[must_use]
pub fn filter_by_range(entries: &[WeightEntry], range: TimeRange, now_millis: i64) -> Vec<WeightEntry> {
    let cutoff = range.cutoff(now_millis);
    entries
        .iter()
        .filter(|e| e.timestamp >= cutoff)
        .copied()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightChange {
    /// Pounds, latest minus earliest.
    pub change: f64,
    pub percentage: f64,
}

/// Earliest to latest by timestamp. `None` with fewer than two entries.
#[must_use]
pub fn weight_change(entries: &[WeightEntry]) -> Option<WeightChange> {
    if entries.len() < 2 {
        return None;
    }
    let first = entries.iter().min_by_key(|e| e.timestamp)?;
    let last = entries.iter().max_by_key(|e| e.timestamp)?;
    let change = last.weight - first.weight;
    let percentage = if first.weight > 0.0 {
        change / first.weight * 100.0
    } else {
        0.0
    };
    Some(WeightChange { change, percentage })
}

/// Least-squares line over the entries in time order, x being the position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// Pounds per entry.
    pub slope: f64,
    pub start: f64,
    pub end: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trend(entries: &[WeightEntry]) -> Option<Trend> {
    if entries.len() < 2 {
        return None;
    }
    let mut ordered = entries.to_vec();
    ordered.sort_by_key(|e| e.timestamp);

    let n = ordered.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, entry) in ordered.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += entry.weight;
        sum_xy += x * entry.weight;
        sum_x2 += x * x;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;
    Some(Trend {
        slope,
        start: intercept,
        end: slope * (n - 1.0) + intercept,
    })
}

/// Newest entry, falling back to the profile's weight.
#[must_use]
pub fn current_weight(entries: &[WeightEntry], profile: Option<&Profile>) -> Option<f64> {
    entries
        .iter()
        .max_by_key(|e| e.timestamp)
        .map(|e| e.weight)
        .or_else(|| profile.map(|p| p.current_weight))
}

/// Pounds still to go; negative once past the goal.
#[must_use]
pub fn remaining_to_goal(current: f64, goal: Option<f64>) -> Option<f64> {
    goal.map(|g| current - g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bracket, Goal, Sex, TargetSet};
    use chrono::NaiveDate;

    const NOW: i64 = 1_800_000_000_000;

    fn entry(days_ago: i64, weight: f64) -> WeightEntry {
        let timestamp = NOW - days_ago * DAY_MILLIS;
        WeightEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(200 - days_ago),
            weight,
            timestamp,
        }
    }

    #[test]
    fn test_filter_by_range() {
        let entries = vec![entry(1, 170.0), entry(20, 172.0), entry(45, 175.0), entry(120, 180.0)];
        assert_eq!(filter_by_range(&entries, TimeRange::Week, NOW).len(), 1);
        assert_eq!(filter_by_range(&entries, TimeRange::Days30, NOW).len(), 2);
        assert_eq!(filter_by_range(&entries, TimeRange::Days60, NOW).len(), 3);
        assert_eq!(filter_by_range(&entries, TimeRange::Days90, NOW).len(), 3);
        assert_eq!(filter_by_range(&entries, TimeRange::All, NOW).len(), 4);
    }

    #[test]
    fn test_range_cutoff_is_inclusive() {
        let entries = vec![entry(7, 170.0)];
        assert_eq!(filter_by_range(&entries, TimeRange::Week, NOW).len(), 1);
    }

    #[test]
    fn test_weight_change_uses_timestamps() {
        // newest first, as stored
        let entries = vec![entry(0, 190.0), entry(10, 195.0), entry(20, 200.0)];
        let change = weight_change(&entries).unwrap();
        assert!((change.change - -10.0).abs() < 1e-9);
        assert!((change.percentage - -5.0).abs() < 1e-9);
        assert!(weight_change(&entries[..1]).is_none());
    }

    #[test]
    fn test_trend_on_straight_line() {
        let entries = vec![entry(0, 194.0), entry(1, 196.0), entry(2, 198.0), entry(3, 200.0)];
        let trend = trend(&entries).unwrap();
        assert!((trend.slope - -2.0).abs() < 1e-9);
        assert!((trend.start - 200.0).abs() < 1e-9);
        assert!((trend.end - 194.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_needs_two_points() {
        assert!(trend(&[]).is_none());
        assert!(trend(&[entry(0, 180.0)]).is_none());
    }

    #[test]
    fn test_current_weight_falls_back_to_profile() {
        let profile = Profile {
            sex: Sex::Male,
            current_weight: 205.0,
            goal_weight: None,
            goal: Goal::Maintain,
            alcohol_opt_in: false,
            alcohol_servings: 0,
            size_category: Bracket::Large,
            targets: TargetSet::zero(),
        };
        assert_eq!(current_weight(&[], Some(&profile)), Some(205.0));
        assert_eq!(current_weight(&[], None), None);
        let entries = vec![entry(5, 201.0), entry(0, 199.0)];
        assert_eq!(current_weight(&entries, Some(&profile)), Some(199.0));
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("30".parse::<TimeRange>().unwrap(), TimeRange::Days30);
        assert_eq!("Week".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert!("year".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Days90.to_string(), "90days");
    }

    #[test]
    fn test_remaining_to_goal() {
        assert_eq!(remaining_to_goal(180.0, Some(170.0)), Some(10.0));
        assert_eq!(remaining_to_goal(180.0, None), None);
    }
}
