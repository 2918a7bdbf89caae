use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

use crate::adherence::{self, AdherenceSummary};
use crate::dates::{Calendar, SystemCalendar};
use crate::db::RecordStore;
use crate::kv::{KeyValueStore, SqliteStore};
use crate::models::{
    Bracket, DailyRecord, FoodCategory, Profile, ProfileInput, ServingEntry, ServingSize,
    TargetSet, WeightEntry, validate_weight,
};
use crate::targets;
use crate::weight::{self, TimeRange, Trend, WeightChange};

/// One row of the history listing, scored against the current targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAdherence {
    pub date: NaiveDate,
    pub adherence: u32,
    pub water: u32,
    pub exercise: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightStats {
    pub range: TimeRange,
    pub entries: usize,
    pub current: Option<f64>,
    pub goal: Option<f64>,
    pub remaining: Option<f64>,
    pub change: Option<WeightChange>,
    pub trend: Option<Trend>,
}

/// Everything a UI needs: target setup, daily logging, adherence and weight
/// tracking, all against one [`RecordStore`] and one [`Calendar`].
///
/// Calls are synchronous and each runs to completion before returning.
pub struct PortionService<S = SqliteStore, C = SystemCalendar> {
    store: RecordStore<S>,
    calendar: C,
}

impl PortionService<SqliteStore, SystemCalendar> {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self::new(RecordStore::open(db_path)?, SystemCalendar))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(RecordStore::open_in_memory()?, SystemCalendar))
    }
}

impl<S: KeyValueStore, C: Calendar> PortionService<S, C> {
    pub fn new(store: RecordStore<S>, calendar: C) -> Self {
        Self { store, calendar }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar.today()
    }

    // --- Profile & targets ---

    pub fn recommend_targets(&self, input: &ProfileInput) -> Result<(Bracket, TargetSet)> {
        input.validate()?;
        Ok(targets::recommend(input))
    }

    /// Derive targets from `input` and store the result as the profile,
    /// replacing any previous one along with its overrides.
    pub fn create_profile(&self, input: &ProfileInput) -> Result<Profile> {
        let (size_category, targets) = self.recommend_targets(input)?;
        let profile = Profile {
            sex: input.sex,
            current_weight: input.current_weight,
            goal_weight: input.goal_weight,
            goal: input.goal,
            alcohol_opt_in: input.alcohol_opt_in,
            alcohol_servings: if input.alcohol_opt_in {
                input.alcohol_servings
            } else {
                0
            },
            size_category,
            targets,
        };
        self.store.save_profile(&profile)?;
        tracing::info!(bracket = %size_category, goal = ?input.goal, "Profile created");
        Ok(profile)
    }

    /// Re-derive targets from the stored answers using the latest logged
    /// weight. Manual overrides are discarded.
    pub fn recalculate_profile(&self) -> Result<Profile> {
        let profile = self.require_profile()?;
        let entries = self.store.load_weight_entries()?;
        let current_weight =
            weight::current_weight(&entries, Some(&profile)).unwrap_or(profile.current_weight);
        self.create_profile(&ProfileInput {
            sex: profile.sex,
            current_weight,
            goal_weight: profile.goal_weight,
            goal: profile.goal,
            alcohol_opt_in: profile.alcohol_opt_in,
            alcohol_servings: profile.alcohol_servings,
        })
    }

    pub fn override_target(&self, category: FoodCategory, value: u32) -> Result<Profile> {
        let mut profile = self.require_profile()?;
        profile.override_target(category, value);
        if category == FoodCategory::Alcohol {
            profile.alcohol_opt_in = value > 0;
            profile.alcohol_servings = value;
        }
        self.store.save_profile(&profile)?;
        tracing::info!(category = %category, value, "Target overridden");
        Ok(profile)
    }

    pub fn profile(&self) -> Result<Option<Profile>> {
        self.store.load_profile()
    }

    fn require_profile(&self) -> Result<Profile> {
        match self.store.load_profile()? {
            Some(profile) => Ok(profile),
            None => bail!("No profile found. Set up a profile first"),
        }
    }

    // --- Daily logging ---

    /// Stored record for `date`, or a zero-filled one.
    pub fn record_for(&self, date: NaiveDate) -> Result<DailyRecord> {
        self.store.load_or_default_daily_record(date)
    }

    /// Portion units are fixed from the profile's bracket at logging time.
    pub fn log_portion(
        &self,
        date: NaiveDate,
        category: FoodCategory,
        size: ServingSize,
    ) -> Result<DailyRecord> {
        let profile = self.require_profile()?;
        let mut record = self.record_for(date)?;
        record.log_portion(category, ServingEntry::new(size, profile.size_category));
        self.store.save_daily_record(&record)?;
        Ok(record)
    }

    /// Returns false when there was nothing to remove.
    pub fn remove_portion(&self, date: NaiveDate, category: FoodCategory) -> Result<bool> {
        let mut record = self.record_for(date)?;
        if !record.remove_portion(category) {
            return Ok(false);
        }
        self.store.save_daily_record(&record)?;
        Ok(true)
    }

    pub fn set_water(&self, date: NaiveDate, glasses: u32) -> Result<DailyRecord> {
        let mut record = self.record_for(date)?;
        record.set_water(glasses);
        self.store.save_daily_record(&record)?;
        Ok(record)
    }

    pub fn set_exercise(&self, date: NaiveDate, done: bool) -> Result<DailyRecord> {
        let mut record = self.record_for(date)?;
        record.set_exercise(done);
        self.store.save_daily_record(&record)?;
        Ok(record)
    }

    // --- Adherence ---

    pub fn day_adherence(&self, date: NaiveDate) -> Result<u32> {
        let profile = self.require_profile()?;
        let record = self.record_for(date)?;
        Ok(adherence::daily_adherence(
            &record.category_amounts(),
            &profile.targets,
        ))
    }

    pub fn adherence_summary(&self) -> Result<AdherenceSummary> {
        let profile = self.require_profile()?;
        let records = self.store.list_all_daily_records()?;
        Ok(adherence::summarize(&records, &profile.targets, self.today()))
    }

    /// Newest first, optionally limited to the most recent `limit` days on
    /// record.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<DayAdherence>> {
        let profile = self.require_profile()?;
        let records = self.store.list_all_daily_records()?;
        Ok(records
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|r| DayAdherence {
                date: r.date,
                adherence: adherence::daily_adherence(&r.category_amounts(), &profile.targets),
                water: r.water,
                exercise: r.exercise,
            })
            .collect())
    }

    // --- Weight ---

    /// Record a weight in pounds, today unless `date` is given. One entry per
    /// date; logging again replaces it.
    pub fn log_weight(&self, weight: f64, date: Option<NaiveDate>) -> Result<WeightEntry> {
        validate_weight(weight)?;
        let today = self.today();
        let date = date.unwrap_or(today);
        let timestamp = if date == today {
            self.calendar.now_millis()
        } else {
            date.and_hms_opt(12, 0, 0)
                .context("Invalid weight date")?
                .and_utc()
                .timestamp_millis()
        };
        let entry = WeightEntry {
            date,
            weight,
            timestamp,
        };
        self.store.save_weight_entry(entry)?;
        Ok(entry)
    }

    /// Entries within `range`, newest first. With no entries at all, the
    /// profile's weight is logged for today first.
    pub fn weight_history(&self, range: TimeRange) -> Result<Vec<WeightEntry>> {
        let mut entries = self.store.load_weight_entries()?;
        if entries.is_empty() {
            if let Some(profile) = self.store.load_profile()? {
                let seeded = self.log_weight(profile.current_weight, None)?;
                tracing::info!(weight = seeded.weight, "Seeded weight history from profile");
                entries.push(seeded);
            }
        }
        Ok(weight::filter_by_range(
            &entries,
            range,
            self.calendar.now_millis(),
        ))
    }

    pub fn delete_weight(&self, date: NaiveDate) -> Result<bool> {
        self.store.delete_weight_entry(date)
    }

    pub fn weight_stats(&self, range: TimeRange) -> Result<WeightStats> {
        let entries = self.weight_history(range)?;
        let profile = self.store.load_profile()?;
        let current = weight::current_weight(&entries, profile.as_ref());
        let goal = profile.as_ref().and_then(|p| p.goal_weight);
        Ok(WeightStats {
            range,
            entries: entries.len(),
            current,
            goal,
            remaining: current.and_then(|c| weight::remaining_to_goal(c, goal)),
            change: weight::weight_change(&entries),
            trend: weight::trend(&entries),
        })
    }

    // --- Settings ---

    pub fn set_reminder(&self, enabled: bool) -> Result<()> {
        self.store.save_reminder_enabled(enabled)
    }

    pub fn reminder(&self) -> Result<bool> {
        self.store.load_reminder_enabled()
    }

    /// Delete every stored document. Returns the number of keys removed.
    pub fn wipe(&self) -> Result<usize> {
        self.store.wipe_all()
    }
}
