use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::dates;
use crate::kv::{KeyValueStore, SqliteStore};
use crate::models::{AmountModel, DailyRecord, Profile, WeightEntry};
use crate::schema::{self, CURRENT_VERSION, DailyDocument, ProfileDocument};

/// Every key this app writes starts with this.
pub const NAMESPACE: &str = "@portion_tracker_";

const PROFILE_KEY: &str = "@portion_tracker_profile";
const DAILY_PREFIX: &str = "@portion_tracker_daily_";
const SERVINGS_PREFIX: &str = "@portion_tracker_servings_";
const REMINDER_KEY: &str = "@portion_tracker_reminder_enabled";
const LEGACY_REMINDER_KEY: &str = "@portion_tracker_reminder";
const WEIGHT_ENTRIES_KEY: &str = "@portion_tracker_weight_entries";

fn record_key(model: AmountModel, date: NaiveDate) -> String {
    let prefix = match model {
        AmountModel::Counts => DAILY_PREFIX,
        AmountModel::Servings => SERVINGS_PREFIX,
    };
    format!("{prefix}{}", dates::format_date(date))
}

/// Typed persistence for profile, daily records, weight entries and the
/// reminder flag on top of any [`KeyValueStore`].
///
/// Reads migrate legacy documents and write the current shape back, so each
/// stored document is migrated at most once. A document that cannot be
/// parsed is logged and read as absent; backend failures propagate.
pub struct RecordStore<S> {
    store: S,
}

impl RecordStore<SqliteStore> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(SqliteStore::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S) -> Self {
        RecordStore { store }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    // --- Profile ---

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let raw = schema::encode_profile(profile).context("Failed to encode profile")?;
        self.store
            .set(PROFILE_KEY, &raw)
            .context("Failed to save profile")?;
        tracing::debug!(bracket = %profile.size_category, "Profile saved");
        Ok(())
    }

    pub fn load_profile(&self) -> Result<Option<Profile>> {
        let Some(raw) = self.store.get(PROFILE_KEY).context("Failed to load profile")? else {
            return Ok(None);
        };
        let document = match ProfileDocument::parse(&raw) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(key = PROFILE_KEY, error = %e, "Ignoring malformed profile");
                return Ok(None);
            }
        };
        let version = document.version();
        let profile = document.migrate();
        if version < CURRENT_VERSION {
            self.save_profile(&profile)?;
            tracing::info!(from = version, to = CURRENT_VERSION, "Migrated profile");
        }
        Ok(Some(profile))
    }

    // --- Daily records ---

    /// Stores the record under its amount model's key and drops any record
    /// for the same date under the other model.
    pub fn save_daily_record(&self, record: &DailyRecord) -> Result<()> {
        let raw = schema::encode_daily(record).context("Failed to encode daily record")?;
        let (key, other) = match record.model() {
            AmountModel::Servings => (
                record_key(AmountModel::Servings, record.date),
                record_key(AmountModel::Counts, record.date),
            ),
            AmountModel::Counts => (
                record_key(AmountModel::Counts, record.date),
                record_key(AmountModel::Servings, record.date),
            ),
        };
        self.store
            .set(&key, &raw)
            .with_context(|| format!("Failed to save daily record for {}", record.date))?;
        self.store
            .remove(&other)
            .with_context(|| format!("Failed to clear stale record for {}", record.date))?;
        tracing::debug!(date = %record.date, key = %key, "Daily record saved");
        Ok(())
    }

    pub fn load_daily_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        for model in [AmountModel::Servings, AmountModel::Counts] {
            let key = record_key(model, date);
            let raw = self
                .store
                .get(&key)
                .with_context(|| format!("Failed to load daily record for {date}"))?;
            let Some(raw) = raw else { continue };
            if let Some(record) = self.decode_daily(&key, &raw, date)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Zero-filled serving-model record when nothing is stored for `date`.
    pub fn load_or_default_daily_record(&self, date: NaiveDate) -> Result<DailyRecord> {
        Ok(self
            .load_daily_record(date)?
            .unwrap_or_else(|| DailyRecord::empty(date)))
    }

    /// Every stored record, newest date first. A date with a serving-model
    /// record never reads its legacy count record.
    pub fn list_all_daily_records(&self) -> Result<Vec<DailyRecord>> {
        let mut dated = Vec::new();
        for key in self.store.keys().context("Failed to list keys")? {
            let (suffix, model) = if let Some(s) = key.strip_prefix(SERVINGS_PREFIX) {
                (s, AmountModel::Servings)
            } else if let Some(s) = key.strip_prefix(DAILY_PREFIX) {
                (s, AmountModel::Counts)
            } else {
                continue;
            };
            match dates::parse_date(suffix) {
                Ok(date) => dated.push((key.clone(), date, model)),
                Err(_) => tracing::warn!(key = %key, "Skipping daily key with malformed date"),
            }
        }
        // servings first so a legacy document is only decoded for dates without one
        dated.sort_by_key(|(_, date, model)| (*model != AmountModel::Servings, *date));

        let keys: Vec<String> = dated.iter().map(|(k, _, _)| k.clone()).collect();
        let values = self
            .store
            .multi_get(&keys)
            .context("Failed to load daily records")?;

        let mut by_date: BTreeMap<NaiveDate, DailyRecord> = BTreeMap::new();
        for ((key, date, _), (_, raw)) in dated.into_iter().zip(values) {
            if by_date.contains_key(&date) {
                continue;
            }
            let Some(raw) = raw else { continue };
            if let Some(record) = self.decode_daily(&key, &raw, date)? {
                by_date.insert(date, record);
            }
        }
        Ok(by_date.into_values().rev().collect())
    }

    /// Migrated documents are written back under `key` only; nothing else is
    /// touched.
    fn decode_daily(&self, key: &str, raw: &str, date: NaiveDate) -> Result<Option<DailyRecord>> {
        let document = match DailyDocument::parse(raw, date) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring malformed daily record");
                return Ok(None);
            }
        };
        let version = document.version();
        let record = document.migrate();
        if version < CURRENT_VERSION {
            let migrated = schema::encode_daily(&record).context("Failed to encode daily record")?;
            self.store
                .set(key, &migrated)
                .with_context(|| format!("Failed to save migrated record for {date}"))?;
            tracing::info!(date = %date, from = version, to = CURRENT_VERSION, "Migrated daily record");
        }
        Ok(Some(record))
    }

    // --- Weight entries ---

    /// Newest first by timestamp. Unreadable entries are skipped.
    pub fn load_weight_entries(&self) -> Result<Vec<WeightEntry>> {
        let Some(raw) = self
            .store
            .get(WEIGHT_ENTRIES_KEY)
            .context("Failed to load weight entries")?
        else {
            return Ok(Vec::new());
        };
        let items = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(key = WEIGHT_ENTRIES_KEY, "Weight entries document is not an array");
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::warn!(key = WEIGHT_ENTRIES_KEY, error = %e, "Ignoring malformed weight entries");
                return Ok(Vec::new());
            }
        };
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<WeightEntry>(item) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed weight entry"),
            }
        }
        sort_weight_entries(&mut entries);
        Ok(entries)
    }

    /// Replaces the entry for the same date, otherwise appends.
    pub fn save_weight_entry(&self, entry: WeightEntry) -> Result<()> {
        let mut entries = self.load_weight_entries()?;
        if let Some(existing) = entries.iter_mut().find(|e| e.date == entry.date) {
            *existing = entry;
        } else {
            entries.push(entry);
        }
        sort_weight_entries(&mut entries);
        self.write_weight_entries(&entries)?;
        tracing::debug!(date = %entry.date, weight = entry.weight, "Weight entry saved");
        Ok(())
    }

    pub fn delete_weight_entry(&self, date: NaiveDate) -> Result<bool> {
        let mut entries = self.load_weight_entries()?;
        let before = entries.len();
        entries.retain(|e| e.date != date);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_weight_entries(&entries)?;
        Ok(true)
    }

    fn write_weight_entries(&self, entries: &[WeightEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("Failed to encode weight entries")?;
        self.store
            .set(WEIGHT_ENTRIES_KEY, &raw)
            .context("Failed to save weight entries")
    }

    // --- Reminder ---

    pub fn save_reminder_enabled(&self, enabled: bool) -> Result<()> {
        let raw = serde_json::to_string(&enabled)?;
        self.store
            .set(REMINDER_KEY, &raw)
            .context("Failed to save reminder setting")?;
        self.store.remove(LEGACY_REMINDER_KEY)?;
        Ok(())
    }

    /// Defaults to off. Reads the older key once and moves it over.
    pub fn load_reminder_enabled(&self) -> Result<bool> {
        let current = self
            .store
            .get(REMINDER_KEY)
            .context("Failed to load reminder setting")?;
        let (raw, legacy) = match current {
            Some(raw) => (raw, false),
            None => match self.store.get(LEGACY_REMINDER_KEY)? {
                Some(raw) => (raw, true),
                None => return Ok(false),
            },
        };
        let enabled = match serde_json::from_str::<bool>(&raw) {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed reminder setting");
                return Ok(false);
            }
        };
        if legacy {
            self.save_reminder_enabled(enabled)?;
            tracing::info!("Migrated reminder setting");
        }
        Ok(enabled)
    }

    // --- Wipe ---

    /// Remove every namespaced key. Keys outside the namespace are left alone.
    /// Returns the number of keys removed.
    pub fn wipe_all(&self) -> Result<usize> {
        let keys = self.namespaced_keys()?;
        if keys.is_empty() {
            return Ok(0);
        }
        if let Err(e) = self.store.multi_remove(&keys) {
            tracing::warn!(error = %e, "Bulk removal failed, retrying key by key");
        }

        let survivors = self.namespaced_keys()?;
        for key in &survivors {
            self.store
                .remove(key)
                .with_context(|| format!("Failed to remove {key}"))?;
        }

        let remaining = self.namespaced_keys()?;
        if !remaining.is_empty() {
            bail!(
                "Wipe incomplete: {} key(s) could not be removed: {}",
                remaining.len(),
                remaining.join(", ")
            );
        }
        tracing::info!(removed = keys.len(), retried = survivors.len(), "Wiped all data");
        Ok(keys.len())
    }

    fn namespaced_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .keys()
            .context("Failed to list keys")?
            .into_iter()
            .filter(|k| k.starts_with(NAMESPACE))
            .collect())
    }
}

fn sort_weight_entries(entries: &mut [WeightEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
