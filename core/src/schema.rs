//! Stored document generations and their migration to the current shape.
//!
//! Every document read from the store passes through [`ProfileDocument::parse`]
//! or [`DailyDocument::parse`] exactly once; nothing past this module sees a
//! legacy shape. Migration renames and defaults fields but never rescales.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Amounts, DailyRecord, FoodCategory, Goal, Profile, Sex, TargetSet};
use crate::targets;

pub const CURRENT_VERSION: u64 = 3;

const VERSION_FIELD: &str = "schemaVersion";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("unsupported schema version {0}")]
    UnsupportedVersion(String),
    #[error("document dated {found} stored under {expected}")]
    DateMismatch {
        expected: NaiveDate,
        found: NaiveDate,
    },
}

/// Sex as written by v1 and v2 profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacySex {
    Male,
    Female,
    PreferNotToSay,
}

impl From<LegacySex> for Sex {
    fn from(sex: LegacySex) -> Self {
        match sex {
            LegacySex::Male => Sex::Male,
            // prefer-not-to-say always used the female rows
            LegacySex::Female | LegacySex::PreferNotToSay => Sex::Female,
        }
    }
}

/// Flat per-category integers shared by v1/v2 targets and daily portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPortions {
    pub protein: u32,
    pub veggies: u32,
    pub fruit: u32,
    #[serde(alias = "healthyCarbs")]
    pub whole_grains: u32,
    /// Absent before v2.
    pub legumes: Option<u32>,
    pub nuts_seeds: u32,
    pub fats: u32,
    pub dairy: u32,
    pub water: u32,
    pub alcohol: u32,
}

impl LegacyPortions {
    fn get(&self, category: FoodCategory) -> u32 {
        match category {
            FoodCategory::Protein => self.protein,
            FoodCategory::Veggies => self.veggies,
            FoodCategory::Fruit => self.fruit,
            FoodCategory::HealthyCarbs => self.whole_grains,
            FoodCategory::Legumes => self.legumes.unwrap_or(0),
            FoodCategory::NutsSeeds => self.nuts_seeds,
            FoodCategory::Fats => self.fats,
            FoodCategory::Dairy => self.dairy,
            FoodCategory::Water => self.water,
            FoodCategory::Alcohol => self.alcohol,
        }
    }

    fn to_targets(self) -> TargetSet {
        let mut targets = TargetSet::zero();
        for category in FoodCategory::ALL {
            targets.set(category, self.get(category));
        }
        targets
    }

    fn to_counts(self) -> BTreeMap<FoodCategory, u32> {
        FoodCategory::food_groups()
            .map(|c| (c, self.get(c)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileV1 {
    pub sex: LegacySex,
    pub current_weight: f64,
    #[serde(default)]
    pub goal_weight: Option<f64>,
    pub goal: Goal,
    pub targets: LegacyPortions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileV2 {
    #[serde(flatten)]
    pub base: ProfileV1,
    pub alcohol_goal: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileDocument {
    V1(ProfileV1),
    V2(ProfileV2),
    V3(Profile),
}

impl ProfileDocument {
    pub fn parse(raw: &str) -> Result<Self, DocumentError> {
        let object = parse_object(raw)?;
        let version = match declared_version(&object)? {
            Some(v) => v,
            None if object.contains_key("alcoholGoal") => 2,
            None => 1,
        };
        let value = Value::Object(object);
        Ok(match version {
            1 => ProfileDocument::V1(serde_json::from_value(value)?),
            2 => ProfileDocument::V2(serde_json::from_value(value)?),
            _ => ProfileDocument::V3(serde_json::from_value(value)?),
        })
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            ProfileDocument::V1(_) => 1,
            ProfileDocument::V2(_) => 2,
            ProfileDocument::V3(_) => 3,
        }
    }

    #[must_use]
    pub fn migrate(self) -> Profile {
        match self {
            ProfileDocument::V1(v1) => {
                let servings = v1.targets.alcohol;
                migrate_legacy_profile(v1, servings)
            }
            ProfileDocument::V2(v2) => migrate_legacy_profile(v2.base, v2.alcohol_goal),
            ProfileDocument::V3(profile) => profile,
        }
    }
}

fn migrate_legacy_profile(legacy: ProfileV1, alcohol_servings: u32) -> Profile {
    let sex = Sex::from(legacy.sex);
    Profile {
        sex,
        current_weight: legacy.current_weight,
        // older setups stored 0 when no goal weight was entered
        goal_weight: legacy.goal_weight.filter(|w| *w > 0.0),
        goal: legacy.goal,
        alcohol_opt_in: alcohol_servings > 0,
        alcohol_servings,
        size_category: targets::classify(sex, legacy.current_weight),
        targets: legacy.targets.to_targets(),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyV1 {
    pub date: NaiveDate,
    #[serde(default)]
    pub portions: LegacyPortions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyV2 {
    #[serde(flatten)]
    pub base: DailyV1,
    #[serde(default)]
    pub exercise: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DailyDocument {
    V1(DailyV1),
    V2(DailyV2),
    V3(DailyRecord),
}

impl DailyDocument {
    /// Parse a document stored under `expected_date`'s key. A document whose
    /// own date disagrees with its key is rejected.
    pub fn parse(raw: &str, expected_date: NaiveDate) -> Result<Self, DocumentError> {
        let object = parse_object(raw)?;
        let version = match declared_version(&object)? {
            Some(v) => v,
            None if is_daily_v2(&object) => 2,
            None => 1,
        };
        let value = Value::Object(object);
        let document = match version {
            1 => DailyDocument::V1(serde_json::from_value(value)?),
            2 => DailyDocument::V2(serde_json::from_value(value)?),
            _ => DailyDocument::V3(serde_json::from_value(value)?),
        };
        let found = document.date();
        if found != expected_date {
            return Err(DocumentError::DateMismatch {
                expected: expected_date,
                found,
            });
        }
        Ok(document)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            DailyDocument::V1(d) => d.date,
            DailyDocument::V2(d) => d.base.date,
            DailyDocument::V3(d) => d.date,
        }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            DailyDocument::V1(_) => 1,
            DailyDocument::V2(_) => 2,
            DailyDocument::V3(_) => 3,
        }
    }

    #[must_use]
    pub fn migrate(self) -> DailyRecord {
        let mut record = match self {
            DailyDocument::V1(v1) => migrate_legacy_daily(v1, false),
            DailyDocument::V2(v2) => migrate_legacy_daily(v2.base, v2.exercise),
            DailyDocument::V3(record) => record,
        };
        record.normalize();
        record
    }
}

fn migrate_legacy_daily(legacy: DailyV1, exercise: bool) -> DailyRecord {
    DailyRecord {
        date: legacy.date,
        amounts: Amounts::Counts {
            counts: legacy.portions.to_counts(),
        },
        water: legacy.portions.water,
        exercise,
    }
}

fn is_daily_v2(object: &Map<String, Value>) -> bool {
    object.contains_key("exercise")
        || object
            .get("portions")
            .and_then(Value::as_object)
            .is_some_and(|p| p.contains_key("legumes"))
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, DocumentError> {
    match serde_json::from_str(raw)? {
        Value::Object(object) => Ok(object),
        _ => Err(DocumentError::NotAnObject),
    }
}

fn declared_version(object: &Map<String, Value>) -> Result<Option<u64>, DocumentError> {
    let Some(value) = object.get(VERSION_FIELD) else {
        return Ok(None);
    };
    match value.as_u64() {
        Some(v @ 1..=CURRENT_VERSION) => Ok(Some(v)),
        _ => Err(DocumentError::UnsupportedVersion(value.to_string())),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Versioned<'a, T> {
    schema_version: u64,
    #[serde(flatten)]
    doc: &'a T,
}

/// Current-generation JSON for a profile.
pub fn encode_profile(profile: &Profile) -> serde_json::Result<String> {
    serde_json::to_string(&Versioned {
        schema_version: CURRENT_VERSION,
        doc: profile,
    })
}

/// Current-generation JSON for a daily record.
pub fn encode_daily(record: &DailyRecord) -> serde_json::Result<String> {
    serde_json::to_string(&Versioned {
        schema_version: CURRENT_VERSION,
        doc: record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AmountModel, Bracket, ServingEntry, ServingSize};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const V1_PROFILE: &str = r#"{
        "sex": "prefer-not-to-say",
        "currentWeight": 172,
        "goalWeight": 0,
        "goal": "lose",
        "targets": {
            "protein": 4, "veggies": 6, "fruit": 1, "wholeGrains": 2,
            "nutsSeeds": 1, "fats": 1, "dairy": 1, "water": 8, "alcohol": 1
        }
    }"#;

    const V2_PROFILE: &str = r#"{
        "sex": "male",
        "currentWeight": 210.5,
        "goalWeight": 190,
        "goal": "build",
        "alcoholGoal": 2,
        "targets": {
            "protein": 7, "veggies": 6, "fruit": 3, "wholeGrains": 5, "legumes": 2,
            "nutsSeeds": 1, "fats": 3, "dairy": 2, "water": 10, "alcohol": 0
        }
    }"#;

    #[test]
    fn test_detects_profile_generations() {
        assert_eq!(ProfileDocument::parse(V1_PROFILE).unwrap().version(), 1);
        assert_eq!(ProfileDocument::parse(V2_PROFILE).unwrap().version(), 2);
    }

    #[test]
    fn test_v1_profile_migration() {
        let profile = ProfileDocument::parse(V1_PROFILE).unwrap().migrate();
        assert_eq!(profile.sex, Sex::Female);
        assert_eq!(profile.goal_weight, None);
        assert_eq!(profile.size_category, Bracket::Medium);
        assert!(profile.alcohol_opt_in);
        assert_eq!(profile.alcohol_servings, 1);
        // whole grains copied verbatim into healthy carbs
        assert_eq!(profile.targets.get(FoodCategory::HealthyCarbs), 2);
        assert_eq!(profile.targets.get(FoodCategory::Legumes), 0);
        assert_eq!(profile.targets.get(FoodCategory::Veggies), 6);
    }

    #[test]
    fn test_v2_profile_migration() {
        let profile = ProfileDocument::parse(V2_PROFILE).unwrap().migrate();
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.goal_weight, Some(190.0));
        assert_eq!(profile.size_category, Bracket::Large);
        assert!(profile.alcohol_opt_in);
        assert_eq!(profile.alcohol_servings, 2);
        assert_eq!(profile.targets.get(FoodCategory::HealthyCarbs), 5);
        assert_eq!(profile.targets.get(FoodCategory::Legumes), 2);
    }

    #[test]
    fn test_profile_migration_is_idempotent() {
        let once = ProfileDocument::parse(V2_PROFILE).unwrap().migrate();
        let encoded = encode_profile(&once).unwrap();
        let document = ProfileDocument::parse(&encoded).unwrap();
        assert_eq!(document.version(), CURRENT_VERSION);
        assert_eq!(document.migrate(), once);
    }

    #[test]
    fn test_encoded_profile_carries_version() {
        let profile = ProfileDocument::parse(V1_PROFILE).unwrap().migrate();
        let value: Value = serde_json::from_str(&encode_profile(&profile).unwrap()).unwrap();
        assert_eq!(value["schemaVersion"], 3);
        assert_eq!(value["sizeCategory"], "M");
        assert_eq!(value["targets"]["healthyCarbs"], 2);
        assert!(value.get("goalWeight").is_none());
    }

    #[test]
    fn test_rejects_non_object_and_future_versions() {
        assert!(matches!(
            ProfileDocument::parse("[1,2]"),
            Err(DocumentError::NotAnObject)
        ));
        assert!(matches!(
            ProfileDocument::parse(r#"{"schemaVersion": 9}"#),
            Err(DocumentError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            ProfileDocument::parse(r#"{"schemaVersion": "3"}"#),
            Err(DocumentError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            ProfileDocument::parse("{not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_v3_profile_missing_targets_is_malformed() {
        let raw = r#"{"schemaVersion":3,"sex":"male","currentWeight":180,"goal":"maintain",
            "alcoholOptIn":false,"alcoholServings":0,"sizeCategory":"M",
            "targets":{"protein":5}}"#;
        assert!(ProfileDocument::parse(raw).is_err());
    }

    #[test]
    fn test_v1_daily_migration() {
        let raw = r#"{"date":"2026-03-02","portions":{"protein":3,"wholeGrains":2,"water":5}}"#;
        let document = DailyDocument::parse(raw, date("2026-03-02")).unwrap();
        assert_eq!(document.version(), 1);
        let record = document.migrate();
        assert_eq!(record.model(), AmountModel::Counts);
        assert_eq!(record.water, 5);
        assert!(!record.exercise);
        assert_eq!(record.portions_logged(FoodCategory::HealthyCarbs), 2);
        assert_eq!(record.portions_logged(FoodCategory::Legumes), 0);
        let Amounts::Counts { counts } = &record.amounts else {
            panic!("expected count model");
        };
        assert!(!counts.contains_key(&FoodCategory::Water));
        assert_eq!(counts.len(), FoodCategory::COUNT - 1);
    }

    #[test]
    fn test_v2_daily_detected_by_exercise_or_legumes() {
        let with_exercise = r#"{"date":"2026-03-02","portions":{"protein":1},"exercise":true}"#;
        let document = DailyDocument::parse(with_exercise, date("2026-03-02")).unwrap();
        assert_eq!(document.version(), 2);
        assert!(document.migrate().exercise);

        let with_legumes = r#"{"date":"2026-03-02","portions":{"legumes":2}}"#;
        let document = DailyDocument::parse(with_legumes, date("2026-03-02")).unwrap();
        assert_eq!(document.version(), 2);
        assert_eq!(document.migrate().portions_logged(FoodCategory::Legumes), 2);
    }

    #[test]
    fn test_daily_date_must_match_key() {
        let raw = r#"{"date":"2026-03-02","portions":{}}"#;
        assert!(matches!(
            DailyDocument::parse(raw, date("2026-03-03")),
            Err(DocumentError::DateMismatch { .. })
        ));
    }

    #[test]
    fn test_daily_negative_count_is_malformed() {
        let raw = r#"{"date":"2026-03-02","portions":{"protein":-1}}"#;
        assert!(DailyDocument::parse(raw, date("2026-03-02")).is_err());
    }

    #[test]
    fn test_current_daily_round_trip() {
        let mut record = DailyRecord::empty(date("2026-10-14"));
        record.log_portion(
            FoodCategory::Fruit,
            ServingEntry::new(ServingSize::Large, Bracket::Small),
        );
        record.set_water(3);
        record.set_exercise(true);
        let encoded = encode_daily(&record).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["amounts"]["model"], "servings");
        assert_eq!(value["schemaVersion"], 3);

        let document = DailyDocument::parse(&encoded, record.date).unwrap();
        assert_eq!(document.version(), 3);
        assert_eq!(document.migrate(), record);
    }

    #[test]
    fn test_daily_migration_is_idempotent() {
        let raw = r#"{"date":"2026-03-02","portions":{"protein":3,"legumes":1,"water":2},"exercise":false}"#;
        let once = DailyDocument::parse(raw, date("2026-03-02")).unwrap().migrate();
        let again = DailyDocument::parse(&encode_daily(&once).unwrap(), once.date)
            .unwrap()
            .migrate();
        assert_eq!(again, once);
    }
}
