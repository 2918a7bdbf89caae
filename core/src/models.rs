use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A nutrition group tracked against a daily target.
///
/// Variant order is display order and doubles as the index into
/// [`TargetSet`] and [`CategoryAmounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodCategory {
    Protein,
    Veggies,
    Fruit,
    HealthyCarbs,
    Legumes,
    NutsSeeds,
    Fats,
    Dairy,
    Water,
    Alcohol,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 10] = [
        FoodCategory::Protein,
        FoodCategory::Veggies,
        FoodCategory::Fruit,
        FoodCategory::HealthyCarbs,
        FoodCategory::Legumes,
        FoodCategory::NutsSeeds,
        FoodCategory::Fats,
        FoodCategory::Dairy,
        FoodCategory::Water,
        FoodCategory::Alcohol,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stored document key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            FoodCategory::Protein => "protein",
            FoodCategory::Veggies => "veggies",
            FoodCategory::Fruit => "fruit",
            FoodCategory::HealthyCarbs => "healthyCarbs",
            FoodCategory::Legumes => "legumes",
            FoodCategory::NutsSeeds => "nutsSeeds",
            FoodCategory::Fats => "fats",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Water => "water",
            FoodCategory::Alcohol => "alcohol",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FoodCategory::Protein => "Protein",
            FoodCategory::Veggies => "Veggies",
            FoodCategory::Fruit => "Fruit",
            FoodCategory::HealthyCarbs => "Healthy Carbs",
            FoodCategory::Legumes => "Legumes",
            FoodCategory::NutsSeeds => "Nuts & Seeds",
            FoodCategory::Fats => "Fats",
            FoodCategory::Dairy => "Dairy",
            FoodCategory::Water => "Water",
            FoodCategory::Alcohol => "Alcohol",
        }
    }

    /// Categories whose amounts live in the per-category maps of a
    /// [`DailyRecord`]. Water is always a bare integer on the record itself.
    pub fn food_groups() -> impl Iterator<Item = FoodCategory> {
        Self::ALL.into_iter().filter(|c| *c != FoodCategory::Water)
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FoodCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "protein" => Ok(FoodCategory::Protein),
            "veggies" | "vegetables" | "veg" => Ok(FoodCategory::Veggies),
            "fruit" | "fruits" => Ok(FoodCategory::Fruit),
            "healthycarbs" | "carbs" | "wholegrains" | "grains" => Ok(FoodCategory::HealthyCarbs),
            "legumes" => Ok(FoodCategory::Legumes),
            "nutsseeds" | "nuts" | "seeds" => Ok(FoodCategory::NutsSeeds),
            "fats" | "fat" => Ok(FoodCategory::Fats),
            "dairy" => Ok(FoodCategory::Dairy),
            "water" => Ok(FoodCategory::Water),
            "alcohol" | "drinks" => Ok(FoodCategory::Alcohol),
            _ => bail!(
                "Invalid food category '{s}'. Must be one of: {}",
                FoodCategory::ALL.map(FoodCategory::key).join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "male",
            Sex::Female => "female",
        })
    }
}

impl FromStr for Sex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => bail!("Invalid sex '{s}'. Must be one of: male, female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Build,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Lose, Goal::Maintain, Goal::Build];
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Build => "build",
        })
    }
}

impl FromStr for Goal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "build" => Ok(Goal::Build),
            _ => bail!("Invalid goal '{s}'. Must be one of: lose, maintain, build"),
        }
    }
}

/// Coarse body-size class selecting a baseline target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bracket {
    #[serde(rename = "S", alias = "small")]
    Small,
    #[serde(rename = "M", alias = "medium")]
    Medium,
    #[serde(rename = "L", alias = "large")]
    Large,
}

impl Bracket {
    pub const ALL: [Bracket; 3] = [Bracket::Small, Bracket::Medium, Bracket::Large];
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bracket::Small => "S",
            Bracket::Medium => "M",
            Bracket::Large => "L",
        })
    }
}

/// Size class picked when logging a single serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServingSize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl ServingSize {
    /// Portion units credited for one serving of this size, scaled to the
    /// body-size bracket of the person logging it.
    #[must_use]
    pub const fn units_for(self, bracket: Bracket) -> f64 {
        match (bracket, self) {
            (Bracket::Small, ServingSize::Small) => 0.75,
            (Bracket::Small, ServingSize::Medium) => 1.25,
            (Bracket::Small, ServingSize::Large) => 2.0,
            (Bracket::Medium, ServingSize::Small) => 0.5,
            (Bracket::Medium, ServingSize::Medium) => 1.0,
            (Bracket::Medium, ServingSize::Large) => 1.5,
            (Bracket::Large, ServingSize::Small) => 0.5,
            (Bracket::Large, ServingSize::Medium) => 0.75,
            (Bracket::Large, ServingSize::Large) => 1.25,
        }
    }
}

impl FromStr for ServingSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s" | "small" => Ok(ServingSize::Small),
            "m" | "medium" => Ok(ServingSize::Medium),
            "l" | "large" => Ok(ServingSize::Large),
            _ => bail!("Invalid serving size '{s}'. Must be one of: S, M, L"),
        }
    }
}

/// Daily portion goal for every [`FoodCategory`].
///
/// Always carries the full category set; deserialization rejects a map that
/// is missing any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FoodCategory, u32>",
    into = "BTreeMap<FoodCategory, u32>"
)]
pub struct TargetSet([u32; FoodCategory::COUNT]);

impl TargetSet {
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; FoodCategory::COUNT])
    }

    #[must_use]
    pub const fn get(&self, category: FoodCategory) -> u32 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: FoodCategory, value: u32) {
        self.0[category.index()] = value;
    }

    #[must_use]
    pub fn with(mut self, category: FoodCategory, value: u32) -> Self {
        self.set(category, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (FoodCategory, u32)> + '_ {
        FoodCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl Index<FoodCategory> for TargetSet {
    type Output = u32;

    fn index(&self, category: FoodCategory) -> &u32 {
        &self.0[category.index()]
    }
}

impl TryFrom<BTreeMap<FoodCategory, u32>> for TargetSet {
    type Error = String;

    fn try_from(map: BTreeMap<FoodCategory, u32>) -> Result<Self, Self::Error> {
        let mut targets = TargetSet::zero();
        for category in FoodCategory::ALL {
            let value = map
                .get(&category)
                .ok_or_else(|| format!("missing target for category '{category}'"))?;
            targets.set(category, *value);
        }
        Ok(targets)
    }
}

impl From<TargetSet> for BTreeMap<FoodCategory, u32> {
    fn from(targets: TargetSet) -> Self {
        targets.iter().collect()
    }
}

/// Per-category consumed amount in portion units, fractional under the
/// serving model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryAmounts([f64; FoodCategory::COUNT]);

impl CategoryAmounts {
    #[must_use]
    pub const fn zero() -> Self {
        Self([0.0; FoodCategory::COUNT])
    }

    #[must_use]
    pub const fn get(&self, category: FoodCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: FoodCategory, value: f64) {
        self.0[category.index()] = value.max(0.0);
    }

    #[must_use]
    pub fn with(mut self, category: FoodCategory, value: f64) -> Self {
        self.set(category, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (FoodCategory, f64)> + '_ {
        FoodCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}

impl Serialize for CategoryAmounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingEntry {
    pub size: ServingSize,
    /// Portion units this serving counts for, fixed when it was logged.
    pub units: f64,
}

impl ServingEntry {
    #[must_use]
    pub const fn new(size: ServingSize, bracket: Bracket) -> Self {
        Self {
            size,
            units: size.units_for(bracket),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountModel {
    Counts,
    Servings,
}

/// How a day's consumption is recorded. Water is never part of these maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum Amounts {
    /// Flat integer count per category (records carried over from older
    /// app versions).
    Counts { counts: BTreeMap<FoodCategory, u32> },
    /// Ordered list of sized servings per category.
    Servings {
        servings: BTreeMap<FoodCategory, Vec<ServingEntry>>,
    },
}

impl Amounts {
    #[must_use]
    pub fn model(&self) -> AmountModel {
        match self {
            Amounts::Counts { .. } => AmountModel::Counts,
            Amounts::Servings { .. } => AmountModel::Servings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub amounts: Amounts,
    #[serde(default)]
    pub water: u32,
    #[serde(default)]
    pub exercise: bool,
}

impl DailyRecord {
    /// Zero-filled record under the serving model.
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            amounts: Amounts::Servings {
                servings: FoodCategory::food_groups().map(|c| (c, Vec::new())).collect(),
            },
            water: 0,
            exercise: false,
        }
    }

    /// Zero-filled record under the flat-count model.
    #[must_use]
    pub fn empty_counts(date: NaiveDate) -> Self {
        Self {
            date,
            amounts: Amounts::Counts {
                counts: FoodCategory::food_groups().map(|c| (c, 0)).collect(),
            },
            water: 0,
            exercise: false,
        }
    }

    #[must_use]
    pub fn model(&self) -> AmountModel {
        self.amounts.model()
    }

    /// Record one portion. Under the count model this adds exactly one,
    /// whatever the serving size.
    pub fn log_portion(&mut self, category: FoodCategory, entry: ServingEntry) {
        if category == FoodCategory::Water {
            self.water = self.water.saturating_add(1);
            return;
        }
        match &mut self.amounts {
            Amounts::Counts { counts } => {
                let count = counts.entry(category).or_insert(0);
                *count = count.saturating_add(1);
            }
            Amounts::Servings { servings } => servings.entry(category).or_default().push(entry),
        }
    }

    /// Undo the most recent portion. Returns false when there was nothing to
    /// remove.
    pub fn remove_portion(&mut self, category: FoodCategory) -> bool {
        if category == FoodCategory::Water {
            if self.water == 0 {
                return false;
            }
            self.water -= 1;
            return true;
        }
        match &mut self.amounts {
            Amounts::Counts { counts } => match counts.get_mut(&category) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    true
                }
                _ => false,
            },
            Amounts::Servings { servings } => servings
                .get_mut(&category)
                .and_then(Vec::pop)
                .is_some(),
        }
    }

    pub fn set_water(&mut self, glasses: u32) {
        self.water = glasses;
    }

    pub fn set_exercise(&mut self, done: bool) {
        self.exercise = done;
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn category_amounts(&self) -> CategoryAmounts {
        let mut amounts = CategoryAmounts::zero();
        match &self.amounts {
            Amounts::Counts { counts } => {
                for (category, count) in counts {
                    amounts.set(*category, f64::from(*count));
                }
            }
            Amounts::Servings { servings } => {
                for (category, entries) in servings {
                    amounts.set(*category, entries.iter().map(|e| e.units).sum());
                }
            }
        }
        amounts.set(FoodCategory::Water, f64::from(self.water));
        amounts
    }

    /// Number of portions logged for a category (entries, not units).
    #[must_use]
    pub fn portions_logged(&self, category: FoodCategory) -> u32 {
        if category == FoodCategory::Water {
            return self.water;
        }
        match &self.amounts {
            Amounts::Counts { counts } => counts.get(&category).copied().unwrap_or(0),
            Amounts::Servings { servings } => servings
                .get(&category)
                .map_or(0, |entries| u32::try_from(entries.len()).unwrap_or(u32::MAX)),
        }
    }

    /// Fill every food-group slot and fold any stray water entry into the
    /// `water` field.
    pub fn normalize(&mut self) {
        match &mut self.amounts {
            Amounts::Counts { counts } => {
                if let Some(stray) = counts.remove(&FoodCategory::Water) {
                    self.water = self.water.saturating_add(stray);
                }
                for category in FoodCategory::food_groups() {
                    counts.entry(category).or_insert(0);
                }
            }
            Amounts::Servings { servings } => {
                if let Some(stray) = servings.remove(&FoodCategory::Water) {
                    let stray = u32::try_from(stray.len()).unwrap_or(u32::MAX);
                    self.water = self.water.saturating_add(stray);
                }
                for category in FoodCategory::food_groups() {
                    servings.entry(category).or_default();
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub date: NaiveDate,
    /// Pounds.
    pub weight: f64,
    /// Unix milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub sex: Sex,
    /// Pounds.
    pub current_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
    pub goal: Goal,
    pub alcohol_opt_in: bool,
    pub alcohol_servings: u32,
    pub size_category: Bracket,
    pub targets: TargetSet,
}

impl Profile {
    /// Manual override of a single target; the only partial mutation a
    /// profile allows.
    pub fn override_target(&mut self, category: FoodCategory, value: u32) {
        self.targets.set(category, value);
    }
}

/// Caller-supplied setup answers from which a [`Profile`] is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInput {
    pub sex: Sex,
    pub current_weight: f64,
    pub goal_weight: Option<f64>,
    pub goal: Goal,
    pub alcohol_opt_in: bool,
    pub alcohol_servings: u32,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<()> {
        validate_weight(self.current_weight)?;
        if let Some(goal_weight) = self.goal_weight {
            validate_weight(goal_weight)
                .map_err(|_| anyhow::anyhow!("Goal weight must be a positive number"))?;
        }
        Ok(())
    }
}

pub fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        bail!("Weight must be a positive number (got {weight})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_category_keys_match_serde_names() {
        for category in FoodCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_category_from_str_aliases() {
        assert_eq!(
            "healthy-carbs".parse::<FoodCategory>().unwrap(),
            FoodCategory::HealthyCarbs
        );
        assert_eq!(
            "Whole Grains".parse::<FoodCategory>().unwrap(),
            FoodCategory::HealthyCarbs
        );
        assert_eq!("nuts".parse::<FoodCategory>().unwrap(), FoodCategory::NutsSeeds);
        assert!("candy".parse::<FoodCategory>().is_err());
    }

    #[test]
    fn test_target_set_serializes_full_map() {
        let targets = TargetSet::zero().with(FoodCategory::Protein, 5);
        let value = serde_json::to_value(targets).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), FoodCategory::COUNT);
        assert_eq!(object["protein"], 5);
        assert_eq!(object["healthyCarbs"], 0);
    }

    #[test]
    fn test_target_set_rejects_missing_category() {
        let json = r#"{"protein":5,"veggies":5}"#;
        assert!(serde_json::from_str::<TargetSet>(json).is_err());
    }

    #[test]
    fn test_target_set_rejects_unknown_category() {
        let mut value = serde_json::to_value(TargetSet::zero()).unwrap();
        value["candy"] = serde_json::json!(1);
        assert!(serde_json::from_value::<TargetSet>(value).is_err());
    }

    #[test]
    fn test_bracket_accepts_legacy_spelling() {
        let bracket: Bracket = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(bracket, Bracket::Medium);
        assert_eq!(serde_json::to_string(&bracket).unwrap(), "\"M\"");
    }

    #[test]
    fn test_log_portion_serving_model_uses_entry_units() {
        let mut record = DailyRecord::empty(date("2026-10-14"));
        record.log_portion(
            FoodCategory::Protein,
            ServingEntry::new(ServingSize::Large, Bracket::Medium),
        );
        record.log_portion(
            FoodCategory::Protein,
            ServingEntry::new(ServingSize::Small, Bracket::Medium),
        );
        assert!((record.category_amounts().get(FoodCategory::Protein) - 2.0).abs() < f64::EPSILON);
        assert_eq!(record.portions_logged(FoodCategory::Protein), 2);
    }

    #[test]
    fn test_log_portion_count_model_adds_one() {
        let mut record = DailyRecord::empty_counts(date("2026-10-14"));
        record.log_portion(
            FoodCategory::Fruit,
            ServingEntry::new(ServingSize::Large, Bracket::Small),
        );
        assert!((record.category_amounts().get(FoodCategory::Fruit) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_water_is_bare_integer() {
        let mut record = DailyRecord::empty(date("2026-10-14"));
        record.log_portion(
            FoodCategory::Water,
            ServingEntry::new(ServingSize::Large, Bracket::Small),
        );
        assert_eq!(record.water, 1);
        let Amounts::Servings { servings } = &record.amounts else {
            panic!("expected serving model");
        };
        assert!(!servings.contains_key(&FoodCategory::Water));
    }

    #[test]
    fn test_remove_portion_never_goes_negative() {
        let mut record = DailyRecord::empty_counts(date("2026-10-14"));
        assert!(!record.remove_portion(FoodCategory::Dairy));
        assert!(!record.remove_portion(FoodCategory::Water));
        assert_eq!(record.portions_logged(FoodCategory::Dairy), 0);

        let mut record = DailyRecord::empty(date("2026-10-14"));
        record.log_portion(
            FoodCategory::Dairy,
            ServingEntry::new(ServingSize::Medium, Bracket::Medium),
        );
        assert!(record.remove_portion(FoodCategory::Dairy));
        assert!(!record.remove_portion(FoodCategory::Dairy));
    }

    #[test]
    fn test_normalize_moves_stray_water() {
        let mut record = DailyRecord {
            date: date("2026-10-14"),
            amounts: Amounts::Counts {
                counts: BTreeMap::from([(FoodCategory::Water, 4), (FoodCategory::Protein, 2)]),
            },
            water: 0,
            exercise: false,
        };
        record.normalize();
        assert_eq!(record.water, 4);
        let Amounts::Counts { counts } = &record.amounts else {
            panic!("expected count model");
        };
        assert_eq!(counts.len(), FoodCategory::COUNT - 1);
        assert_eq!(counts[&FoodCategory::Protein], 2);
    }

    #[test]
    fn test_serving_units_table() {
        use Bracket::{Large as BL, Medium as BM, Small as BS};
        use ServingSize::{Large, Medium, Small};
        let expected = [
            (BS, [(Small, 0.75), (Medium, 1.25), (Large, 2.0)]),
            (BM, [(Small, 0.5), (Medium, 1.0), (Large, 1.5)]),
            (BL, [(Small, 0.5), (Medium, 0.75), (Large, 1.25)]),
        ];
        for (bracket, row) in expected {
            for (size, units) in row {
                assert!(
                    (size.units_for(bracket) - units).abs() < f64::EPSILON,
                    "{bracket}/{size:?}"
                );
            }
            assert!(Small.units_for(bracket) < Medium.units_for(bracket));
            assert!(Medium.units_for(bracket) < Large.units_for(bracket));
        }
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(165.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-3.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_profile_input_rejects_bad_goal_weight() {
        let input = ProfileInput {
            sex: Sex::Female,
            current_weight: 160.0,
            goal_weight: Some(0.0),
            goal: Goal::Lose,
            alcohol_opt_in: false,
            alcohol_servings: 0,
        };
        assert!(input.validate().is_err());
    }
}
