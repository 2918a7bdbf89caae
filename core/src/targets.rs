//! Bracket classification and the target adjustment pipeline.
//!
//! `recommend` is the usual entry point: classify, look up the baseline row,
//! then adjust for goal and alcohol budget.

use crate::models::{Bracket, FoodCategory, Goal, ProfileInput, Sex, TargetSet};
use crate::table;

/// Weight cut-offs in pounds for one sex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketThresholds {
    /// Weights strictly below this are [`Bracket::Small`].
    pub small_below: f64,
    /// Weights at or below this (and not small) are [`Bracket::Medium`].
    pub medium_up_to: f64,
}

#[must_use]
pub const fn thresholds(sex: Sex) -> BracketThresholds {
    match sex {
        Sex::Male | Sex::Female => BracketThresholds {
            small_below: 150.0,
            medium_up_to: 200.0,
        },
    }
}

/// Assumes `weight > 0`; callers validate first.
#[must_use]
pub fn classify(sex: Sex, weight: f64) -> Bracket {
    let t = thresholds(sex);
    if weight < t.small_below {
        Bracket::Small
    } else if weight <= t.medium_up_to {
        Bracket::Medium
    } else {
        Bracket::Large
    }
}

/// Most drinks that other categories are ever reduced for.
pub const MAX_COMPENSATED_SERVINGS: u32 = 3;

/// Categories that absorb the alcohol budget, in order, each with its floor.
pub const ALCOHOL_COMPENSATION_CHAIN: [(FoodCategory, u32); 3] = [
    (FoodCategory::HealthyCarbs, 1),
    (FoodCategory::Fats, 1),
    (FoodCategory::NutsSeeds, 0),
];

/// Daily drinks above this are shown as off plan. Storage is never capped.
pub const ALCOHOL_ON_PLAN_LIMIT: u32 = 2;

#[must_use]
pub const fn alcohol_off_plan(servings: u32) -> bool {
    servings > ALCOHOL_ON_PLAN_LIMIT
}

#[must_use]
pub fn adjust(
    baseline: TargetSet,
    goal: Goal,
    alcohol_opt_in: bool,
    alcohol_servings: u32,
) -> TargetSet {
    let mut targets = baseline;
    apply_goal(&mut targets, goal);
    apply_alcohol(&mut targets, alcohol_opt_in, alcohol_servings);
    targets
}

fn apply_goal(targets: &mut TargetSet, goal: Goal) {
    match goal {
        Goal::Maintain => {}
        Goal::Lose => {
            increase(targets, FoodCategory::Veggies, 1);
            decrease_to_floor(targets, FoodCategory::Fruit, 1, 1);
            decrease_to_floor(targets, FoodCategory::HealthyCarbs, 1, 0);
            decrease_to_floor(targets, FoodCategory::Fats, 1, 1);
            let dairy = targets.get(FoodCategory::Dairy).min(1);
            targets.set(FoodCategory::Dairy, dairy);
        }
        Goal::Build => {
            increase(targets, FoodCategory::Protein, 1);
            increase(targets, FoodCategory::HealthyCarbs, 1);
            let dairy = targets.get(FoodCategory::Dairy).saturating_add(1).min(2);
            targets.set(FoodCategory::Dairy, dairy);
        }
    }
}

fn apply_alcohol(targets: &mut TargetSet, opt_in: bool, servings: u32) {
    if !opt_in {
        targets.set(FoodCategory::Alcohol, 0);
        return;
    }
    targets.set(FoodCategory::Alcohol, servings);
    let required = servings.min(MAX_COMPENSATED_SERVINGS);
    let unapplied = reduce_along_chain(targets, required, &ALCOHOL_COMPENSATION_CHAIN);
    if unapplied > 0 {
        tracing::debug!(unapplied, "Alcohol compensation chain exhausted");
    }
}

/// Walk `chain` in order, taking what each category has above its floor until
/// `required` is met. Returns the reduction that could not be applied.
///
/// Only lowers: a category at or under its floor is skipped untouched.
fn reduce_along_chain(
    targets: &mut TargetSet,
    mut required: u32,
    chain: &[(FoodCategory, u32)],
) -> u32 {
    for &(category, floor) in chain {
        if required == 0 {
            break;
        }
        let current = targets.get(category);
        let available = current.saturating_sub(floor);
        let take = required.min(available);
        targets.set(category, current - take);
        required -= take;
    }
    required
}

fn increase(targets: &mut TargetSet, category: FoodCategory, by: u32) {
    targets.set(category, targets.get(category).saturating_add(by));
}

/// Lower by `by`, never ending below `floor`. A value that starts under the
/// floor is lifted to it.
fn decrease_to_floor(targets: &mut TargetSet, category: FoodCategory, by: u32, floor: u32) {
    let current = targets.get(category);
    targets.set(category, current.saturating_sub(by).max(floor));
}

/// Full derivation for a set of setup answers.
#[must_use]
pub fn recommend(input: &ProfileInput) -> (Bracket, TargetSet) {
    let bracket = classify(input.sex, input.current_weight);
    let baseline = table::baseline(input.sex, bracket, input.goal);
    let targets = adjust(
        baseline,
        input.goal,
        input.alcohol_opt_in,
        input.alcohol_servings,
    );
    tracing::debug!(
        sex = ?input.sex,
        bracket = %bracket,
        goal = ?input.goal,
        total = targets.total(),
        "Recommended targets"
    );
    (bracket, targets)
}
