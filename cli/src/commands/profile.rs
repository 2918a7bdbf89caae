use anyhow::{Result, bail};
use serde::Serialize;

use portion_core::models::{Bracket, FoodCategory, Goal, Profile, ProfileInput, Sex, TargetSet};

use super::Service;
use super::helpers::{print_json, print_profile_summary, print_targets_table, weight_to_lbs};

#[derive(Serialize)]
struct TargetsView<'a> {
    size_category: Bracket,
    targets: &'a TargetSet,
}

fn require_profile(svc: &Service) -> Result<Profile> {
    match svc.profile()? {
        Some(profile) => Ok(profile),
        None => bail!("No profile found. Run `portion setup` first"),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_setup(
    svc: &Service,
    sex: &str,
    weight: f64,
    goal: &str,
    goal_weight: Option<f64>,
    unit: &str,
    alcohol: Option<u32>,
    json: bool,
) -> Result<()> {
    let sex: Sex = sex.parse()?;
    let goal: Goal = goal.parse()?;
    let current_weight = weight_to_lbs(weight, unit)?;
    let goal_weight = goal_weight.map(|w| weight_to_lbs(w, unit)).transpose()?;

    let input = ProfileInput {
        sex,
        current_weight,
        goal_weight,
        goal,
        alcohol_opt_in: alcohol.is_some_and(|n| n > 0),
        alcohol_servings: alcohol.unwrap_or(0),
    };
    let profile = svc.create_profile(&input)?;

    if json {
        return print_json(&profile);
    }
    print_profile_summary(&profile);
    println!();
    print_targets_table(&profile.targets);
    Ok(())
}

pub(crate) fn cmd_targets_show(svc: &Service, json: bool) -> Result<()> {
    let profile = require_profile(svc)?;

    if json {
        return print_json(&TargetsView {
            size_category: profile.size_category,
            targets: &profile.targets,
        });
    }
    print_profile_summary(&profile);
    println!();
    print_targets_table(&profile.targets);
    Ok(())
}

pub(crate) fn cmd_targets_set(svc: &Service, category: &str, value: u32, json: bool) -> Result<()> {
    let category: FoodCategory = category.parse()?;
    require_profile(svc)?;
    let profile = svc.override_target(category, value)?;

    if json {
        return print_json(&TargetsView {
            size_category: profile.size_category,
            targets: &profile.targets,
        });
    }
    println!("{} target set to {value} per day", category.label());
    Ok(())
}

pub(crate) fn cmd_targets_recalculate(svc: &Service, json: bool) -> Result<()> {
    require_profile(svc)?;
    let profile = svc.recalculate_profile()?;

    if json {
        return print_json(&profile);
    }
    println!("Targets recalculated (manual overrides cleared)\n");
    print_profile_summary(&profile);
    println!();
    print_targets_table(&profile.targets);
    Ok(())
}
