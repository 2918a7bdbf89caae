//! Baseline daily portions per (sex, bracket, goal).
//!
//! Values are tuned guidance, not a formula, so every cell is spelled out.
//! The match is exhaustive: a missing combination fails the build.
//! Goal deltas are not baked into this generation's cells; see
//! [`crate::targets::adjust`].

use crate::models::{Bracket, FoodCategory, Goal, Sex, TargetSet};

struct Row {
    protein: u32,
    veggies: u32,
    fruit: u32,
    healthy_carbs: u32,
    legumes: u32,
    nuts_seeds: u32,
    fats: u32,
    dairy: u32,
    water: u32,
    alcohol: u32,
}

impl From<Row> for TargetSet {
    fn from(row: Row) -> Self {
        TargetSet::zero()
            .with(FoodCategory::Protein, row.protein)
            .with(FoodCategory::Veggies, row.veggies)
            .with(FoodCategory::Fruit, row.fruit)
            .with(FoodCategory::HealthyCarbs, row.healthy_carbs)
            .with(FoodCategory::Legumes, row.legumes)
            .with(FoodCategory::NutsSeeds, row.nuts_seeds)
            .with(FoodCategory::Fats, row.fats)
            .with(FoodCategory::Dairy, row.dairy)
            .with(FoodCategory::Water, row.water)
            .with(FoodCategory::Alcohol, row.alcohol)
    }
}

#[must_use]
#[rustfmt::skip]
#[allow(clippy::too_many_lines, clippy::match_same_arms)]
pub fn baseline(sex: Sex, bracket: Bracket, goal: Goal) -> TargetSet {
    use Bracket::{Large, Medium, Small};
    use Goal::{Build, Lose, Maintain};
    use Sex::{Female, Male};

    let row = match (sex, bracket, goal) {
        // --- Female ---
        (Female, Small, Lose) => Row {
            protein: 3, veggies: 4, fruit: 2, healthy_carbs: 2, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Small, Maintain) => Row {
            protein: 3, veggies: 4, fruit: 2, healthy_carbs: 2, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Small, Build) => Row {
            protein: 3, veggies: 4, fruit: 2, healthy_carbs: 2, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Medium, Lose) => Row {
            protein: 4, veggies: 5, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Medium, Maintain) => Row {
            protein: 4, veggies: 5, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Medium, Build) => Row {
            protein: 4, veggies: 5, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Female, Large, Lose) => Row {
            protein: 5, veggies: 6, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },
        (Female, Large, Maintain) => Row {
            protein: 5, veggies: 6, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },
        (Female, Large, Build) => Row {
            protein: 5, veggies: 6, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },

        // --- Male ---
        (Male, Small, Lose) => Row {
            protein: 4, veggies: 4, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Male, Small, Maintain) => Row {
            protein: 4, veggies: 4, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Male, Small, Build) => Row {
            protein: 4, veggies: 4, fruit: 2, healthy_carbs: 3, legumes: 1,
            nuts_seeds: 1, fats: 2, dairy: 1, water: 8, alcohol: 0,
        },
        (Male, Medium, Lose) => Row {
            protein: 5, veggies: 5, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },
        (Male, Medium, Maintain) => Row {
            protein: 5, veggies: 5, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },
        (Male, Medium, Build) => Row {
            protein: 5, veggies: 5, fruit: 3, healthy_carbs: 3, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 1, water: 10, alcohol: 0,
        },
        (Male, Large, Lose) => Row {
            protein: 6, veggies: 6, fruit: 3, healthy_carbs: 4, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 2, water: 10, alcohol: 0,
        },
        (Male, Large, Maintain) => Row {
            protein: 6, veggies: 6, fruit: 3, healthy_carbs: 4, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 2, water: 10, alcohol: 0,
        },
        (Male, Large, Build) => Row {
            protein: 6, veggies: 6, fruit: 3, healthy_carbs: 4, legumes: 2,
            nuts_seeds: 1, fats: 3, dairy: 2, water: 10, alcohol: 0,
        },
    };
    row.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cells() -> impl Iterator<Item = (Sex, Bracket, Goal)> {
        Sex::ALL.into_iter().flat_map(|sex| {
            Bracket::ALL
                .into_iter()
                .flat_map(move |bracket| Goal::ALL.into_iter().map(move |goal| (sex, bracket, goal)))
        })
    }

    #[test]
    fn test_every_cell_has_full_category_set() {
        assert_eq!(all_cells().count(), 18);
        for (sex, bracket, goal) in all_cells() {
            let targets = baseline(sex, bracket, goal);
            let map = serde_json::to_value(targets).unwrap();
            assert_eq!(
                map.as_object().unwrap().len(),
                FoodCategory::COUNT,
                "{sex:?}/{bracket:?}/{goal:?}"
            );
        }
    }

    #[test]
    fn test_every_cell_has_real_targets() {
        for (sex, bracket, goal) in all_cells() {
            let targets = baseline(sex, bracket, goal);
            assert!(targets.get(FoodCategory::Protein) > 0);
            assert!(targets.get(FoodCategory::Water) >= 8);
            assert_eq!(targets.get(FoodCategory::Alcohol), 0);
        }
    }

    #[test]
    fn test_larger_brackets_never_get_less_protein() {
        for sex in Sex::ALL {
            for goal in Goal::ALL {
                let small = baseline(sex, Bracket::Small, goal).get(FoodCategory::Protein);
                let medium = baseline(sex, Bracket::Medium, goal).get(FoodCategory::Protein);
                let large = baseline(sex, Bracket::Large, goal).get(FoodCategory::Protein);
                assert!(small <= medium && medium <= large);
            }
        }
    }

    #[test]
    fn test_known_cells() {
        let t = baseline(Sex::Male, Bracket::Large, Goal::Maintain);
        assert_eq!(t.get(FoodCategory::Protein), 6);
        assert_eq!(t.get(FoodCategory::HealthyCarbs), 4);
        assert_eq!(t.get(FoodCategory::Dairy), 2);

        let t = baseline(Sex::Female, Bracket::Small, Goal::Lose);
        assert_eq!(t.get(FoodCategory::Protein), 3);
        assert_eq!(t.get(FoodCategory::Veggies), 4);
        assert_eq!(t.get(FoodCategory::Water), 8);
    }
}
