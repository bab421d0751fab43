use crate::plans::reconcile::aggregate_uses;
use crate::plans::tree::PlanTree;
use serde::Serialize;

/// Display form of a generated or saved plan. Pure read: any shape the tree
/// arrives in renders to something, a hole in the data just renders empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreview {
    pub name: Option<String>,
    pub cuisine_style: Option<String>,
    pub days: Vec<DayPreview>,
    pub shopping: Vec<ShoppingLine>,
    pub total_calories: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPreview {
    pub label: String,
    pub meals: Vec<MealLine>,
    pub calories: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLine {
    pub name: String,
    pub calories: f64,
    pub instructions: Vec<String>,
}

/// One aggregated ingredient line across the whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

pub fn render(tree: &PlanTree) -> PlanPreview {
    let days = tree
        .days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let meals: Vec<MealLine> = day
                .meals
                .iter()
                .map(|m| MealLine {
                    name: m.name.clone(),
                    calories: if m.calories.is_finite() { m.calories } else { 0.0 },
                    instructions: m.instructions.clone(),
                })
                .collect();
            let calories = meals.iter().map(|m| m.calories).sum();
            DayPreview {
                label: format!("Day {}", i + 1),
                meals,
                calories,
            }
        })
        .collect::<Vec<_>>();

    let total_calories = days.iter().map(|d| d.calories).sum();

    let shopping = aggregate_uses(tree)
        .into_iter()
        .map(|t| ShoppingLine {
            name: t.display_name,
            quantity: t.base,
            unit: t.unit,
        })
        .collect();

    PlanPreview {
        name: None,
        cuisine_style: tree.meta.cuisine_style.clone(),
        days,
        shopping,
        total_calories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::tree::{IngredientUse, PlanDay, PlanMeal};

    #[test]
    fn empty_tree_renders_empty_preview() {
        let preview = render(&PlanTree::default());
        assert!(preview.days.is_empty());
        assert!(preview.shopping.is_empty());
        assert_eq!(preview.total_calories, 0.0);
    }

    #[test]
    fn sums_calories_per_day_and_overall() {
        let tree = PlanTree {
            meta: Default::default(),
            days: vec![
                PlanDay {
                    meals: vec![
                        PlanMeal {
                            name: "Oats".into(),
                            calories: 400.0,
                            ..Default::default()
                        },
                        PlanMeal {
                            name: "Curry".into(),
                            calories: 700.0,
                            ..Default::default()
                        },
                    ],
                },
                PlanDay {
                    meals: vec![PlanMeal {
                        name: "Stir fry".into(),
                        calories: 650.0,
                        ..Default::default()
                    }],
                },
            ],
        };
        let preview = render(&tree);
        assert_eq!(preview.days[0].label, "Day 1");
        assert_eq!(preview.days[0].calories, 1100.0);
        assert_eq!(preview.days[1].calories, 650.0);
        assert_eq!(preview.total_calories, 1750.0);
    }

    #[test]
    fn shopping_lines_are_aggregated_in_base_units() {
        let tree = PlanTree {
            meta: Default::default(),
            days: vec![PlanDay {
                meals: vec![
                    PlanMeal {
                        name: "a".into(),
                        uses: vec![IngredientUse {
                            name: "Rice".into(),
                            quantity: 0.2,
                            unit: "kg".into(),
                        }],
                        ..Default::default()
                    },
                    PlanMeal {
                        name: "b".into(),
                        uses: vec![IngredientUse {
                            name: "rice".into(),
                            quantity: 100.0,
                            unit: "g".into(),
                        }],
                        ..Default::default()
                    },
                ],
            }],
        };
        let preview = render(&tree);
        assert_eq!(preview.shopping.len(), 1);
        assert_eq!(preview.shopping[0].quantity, 300.0);
        assert_eq!(preview.shopping[0].unit, "g");
    }

    #[test]
    fn non_finite_calories_render_as_zero() {
        let tree = PlanTree {
            meta: Default::default(),
            days: vec![PlanDay {
                meals: vec![PlanMeal {
                    name: "odd".into(),
                    calories: f64::NAN,
                    ..Default::default()
                }],
            }],
        };
        let preview = render(&tree);
        assert_eq!(preview.days[0].calories, 0.0);
    }
}
