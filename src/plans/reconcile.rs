use crate::pantry::repo as pantry_repo;
use crate::pantry::units::{base_symbol, unit_scale, Dimension};
use crate::plans::tree::PlanTree;
use serde::Serialize;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Total usage of one ingredient across the whole plan tree.
///
/// Mass and volume uses are summed in base units (grams/milliliters)
/// regardless of the unit each meal wrote them in; anything else is summed
/// per exact unit string, since "2 unit" and "2 slices" are not addable.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTotal {
    pub key: String,
    pub display_name: String,
    pub dimension: Dimension,
    pub base: f64,
    pub unit: String,
}

pub fn aggregate_uses(tree: &PlanTree) -> Vec<UsageTotal> {
    let mut totals: Vec<UsageTotal> = Vec::new();

    for day in &tree.days {
        for meal in &day.meals {
            for usage in &meal.uses {
                let name = usage.name.trim();
                if name.is_empty() || !usage.quantity.is_finite() || usage.quantity <= 0.0 {
                    continue;
                }
                let key = name.to_lowercase();
                let (dimension, base, unit) = match unit_scale(&usage.unit) {
                    Some((dimension, scale)) => (
                        dimension,
                        usage.quantity * scale,
                        base_symbol(dimension).to_string(),
                    ),
                    None => (
                        Dimension::Other,
                        usage.quantity,
                        usage.unit.trim().to_string(),
                    ),
                };

                let existing = totals.iter_mut().find(|t| {
                    t.key == key
                        && t.dimension == dimension
                        && (dimension != Dimension::Other || t.unit.eq_ignore_ascii_case(&unit))
                });
                match existing {
                    Some(t) => t.base += base,
                    None => totals.push(UsageTotal {
                        key,
                        display_name: name.to_string(),
                        dimension,
                        base,
                        unit,
                    }),
                }
            }
        }
    }

    totals
}

/// Deduction expressed in a pantry row's own unit, if the row is compatible
/// with the usage total: same dimension converts through base units, "other"
/// requires the exact unit string.
pub fn deduction_in_row_units(row_unit: &str, total: &UsageTotal) -> Option<f64> {
    match unit_scale(row_unit) {
        Some((dimension, scale)) if dimension == total.dimension => Some(total.base / scale),
        Some(_) => None,
        None => {
            if total.dimension == Dimension::Other
                && row_unit.trim().eq_ignore_ascii_case(&total.unit)
            {
                Some(total.base)
            } else {
                None
            }
        }
    }
}

/// Clamped decrement: the new quantity never increases and never drops below
/// zero; the second value is the shortfall that could not be covered.
pub fn decremented(current: f64, deduction: f64) -> (f64, f64) {
    if deduction <= 0.0 {
        return (current, 0.0);
    }
    let new = (current - deduction).max(0.0);
    let shortfall = (deduction - current).max(0.0);
    (new, shortfall)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedIngredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    pub shortfall: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIngredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedUse {
    pub name: String,
    pub unit: String,
    pub reason: String,
}

/// What the accept did to the pantry, returned to the client alongside the
/// saved plan.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    pub adjusted: Vec<AdjustedIngredient>,
    pub created: Vec<CreatedIngredient>,
    pub skipped: Vec<SkippedUse>,
}

/// Applies the aggregated usage to the caller's pantry. Must run inside the
/// same transaction that persists the plan: each affected row is locked
/// before the read-then-write, so concurrent accepts serialize instead of
/// losing updates.
///
/// A use with no matching row creates the ingredient at quantity zero, which
/// keeps the shortfall visible in the pantry. A name match with an
/// incompatible unit is skipped and reported.
pub async fn apply(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    totals: &[UsageTotal],
) -> anyhow::Result<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();

    for total in totals {
        let row = pantry_repo::lock_by_name(tx, user_id, &total.display_name).await?;
        match row {
            Some(row) => match deduction_in_row_units(&row.unit, total) {
                Some(deduction) => {
                    let (new_quantity, shortfall) = decremented(row.quantity, deduction);
                    pantry_repo::set_quantity(tx, row.id, new_quantity).await?;
                    debug!(
                        user_id = %user_id,
                        ingredient = %row.name,
                        previous = row.quantity,
                        new = new_quantity,
                        "pantry decremented"
                    );
                    summary.adjusted.push(AdjustedIngredient {
                        id: row.id,
                        name: row.name,
                        unit: row.unit,
                        previous_quantity: row.quantity,
                        new_quantity,
                        shortfall,
                    });
                }
                None => {
                    summary.skipped.push(SkippedUse {
                        name: total.display_name.clone(),
                        unit: total.unit.clone(),
                        reason: format!("incompatible unit \"{}\" in pantry", row.unit),
                    });
                }
            },
            None => {
                let created =
                    pantry_repo::insert_in_tx(tx, user_id, &total.display_name, 0.0, &total.unit)
                        .await?;
                summary.created.push(CreatedIngredient {
                    id: created.id,
                    name: created.name,
                    unit: created.unit,
                });
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::tree::{IngredientUse, PlanDay, PlanMeal, PlanTree};

    fn tree_with_uses(uses: Vec<Vec<IngredientUse>>) -> PlanTree {
        PlanTree {
            meta: Default::default(),
            days: vec![PlanDay {
                meals: uses
                    .into_iter()
                    .map(|u| PlanMeal {
                        name: "meal".into(),
                        calories: 500.0,
                        uses: u,
                        instructions: vec![],
                    })
                    .collect(),
            }],
        }
    }

    fn usage(name: &str, quantity: f64, unit: &str) -> IngredientUse {
        IngredientUse {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    #[test]
    fn aggregates_mass_across_units_in_base_grams() {
        let tree = tree_with_uses(vec![
            vec![usage("Chicken", 300.0, "g")],
            vec![usage("chicken", 0.5, "kg")],
        ]);
        let totals = aggregate_uses(&tree);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].dimension, Dimension::Mass);
        assert_eq!(totals[0].base, 800.0);
        assert_eq!(totals[0].unit, "g");
        assert_eq!(totals[0].display_name, "Chicken");
    }

    #[test]
    fn other_units_aggregate_per_unit_string() {
        let tree = tree_with_uses(vec![
            vec![usage("Egg", 2.0, "unit")],
            vec![usage("egg", 1.0, "unit"), usage("egg", 1.0, "carton")],
        ]);
        let totals = aggregate_uses(&tree);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].base, 3.0);
        assert_eq!(totals[0].unit, "unit");
        assert_eq!(totals[1].base, 1.0);
        assert_eq!(totals[1].unit, "carton");
    }

    #[test]
    fn zero_negative_and_non_finite_uses_are_ignored() {
        let tree = tree_with_uses(vec![vec![
            usage("Salt", 0.0, "g"),
            usage("Oil", -3.0, "mL"),
            usage("Mystery", f64::NAN, "g"),
        ]]);
        assert!(aggregate_uses(&tree).is_empty());
    }

    #[test]
    fn deduction_converts_into_row_units() {
        let total = UsageTotal {
            key: "flour".into(),
            display_name: "Flour".into(),
            dimension: Dimension::Mass,
            base: 500.0,
            unit: "g".into(),
        };
        assert_eq!(deduction_in_row_units("kg", &total), Some(0.5));
        assert_eq!(deduction_in_row_units("g", &total), Some(500.0));
        assert_eq!(deduction_in_row_units("L", &total), None);
        assert_eq!(deduction_in_row_units("bag", &total), None);
    }

    #[test]
    fn other_deduction_requires_exact_unit() {
        let total = UsageTotal {
            key: "egg".into(),
            display_name: "Egg".into(),
            dimension: Dimension::Other,
            base: 2.0,
            unit: "unit".into(),
        };
        assert_eq!(deduction_in_row_units("unit", &total), Some(2.0));
        assert_eq!(deduction_in_row_units("UNIT", &total), Some(2.0));
        assert_eq!(deduction_in_row_units("carton", &total), None);
        assert_eq!(deduction_in_row_units("g", &total), None);
    }

    #[test]
    fn decrement_covers_the_egg_case() {
        // pantry has 12, plan uses 2
        let (new, shortfall) = decremented(12.0, 2.0);
        assert_eq!(new, 10.0);
        assert_eq!(shortfall, 0.0);
    }

    #[test]
    fn decrement_floors_at_zero_and_reports_shortfall() {
        let (new, shortfall) = decremented(1.5, 4.0);
        assert_eq!(new, 0.0);
        assert_eq!(shortfall, 2.5);
    }

    #[test]
    fn decrement_never_increases_quantity() {
        let (new, _) = decremented(7.0, 0.0);
        assert_eq!(new, 7.0);
        let (new, _) = decremented(7.0, -3.0);
        assert_eq!(new, 7.0);
    }
}
