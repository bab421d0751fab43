use serde::{Deserialize, Serialize};

/// The nested structure produced by generation and persisted on accept.
/// Every field is defaulted so a partially-shaped tree degrades to empty
/// collections instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanTree {
    pub meta: PlanMeta,
    pub days: Vec<PlanDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanMeta {
    pub duration_days: u32,
    pub meals_per_day: u32,
    pub target_calories_per_day: f64,
    pub cuisine_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanDay {
    pub meals: Vec<PlanMeal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanMeal {
    pub name: String,
    pub calories: f64,
    pub uses: Vec<IngredientUse>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngredientUse {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl PlanTree {
    /// Advisory shape check: days match the declared duration and each day
    /// has the declared number of meals.
    pub fn shape_matches_meta(&self) -> bool {
        self.days.len() == self.meta.duration_days as usize
            && self
                .days
                .iter()
                .all(|d| d.meals.len() == self.meta.meals_per_day as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_fields() {
        let tree: PlanTree = serde_json::from_str(r#"{"days":[{}]}"#).unwrap();
        assert_eq!(tree.days.len(), 1);
        assert!(tree.days[0].meals.is_empty());
        assert_eq!(tree.meta.duration_days, 0);
    }

    #[test]
    fn wire_casing_is_camel_case() {
        let json = serde_json::to_value(PlanTree {
            meta: PlanMeta {
                duration_days: 2,
                meals_per_day: 3,
                target_calories_per_day: 2100.0,
                cuisine_style: Some("thai".into()),
            },
            days: vec![],
        })
        .unwrap();
        assert_eq!(json["meta"]["durationDays"], 2);
        assert_eq!(json["meta"]["mealsPerDay"], 3);
        assert_eq!(json["meta"]["cuisineStyle"], "thai");
    }

    #[test]
    fn shape_check_matches_meta() {
        let mut tree: PlanTree = serde_json::from_value(serde_json::json!({
            "meta": { "durationDays": 1, "mealsPerDay": 2 },
            "days": [ { "meals": [ {}, {} ] } ]
        }))
        .unwrap();
        assert!(tree.shape_matches_meta());

        tree.days[0].meals.pop();
        assert!(!tree.shape_matches_meta());
    }
}
