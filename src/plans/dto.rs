use crate::error::FieldErrors;
use crate::plans::reconcile::ReconcileSummary;
use crate::plans::repo::MealPlan;
use crate::plans::tree::PlanTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MAX_DURATION_DAYS: u32 = 30;
pub const MAX_MEALS_PER_DAY: u32 = 6;

/// Shared generate validation; the flow and the endpoint enforce the same
/// ranges so nothing invalid ever reaches the generator.
pub fn validate_generate(
    duration_days: u32,
    meals_per_day: u32,
    name: &str,
) -> BTreeMap<String, String> {
    let mut errs = FieldErrors::new();
    if duration_days < 1 || duration_days > MAX_DURATION_DAYS {
        errs.push("durationDays", "must be between 1 and 30");
    }
    if meals_per_day < 1 || meals_per_day > MAX_MEALS_PER_DAY {
        errs.push("mealsPerDay", "must be between 1 and 6");
    }
    if name.trim().is_empty() {
        errs.push("name", "must not be empty");
    }
    errs.into_map()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub user_id: Uuid,
    pub duration_days: u32,
    pub meals_per_day: u32,
    pub name: String,
}

impl GeneratePlanRequest {
    pub fn validate(&self) -> BTreeMap<String, String> {
        validate_generate(self.duration_days, self.meals_per_day, &self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPlanRequest {
    pub user_id: Uuid,
    pub name: String,
    pub plan: PlanTree,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPlanResponse {
    pub saved_plan: MealPlan,
    pub pantry: ReconcileSummary,
}

/// PATCH body; status arrives as a string so a bad value is a field error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlanListQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_duration() {
        assert!(validate_generate(0, 3, "week").contains_key("durationDays"));
        assert!(validate_generate(31, 3, "week").contains_key("durationDays"));
        assert!(!validate_generate(1, 3, "week").contains_key("durationDays"));
        assert!(!validate_generate(30, 3, "week").contains_key("durationDays"));
    }

    #[test]
    fn rejects_out_of_range_meals_per_day() {
        assert!(validate_generate(7, 0, "week").contains_key("mealsPerDay"));
        assert!(validate_generate(7, 7, "week").contains_key("mealsPerDay"));
        assert!(!validate_generate(7, 6, "week").contains_key("mealsPerDay"));
    }

    #[test]
    fn rejects_blank_name() {
        assert!(validate_generate(7, 3, "").contains_key("name"));
        assert!(validate_generate(7, 3, "   ").contains_key("name"));
        assert!(!validate_generate(7, 3, " week ").contains_key("name"));
    }

    #[test]
    fn collects_all_field_errors_at_once() {
        let errs = validate_generate(0, 7, "");
        assert_eq!(errs.len(), 3);
    }
}
