use crate::plans::tree::{IngredientUse, PlanDay, PlanMeal, PlanMeta, PlanTree};
use crate::users::profile::{FitnessGoal, FitnessLevel, Gender};
use crate::users::repo::User;
use axum::async_trait;

/// Parameters the generator needs beyond the user profile.
#[derive(Debug, Clone, Copy)]
pub struct GenerateSpec {
    pub duration_days: u32,
    pub meals_per_day: u32,
}

/// Produces an unsaved plan tree for a user. The content source is opaque to
/// the rest of the app; it could be a model, a rules engine, or the built-in
/// template rotation below.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, user: &User, spec: GenerateSpec) -> anyhow::Result<PlanTree>;
}

struct MealTemplate {
    name: &'static str,
    calorie_share: f64,
    uses: &'static [(&'static str, f64, &'static str)],
    instructions: &'static [&'static str],
}

const TEMPLATES: &[MealTemplate] = &[
    MealTemplate {
        name: "Overnight oats with berries",
        calorie_share: 1.0,
        uses: &[("Oats", 80.0, "g"), ("Milk", 200.0, "mL"), ("Berries", 60.0, "g")],
        instructions: &["Combine oats and milk", "Refrigerate overnight", "Top with berries"],
    },
    MealTemplate {
        name: "Chicken and rice bowl",
        calorie_share: 1.2,
        uses: &[("Chicken", 180.0, "g"), ("Rice", 90.0, "g"), ("Olive oil", 10.0, "mL")],
        instructions: &["Cook rice", "Pan-sear chicken", "Assemble bowl"],
    },
    MealTemplate {
        name: "Lentil vegetable soup",
        calorie_share: 0.9,
        uses: &[("Lentils", 100.0, "g"), ("Carrot", 80.0, "g"), ("Stock", 400.0, "mL")],
        instructions: &["Simmer lentils in stock", "Add diced vegetables", "Season and serve"],
    },
    MealTemplate {
        name: "Egg scramble on toast",
        calorie_share: 0.8,
        uses: &[("Egg", 2.0, "unit"), ("Bread", 2.0, "slice"), ("Butter", 10.0, "g")],
        instructions: &["Scramble eggs in butter", "Toast bread", "Serve together"],
    },
    MealTemplate {
        name: "Salmon with potatoes",
        calorie_share: 1.1,
        uses: &[("Salmon", 150.0, "g"), ("Potatoes", 250.0, "g"), ("Lemon", 0.5, "unit")],
        instructions: &["Roast potatoes", "Bake salmon", "Finish with lemon"],
    },
    MealTemplate {
        name: "Yogurt with granola",
        calorie_share: 0.6,
        uses: &[("Yogurt", 200.0, "g"), ("Granola", 50.0, "g"), ("Honey", 15.0, "mL")],
        instructions: &["Layer yogurt and granola", "Drizzle honey"],
    },
];

/// Rough daily energy need: weight-scaled base, activity multiplier, goal
/// offset. Not nutrition advice, just a stable target for the templates.
pub fn daily_calorie_target(user: &User) -> f64 {
    let reference_weight = match user.gender {
        Gender::Male => 80.0,
        Gender::Female => 65.0,
    };
    let weight = user
        .weight
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(reference_weight);
    let base = weight * 24.0;
    let activity = match user.fitness_level {
        FitnessLevel::Sedentary => 1.2,
        FitnessLevel::Light => 1.35,
        FitnessLevel::Moderate => 1.5,
        FitnessLevel::Active => 1.65,
        FitnessLevel::VeryActive => 1.8,
    };
    let goal = match user.fitness_goal {
        FitnessGoal::Bulking => 300.0,
        FitnessGoal::Cutting => -300.0,
        FitnessGoal::Maintaining => 0.0,
    };
    base * activity + goal
}

/// Deterministic rotation over the built-in templates. Same user profile and
/// spec always produce the same tree, which keeps the accept path testable.
#[derive(Debug, Default, Clone)]
pub struct TemplateGenerator;

#[async_trait]
impl PlanGenerator for TemplateGenerator {
    async fn generate(&self, user: &User, spec: GenerateSpec) -> anyhow::Result<PlanTree> {
        let target = daily_calorie_target(user);
        let per_meal = target / spec.meals_per_day.max(1) as f64;

        let days = (0..spec.duration_days)
            .map(|d| PlanDay {
                meals: (0..spec.meals_per_day)
                    .map(|m| {
                        let idx = (d * spec.meals_per_day + m) as usize % TEMPLATES.len();
                        let template = &TEMPLATES[idx];
                        PlanMeal {
                            name: template.name.to_string(),
                            calories: (per_meal * template.calorie_share).round(),
                            uses: template
                                .uses
                                .iter()
                                .map(|(name, quantity, unit)| IngredientUse {
                                    name: (*name).to_string(),
                                    quantity: *quantity,
                                    unit: (*unit).to_string(),
                                })
                                .collect(),
                            instructions: template
                                .instructions
                                .iter()
                                .map(|s| (*s).to_string())
                                .collect(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(PlanTree {
            meta: PlanMeta {
                duration_days: spec.duration_days,
                meals_per_day: spec.meals_per_day,
                target_calories_per_day: target,
                cuisine_style: user.favorite_cuisines.first().cloned(),
            },
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::profile::{FitnessGoal, FitnessLevel, Gender};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn test_user(weight: Option<f64>, goal: FitnessGoal) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            username: "t".into(),
            email: "t@example.com".into(),
            password_hash: String::new(),
            weight,
            fitness_goal: goal,
            gender: Gender::Female,
            fitness_level: FitnessLevel::Moderate,
            favorite_cuisines: vec!["mediterranean".into()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn calorie_target_reflects_goal() {
        let maintaining = daily_calorie_target(&test_user(Some(70.0), FitnessGoal::Maintaining));
        let bulking = daily_calorie_target(&test_user(Some(70.0), FitnessGoal::Bulking));
        let cutting = daily_calorie_target(&test_user(Some(70.0), FitnessGoal::Cutting));
        assert_eq!(bulking - maintaining, 300.0);
        assert_eq!(maintaining - cutting, 300.0);
    }

    #[test]
    fn calorie_target_falls_back_without_weight() {
        let target = daily_calorie_target(&test_user(None, FitnessGoal::Maintaining));
        assert!(target > 0.0);
        let nan = daily_calorie_target(&test_user(Some(f64::NAN), FitnessGoal::Maintaining));
        assert_eq!(target, nan);
    }

    #[tokio::test]
    async fn generated_shape_matches_the_spec_fields() {
        let user = test_user(Some(70.0), FitnessGoal::Maintaining);
        let tree = TemplateGenerator
            .generate(
                &user,
                GenerateSpec {
                    duration_days: 3,
                    meals_per_day: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(tree.meta.duration_days, 3);
        assert_eq!(tree.meta.meals_per_day, 2);
        assert_eq!(tree.meta.cuisine_style.as_deref(), Some("mediterranean"));
        assert!(tree.shape_matches_meta());
        assert!(tree.days.iter().flat_map(|d| &d.meals).all(|m| !m.uses.is_empty()));
    }

    #[tokio::test]
    async fn generation_is_deterministic() {
        let user = test_user(Some(70.0), FitnessGoal::Maintaining);
        let spec = GenerateSpec {
            duration_days: 5,
            meals_per_day: 3,
        };
        let a = TemplateGenerator.generate(&user, spec).await.unwrap();
        let b = TemplateGenerator.generate(&user, spec).await.unwrap();
        assert_eq!(a, b);
    }
}
