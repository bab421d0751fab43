use crate::users::profile::{FitnessGoal, FitnessLevel, Gender};
use crate::users::repo::User;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for user creation. Enum fields arrive as plain strings and
/// are checked against the fixed value sets so a bad value is a field error,
/// not a deserializer rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub weight: Option<f64>,
    pub fitness_goal: String,
    pub gender: String,
    pub fitness_level: String,
    #[serde(default)]
    pub favorite_cuisines: Vec<String>,
}

/// Public part of the user returned to the client; the password never leaves
/// the database row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub weight: Option<f64>,
    pub fitness_goal: FitnessGoal,
    pub gender: Gender,
    pub fitness_level: FitnessLevel,
    pub favorite_cuisines: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            weight: u.weight,
            fitness_goal: u.fitness_goal,
            gender: u.gender,
            fitness_level: u.fitness_level,
            favorite_cuisines: u.favorite_cuisines,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization_strips_nothing_it_should_keep() {
        let now = OffsetDateTime::now_utc();
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "sam".into(),
            email: "sam@example.com".into(),
            weight: Some(72.5),
            fitness_goal: FitnessGoal::Cutting,
            gender: Gender::Male,
            fitness_level: FitnessLevel::Light,
            favorite_cuisines: vec!["thai".into()],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("sam@example.com"));
        assert!(json.contains("\"fitnessGoal\":\"CUTTING\""));
        assert!(!json.contains("password"));
    }
}
