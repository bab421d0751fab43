use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fitness goal driving the calorie target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "fitness_goal", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitnessGoal {
    Bulking,
    Cutting,
    Maintaining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "gender", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Activity level multiplier bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "fitness_level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitnessLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BULKING" => Ok(Self::Bulking),
            "CUTTING" => Ok(Self::Cutting),
            "MAINTAINING" => Ok(Self::Maintaining),
            _ => Err("must be one of BULKING, CUTTING, MAINTAINING".into()),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            _ => Err("must be one of MALE, FEMALE".into()),
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEDENTARY" => Ok(Self::Sedentary),
            "LIGHT" => Ok(Self::Light),
            "MODERATE" => Ok(Self::Moderate),
            "ACTIVE" => Ok(Self::Active),
            "VERY_ACTIVE" => Ok(Self::VeryActive),
            _ => Err("must be one of SEDENTARY, LIGHT, MODERATE, ACTIVE, VERY_ACTIVE".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_fixed_value_sets() {
        assert_eq!("BULKING".parse::<FitnessGoal>().unwrap(), FitnessGoal::Bulking);
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(
            "VERY_ACTIVE".parse::<FitnessLevel>().unwrap(),
            FitnessLevel::VeryActive
        );
    }

    #[test]
    fn rejects_values_outside_the_sets() {
        assert!("bulking".parse::<FitnessGoal>().is_err());
        assert!("OTHER".parse::<Gender>().is_err());
        let err = "COUCH".parse::<FitnessLevel>().unwrap_err();
        assert!(err.contains("SEDENTARY"));
    }

    #[test]
    fn serializes_in_wire_casing() {
        let json = serde_json::to_string(&FitnessLevel::VeryActive).unwrap();
        assert_eq!(json, "\"VERY_ACTIVE\"");
    }
}
