use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SERVINGS: i32 = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[sea_orm(string_value = "easy")]
    Easy,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Select a valid choice. {s} is not one of the available choices."))
    }
}

/// Publication state. Owners move freely between the two.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

impl RecipeStatus {
    pub const ALL: [Self; 2] = [Self::Draft, Self::Published];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
        }
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Select a valid choice. {s} is not one of the available choices."))
    }
}

/// Validated recipe fields, as accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInput {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    pub status: RecipeStatus,
    pub category_id: Option<i32>,
    pub country_id: Option<i32>,
    pub image: Option<String>,
}

impl RecipeInput {
    #[must_use]
    pub const fn total_time(&self) -> i32 {
        total_time(self.prep_time, self.cook_time)
    }
}

#[must_use]
pub const fn total_time(prep_time: i32, cook_time: i32) -> i32 {
    prep_time + cook_time
}

impl crate::entities::recipes::Model {
    #[must_use]
    pub const fn total_time(&self) -> i32 {
        total_time(self.prep_time, self.cook_time)
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == RecipeStatus::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_time() {
        assert_eq!(total_time(10, 20), 30);
        assert_eq!(total_time(30, 0), 30);
        assert_eq!(total_time(0, 0), 0);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "published".parse::<RecipeStatus>().unwrap(),
            RecipeStatus::Published
        );
        assert!("archived".parse::<RecipeStatus>().is_err());
        assert_eq!(RecipeStatus::default(), RecipeStatus::Draft);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RecipeStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
    }
}
