//! Submitted form payloads and their field-level validation.
//!
//! Every validator collects all field errors before failing, so a caller can
//! redisplay the whole form at once. Nothing here touches the database;
//! checks that need it (slug taken, category exists) live in the services.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::recipe::{DEFAULT_SERVINGS, Difficulty, RecipeInput, RecipeStatus};
use crate::models::text::slugify;

pub const TITLE_MAX_LEN: usize = 200;
pub const COMMENT_MAX_LEN: usize = 500;
pub const IMAGE_REF_MAX_LEN: usize = 500;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Field name to messages, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message of the first failing field, for one-line notices.
    #[must_use]
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .next()
            .and_then(|(field, msgs)| msgs.first().map(|m| format!("{field}: {m}")))
            .unwrap_or_else(|| "Invalid input".to_string())
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub difficulty: String,
    /// Category id, blank for none.
    pub category: String,
    /// Country id, blank for none.
    pub country: String,
    pub image: String,
    pub status: String,
}

impl RecipeForm {
    /// Prefills the edit form from a stored recipe.
    #[must_use]
    pub fn from_model(recipe: &crate::entities::recipes::Model) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            prep_time: recipe.prep_time.to_string(),
            cook_time: recipe.cook_time.to_string(),
            servings: recipe.servings.to_string(),
            difficulty: recipe.difficulty.to_string(),
            category: recipe.category_id.map(|id| id.to_string()).unwrap_or_default(),
            country: recipe.country_id.map(|id| id.to_string()).unwrap_or_default(),
            image: recipe.image.clone().unwrap_or_default(),
            status: recipe.status.to_string(),
        }
    }

    pub fn validate(&self) -> Result<RecipeInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.add("title", max_len_message(TITLE_MAX_LEN, title.chars().count()));
        } else if slugify(&title).is_empty() {
            errors.add("title", "Title must contain at least one letter or digit.");
        }

        let description = required_text(&mut errors, "description", &self.description);
        let ingredients = required_text(&mut errors, "ingredients", &self.ingredients);
        let instructions = required_text(&mut errors, "instructions", &self.instructions);

        let prep_time = parse_bounded(&mut errors, "prep_time", &self.prep_time, 0, None);
        let cook_time = parse_bounded(&mut errors, "cook_time", &self.cook_time, 0, None);
        let servings = parse_bounded(
            &mut errors,
            "servings",
            &self.servings,
            1,
            Some(DEFAULT_SERVINGS),
        );

        let difficulty = if self.difficulty.trim().is_empty() {
            Difficulty::default()
        } else {
            self.difficulty.parse().unwrap_or_else(|msg: String| {
                errors.add("difficulty", msg);
                Difficulty::default()
            })
        };

        let status = if self.status.trim().is_empty() {
            RecipeStatus::default()
        } else {
            self.status.parse().unwrap_or_else(|msg: String| {
                errors.add("status", msg);
                RecipeStatus::default()
            })
        };

        let category_id = optional_id(&mut errors, "category", &self.category);
        let country_id = optional_id(&mut errors, "country", &self.country);

        let image = self.image.trim();
        if image.chars().count() > IMAGE_REF_MAX_LEN {
            errors.add("image", max_len_message(IMAGE_REF_MAX_LEN, image.chars().count()));
        }
        let image = (!image.is_empty()).then(|| image.to_string());

        errors.into_result(RecipeInput {
            title,
            description,
            ingredients,
            instructions,
            prep_time,
            cook_time,
            servings,
            difficulty,
            status,
            category_id,
            country_id,
            image,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let content = self.content.trim();
        let len = content.chars().count();
        if content.is_empty() {
            return Err(FieldErrors::single("content", REQUIRED));
        }
        if len > COMMENT_MAX_LEN {
            return Err(FieldErrors::single(
                "content",
                max_len_message(COMMENT_MAX_LEN, len),
            ));
        }
        Ok(content.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Registration fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim().to_string();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_LEN {
            errors.add(
                "username",
                max_len_message(USERNAME_MAX_LEN, username.chars().count()),
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !is_plausible_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else if self.password1.chars().count() < PASSWORD_MIN_LEN {
            errors.add(
                "password1",
                format!(
                    "This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."
                ),
            );
        }

        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(Registration {
            username,
            email,
            password: self.password1.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

fn max_len_message(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

fn required_text(errors: &mut FieldErrors, field: &str, raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

fn parse_bounded(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    min: i32,
    default: Option<i32>,
) -> i32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return default.unwrap_or_else(|| {
            errors.add(field, REQUIRED);
            min
        });
    }

    match raw.parse::<i32>() {
        Ok(value) if value >= min => value,
        Ok(_) => {
            errors.add(
                field,
                format!("Ensure this value is greater than or equal to {min}."),
            );
            min
        }
        Err(_) => {
            errors.add(field, "Enter a whole number.");
            min
        }
    }
}

fn optional_id(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.add(field, INVALID_CHOICE);
            None
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
