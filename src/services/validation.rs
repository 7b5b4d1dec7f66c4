//! Input rules for accounts and recipes.
//!
//! Each check returns a user-facing message on failure; services wrap it in
//! their own validation error variant.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::CatalogConfig;
use crate::domain::ListOrText;
use crate::models::{NewRecipe, RecipeChanges, RecipeFields};

pub const MIN_PASSWORD_LEN: usize = 8;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]{3,50}$").expect("Invalid regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[a-zA-Z]{2,}$").expect("Invalid regex"))
}

fn cyrillic_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{Cyrillic}").expect("Invalid regex"))
}

pub fn validate_username(username: &str) -> Result<(), String> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err("Username must be 3-50 characters: Latin letters, digits, '_' or '-'".to_string())
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err("Invalid email address".to_string())
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    const RULE: &str = "Password must be at least 8 characters and contain letters and digits (no Cyrillic letters)";

    if password.chars().count() < MIN_PASSWORD_LEN
        || cyrillic_regex().is_match(password)
        || !password.chars().any(|c| c.is_ascii_alphabetic())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(RULE.to_string());
    }

    Ok(())
}

fn cooking_time(minutes: i64) -> Result<i32, String> {
    if minutes <= 0 {
        return Err("Cooking time must be a positive number of minutes".to_string());
    }
    i32::try_from(minutes).map_err(|_| "Cooking time is too large".to_string())
}

fn required_list(value: ListOrText, field: &str) -> Result<Vec<String>, String> {
    let items = value.into_items();
    if items.is_empty() {
        return Err(format!("{field} must contain at least one entry"));
    }
    Ok(items)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks the fields of a new recipe and fills in configured defaults.
pub fn validate_new_recipe(
    fields: RecipeFields,
    defaults: &CatalogConfig,
) -> Result<NewRecipe, String> {
    let title = non_blank(fields.title).ok_or("Title is required")?;
    let ingredients = required_list(
        fields.ingredients.ok_or("Ingredients are required")?,
        "Ingredients",
    )?;
    let steps = required_list(fields.steps.ok_or("Steps are required")?, "Steps")?;
    let cooking_time = cooking_time(fields.cooking_time.ok_or("Cooking time is required")?)?;

    Ok(NewRecipe {
        title,
        description: non_blank(fields.description),
        ingredients,
        steps,
        cooking_time,
        difficulty: non_blank(fields.difficulty)
            .unwrap_or_else(|| defaults.default_difficulty.clone()),
        category: non_blank(fields.category).unwrap_or_else(|| defaults.default_category.clone()),
        image_url: non_blank(fields.image_url)
            .unwrap_or_else(|| defaults.default_image_url.clone()),
    })
}

/// Checks a partial update. Supplied fields must be valid; invalid values
/// are rejected rather than skipped.
pub fn validate_recipe_changes(fields: RecipeFields) -> Result<RecipeChanges, String> {
    let title = match fields.title {
        Some(title) => Some(non_blank(Some(title)).ok_or("Title cannot be empty")?),
        None => None,
    };

    let ingredients = fields
        .ingredients
        .map(|value| required_list(value, "Ingredients"))
        .transpose()?;
    let steps = fields
        .steps
        .map(|value| required_list(value, "Steps"))
        .transpose()?;
    let cooking_time = fields.cooking_time.map(cooking_time).transpose()?;

    let difficulty = match fields.difficulty {
        Some(value) => Some(non_blank(Some(value)).ok_or("Difficulty cannot be empty")?),
        None => None,
    };
    let category = match fields.category {
        Some(value) => Some(non_blank(Some(value)).ok_or("Category cannot be empty")?),
        None => None,
    };
    let image_url = match fields.image_url {
        Some(value) => Some(non_blank(Some(value)).ok_or("Image URL cannot be empty")?),
        None => None,
    };

    Ok(RecipeChanges {
        title,
        // An explicit empty description clears it.
        description: fields.description.map(|d| non_blank(Some(d))),
        ingredients,
        steps,
        cooking_time,
        difficulty,
        category,
        image_url,
    })
}
