//! Domain types for the recipe catalog.
//!
//! Newtype identifiers keep user and recipe ids from being mixed up, and
//! [`Identity`] is the explicit per-request caller context that every
//! service operation receives.

pub mod list_text;

pub use list_text::ListOrText;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a registered user.
///
/// # Examples
///
/// ```rust
/// use recipe_catalog::domain::UserId;
///
/// let id = UserId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Unique identifier for a recipe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecipeId(i32);

impl RecipeId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RecipeId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<RecipeId> for i32 {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}

/// The authenticated caller of an operation.
///
/// Stored in the session at login and handed to services explicitly, so no
/// service ever reads ambient request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl Identity {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// True when the caller is the given user or an administrator.
    #[must_use]
    pub fn can_act_for(&self, user_id: UserId) -> bool {
        self.is_admin || self.user_id == user_id
    }
}

/// Ingredient-match combination mode for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// At least one ingredient term must match.
    #[default]
    Any,
    /// Every ingredient term must match.
    All,
}

impl MatchMode {
    /// Parses a query-string value. Anything other than `all` means `any`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Any
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_and_convert() {
        let id = RecipeId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(UserId::from(3)), 3);
        assert_eq!(Some(UserId::new(4)).map(UserId::value), Some(4));
        assert_eq!(Some(RecipeId::new(5)).map(RecipeId::value), Some(5));
    }

    #[test]
    fn identity_permissions() {
        let user = Identity {
            user_id: UserId::new(2),
            username: "cook".to_string(),
            is_admin: false,
        };
        assert!(user.can_act_for(UserId::new(2)));
        assert!(!user.can_act_for(UserId::new(3)));

        let admin = Identity {
            is_admin: true,
            ..user
        };
        assert!(admin.can_act_for(UserId::new(3)));
    }

    #[test]
    fn match_mode_parsing() {
        assert_eq!(MatchMode::parse("all"), MatchMode::All);
        assert_eq!(MatchMode::parse(" ALL "), MatchMode::All);
        assert_eq!(MatchMode::parse("any"), MatchMode::Any);
        assert_eq!(MatchMode::parse("whatever"), MatchMode::Any);
        assert_eq!(MatchMode::parse(""), MatchMode::Any);
    }
}
