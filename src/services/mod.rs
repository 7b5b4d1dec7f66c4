pub mod validation;

pub mod search;
pub use search::{SearchCriteria, SearchOutcome};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod recipe_service;
pub mod recipe_service_impl;
pub use recipe_service::{RecipeError, RecipeListing, RecipeService};
pub use recipe_service_impl::SeaOrmRecipeService;
