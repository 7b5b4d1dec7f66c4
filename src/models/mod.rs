pub mod recipe;

pub use recipe::{NewRecipe, Recipe, RecipeChanges, RecipeDto, RecipeFields, RecipePage};
