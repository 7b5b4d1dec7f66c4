pub mod recipe;
pub mod user;
