pub mod prelude;

pub mod recipes;
pub mod users;
