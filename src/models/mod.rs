pub mod recipe;
pub mod text;
