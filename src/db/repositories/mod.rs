pub mod comment;
pub mod like;
pub mod recipe;
pub mod taxonomy;
pub mod user;
