pub mod prelude;

pub mod categories;
pub mod comments;
pub mod countries;
pub mod likes;
pub mod recipes;
pub mod users;
