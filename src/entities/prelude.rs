pub use super::categories::Entity as Categories;
pub use super::comments::Entity as Comments;
pub use super::countries::Entity as Countries;
pub use super::likes::Entity as Likes;
pub use super::recipes::Entity as Recipes;
pub use super::users::Entity as Users;
