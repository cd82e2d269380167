pub mod forms;
pub mod permissions;

pub use forms::FieldErrors;
pub use permissions::{Actor, can_modify, can_view};

pub mod recipe_service;
pub mod recipe_service_impl;
pub use recipe_service::{RecipeError, RecipeService};
pub use recipe_service_impl::SeaOrmRecipeService;

pub mod comment_service;
pub mod comment_service_impl;
pub use comment_service::{CommentError, CommentService, DeletedComment};
pub use comment_service_impl::SeaOrmCommentService;

pub mod like_service;
pub mod like_service_impl;
pub use like_service::{LikeError, LikeService, LikeToggle};
pub use like_service_impl::SeaOrmLikeService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;
