//! Ownership rules: who may change or see what.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::entities::{comments, recipes};

/// The authenticated principal a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: i32,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        }
    }
}

/// Something with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for recipes::Model {
    fn owner_id(&self) -> i32 {
        self.author_id
    }
}

impl Owned for comments::Model {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

/// True iff the actor is staff or owns the resource.
#[must_use]
pub fn can_modify(actor: &Actor, resource: &impl Owned) -> bool {
    actor.is_staff || actor.id == resource.owner_id()
}

/// Returned when an authenticated actor touches something they do not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("You do not have permission to change this")]
pub struct Forbidden;

pub fn ensure_can_modify(actor: &Actor, resource: &impl Owned) -> Result<(), Forbidden> {
    if can_modify(actor, resource) {
        Ok(())
    } else {
        Err(Forbidden)
    }
}

/// Published recipes are public; drafts only exist for their author and staff.
#[must_use]
pub fn can_view(viewer: Option<&Actor>, recipe: &recipes::Model) -> bool {
    recipe.is_published() || viewer.is_some_and(|actor| can_modify(actor, recipe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recipe::{Difficulty, RecipeStatus};

    fn actor(id: i32, is_staff: bool) -> Actor {
        Actor {
            id,
            username: format!("user{id}"),
            is_staff,
        }
    }

    fn recipe(author_id: i32, status: RecipeStatus) -> recipes::Model {
        recipes::Model {
            id: 1,
            title: "Pasta".to_string(),
            slug: "pasta".to_string(),
            description: String::new(),
            ingredients: String::new(),
            instructions: String::new(),
            prep_time: 5,
            cook_time: 10,
            servings: 4,
            difficulty: Difficulty::Easy,
            status,
            image: None,
            author_id,
            category_id: None,
            country_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn comment(user_id: i32) -> comments::Model {
        comments::Model {
            id: 1,
            recipe_id: 1,
            user_id,
            content: "Nice".to_string(),
            approved: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_author_can_modify_own_recipe() {
        assert!(can_modify(&actor(7, false), &recipe(7, RecipeStatus::Published)));
    }

    #[test]
    fn test_stranger_cannot_modify_recipe() {
        assert!(!can_modify(&actor(8, false), &recipe(7, RecipeStatus::Published)));
    }

    #[test]
    fn test_staff_can_modify_anything() {
        assert!(can_modify(&actor(99, true), &recipe(7, RecipeStatus::Draft)));
        assert!(can_modify(&actor(99, true), &comment(7)));
    }

    #[test]
    fn test_ensure_can_modify() {
        assert_eq!(
            ensure_can_modify(&actor(8, false), &recipe(7, RecipeStatus::Published)),
            Err(Forbidden)
        );
        assert!(ensure_can_modify(&actor(7, false), &recipe(7, RecipeStatus::Published)).is_ok());
    }

    #[test]
    fn test_comment_ownership_uses_commenter() {
        assert!(can_modify(&actor(3, false), &comment(3)));
        assert!(!can_modify(&actor(4, false), &comment(3)));
    }

    #[test]
    fn test_draft_visibility() {
        let draft = recipe(7, RecipeStatus::Draft);
        assert!(!can_view(None, &draft));
        assert!(!can_view(Some(&actor(8, false)), &draft));
        assert!(can_view(Some(&actor(7, false)), &draft));
        assert!(can_view(Some(&actor(1, true)), &draft));
        assert!(can_view(None, &recipe(7, RecipeStatus::Published)));
    }
}
