mod common;

use axum::http::StatusCode;
use common::{body_json, location, messages, spawn_app};
use larder::db::RecipeFilter;
use larder::models::recipe::RecipeStatus;

#[tokio::test]
async fn test_like_toggle_returns_status_for_scripts() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    let recipe = app
        .create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;
    let cookie = app.login("alice").await;

    let response = app.post_ajax("/recipe/pasta/like/", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!({"success": true, "liked": true, "total_likes": 1})
    );

    let body = body_json(app.post_ajax("/recipe/pasta/like/", "", Some(&cookie)).await).await;
    assert_eq!(
        body,
        serde_json::json!({"success": true, "liked": false, "total_likes": 0})
    );

    assert_eq!(app.store().total_likes(recipe.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_like_toggle_redirects_browsers() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    let bob = app.create_user("bob", false).await;
    let recipe = app
        .create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;
    let cookie = app.login("bob").await;

    let response = app.post_form("/recipe/pasta/like/", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipe/pasta/");

    let page = body_json(app.get("/recipe/pasta/", Some(&cookie)).await).await;
    assert_eq!(page["data"]["user_has_liked"], true);
    assert_eq!(page["data"]["total_likes"], 1);
    assert!(messages(&page).contains(&"Recipe added to favorites!".to_string()));

    let favorites = body_json(app.get("/favorites/", Some(&cookie)).await).await;
    assert_eq!(favorites["data"]["recipes"][0]["slug"], "pasta");
    assert_eq!(
        favorites["data"]["liked_recipe_ids"],
        serde_json::json!([recipe.id])
    );

    assert!(app.store().has_liked(recipe.id, bob.id).await.unwrap());
}

#[tokio::test]
async fn test_like_on_missing_recipe_is_not_found() {
    let app = spawn_app().await;
    app.create_user("alice", false).await;
    let cookie = app.login("alice").await;

    let response = app.post_ajax("/recipe/ghost/like/", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.post_form("/recipe/ghost/like/", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = body_json(app.get("/", Some(&cookie)).await).await;
    let notices = messages(&page);
    assert_eq!(notices.len(), 3, "{notices:?}");
}

#[tokio::test]
async fn test_create_recipe_through_form() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    let cookie = app.login("alice").await;

    let page = body_json(app.get("/recipe/create/", Some(&cookie)).await).await;
    assert_eq!(page["data"]["form"]["servings"], "4");
    assert_eq!(page["data"]["choices"]["difficulties"][1]["value"], "medium");

    let response = app
        .post_form(
            "/recipe/create/",
            "title=Pasta+Carbonara&description=Creamy&ingredients=Pasta%0AEggs&instructions=Cook&prep_time=10&cook_time=15&difficulty=easy",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipe/pasta-carbonara/");

    let recipe = app
        .store()
        .get_recipe_by_slug("pasta-carbonara")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recipe.author_id, alice.id);
    assert_eq!(recipe.status, RecipeStatus::Draft);
    assert_eq!(recipe.servings, 4);

    // Drafts stay out of lists but the author can open them.
    let home = body_json(app.get("/", None).await).await;
    assert!(home["data"]["recipes"].as_array().unwrap().is_empty());
    assert_eq!(
        app.get("/recipe/pasta-carbonara/", None).await.status(),
        StatusCode::NOT_FOUND
    );
    let detail = body_json(app.get("/recipe/pasta-carbonara/", Some(&cookie)).await).await;
    assert_eq!(detail["data"]["status"], "draft");
    assert_eq!(detail["data"]["can_modify"], true);
    assert!(messages(&detail).contains(&"Recipe created successfully!".to_string()));
}

#[tokio::test]
async fn test_create_recipe_validation() {
    let app = spawn_app().await;
    app.create_user("alice", false).await;
    let cookie = app.login("alice").await;

    let response = app
        .post_form(
            "/recipe/create/",
            "title=Soup&prep_time=-5&cook_time=soon&servings=0&difficulty=extreme",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    for field in [
        "description",
        "ingredients",
        "instructions",
        "prep_time",
        "cook_time",
        "servings",
        "difficulty",
    ] {
        assert!(body["fields"][field].is_array(), "missing error for {field}");
    }
    assert!(body["fields"].get("title").is_none());
    assert_eq!(body["data"]["title"], "Soup");
    assert!(!app.store().recipe_slug_exists("soup").await.unwrap());

    let page = body_json(app.get("/", Some(&cookie)).await).await;
    assert!(messages(&page).contains(&"Please correct the errors below.".to_string()));
}

#[tokio::test]
async fn test_non_owner_cannot_edit_or_delete() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    app.create_user("bob", false).await;
    app.create_user("admin", true).await;
    app.create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;

    let bob = app.login("bob").await;
    let edit = "title=Stolen&description=x&ingredients=x&instructions=x&prep_time=1&cook_time=1&status=draft";

    assert_eq!(
        app.get("/recipe/pasta/edit/", Some(&bob)).await.status(),
        StatusCode::FORBIDDEN
    );
    let response = app.post_form("/recipe/pasta/edit/", edit, Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.post_form("/recipe/pasta/delete/", "", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = app
        .store()
        .get_recipe_by_slug("pasta")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Pasta");
    assert_eq!(stored.status, RecipeStatus::Published);

    // Staff may change anyone's recipe; the slug survives a title change.
    let admin = app.login("admin").await;
    let response = app.post_form("/recipe/pasta/edit/", edit, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipe/pasta/");
    let stored = app
        .store()
        .get_recipe_by_slug("pasta")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Stolen");
    assert_eq!(stored.status, RecipeStatus::Draft);

    let response = app.post_form("/recipe/pasta/delete/", "", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(!app.store().recipe_slug_exists("pasta").await.unwrap());
}

#[tokio::test]
async fn test_owner_edit_form_prefills_values() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    app.create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;
    let cookie = app.login("alice").await;

    let page = body_json(app.get("/recipe/pasta/edit/", Some(&cookie)).await).await;
    assert_eq!(page["data"]["slug"], "pasta");
    assert_eq!(page["data"]["form"]["title"], "Pasta");
    assert_eq!(page["data"]["form"]["prep_time"], "10");
    assert_eq!(page["data"]["form"]["status"], "published");
}

#[tokio::test]
async fn test_comment_flow() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    app.create_user("bob", false).await;
    let recipe = app
        .create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;

    let bob = app.login("bob").await;
    let response = app
        .post_form("/recipe/pasta/comment/", "content=Delicious%21", Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipe/pasta/");

    let detail = body_json(app.get("/recipe/pasta/", Some(&bob)).await).await;
    assert_eq!(detail["data"]["total_comments"], 1);
    assert_eq!(detail["data"]["comments"][0]["author"], "bob");
    assert_eq!(detail["data"]["comments"][0]["content"], "Delicious!");
    assert_eq!(detail["data"]["comments"][0]["can_delete"], true);
    let comment_id = detail["data"]["comments"][0]["id"].as_i64().unwrap();

    // Empty content bounces back with a notice and stores nothing.
    let response = app
        .post_form("/recipe/pasta/comment/", "content=+++", Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let detail = body_json(app.get("/recipe/pasta/", Some(&bob)).await).await;
    assert!(messages(&detail).contains(&"Error adding comment. Please try again.".to_string()));
    assert_eq!(app.store().total_comments(recipe.id).await.unwrap(), 1);

    let response = app
        .post_ajax(
            "/recipe/pasta/comment/",
            &format!("content={}", "x".repeat(501)),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The recipe's author does not own bob's comment.
    let alice_cookie = app.login("alice").await;
    let uri = format!("/comment/{comment_id}/delete/");
    let response = app.post_form(&uri, "", Some(&alice_cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.store().total_comments(recipe.id).await.unwrap(), 1);

    let response = app.post_form(&uri, "", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipe/pasta/");
    assert_eq!(app.store().total_comments(recipe.id).await.unwrap(), 0);

    let response = app.post_form(&uri, "", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forbidden_leaves_a_notice() {
    let app = spawn_app().await;
    let alice = app.create_user("alice", false).await;
    app.create_user("bob", false).await;
    app.create_recipe(alice.id, "Pasta", RecipeStatus::Published)
        .await;

    let bob = app.login("bob").await;
    let response = app.post_form("/recipe/pasta/delete/", "", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let page = body_json(app.get("/", Some(&bob)).await).await;
    assert_eq!(messages(&page).len(), 2);
    assert_eq!(
        app.store()
            .count_recipes(&RecipeFilter::Published)
            .await
            .unwrap(),
        1
    );
}
