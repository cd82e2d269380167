use serde::Deserialize;

use crate::config::{Config, SecurityConfig};
use crate::db::{Store, TaxonomyKind};
use crate::models::recipe::{Difficulty, RecipeInput, RecipeStatus};
use crate::models::text::slugify;

const SEED_DATA: &str = include_str!("seed_recipes.toml");

pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Deserialize)]
struct SeedFile {
    recipe: Vec<SeedRecipe>,
}

#[derive(Debug, Deserialize)]
struct SeedRecipe {
    title: String,
    category: String,
    country: String,
    description: String,
    ingredients: String,
    instructions: String,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    difficulty: Difficulty,
    #[serde(default = "published")]
    status: RecipeStatus,
}

const fn published() -> RecipeStatus {
    RecipeStatus::Published
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Creates the staff user, categories, countries and sample recipes.
/// Rows that already exist are left alone and reported as such.
pub async fn seed_sample_data(
    store: &Store,
    security: &SecurityConfig,
    admin_password: &str,
) -> anyhow::Result<SeedReport> {
    let data: SeedFile = toml::from_str(SEED_DATA)?;
    let mut report = SeedReport::default();

    let admin = match store.get_user_by_username(ADMIN_USERNAME).await? {
        Some(user) => user,
        None => {
            report.admin_created = true;
            store
                .create_user(ADMIN_USERNAME, ADMIN_EMAIL, admin_password, true, security)
                .await?
        }
    };

    for recipe in data.recipe {
        let (category, _) = store
            .get_or_create_taxon(TaxonomyKind::Category, &recipe.category, "")
            .await?;
        let (country, _) = store
            .get_or_create_taxon(TaxonomyKind::Country, &recipe.country, "")
            .await?;

        let slug = slugify(&recipe.title);
        if store.recipe_slug_exists(&slug).await? {
            report.existing.push(recipe.title);
            continue;
        }

        let title = recipe.title.clone();
        let input = RecipeInput {
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            status: recipe.status,
            category_id: Some(category.id),
            country_id: Some(country.id),
            image: None,
        };

        match store.insert_recipe(admin.id, &slug, input).await? {
            Some(_) => report.created.push(title),
            None => report.existing.push(title),
        }
    }

    Ok(report)
}

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let password = std::env::var("LARDER_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

    let report = seed_sample_data(&store, &config.security, &password).await?;

    if report.admin_created {
        println!("✓ Created admin user '{ADMIN_USERNAME}'");
    }
    for title in &report.created {
        println!("✓ Created recipe: {title}");
    }
    for title in &report.existing {
        println!("⚠ Recipe already exists: {title}");
    }
    println!("Successfully populated recipes!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecipeFilter;
    use crate::db::test_support::{fast_security, temp_store};

    #[test]
    fn test_seed_data_parses() {
        let data: SeedFile = toml::from_str(SEED_DATA).unwrap();
        assert_eq!(data.recipe.len(), 8);
        assert_eq!(data.recipe[0].title, "Classic Spaghetti Carbonara");
        assert!(data.recipe[0].ingredients.starts_with("400g spaghetti"));
        assert!(data.recipe.iter().all(|r| r.status == RecipeStatus::Published));
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let store = temp_store().await;
        let security = fast_security();

        let first = seed_sample_data(&store, &security, "admin123").await.unwrap();
        assert!(first.admin_created);
        assert_eq!(first.created.len(), 8);
        assert!(first.existing.is_empty());

        let second = seed_sample_data(&store, &security, "admin123").await.unwrap();
        assert!(!second.admin_created);
        assert!(second.created.is_empty());
        assert_eq!(second.existing.len(), 8);

        assert_eq!(store.count_recipes(&RecipeFilter::Published).await.unwrap(), 8);
        let italian = store
            .get_taxon_by_slug(TaxonomyKind::Country, "italian")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            store
                .count_recipes(&RecipeFilter::Country(italian.id))
                .await
                .unwrap(),
            5
        );
        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_staff);
    }
}
