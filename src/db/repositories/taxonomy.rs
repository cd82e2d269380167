//! Categories and countries share one shape: a unique name, a unique slug
//! derived from it, and an optional description.

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::{categories, countries, prelude::*};
use crate::models::text::slug_or_derive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Category,
    Country,
}

impl TaxonomyKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Country => "Country",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxon {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<categories::Model> for Taxon {
    fn from(m: categories::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
        }
    }
}

impl From<countries::Model> for Taxon {
    fn from(m: countries::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
        }
    }
}

pub struct TaxonomyRepository {
    conn: DatabaseConnection,
    kind: TaxonomyKind,
}

impl TaxonomyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, kind: TaxonomyKind) -> Self {
        Self { conn, kind }
    }

    /// All entries ordered by name.
    pub async fn list(&self) -> Result<Vec<Taxon>> {
        let items = match self.kind {
            TaxonomyKind::Category => Categories::find()
                .order_by_asc(categories::Column::Name)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Taxon::from)
                .collect(),
            TaxonomyKind::Country => Countries::find()
                .order_by_asc(countries::Column::Name)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Taxon::from)
                .collect(),
        };
        Ok(items)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Taxon>> {
        let item = match self.kind {
            TaxonomyKind::Category => Categories::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(&self.conn)
                .await?
                .map(Taxon::from),
            TaxonomyKind::Country => Countries::find()
                .filter(countries::Column::Slug.eq(slug))
                .one(&self.conn)
                .await?
                .map(Taxon::from),
        };
        Ok(item)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Taxon>> {
        let item = match self.kind {
            TaxonomyKind::Category => Categories::find_by_id(id)
                .one(&self.conn)
                .await?
                .map(Taxon::from),
            TaxonomyKind::Country => Countries::find_by_id(id)
                .one(&self.conn)
                .await?
                .map(Taxon::from),
        };
        Ok(item)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Taxon>> {
        let item = match self.kind {
            TaxonomyKind::Category => Categories::find()
                .filter(categories::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(Taxon::from),
            TaxonomyKind::Country => Countries::find()
                .filter(countries::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(Taxon::from),
        };
        Ok(item)
    }

    /// Inserts a new entry. A missing or blank slug is derived from the name.
    pub async fn create(
        &self,
        name: &str,
        slug: Option<&str>,
        description: &str,
    ) -> Result<Taxon> {
        let slug = slug_or_derive(slug, name);
        if slug.is_empty() {
            anyhow::bail!("{} name '{name}' does not produce a usable slug", self.kind.label());
        }
        let now = chrono::Utc::now().to_rfc3339();

        let item = match self.kind {
            TaxonomyKind::Category => Categories::insert(categories::ActiveModel {
                name: Set(name.to_string()),
                slug: Set(slug),
                description: Set(description.to_string()),
                created_at: Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.conn)
            .await
            .map(Taxon::from),
            TaxonomyKind::Country => Countries::insert(countries::ActiveModel {
                name: Set(name.to_string()),
                slug: Set(slug),
                description: Set(description.to_string()),
                created_at: Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.conn)
            .await
            .map(Taxon::from),
        };

        item.with_context(|| format!("Failed to create {} '{name}'", self.kind.label()))
    }

    /// Returns the existing entry with this name, or creates it.
    /// The flag is true when a row was inserted.
    pub async fn get_or_create(&self, name: &str, description: &str) -> Result<(Taxon, bool)> {
        if let Some(existing) = self.get_by_name(name).await? {
            return Ok((existing, false));
        }
        let created = self.create(name, None, description).await?;
        Ok((created, true))
    }

    /// Deletes the entry. Recipes referencing it keep existing with the
    /// reference cleared.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = match self.kind {
            TaxonomyKind::Category => Categories::delete_by_id(id).exec(&self.conn).await?,
            TaxonomyKind::Country => Countries::delete_by_id(id).exec(&self.conn).await?,
        };
        Ok(result.rows_affected > 0)
    }
}
