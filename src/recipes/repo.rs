use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::recipes::repo_types::{NewRecipe, Recipe};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a recipe. An owner that does not exist surfaces as
    /// `StoreError::ForeignKeyViolation`.
    async fn insert(&self, new: NewRecipe) -> Result<Recipe, StoreError>;
    /// Recipes owned by `user_id`, in insertion order.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn insert(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (id, user_id, title, instructions, minutes_to_complete)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, instructions, minutes_to_complete
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.instructions)
        .bind(new.minutes_to_complete)
        .fetch_one(&self.db)
        .await?;
        Ok(recipe)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, instructions, minutes_to_complete
            FROM recipes
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
