use sqlx::FromRow;
use uuid::Uuid;

/// Recipe record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid, // owner
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
}

/// Validated input for a recipe insert.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub user_id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
}
