//! In-memory user and recipe storage used by the test suite.
//!
//! Enforces the same constraints as the Postgres schema: unique usernames and recipes that
//! reference an existing user. Both checks happen under the write lock that performs the
//! insert.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::error::StoreError;
use crate::recipes::{
    repo::RecipeStore,
    repo_types::{NewRecipe, Recipe},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn recipe_count(&self) -> usize {
        self.tables.read().await.recipes.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::UniqueViolation);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            image_url: new.image_url,
            bio: new.bio,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == new.user_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            instructions: new.instructions,
            minutes_to_complete: new.minutes_to_complete,
        };
        tables.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .recipes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}
