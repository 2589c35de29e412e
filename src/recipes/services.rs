use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{repo::UserStore, repo_types::User};
use crate::error::{AppResult, AuthError, StoreError, ValidationError};
use crate::recipes::{
    repo::RecipeStore,
    repo_types::{NewRecipe, Recipe},
};

/// Instructions must be strictly longer than this many characters.
pub const MIN_INSTRUCTIONS_CHARS: usize = 50;

pub fn validate_recipe(
    user_id: Uuid,
    title: Option<String>,
    instructions: Option<String>,
    minutes_to_complete: Option<i32>,
) -> Result<NewRecipe, ValidationError> {
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingTitle)?;
    let instructions = instructions
        .filter(|i| i.chars().count() > MIN_INSTRUCTIONS_CHARS)
        .ok_or(ValidationError::InstructionsTooShort)?;
    Ok(NewRecipe {
        user_id,
        title,
        instructions,
        minutes_to_complete,
    })
}

/// The user a session is bound to. A missing row means the session is stale.
pub async fn resolve_owner(users: &dyn UserStore, user_id: Uuid) -> AppResult<User> {
    match users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(%user_id, "session bound to a missing user");
            Err(AuthError::NoSession.into())
        }
    }
}

/// Persist a validated recipe and return it with its owner.
pub async fn create_recipe(
    recipes: &dyn RecipeStore,
    users: &dyn UserStore,
    new: NewRecipe,
) -> AppResult<(Recipe, User)> {
    let owner = resolve_owner(users, new.user_id).await?;
    let recipe = match recipes.insert(new).await {
        Ok(r) => r,
        Err(StoreError::ForeignKeyViolation) => return Err(AuthError::NoSession.into()),
        Err(e) => return Err(e.into()),
    };
    info!(recipe_id = %recipe.id, user_id = %owner.id, "recipe created");
    Ok((recipe, owner))
}

pub async fn list_by_owner(recipes: &dyn RecipeStore, user_id: Uuid) -> AppResult<Vec<Recipe>> {
    Ok(recipes.list_by_owner(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::services::{create_user, validate_registration};
    use crate::error::AppError;
    use crate::memory::MemoryStore;

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    async fn user(store: &MemoryStore, name: &str) -> User {
        let reg = validate_registration(Some(name.into()), Some("pw".into()), None, None).unwrap();
        create_user(store, reg).await.unwrap()
    }

    #[test]
    fn instructions_boundary_is_strict() {
        let owner = Uuid::new_v4();
        assert_eq!(
            validate_recipe(owner, Some("Soup".into()), Some(text(50)), None).unwrap_err(),
            ValidationError::InstructionsTooShort
        );
        let ok = validate_recipe(owner, Some("Soup".into()), Some(text(51)), Some(20)).unwrap();
        assert_eq!(ok.instructions.len(), 51);
        assert_eq!(ok.minutes_to_complete, Some(20));
    }

    #[test]
    fn instructions_length_counts_characters() {
        // 51 two-byte characters
        let accented = "é".repeat(51);
        assert!(validate_recipe(Uuid::new_v4(), Some("Crêpes".into()), Some(accented), None).is_ok());
        let short = "é".repeat(30);
        assert!(validate_recipe(Uuid::new_v4(), Some("Crêpes".into()), Some(short), None).is_err());
    }

    #[test]
    fn missing_title_and_instructions() {
        let owner = Uuid::new_v4();
        assert_eq!(
            validate_recipe(owner, None, Some(text(60)), None).unwrap_err(),
            ValidationError::MissingTitle
        );
        assert_eq!(
            validate_recipe(owner, Some(String::new()), Some(text(60)), None).unwrap_err(),
            ValidationError::MissingTitle
        );
        assert_eq!(
            validate_recipe(owner, Some("Stew".into()), None, None).unwrap_err(),
            ValidationError::InstructionsTooShort
        );
    }

    #[tokio::test]
    async fn listing_is_scoped_to_owner() {
        let store = MemoryStore::default();
        let ana = user(&store, "ana").await;
        let bob = user(&store, "bob").await;

        for (owner, title) in [(&ana, "a1"), (&bob, "b1"), (&ana, "a2"), (&bob, "b2")] {
            let new = validate_recipe(owner.id, Some(title.into()), Some(text(60)), None).unwrap();
            create_recipe(&store, &store, new).await.unwrap();
        }

        let titles: Vec<String> = list_by_owner(&store, ana.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["a1", "a2"]);

        let bobs = list_by_owner(&store, bob.id).await.unwrap();
        assert!(bobs.iter().all(|r| r.user_id == bob.id));
        assert_eq!(bobs.len(), 2);
    }

    #[tokio::test]
    async fn create_returns_owner() {
        let store = MemoryStore::default();
        let ana = user(&store, "ana").await;
        let new = validate_recipe(ana.id, Some("Bread".into()), Some(text(80)), Some(90)).unwrap();
        let (recipe, owner) = create_recipe(&store, &store, new).await.unwrap();
        assert_eq!(recipe.user_id, ana.id);
        assert_eq!(owner.username, "ana");
    }

    #[tokio::test]
    async fn resolve_owner_rejects_stale_ids() {
        let store = MemoryStore::default();
        let ana = user(&store, "ana").await;
        assert_eq!(resolve_owner(&store, ana.id).await.unwrap().username, "ana");
        let err = resolve_owner(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::NoSession)));
    }

    #[tokio::test]
    async fn unknown_owner_is_rejected() {
        let store = MemoryStore::default();
        let new = validate_recipe(Uuid::new_v4(), Some("Ghost".into()), Some(text(80)), None).unwrap();
        let err = create_recipe(&store, &store, new).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::NoSession)));
        assert_eq!(store.recipe_count().await, 0);
    }
}
