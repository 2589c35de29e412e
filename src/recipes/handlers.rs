use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{instrument, warn};

use crate::{
    auth::session::SessionContext,
    error::{AppError, AppResult},
    extractors::JsonBody,
    recipes::{
        dto::{CreateRecipeRequest, CreatedRecipeResponse, RecipeListItem},
        services::{create_recipe, list_by_owner, resolve_owner, validate_recipe},
    },
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(post_recipe))
}

#[instrument(skip(state, session))]
pub async fn list_recipes(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<Vec<RecipeListItem>>> {
    let user_id = session.require_user()?;
    let owner = resolve_owner(state.users.as_ref(), user_id).await?;
    let recipes = list_by_owner(state.recipes.as_ref(), owner.id).await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, session, payload))]
pub async fn post_recipe(
    State(state): State<AppState>,
    session: SessionContext,
    JsonBody(payload): JsonBody<CreateRecipeRequest>,
) -> AppResult<(StatusCode, Json<CreatedRecipeResponse>)> {
    let user_id = session.require_user()?;
    let new = validate_recipe(
        user_id,
        payload.title,
        payload.instructions,
        payload.minutes_to_complete,
    )
    .map_err(|e| {
        warn!(error = %e, %user_id, "recipe rejected");
        AppError::from(e)
    })?;

    let (recipe, owner) = create_recipe(state.recipes.as_ref(), state.users.as_ref(), new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedRecipeResponse {
            title: recipe.title,
            instructions: recipe.instructions,
            minutes_to_complete: recipe.minutes_to_complete,
            user: owner.into(),
        }),
    ))
}
