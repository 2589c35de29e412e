use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::dto::UserSummary;
use crate::recipes::repo_types::Recipe;

#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<i32>,
}

/// Entry of the caller's recipe list.
#[derive(Debug, Serialize, PartialEq)]
pub struct RecipeListItem {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: Uuid,
}

/// Response for a newly created recipe, with its owner.
#[derive(Debug, Serialize, PartialEq)]
pub struct CreatedRecipeResponse {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user: UserSummary,
}

impl From<Recipe> for RecipeListItem {
    fn from(r: Recipe) -> Self {
        Self {
            title: r.title,
            instructions: r.instructions,
            minutes_to_complete: r.minutes_to_complete,
            user_id: r.user_id,
        }
    }
}
