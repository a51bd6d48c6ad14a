//! Request body and link-table writes shared by recipe create and update.

use crate::error::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags};
use diesel::prelude::*;
use foodgram_core::{IngredientAmount, RecipeDraft, ValidRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: i32,
    pub amount: i64,
}

/// Body of recipe create (every field required) and update (tags and
/// ingredients required, everything else optional).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    /// Base64 data URL, e.g. `data:image/png;base64,...`
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
}

impl RecipeRequest {
    pub fn into_draft(self) -> RecipeDraft {
        RecipeDraft {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            tags: self.tags,
            ingredients: self.ingredients.map(|items| {
                items
                    .into_iter()
                    .map(|i| IngredientAmount {
                        id: i.id,
                        amount: i.amount,
                    })
                    .collect()
            }),
            image: self.image,
        }
    }
}

/// Reject tag or ingredient ids that do not exist.
pub fn ensure_references_exist(conn: &mut PgConnection, recipe: &ValidRecipe) -> Result<(), ApiError> {
    let found_tags: Vec<i32> = tags::table
        .filter(tags::id.eq_any(&recipe.tags))
        .select(tags::id)
        .load(conn)?;
    let missing = missing_ids(recipe.tags.iter().copied(), &found_tags);
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!("Unknown tag ids: {}", join_ids(&missing))));
    }

    let ingredient_ids: Vec<i32> = recipe.ingredients.iter().map(|(id, _)| *id).collect();
    let found_ingredients: Vec<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .select(ingredients::id)
        .load(conn)?;
    let missing = missing_ids(ingredient_ids.iter().copied(), &found_ingredients);
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Unknown ingredient ids: {}",
            join_ids(&missing)
        )));
    }

    Ok(())
}

/// Replace the recipe's tag set and ingredient amounts.
pub fn replace_links(
    conn: &mut PgConnection,
    recipe_id: i32,
    recipe: &ValidRecipe,
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id))).execute(conn)?;
    let new_tags: Vec<NewRecipeTag> = recipe
        .tags
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&new_tags)
        .execute(conn)?;

    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    let new_ingredients: Vec<NewRecipeIngredient> = recipe
        .ingredients
        .iter()
        .map(|&(ingredient_id, amount)| NewRecipeIngredient {
            recipe_id,
            ingredient_id,
            amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&new_ingredients)
        .execute(conn)?;

    Ok(())
}

fn missing_ids(requested: impl Iterator<Item = i32>, found: &[i32]) -> Vec<i32> {
    requested.filter(|id| !found.contains(id)).collect()
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ids_keeps_request_order() {
        assert_eq!(missing_ids([5, 1, 9, 2].into_iter(), &[1, 2]), vec![5, 9]);
        assert!(missing_ids([1, 2].into_iter(), &[2, 1]).is_empty());
    }

    #[test]
    fn test_into_draft_maps_ingredients() {
        let request = RecipeRequest {
            ingredients: Some(vec![IngredientAmountRequest { id: 3, amount: 200 }]),
            tags: Some(vec![1]),
            image: None,
            name: Some("Borscht".to_string()),
            text: None,
            cooking_time: Some(90),
        };
        let draft = request.into_draft();
        assert_eq!(
            draft.ingredients,
            Some(vec![IngredientAmount { id: 3, amount: 200 }])
        );
        assert_eq!(draft.cooking_time, Some(90));
        assert!(draft.image.is_none());
    }
}
