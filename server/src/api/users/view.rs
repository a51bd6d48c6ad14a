//! Read shapes for users and subscribed authors.

use crate::api::recipes::view::{short_recipe, ShortRecipeResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::images::image_url;
use crate::models::{Recipe, User};
use crate::schema::{recipes, subscriptions, users};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user; always false for anonymous callers
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

/// An author as seen from the subscriptions endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
    /// Newest first, truncated by `recipes_limit`
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: i64,
}

pub fn user_response(config: &Config, user: User, is_subscribed: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        avatar: user.avatar_id.map(|id| image_url(config, id)),
        email: user.email,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        is_subscribed,
    }
}

pub fn find_user(conn: &mut PgConnection, id: i32) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))
}

/// Which of `author_ids` the viewer is subscribed to.
pub fn subscribed_ids(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    author_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer.id))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}

/// Build read shapes for a batch of users with one subscription query.
pub fn user_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<&User>,
    users: Vec<User>,
) -> Result<Vec<UserResponse>, ApiError> {
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_ids(conn, viewer, &ids)?;

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = subscribed.contains(&user.id);
            user_response(config, user, is_subscribed)
        })
        .collect())
}

/// Build subscription shapes for authors the viewer follows.
pub fn subscription_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: &User,
    authors: Vec<User>,
    recipes_limit: Option<usize>,
) -> Result<Vec<SubscriptionResponse>, ApiError> {
    let ids: Vec<i32> = authors.iter().map(|a| a.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let subscribed = subscribed_ids(conn, Some(viewer), &ids)?;

    let counts: HashMap<i32, i64> = recipes::table
        .filter(recipes::author_id.eq_any(&ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    let mut recipes_by_author: HashMap<i32, Vec<ShortRecipeResponse>> = HashMap::new();
    for recipe in newest_recipes(conn, &ids, recipes_limit)? {
        recipes_by_author
            .entry(recipe.author_id)
            .or_default()
            .push(short_recipe(config, &recipe));
    }

    Ok(authors
        .into_iter()
        .map(|author| {
            let recipes = recipes_by_author.remove(&author.id).unwrap_or_default();
            let recipes_count = counts.get(&author.id).copied().unwrap_or(0);
            let is_subscribed = subscribed.contains(&author.id);
            let user = user_response(config, author, is_subscribed);
            SubscriptionResponse {
                id: user.id,
                email: user.email,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
                is_subscribed: user.is_subscribed,
                avatar: user.avatar,
                recipes,
                recipes_count,
            }
        })
        .collect())
}

/// Newest recipes of each author in `author_ids`. With a limit, each author
/// gets its own `LIMIT` query so no more than `limit` rows per author are read.
fn newest_recipes(
    conn: &mut PgConnection,
    author_ids: &[i32],
    limit: Option<usize>,
) -> Result<Vec<Recipe>, diesel::result::Error> {
    let Some(limit) = limit else {
        return recipes::table
            .filter(recipes::author_id.eq_any(author_ids))
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .select(Recipe::as_select())
            .load(conn);
    };
    if limit == 0 {
        return Ok(Vec::new());
    }

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut rows = Vec::new();
    for &author_id in author_ids {
        rows.extend(
            recipes::table
                .filter(recipes::author_id.eq(author_id))
                .order((recipes::created_at.desc(), recipes::id.desc()))
                .limit(limit)
                .select(Recipe::as_select())
                .load(conn)?,
        );
    }
    Ok(rows)
}

/// `recipes_limit` only applies when it parses as a non-negative integer.
pub fn parse_recipes_limit(pairs: &[(String, String)]) -> Option<usize> {
    pairs
        .iter()
        .find(|(k, _)| k == "recipes_limit")
        .and_then(|(_, v)| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_recipes_limit_parsed() {
        assert_eq!(parse_recipes_limit(&pairs(&[("recipes_limit", "3")])), Some(3));
        assert_eq!(parse_recipes_limit(&pairs(&[("recipes_limit", "0")])), Some(0));
    }

    #[test]
    fn test_recipes_limit_ignored_when_not_a_number() {
        assert_eq!(parse_recipes_limit(&pairs(&[("recipes_limit", "many")])), None);
        assert_eq!(parse_recipes_limit(&pairs(&[("recipes_limit", "-1")])), None);
        assert_eq!(parse_recipes_limit(&pairs(&[("page", "2")])), None);
    }
}
