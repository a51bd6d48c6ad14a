//! Domain rules for recipe payloads, accounts, subscriptions and reference data.
//!
//! Everything here is pure: existence checks against the database (unknown tag or
//! ingredient ids, duplicate accounts) are the caller's job.

use std::collections::HashSet;

use crate::constants::{
    COOKING_MIN_TIME, EMAIL_MAX_LENGTH, INGREDIENT_MIN_AMOUNT, MAX_POSITIVE_VALUE,
    NAME_MAX_LENGTH, PASSWORD_MIN_LENGTH, RECIPE_NAME_MAX_LENGTH, RESERVED_USERNAMES,
    TAG_MAX_LENGTH, USERNAME_MAX_LENGTH,
};
use crate::error::ValidationError;

/// One `{id, amount}` entry of a recipe payload, before bounds checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    /// Every field is required.
    Create,
    /// Tags and ingredients are required and replace the old sets; the rest is optional.
    Update,
}

/// A recipe payload as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub image: Option<String>,
}

/// A recipe payload that passed every rule. Amounts are narrowed to the column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecipe {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i16>,
    pub tags: Vec<i32>,
    pub ingredients: Vec<(i32, i16)>,
    pub image: Option<String>,
}

impl RecipeDraft {
    pub fn validate(self, mode: DraftMode) -> Result<ValidRecipe, ValidationError> {
        let required = mode == DraftMode::Create;

        let tags = validate_tags(self.tags)?;
        let ingredients = validate_ingredients(self.ingredients)?;

        let name = match self.name {
            Some(name) => Some(validate_recipe_name(&name)?),
            None if required => return Err(ValidationError::MissingField("name")),
            None => None,
        };

        let text = match self.text {
            Some(text) if text.trim().is_empty() => {
                return Err(ValidationError::EmptyField("text"))
            }
            Some(text) => Some(text),
            None if required => return Err(ValidationError::MissingField("text")),
            None => None,
        };

        let cooking_time = match self.cooking_time {
            Some(minutes) => Some(validate_cooking_time(minutes)?),
            None if required => return Err(ValidationError::MissingField("cooking_time")),
            None => None,
        };

        let image = match self.image {
            Some(image) if image.trim().is_empty() => return Err(ValidationError::MissingImage),
            Some(image) => Some(image),
            None if required => return Err(ValidationError::MissingImage),
            None => None,
        };

        Ok(ValidRecipe {
            name,
            text,
            cooking_time,
            tags,
            ingredients,
            image,
        })
    }
}

pub fn validate_tags(tags: Option<Vec<i32>>) -> Result<Vec<i32>, ValidationError> {
    let tags = tags.ok_or(ValidationError::NoTags)?;
    if tags.is_empty() {
        return Err(ValidationError::NoTags);
    }
    let mut seen = HashSet::with_capacity(tags.len());
    if !tags.iter().all(|id| seen.insert(*id)) {
        return Err(ValidationError::DuplicateTags);
    }
    Ok(tags)
}

pub fn validate_ingredients(
    ingredients: Option<Vec<IngredientAmount>>,
) -> Result<Vec<(i32, i16)>, ValidationError> {
    let ingredients = ingredients.ok_or(ValidationError::NoIngredients)?;
    if ingredients.is_empty() {
        return Err(ValidationError::NoIngredients);
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    if !ingredients.iter().all(|item| seen.insert(item.id)) {
        return Err(ValidationError::DuplicateIngredients);
    }

    ingredients
        .into_iter()
        .map(|item| {
            bounded(item.amount, INGREDIENT_MIN_AMOUNT)
                .map(|amount| (item.id, amount))
                .ok_or(ValidationError::AmountOutOfRange {
                    ingredient_id: item.id,
                    min: INGREDIENT_MIN_AMOUNT,
                    max: MAX_POSITIVE_VALUE,
                })
        })
        .collect()
}

pub fn validate_cooking_time(minutes: i64) -> Result<i16, ValidationError> {
    bounded(minutes, COOKING_MIN_TIME).ok_or(ValidationError::CookingTimeOutOfRange {
        min: COOKING_MIN_TIME,
        max: MAX_POSITIVE_VALUE,
    })
}

fn bounded(value: i64, min: i64) -> Option<i16> {
    if (min..=MAX_POSITIVE_VALUE).contains(&value) {
        i16::try_from(value).ok()
    } else {
        None
    }
}

pub fn validate_recipe_name(name: &str) -> Result<String, ValidationError> {
    required_text("name", name, RECIPE_NAME_MAX_LENGTH)
}

fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}

pub fn validate_subscription(user_id: i32, author_id: i32) -> Result<(), ValidationError> {
    if user_id == author_id {
        return Err(ValidationError::SelfSubscription);
    }
    Ok(())
}

/// Registration fields, borrowed from the request body.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Normalized registration fields. The password is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAccount {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn validate_account(account: NewAccount<'_>) -> Result<ValidAccount, ValidationError> {
    let email = validate_email(account.email)?;
    let username = validate_username(account.username)?;
    let first_name = required_text("first_name", account.first_name, NAME_MAX_LENGTH)?;
    let last_name = required_text("last_name", account.last_name, NAME_MAX_LENGTH)?;
    validate_password(account.password)?;

    Ok(ValidAccount {
        email,
        username,
        first_name,
        last_name,
    })
}

/// Lowercases the domain part, like the usual email normalization.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyField("email"));
    }
    if email.len() > EMAIL_MAX_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: EMAIL_MAX_LENGTH,
        });
    }

    let (local, domain) = email.rsplit_once('@').ok_or(ValidationError::InvalidEmail)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = required_text("username", username, USERNAME_MAX_LENGTH)?;
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(ValidationError::InvalidUsername);
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&username))
    {
        return Err(ValidationError::ReservedUsername(username));
    }
    Ok(username)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort(PASSWORD_MIN_LENGTH));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::EmptyField("slug"));
    }
    if slug.len() > TAG_MAX_LENGTH {
        return Err(ValidationError::TooLong {
            field: "slug",
            max: TAG_MAX_LENGTH,
        });
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain_is_lowercased() {
        assert_eq!(
            validate_email("Cook@Example.COM").unwrap(),
            "Cook@example.com"
        );
    }

    #[test]
    fn test_email_without_domain_dot_rejected() {
        assert_eq!(
            validate_email("cook@localhost"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(validate_email("cook"), Err(ValidationError::InvalidEmail));
        assert_eq!(
            validate_email("co ok@example.com"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("chef.anna+1@home").is_ok());
        assert_eq!(
            validate_username("chef anna"),
            Err(ValidationError::InvalidUsername)
        );
    }

    #[test]
    fn test_reserved_username() {
        assert!(matches!(
            validate_username("Me"),
            Err(ValidationError::ReservedUsername(_))
        ));
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("breakfast_2").is_ok());
        assert!(validate_slug("завтрак").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_short_password() {
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::PasswordTooShort(PASSWORD_MIN_LENGTH))
        );
    }
}
