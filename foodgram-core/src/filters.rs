//! Query-string filters for recipe and ingredient listings.

use crate::error::FilterError;

/// Filters accepted by the recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i32>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Parse decoded query pairs. Unknown keys are ignored so pagination
    /// parameters can share the same query string; `tags` may repeat.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, FilterError> {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => {
                    let author = value
                        .trim()
                        .parse::<i32>()
                        .map_err(|_| FilterError::InvalidValue {
                            param: "author",
                            value: value.clone(),
                        })?;
                    filter.author = Some(author);
                }
                "tags" => {
                    let slug = value.trim();
                    if !slug.is_empty() && !filter.tags.iter().any(|t| t == slug) {
                        filter.tags.push(slug.to_string());
                    }
                }
                "is_favorited" => filter.is_favorited = Some(parse_flag("is_favorited", value)?),
                "is_in_shopping_cart" => {
                    filter.is_in_shopping_cart = Some(parse_flag("is_in_shopping_cart", value)?)
                }
                _ => {}
            }
        }
        Ok(filter)
    }

    /// True when the filter can only match the caller's own favorites or cart.
    pub fn requires_user(&self) -> bool {
        self.is_favorited == Some(true) || self.is_in_shopping_cart == Some(true)
    }
}

fn parse_flag(param: &'static str, value: &str) -> Result<bool, FilterError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(FilterError::InvalidValue {
            param,
            value: value.to_string(),
        }),
    }
}

/// Build a `LIKE` pattern matching names that start with `prefix`.
///
/// `%`, `_` and `\` in the prefix are escaped so they match literally.
pub fn starts_with_pattern(prefix: &str) -> String {
    let escaped = prefix
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}%", escaped)
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
    fn test_empty_query() {
        let filter = RecipeFilter::from_pairs(&[]).unwrap();
        assert_eq!(filter, RecipeFilter::default());
        assert!(!filter.requires_user());
    }

    #[test]
    fn test_repeated_tags() {
        let filter = RecipeFilter::from_pairs(&pairs(&[
            ("tags", "breakfast"),
            ("page", "2"),
            ("tags", "dinner"),
            ("tags", "breakfast"),
        ]))
        .unwrap();
        assert_eq!(filter.tags, vec!["breakfast", "dinner"]);
    }

    #[test]
    fn test_flags() {
        let filter = RecipeFilter::from_pairs(&pairs(&[
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "false"),
            ("author", "7"),
        ]))
        .unwrap();
        assert_eq!(filter.is_favorited, Some(true));
        assert_eq!(filter.is_in_shopping_cart, Some(false));
        assert_eq!(filter.author, Some(7));
        assert!(filter.requires_user());
    }

    #[test]
    fn test_invalid_author() {
        let err = RecipeFilter::from_pairs(&pairs(&[("author", "bob")])).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue {
                param: "author",
                value: "bob".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_flag() {
        assert!(RecipeFilter::from_pairs(&pairs(&[("is_favorited", "maybe")])).is_err());
    }

    #[test]
    fn test_starts_with_pattern_escapes() {
        assert_eq!(starts_with_pattern("сах"), "сах%");
        assert_eq!(starts_with_pattern("100%_"), "100\\%\\_%");
    }
}
