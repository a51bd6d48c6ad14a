//! Record types for the reference-data seed files.

use serde::Deserialize;

use crate::constants::{INGREDIENT_MAX_LENGTH, MEASUREMENT_UNIT_MAX_LENGTH, TAG_MAX_LENGTH};
use crate::error::ValidationError;
use crate::validation::validate_slug;

/// One entry of `ingredients.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

/// One entry of `tags.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub slug: String,
}

pub fn parse_ingredients(json: &str) -> Result<Vec<IngredientRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn parse_tags(json: &str) -> Result<Vec<TagRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

impl IngredientRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("name", &self.name, INGREDIENT_MAX_LENGTH)?;
        check_length(
            "measurement_unit",
            &self.measurement_unit,
            MEASUREMENT_UNIT_MAX_LENGTH,
        )
    }
}

impl TagRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("name", &self.name, TAG_MAX_LENGTH)?;
        validate_slug(&self.slug)
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredients() {
        let records =
            parse_ingredients(r#"[{"name": "абрикосовое варенье", "measurement_unit": "г"}]"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].measurement_unit, "г");
        assert!(records[0].validate().is_ok());
    }

    #[test]
    fn test_tag_with_bad_slug() {
        let records = parse_tags(r#"[{"name": "Lunch", "slug": "lunch time"}]"#).unwrap();
        assert!(matches!(
            records[0].validate(),
            Err(ValidationError::InvalidSlug(_))
        ));
    }
}
