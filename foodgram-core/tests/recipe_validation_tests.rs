//! Rules applied to recipe payloads before anything touches the database.

use foodgram_core::constants::MAX_POSITIVE_VALUE;
use foodgram_core::{DraftMode, IngredientAmount, RecipeDraft, ValidationError};

fn ingredient(id: i32, amount: i64) -> IngredientAmount {
    IngredientAmount { id, amount }
}

/// A payload that passes every create-time rule.
fn complete_draft() -> RecipeDraft {
    RecipeDraft {
        name: Some("Borscht".to_string()),
        text: Some("Simmer everything for an hour.".to_string()),
        cooking_time: Some(60),
        tags: Some(vec![1, 2]),
        ingredients: Some(vec![ingredient(10, 300), ingredient(11, 2)]),
        image: Some("data:image/png;base64,AAAA".to_string()),
    }
}

#[test]
fn test_complete_draft_is_accepted() {
    let valid = complete_draft().validate(DraftMode::Create).unwrap();
    assert_eq!(valid.name.as_deref(), Some("Borscht"));
    assert_eq!(valid.cooking_time, Some(60));
    assert_eq!(valid.tags, vec![1, 2]);
    assert_eq!(valid.ingredients, vec![(10, 300), (11, 2)]);
}

#[test]
fn test_duplicate_ingredient_ids_rejected() {
    let draft = RecipeDraft {
        ingredients: Some(vec![ingredient(10, 1), ingredient(10, 5)]),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::DuplicateIngredients)
    );
}

#[test]
fn test_zero_tags_rejected() {
    let draft = RecipeDraft {
        tags: Some(vec![]),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::NoTags)
    );
}

#[test]
fn test_missing_tags_rejected_on_update() {
    let draft = RecipeDraft {
        tags: None,
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Update),
        Err(ValidationError::NoTags)
    );
}

#[test]
fn test_duplicate_tags_rejected() {
    let draft = RecipeDraft {
        tags: Some(vec![3, 4, 3]),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::DuplicateTags)
    );
}

#[test]
fn test_no_ingredients_rejected() {
    let draft = RecipeDraft {
        ingredients: Some(vec![]),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::NoIngredients)
    );
}

#[test]
fn test_amount_bounds() {
    for amount in [0, -1, MAX_POSITIVE_VALUE + 1] {
        let draft = RecipeDraft {
            ingredients: Some(vec![ingredient(10, amount)]),
            ..complete_draft()
        };
        assert!(
            matches!(
                draft.validate(DraftMode::Create),
                Err(ValidationError::AmountOutOfRange {
                    ingredient_id: 10,
                    ..
                })
            ),
            "amount {} should be rejected",
            amount
        );
    }

    let draft = RecipeDraft {
        ingredients: Some(vec![ingredient(10, MAX_POSITIVE_VALUE)]),
        ..complete_draft()
    };
    assert!(draft.validate(DraftMode::Create).is_ok());
}

#[test]
fn test_cooking_time_bounds() {
    let draft = RecipeDraft {
        cooking_time: Some(0),
        ..complete_draft()
    };
    assert!(matches!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::CookingTimeOutOfRange { .. })
    ));
}

#[test]
fn test_image_required_on_create_only() {
    let draft = RecipeDraft {
        image: None,
        ..complete_draft()
    };
    assert_eq!(
        draft.clone().validate(DraftMode::Create),
        Err(ValidationError::MissingImage)
    );

    let valid = draft.validate(DraftMode::Update).unwrap();
    assert_eq!(valid.image, None);
}

#[test]
fn test_empty_image_rejected() {
    let draft = RecipeDraft {
        image: Some(String::new()),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Update),
        Err(ValidationError::MissingImage)
    );
}

#[test]
fn test_update_keeps_unsent_fields_unset() {
    let draft = RecipeDraft {
        name: None,
        text: None,
        cooking_time: None,
        image: None,
        ..complete_draft()
    };
    let valid = draft.validate(DraftMode::Update).unwrap();
    assert_eq!(valid.name, None);
    assert_eq!(valid.text, None);
    assert_eq!(valid.cooking_time, None);
}

#[test]
fn test_blank_name_rejected() {
    let draft = RecipeDraft {
        name: Some("   ".to_string()),
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::EmptyField("name"))
    );
}

#[test]
fn test_overlong_name_rejected() {
    let draft = RecipeDraft {
        name: Some("x".repeat(257)),
        ..complete_draft()
    };
    assert!(matches!(
        draft.validate(DraftMode::Create),
        Err(ValidationError::TooLong { field: "name", .. })
    ));
}

#[test]
fn test_self_subscription_rejected() {
    use foodgram_core::validation::validate_subscription;

    assert_eq!(
        validate_subscription(5, 5),
        Err(ValidationError::SelfSubscription)
    );
    assert!(validate_subscription(5, 6).is_ok());
}
