pub mod constants;
pub mod error;
pub mod filters;
pub mod fixtures;
pub mod image;
pub mod pagination;
pub mod shopping_list;
pub mod short_code;
pub mod validation;

pub use error::{FilterError, ImageError, ShortCodeError, ValidationError};
pub use filters::RecipeFilter;
pub use image::{decode_data_url, DecodedImage};
pub use pagination::{PageLinks, PageRequest};
pub use shopping_list::{ShoppingList, ShoppingListEntry};
pub use short_code::{store_unique_code, Attempt};
pub use validation::{DraftMode, IngredientAmount, RecipeDraft, ValidRecipe};
