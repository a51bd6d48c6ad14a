use thiserror::Error;

/// A payload failed a domain rule. The message is safe to show to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Field '{field}' must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("At least one tag is required")]
    NoTags,

    #[error("Tags must be unique")]
    DuplicateTags,

    #[error("At least one ingredient is required")]
    NoIngredients,

    #[error("Ingredients must be unique")]
    DuplicateIngredients,

    #[error("Amount for ingredient {ingredient_id} must be between {min} and {max}")]
    AmountOutOfRange {
        ingredient_id: i32,
        min: i64,
        max: i64,
    },

    #[error("Cooking time must be between {min} and {max} minutes")]
    CookingTimeOutOfRange { min: i64, max: i64 },

    #[error("Recipe must have an image")]
    MissingImage,

    #[error("Avatar is required")]
    MissingAvatar,

    #[error("You cannot subscribe to yourself")]
    SelfSubscription,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Username may contain only letters, digits and @/./+/-/_")]
    InvalidUsername,

    #[error("Username '{0}' is reserved")]
    ReservedUsername(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Slug '{0}' may contain only letters, digits, hyphens and underscores")]
    InvalidSlug(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image must be a base64 data URL")]
    NotDataUrl,

    #[error("Invalid base64 image data")]
    InvalidBase64,

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),

    #[error("Failed to read image: {0}")]
    Unreadable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid value for '{param}': {value}")]
    InvalidValue { param: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ShortCodeError<E> {
    #[error("No free short code after {0} attempts")]
    Exhausted(usize),

    #[error(transparent)]
    Store(E),
}
