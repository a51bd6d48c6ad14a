//! Field limits and defaults shared by the server and the CLI.

/// Smallest accepted cooking time, in minutes.
pub const COOKING_MIN_TIME: i64 = 1;

/// Smallest accepted ingredient amount.
pub const INGREDIENT_MIN_AMOUNT: i64 = 1;

/// Upper bound for cooking time and ingredient amounts (fits in SMALLINT).
pub const MAX_POSITIVE_VALUE: i64 = 32_000;

pub const RECIPE_NAME_MAX_LENGTH: usize = 256;
pub const TAG_MAX_LENGTH: usize = 32;
pub const INGREDIENT_MAX_LENGTH: usize = 128;
pub const MEASUREMENT_UNIT_MAX_LENGTH: usize = 64;

pub const EMAIL_MAX_LENGTH: usize = 254;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const NAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Usernames that would shadow a fixed route under `/api/users/`.
pub const RESERVED_USERNAMES: &[&str] = &["me", "subscriptions", "set_password"];

/// Number of characters in a generated short code.
pub const SHORT_URL_LENGTH: usize = 6;
pub const SHORT_URL_MAX_LENGTH: usize = 10;
pub const URL_MAX_LENGTH: usize = 256;

/// How many fresh codes to try before giving up on a collision streak.
pub const SHORT_URL_MAX_ATTEMPTS: usize = 10;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 1000;

pub const SHOPPING_LIST_FILE_NAME: &str = "shopping_list.txt";
