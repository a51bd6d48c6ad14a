//! Short codes for absolute URLs, stored in `short_urls`.

use crate::error::ApiError;
use crate::models::NewShortUrl;
use crate::schema::short_urls;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::constants::{SHORT_URL_LENGTH, SHORT_URL_MAX_ATTEMPTS};
use foodgram_core::{store_unique_code, Attempt, ShortCodeError};

const SHORT_CODE_CONSTRAINT: &str = "short_urls_short_code_key";

/// Return the code for `original_url`, creating one if the URL has none yet.
pub fn code_for_url(conn: &mut PgConnection, original_url: &str) -> Result<String, ApiError> {
    if let Some(code) = existing_code(conn, original_url)? {
        return Ok(code);
    }

    // A concurrent request for the same URL is absorbed by ON CONFLICT and the re-read below
    store_unique_code(SHORT_URL_LENGTH, SHORT_URL_MAX_ATTEMPTS, |code| {
        let inserted = diesel::insert_into(short_urls::table)
            .values(&NewShortUrl {
                original_url,
                short_code: code,
            })
            .on_conflict(short_urls::original_url)
            .do_nothing()
            .execute(conn);

        match inserted {
            Ok(_) => Ok(Attempt::Stored(())),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info))
                if info.constraint_name() == Some(SHORT_CODE_CONSTRAINT) =>
            {
                tracing::debug!(code, "short code collision, retrying");
                Ok(Attempt::Collision)
            }
            Err(e) => Err(e),
        }
    })
    .map_err(|e| match e {
        ShortCodeError::Store(e) => ApiError::Database(e),
        exhausted @ ShortCodeError::Exhausted(_) => ApiError::Internal(exhausted.to_string()),
    })?;

    let code = existing_code(conn, original_url)?
        .ok_or_else(|| ApiError::Internal(format!("short link for {} vanished", original_url)))?;
    tracing::info!(%code, original_url, "short link created");
    Ok(code)
}

fn existing_code(
    conn: &mut PgConnection,
    original_url: &str,
) -> Result<Option<String>, diesel::result::Error> {
    short_urls::table
        .filter(short_urls::original_url.eq(original_url))
        .select(short_urls::short_code)
        .first(conn)
        .optional()
}

/// The original URL behind `code`, if any.
pub fn resolve(conn: &mut PgConnection, code: &str) -> Result<Option<String>, diesel::result::Error> {
    short_urls::table
        .filter(short_urls::short_code.eq(code))
        .select(short_urls::original_url)
        .first(conn)
        .optional()
}
