//! Storage for uploaded recipe images and avatars.

use crate::config::Config;
use crate::error::ApiError;
use crate::models::NewImage;
use crate::schema::images;
use diesel::prelude::*;
use foodgram_core::decode_data_url;
use uuid::Uuid;

/// Decode a base64 data URL, validate it and store the bytes. Returns the new image id.
pub fn store_data_url(conn: &mut PgConnection, data_url: &str) -> Result<Uuid, ApiError> {
    let image = decode_data_url(data_url)?;

    let id = diesel::insert_into(images::table)
        .values(&NewImage {
            content_type: &image.content_type,
            data: &image.data,
        })
        .returning(images::id)
        .get_result(conn)?;

    tracing::debug!(%id, content_type = %image.content_type, bytes = image.data.len(), "stored image");
    Ok(id)
}

pub fn delete_image(conn: &mut PgConnection, id: Uuid) -> Result<(), diesel::result::Error> {
    diesel::delete(images::table.find(id)).execute(conn)?;
    Ok(())
}

/// Public URL of a stored image.
pub fn image_url(config: &Config, id: Uuid) -> String {
    config.absolute_url(&format!("/media/{}", id))
}
