//! Seeding of reference data (tags and ingredients) from JSON files.

use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use anyhow::Context;
use diesel::prelude::*;
use foodgram_core::fixtures::{parse_ingredients, parse_tags};
use std::path::Path;

/// Insert every ingredient in `path`, skipping ones that already exist. Returns the number inserted.
pub fn load_ingredients(conn: &mut PgConnection, path: &Path) -> anyhow::Result<usize> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records =
        parse_ingredients(&json).with_context(|| format!("Invalid ingredients in {}", path.display()))?;

    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .with_context(|| format!("Ingredient #{} ({})", index + 1, record.name))?;
    }

    let rows: Vec<NewIngredient> = records
        .iter()
        .map(|r| NewIngredient {
            name: &r.name,
            measurement_unit: &r.measurement_unit,
        })
        .collect();

    let inserted = conn.transaction(|conn| {
        // Postgres caps bind parameters per statement
        let mut inserted = 0;
        for chunk in rows.chunks(1000) {
            inserted += diesel::insert_into(ingredients::table)
                .values(chunk)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        Ok::<_, diesel::result::Error>(inserted)
    })?;

    tracing::info!(
        file = %path.display(),
        total = records.len(),
        inserted,
        "loaded ingredients"
    );
    Ok(inserted)
}

/// Insert every tag in `path`, skipping ones whose name or slug already exists.
pub fn load_tags(conn: &mut PgConnection, path: &Path) -> anyhow::Result<usize> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = parse_tags(&json).with_context(|| format!("Invalid tags in {}", path.display()))?;

    for record in &records {
        record
            .validate()
            .with_context(|| format!("Tag {:?}", record.name))?;
    }

    let rows: Vec<NewTag> = records
        .iter()
        .map(|r| NewTag {
            name: &r.name,
            slug: &r.slug,
        })
        .collect();

    let inserted = diesel::insert_into(tags::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)?;

    tracing::info!(
        file = %path.display(),
        total = records.len(),
        inserted,
        "loaded tags"
    );
    Ok(inserted)
}
