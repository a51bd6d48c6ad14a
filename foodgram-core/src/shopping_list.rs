//! Shopping list aggregation across every recipe in a user's cart.

use std::collections::HashMap;
use std::fmt::Write;

/// One summed line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Group `(name, unit, amount)` rows by name and unit, summing amounts.
    ///
    /// Entries come out in alphabetical order of name, then unit, ignoring case.
    pub fn aggregate<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, i64)>,
    {
        let mut totals: HashMap<(String, String), i64> = HashMap::new();
        for (name, unit, amount) in rows {
            *totals.entry((name, unit)).or_default() += amount;
        }

        let mut entries: Vec<ShoppingListEntry> = totals
            .into_iter()
            .map(|((name, measurement_unit), total_amount)| ShoppingListEntry {
                name,
                measurement_unit,
                total_amount,
            })
            .collect();
        entries.sort_by_cached_key(|e| {
            (
                alphabetical_key(&e.name),
                alphabetical_key(&e.measurement_unit),
                e.name.clone(),
                e.measurement_unit.clone(),
            )
        });

        Self { entries }
    }

    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text body of the downloadable file.
    pub fn render(&self) -> String {
        let mut out = String::from("Shopping list:\n");
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "{} ({}) — {}",
                entry.name, entry.measurement_unit, entry.total_amount
            );
        }
        out
    }
}

/// Case-insensitive sort key. `ё` sits right after `е`, as in the Russian alphabet,
/// instead of after `я` where its code point puts it.
fn alphabetical_key(value: &str) -> Vec<(char, u8)> {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ё' => ('е', 1),
            c => (c, 0),
        })
        .collect()
}
