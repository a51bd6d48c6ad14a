//! Aggregation of cart ingredients into the downloadable shopping list.

use foodgram_core::ShoppingList;

fn row(name: &str, unit: &str, amount: i64) -> (String, String, i64) {
    (name.to_string(), unit.to_string(), amount)
}

#[test]
fn test_sums_same_ingredient_across_recipes() {
    // Two cart recipes both use flour and eggs.
    let list = ShoppingList::aggregate(vec![
        row("flour", "g", 200),
        row("eggs", "pcs", 2),
        row("flour", "g", 350),
        row("eggs", "pcs", 3),
        row("milk", "ml", 250),
    ]);

    let totals: Vec<(&str, &str, i64)> = list
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e.measurement_unit.as_str(), e.total_amount))
        .collect();

    assert_eq!(
        totals,
        vec![("eggs", "pcs", 5), ("flour", "g", 550), ("milk", "ml", 250)]
    );
}

#[test]
fn test_same_name_different_unit_kept_apart() {
    let list = ShoppingList::aggregate(vec![row("sugar", "g", 100), row("sugar", "tbsp", 2)]);
    assert_eq!(list.entries().len(), 2);
    assert_eq!(list.entries()[0].measurement_unit, "g");
    assert_eq!(list.entries()[1].measurement_unit, "tbsp");
}

#[test]
fn test_render() {
    let list = ShoppingList::aggregate(vec![row("salt", "g", 5), row("butter", "g", 50)]);
    assert_eq!(
        list.render(),
        "Shopping list:\nbutter (g) — 50\nsalt (g) — 5\n"
    );
}

#[test]
fn test_empty_cart() {
    let list = ShoppingList::aggregate(Vec::new());
    assert!(list.is_empty());
    assert_eq!(list.render(), "Shopping list:\n");
}

#[test]
fn test_orders_alphabetically_ignoring_case() {
    let list = ShoppingList::aggregate(vec![
        row("яблоко", "pcs", 1),
        row("Banana", "pcs", 2),
        row("ёжевика", "g", 100),
        row("apple", "pcs", 3),
        row("ель", "g", 5),
        row("жёлудь", "g", 7),
    ]);

    let names: Vec<&str> = list.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["apple", "Banana", "ель", "ёжевика", "жёлудь", "яблоко"]
    );
}
