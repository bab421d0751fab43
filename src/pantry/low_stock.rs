use crate::pantry::units::{normalize, Dimension, Normalized};

/// Threshold in base units (grams or milliliters) below which an item is
/// considered low on stock.
pub const LOW_STOCK_THRESHOLD: f64 = 100.0;

/// Anything with a quantity and a unit can be evaluated.
pub trait StockLevel {
    fn quantity(&self) -> f64;
    fn unit(&self) -> &str;
}

/// A flagged item together with its normalized magnitude.
#[derive(Debug)]
pub struct LowStock<'a, T> {
    pub item: &'a T,
    pub normalized: Normalized,
}

/// Pure evaluation: keep items whose normalized base magnitude is finite and
/// strictly below the threshold, restricted to mass and volume. Result is
/// ordered ascending by base magnitude; ties keep the input order.
pub fn evaluate<T: StockLevel>(items: &[T]) -> Vec<LowStock<'_, T>> {
    let mut flagged: Vec<LowStock<'_, T>> = items
        .iter()
        .filter_map(|item| {
            let normalized = normalize(item.quantity(), item.unit());
            match normalized.dimension {
                Dimension::Mass | Dimension::Vol
                    if normalized.base.is_finite() && normalized.base < LOW_STOCK_THRESHOLD =>
                {
                    Some(LowStock { item, normalized })
                }
                _ => None,
            }
        })
        .collect();

    // Vec::sort_by is stable, which is what keeps tied items in input order.
    flagged.sort_by(|a, b| a.normalized.base.total_cmp(&b.normalized.base));
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: &'static str,
        quantity: f64,
        unit: &'static str,
    }

    impl StockLevel for Item {
        fn quantity(&self) -> f64 {
            self.quantity
        }
        fn unit(&self) -> &str {
            self.unit
        }
    }

    fn item(name: &'static str, quantity: f64, unit: &'static str) -> Item {
        Item {
            name,
            quantity,
            unit,
        }
    }

    #[test]
    fn flags_and_sorts_lowest_first() {
        let pantry = vec![
            item("flour", 80.0, "g"),
            item("sugar", 150.0, "g"),
            item("milk", 50.0, "mL"),
            item("rice", 1.0, "kg"),
        ];
        let flagged = evaluate(&pantry);
        let names: Vec<&str> = flagged.iter().map(|f| f.item.name).collect();
        assert_eq!(names, vec!["milk", "flour"]);
    }

    #[test]
    fn other_units_are_never_flagged() {
        let pantry = vec![item("eggs", 2.0, "unit"), item("lemons", 0.0, "")];
        assert!(evaluate(&pantry).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        let pantry = vec![item("salt", 100.0, "g"), item("pepper", 99.999, "g")];
        let flagged = evaluate(&pantry);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].item.name, "pepper");
    }

    #[test]
    fn non_finite_magnitudes_are_excluded() {
        let pantry = vec![item("mystery", f64::NAN, "g"), item("void", f64::NEG_INFINITY, "mL")];
        assert!(evaluate(&pantry).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let pantry = vec![
            item("first", 50.0, "g"),
            item("second", 0.05, "kg"),
            item("third", 50.0, "mL"),
        ];
        let flagged = evaluate(&pantry);
        let names: Vec<&str> = flagged.iter().map(|f| f.item.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let pantry = vec![
            item("flour", 80.0, "g"),
            item("milk", 50.0, "mL"),
            item("sugar", 150.0, "g"),
        ];
        let first: Vec<&str> = evaluate(&pantry).iter().map(|f| f.item.name).collect();
        let second: Vec<&str> = evaluate(&pantry).iter().map(|f| f.item.name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn negative_stock_sorts_below_zero_stock() {
        let pantry = vec![item("a", 0.0, "g"), item("b", -5.0, "g")];
        let flagged = evaluate(&pantry);
        let names: Vec<&str> = flagged.iter().map(|f| f.item.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
