use serde::Serialize;

/// Physical dimension of a quantity after normalization. `Other` covers any
/// unit outside the g/kg/mL/L convention and is never threshold-comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Vol,
    Other,
}

/// A quantity reduced to its base unit: grams for mass, milliliters for
/// volume, the raw magnitude for everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub dimension: Dimension,
    pub base: f64,
    pub display: String,
}

/// Scale factor from a recognized unit to its base unit. Matching is exact
/// after trimming: "G" or "ml" are not recognized.
pub fn unit_scale(unit: &str) -> Option<(Dimension, f64)> {
    match unit.trim() {
        "g" => Some((Dimension::Mass, 1.0)),
        "kg" => Some((Dimension::Mass, 1000.0)),
        "mL" => Some((Dimension::Vol, 1.0)),
        "L" => Some((Dimension::Vol, 1000.0)),
        _ => None,
    }
}

/// Base unit symbol for a comparable dimension.
pub fn base_symbol(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Mass => "g",
        Dimension::Vol => "mL",
        Dimension::Other => "",
    }
}

/// Converts a quantity+unit pair into its canonical base-unit magnitude.
/// Values pass through as IEEE doubles; non-finite input stays non-finite
/// and is the caller's problem to exclude from comparisons.
pub fn normalize(quantity: f64, unit: &str) -> Normalized {
    let trimmed = unit.trim();
    let (dimension, base) = match unit_scale(trimmed) {
        Some((dimension, scale)) => (dimension, quantity * scale),
        None => (Dimension::Other, quantity),
    };
    let display = if trimmed.is_empty() {
        format!("{quantity}")
    } else {
        format!("{quantity} {trimmed}")
    };
    Normalized {
        dimension,
        base,
        display,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grams_pass_through() {
        let n = normalize(250.0, "g");
        assert_eq!(n.dimension, Dimension::Mass);
        assert_eq!(n.base, 250.0);
        assert_eq!(n.display, "250 g");
    }

    #[test]
    fn kilograms_scale_to_grams() {
        let n = normalize(2.0, "kg");
        assert_eq!(n.dimension, Dimension::Mass);
        assert_eq!(n.base, 2000.0);
    }

    #[test]
    fn liters_scale_to_milliliters() {
        let n = normalize(0.5, "L");
        assert_eq!(n.dimension, Dimension::Vol);
        assert_eq!(n.base, 500.0);
    }

    #[test]
    fn milliliters_pass_through() {
        let n = normalize(50.0, "mL");
        assert_eq!(n.dimension, Dimension::Vol);
        assert_eq!(n.base, 50.0);
    }

    #[test]
    fn unknown_units_are_other() {
        let n = normalize(5.0, "lb");
        assert_eq!(n.dimension, Dimension::Other);
        assert_eq!(n.base, 5.0);
    }

    #[test]
    fn blank_unit_is_trimmed_and_other() {
        let n = normalize(3.0, "   ");
        assert_eq!(n.dimension, Dimension::Other);
        assert_eq!(n.display, "3");
    }

    #[test]
    fn unit_matching_is_case_sensitive() {
        assert_eq!(normalize(1.0, "G").dimension, Dimension::Other);
        assert_eq!(normalize(1.0, "ml").dimension, Dimension::Other);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let n = normalize(1.5, " kg ");
        assert_eq!(n.dimension, Dimension::Mass);
        assert_eq!(n.base, 1500.0);
        assert_eq!(n.display, "1.5 kg");
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(normalize(f64::NAN, "g").base.is_nan());
        assert!(normalize(f64::INFINITY, "kg").base.is_infinite());
    }
}
