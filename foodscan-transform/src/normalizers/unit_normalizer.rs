//! Unit Normalizer
//!
//! Maps raw unit tokens (English and French spellings) to canonical units,
//! classifies them, and converts magnitudes to grams. Volumes are treated as
//! mass-equivalent at 1 ml ≈ 1 g.

use serde::{Deserialize, Serialize};

/// Canonical unit tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalUnit {
    G,
    Kg,
    Mg,
    Oz,
    Lb,
    Ml,
    Cl,
    Dl,
    L,
    Pieces,
    Units,
    Count,
}

/// Broad family a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Weight,
    Volume,
    Counting,
}

impl CanonicalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalUnit::G => "g",
            CanonicalUnit::Kg => "kg",
            CanonicalUnit::Mg => "mg",
            CanonicalUnit::Oz => "oz",
            CanonicalUnit::Lb => "lb",
            CanonicalUnit::Ml => "ml",
            CanonicalUnit::Cl => "cl",
            CanonicalUnit::Dl => "dl",
            CanonicalUnit::L => "l",
            CanonicalUnit::Pieces => "pieces",
            CanonicalUnit::Units => "units",
            CanonicalUnit::Count => "count",
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            CanonicalUnit::G
            | CanonicalUnit::Kg
            | CanonicalUnit::Mg
            | CanonicalUnit::Oz
            | CanonicalUnit::Lb => UnitKind::Weight,
            CanonicalUnit::Ml | CanonicalUnit::Cl | CanonicalUnit::Dl | CanonicalUnit::L => {
                UnitKind::Volume
            }
            CanonicalUnit::Pieces | CanonicalUnit::Units | CanonicalUnit::Count => {
                UnitKind::Counting
            }
        }
    }

    /// Multiplier to grams; `None` for counting units
    pub fn grams_factor(&self) -> Option<f64> {
        match self {
            CanonicalUnit::G => Some(1.0),
            CanonicalUnit::Kg => Some(1000.0),
            CanonicalUnit::Mg => Some(0.001),
            CanonicalUnit::Oz => Some(28.35),
            CanonicalUnit::Lb => Some(453.59),
            CanonicalUnit::Ml => Some(1.0),
            CanonicalUnit::Cl => Some(10.0),
            CanonicalUnit::Dl => Some(100.0),
            CanonicalUnit::L => Some(1000.0),
            CanonicalUnit::Pieces | CanonicalUnit::Units | CanonicalUnit::Count => None,
        }
    }
}

/// Stateless unit canonicalizer and converter
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitNormalizer;

impl UnitNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Canonical unit for a raw token, `None` if unrecognized
    pub fn normalize(&self, raw: &str) -> Option<CanonicalUnit> {
        let token = raw.trim().to_lowercase();
        let unit = match token.as_str() {
            "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" => CanonicalUnit::G,
            "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" | "kilogramme" | "kilogrammes" => {
                CanonicalUnit::Kg
            }
            "mg" | "milligram" | "milligrams" | "milligramme" | "milligrammes" => {
                CanonicalUnit::Mg
            }
            "l" | "litre" | "litres" | "liter" | "liters" => CanonicalUnit::L,
            "ml" | "millilitre" | "millilitres" | "milliliter" | "milliliters" => {
                CanonicalUnit::Ml
            }
            "cl" | "centilitre" | "centilitres" | "centiliter" | "centiliters" => {
                CanonicalUnit::Cl
            }
            "dl" | "decilitre" | "decilitres" | "deciliter" | "deciliters" => CanonicalUnit::Dl,
            "oz" | "ounce" | "ounces" => CanonicalUnit::Oz,
            "lb" | "lbs" | "pound" | "pounds" => CanonicalUnit::Lb,
            "piece" | "pieces" | "pièce" | "pièces" | "pcs" | "pc" => CanonicalUnit::Pieces,
            "unit" | "units" | "unité" | "unités" => CanonicalUnit::Units,
            "count" => CanonicalUnit::Count,
            _ => return None,
        };
        Some(unit)
    }

    pub fn is_weight_unit(&self, raw: &str) -> bool {
        matches!(self.normalize(raw).map(|u| u.kind()), Some(UnitKind::Weight))
    }

    pub fn is_volume_unit(&self, raw: &str) -> bool {
        matches!(self.normalize(raw).map(|u| u.kind()), Some(UnitKind::Volume))
    }

    pub fn is_counting_unit(&self, raw: &str) -> bool {
        matches!(self.normalize(raw).map(|u| u.kind()), Some(UnitKind::Counting))
    }

    /// Weight or volume (mass-equivalent) unit
    pub fn is_mass_compatible(&self, raw: &str) -> bool {
        self.is_weight_unit(raw) || self.is_volume_unit(raw)
    }

    /// Unrounded gram equivalent; range checks compare this value
    pub fn exact_grams(&self, value: f64, raw_unit: &str) -> Option<f64> {
        let factor = self.normalize(raw_unit)?.grams_factor()?;
        Some(value * factor)
    }

    /// Convert to grams, rounded to 3 decimals; `None` for unknown or counting units
    pub fn convert_to_grams(&self, value: f64, raw_unit: &str) -> Option<f64> {
        self.exact_grams(value, raw_unit).map(round3)
    }
}

/// Round to 3 decimal places
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_map_to_canonical() {
        let n = UnitNormalizer::new();
        let cases = [
            ("g", Some("g")),
            ("gr", Some("g")),
            ("Grammes", Some("g")),
            ("kilo", Some("kg")),
            ("kilogramme", Some("kg")),
            ("milligram", Some("mg")),
            ("litre", Some("l")),
            ("liter", Some("l")),
            ("millilitre", Some("ml")),
            ("centilitre", Some("cl")),
            ("ounce", Some("oz")),
            ("pound", Some("lb")),
            ("pièces", Some("pieces")),
            ("unknown", None),
            ("", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(n.normalize(raw).map(|u| u.as_str()), expected, "token {raw:?}");
        }
    }

    #[test]
    fn test_classification() {
        let n = UnitNormalizer::new();
        assert!(n.is_weight_unit("kg"));
        assert!(n.is_volume_unit("cl"));
        assert!(n.is_counting_unit("pcs"));
        assert!(n.is_mass_compatible("ml"));
        assert!(!n.is_mass_compatible("pieces"));
        assert!(!n.is_mass_compatible("boxes"));
    }

    #[test]
    fn test_convert_to_grams() {
        let n = UnitNormalizer::new();
        assert_eq!(n.convert_to_grams(100.0, "g"), Some(100.0));
        assert_eq!(n.convert_to_grams(1.5, "kg"), Some(1500.0));
        assert_eq!(n.convert_to_grams(500.0, "ml"), Some(500.0));
        assert_eq!(n.convert_to_grams(2.0, "l"), Some(2000.0));
        assert_eq!(n.convert_to_grams(33.0, "cl"), Some(330.0));
        assert_eq!(n.convert_to_grams(250.0, "mg"), Some(0.25));
        assert_eq!(n.convert_to_grams(1.0, "oz"), Some(28.35));
        assert_eq!(n.convert_to_grams(1.0, "lb"), Some(453.59));
        assert_eq!(n.convert_to_grams(6.0, "pieces"), None);
        assert_eq!(n.convert_to_grams(6.0, "boxes"), None);
    }

    #[test]
    fn test_exact_grams_not_rounded() {
        let n = UnitNormalizer::new();
        assert_eq!(n.exact_grams(0.0996, "g"), Some(0.0996));
        assert_eq!(n.convert_to_grams(0.0996, "g"), Some(0.1));
        assert_eq!(n.exact_grams(6.0, "pieces"), None);
    }
}
