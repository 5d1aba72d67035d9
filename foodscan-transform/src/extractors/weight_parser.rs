//! Weight Parser
//!
//! Turns a raw quantity value into a `(magnitude, unit)` pair.
//!
//! # Accepted Inputs
//! - JSON number: read as grams when inside the open range (0, 10000)
//! - Text, lower-cased and matched in priority order:
//!   1. **Multiplied pack**: `"2 x 100g"`, `"4 × 25 g"` → magnitude `n * m`
//!   2. **Spaced or attached known unit**: `"400 g"`, `"1.5 kilos"`, `"33 cl"`
//!   3. **Attached letters**: `"400g"`, `"6pieces"` (any letter run as unit)
//!
//! The first pattern that matches wins. Units come back exactly as matched;
//! canonicalization and gram conversion belong to
//! [`UnitNormalizer`](crate::normalizers::UnitNormalizer).
//!
//! Nothing here can fail: unrecognized input is `(None, None)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

/// Exclusive upper bound for bare numbers to be read as grams
pub const DIRECT_NUMERIC_MAX: f64 = 10_000.0;

/// Number with optional decimal part (dot or comma)
const NUMBER: &str = r"(\d+(?:[.,]\d+)?)";

/// Unit tokens the spaced pattern recognizes, longest spellings first
const KNOWN_UNITS: &str = "kilogrammes?|kilograms?|kilos?|kg\
|milligrammes?|milligrams?|mg\
|grammes?|grams?|gr|g\
|millilitres?|milliliters?|ml\
|centilitres?|centiliters?|cl\
|decilitres?|deciliters?|dl\
|litres?|liters?|l\
|ounces?|oz|pounds?|lbs?";

static MULTIPLIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{NUMBER}\s*[x×*]\s*{NUMBER}\s*(g|kg|mg|l|ml|cl|dl|oz|lb)\b"
    ))
    .expect("multiplied-pack pattern is valid")
});

static SPACED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*({KNOWN_UNITS})\b")).expect("spaced-unit pattern is valid")
});

static ATTACHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{NUMBER}(\p{{Alphabetic}}+)")).expect("attached-unit pattern is valid")
});

/// Parsed quantity: raw magnitude and raw unit token
pub type ParsedQuantity = (Option<f64>, Option<String>);

/// Stateless quantity parser
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightParser;

impl WeightParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse any raw quantity value
    ///
    /// Strings go through [`parse_text`](Self::parse_text); numbers through the
    /// direct-numeric rule; booleans, arrays and objects are rendered as text
    /// first, which in practice never matches.
    pub fn parse(&self, raw: Option<&Value>) -> ParsedQuantity {
        match raw {
            None | Some(Value::Null) => (None, None),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => self.parse_number(v),
                None => (None, None),
            },
            Some(Value::String(s)) => self.parse_text(s),
            Some(other) => self.parse_text(&other.to_string()),
        }
    }

    /// Bare number: grams when `0 < value < 10000`
    pub fn parse_number(&self, value: f64) -> ParsedQuantity {
        if value.is_finite() && value > 0.0 && value < DIRECT_NUMERIC_MAX {
            (Some(value), Some("g".to_string()))
        } else {
            trace!(value, "Direct numeric quantity outside accepted range");
            (None, None)
        }
    }

    /// Free-text quantity
    pub fn parse_text(&self, text: &str) -> ParsedQuantity {
        let clean = text.trim().to_lowercase();
        if clean.is_empty() {
            return (None, None);
        }

        if let Some(caps) = MULTIPLIED.captures(&clean) {
            if let (Some(count), Some(each)) = (parse_decimal(&caps[1]), parse_decimal(&caps[2])) {
                return (Some(count * each), Some(caps[3].to_string()));
            }
        }

        for pattern in [&*SPACED, &*ATTACHED] {
            if let Some(caps) = pattern.captures(&clean) {
                if let Some(value) = parse_decimal(&caps[1]) {
                    return (Some(value), Some(caps[2].to_string()));
                }
            }
        }

        trace!(input = %clean, "Quantity text matched no pattern");
        (None, None)
    }
}

/// Parse `"1.5"` or `"1,5"`
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
