//! Typed result of field extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named upstream CO2 sources, in resolution priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Co2Source {
    /// `agribalyse.co2_total`
    AgribalyseTotal,
    /// `ecoscore_data.agribalyse.co2_total`
    EcoscoreAgribalyseTotal,
    /// `nutriments["carbon-footprint_100g"]`
    NutrimentsCarbonFootprint,
    /// `nutriments["carbon-footprint-from-known-ingredients_100g"]`
    NutrimentsKnownIngredients,
}

impl Co2Source {
    /// All sources, highest priority first
    pub const PRIORITY: [Co2Source; 4] = [
        Co2Source::AgribalyseTotal,
        Co2Source::EcoscoreAgribalyseTotal,
        Co2Source::NutrimentsCarbonFootprint,
        Co2Source::NutrimentsKnownIngredients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Co2Source::AgribalyseTotal => "agribalyse_total",
            Co2Source::EcoscoreAgribalyseTotal => "ecoscore_agribalyse_total",
            Co2Source::NutrimentsCarbonFootprint => "nutriments_carbon_footprint",
            Co2Source::NutrimentsKnownIngredients => "nutriments_known_ingredients",
        }
    }
}

impl fmt::Display for Co2Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every CO2 source value found on a record (per 100g); each is `None` when absent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Co2Sources {
    pub agribalyse_total: Option<f64>,
    pub ecoscore_agribalyse_total: Option<f64>,
    pub nutriments_carbon_footprint: Option<f64>,
    pub nutriments_known_ingredients: Option<f64>,
}

impl Co2Sources {
    pub fn get(&self, source: Co2Source) -> Option<f64> {
        match source {
            Co2Source::AgribalyseTotal => self.agribalyse_total,
            Co2Source::EcoscoreAgribalyseTotal => self.ecoscore_agribalyse_total,
            Co2Source::NutrimentsCarbonFootprint => self.nutriments_carbon_footprint,
            Co2Source::NutrimentsKnownIngredients => self.nutriments_known_ingredients,
        }
    }

    pub fn set(&mut self, source: Co2Source, value: Option<f64>) {
        let slot = match source {
            Co2Source::AgribalyseTotal => &mut self.agribalyse_total,
            Co2Source::EcoscoreAgribalyseTotal => &mut self.ecoscore_agribalyse_total,
            Co2Source::NutrimentsCarbonFootprint => &mut self.nutriments_carbon_footprint,
            Co2Source::NutrimentsKnownIngredients => &mut self.nutriments_known_ingredients,
        };
        *slot = value;
    }

    /// Sources with their values, highest priority first
    pub fn iter(&self) -> impl Iterator<Item = (Co2Source, Option<f64>)> + '_ {
        Co2Source::PRIORITY.iter().map(move |s| (*s, self.get(*s)))
    }

    pub fn any_present(&self) -> bool {
        self.iter().any(|(_, v)| v.is_some())
    }
}

/// Which target fields extraction managed to populate
///
/// A `true` flag always means the matching field on [`ExtractedFields`] is non-null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionSuccess {
    pub barcode: bool,
    pub product_name: bool,
    pub brand_name: bool,
    pub weight: bool,
    pub unit: bool,
    pub nutriscore_grade: bool,
    pub nutriscore_score: bool,
    pub eco_score: bool,
    /// True iff any CO2 source is present
    pub co2_total: bool,
}

impl ExtractionSuccess {
    /// Derive flags from field presence
    pub fn from_fields(fields: &ExtractedFields) -> Self {
        Self {
            barcode: fields.barcode.is_some(),
            product_name: fields.product_name.is_some(),
            brand_name: fields.brand_name.is_some(),
            weight: fields.weight.is_some(),
            unit: fields.unit.is_some(),
            nutriscore_grade: fields.nutriscore_grade.is_some(),
            nutriscore_score: fields.nutriscore_score.is_some(),
            eco_score: fields.eco_score.is_some(),
            co2_total: fields.co2_sources.any_present(),
        }
    }

    /// `(field name, flag)` pairs in a stable order
    pub fn entries(&self) -> [(&'static str, bool); 9] {
        [
            ("barcode", self.barcode),
            ("product_name", self.product_name),
            ("brand_name", self.brand_name),
            ("weight", self.weight),
            ("unit", self.unit),
            ("nutriscore_grade", self.nutriscore_grade),
            ("nutriscore_score", self.nutriscore_score),
            ("eco_score", self.eco_score),
            ("co2_total", self.co2_total),
        ]
    }
}

/// Candidate values for every target field of one raw record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub barcode: Option<String>,
    pub product_name: Option<String>,
    pub brand_name: Option<String>,
    pub brand_tags: Vec<String>,
    /// Raw magnitude, in `unit` (not yet converted to grams)
    pub weight: Option<f64>,
    /// Raw unit token as found upstream
    pub unit: Option<String>,
    /// Upper-cased grade; may still be outside A-E
    pub nutriscore_grade: Option<String>,
    pub nutriscore_score: Option<i64>,
    pub eco_score: Option<String>,
    pub co2_sources: Co2Sources,
    pub extraction_success: ExtractionSuccess,
}
