//! Product formatting: raw Open Food Facts records to tool output views.
//!
//! Remote records are partially trusted: any field may be missing, empty, or
//! of an unexpected JSON type. Every accessor here returns an `Option` and
//! every view applies an explicit fallback.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Placeholder for missing text in summary-style fields.
pub const UNKNOWN: &str = "Unknown";

/// One product record as returned by the remote service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    fields: Map<String, Value>,
}

impl ProductRecord {
    /// Wrap a JSON value. Anything but an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Present, non-empty field value. Empty strings, zero and null count as missing.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| is_present(v))
    }

    /// Field rendered as text, when it is a string or a number.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<String> {
        self.text("code")
    }

    /// Fill in the barcode when the record does not carry one.
    pub fn set_code_if_missing(&mut self, code: &str) {
        if self.code().is_none() {
            self.fields
                .insert("code".to_string(), Value::String(code.to_string()));
        }
    }

    /// Nutrient sub-mapping keyed by `<nutrient>_<unit>` strings.
    pub fn nutriments(&self) -> Option<&Map<String, Value>> {
        self.fields.get("nutriments").and_then(Value::as_object)
    }

    /// Numeric nutrient value. Numeric strings are parsed; anything else is absent.
    pub fn nutrient(&self, key: &str) -> Option<Number> {
        match self.nutriments()?.get(key)? {
            Value::Number(n) => Some(n.clone()),
            Value::String(s) => s.trim().parse::<f64>().ok().and_then(Number::from_f64),
            _ => None,
        }
    }

    fn text_or(&self, key: &str, placeholder: &str) -> String {
        self.text(key).unwrap_or_else(|| placeholder.to_string())
    }

    fn raw_or_unknown(&self, key: &str) -> Value {
        self.raw(key)
            .cloned()
            .unwrap_or_else(|| Value::String(UNKNOWN.to_string()))
    }

    fn nutrient_or_zero(&self, key: &str) -> Number {
        self.nutrient(key).unwrap_or_else(|| Number::from(0))
    }

    fn nutriments_or_empty(&self) -> Value {
        Value::Object(self.nutriments().cloned().unwrap_or_default())
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Bool(b) => *b,
        Value::Array(_) | Value::Object(_) => true,
    }
}

// =============================================================================
// Summary view
// =============================================================================

/// Compact view used by every listing and search tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub barcode: String,
    pub name: String,
    pub brands: String,
    pub categories: String,
    pub nutriscore_grade: String,
    /// NOVA group number, or `"Unknown"`.
    pub nova_group: Value,
    pub basic_nutrition: BasicNutrition,
}

/// Five headline nutrients per 100g.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicNutrition {
    pub energy_kcal_100g: Number,
    pub fat_100g: Number,
    pub sugars_100g: Number,
    pub salt_100g: Number,
    pub proteins_100g: Number,
}

pub fn summary(product: &ProductRecord) -> ProductSummary {
    ProductSummary {
        barcode: product.text_or("code", UNKNOWN),
        name: product.text_or("product_name", UNKNOWN),
        brands: product.text_or("brands", UNKNOWN),
        categories: product.text_or("categories", UNKNOWN),
        nutriscore_grade: product.text_or("nutriscore_grade", UNKNOWN),
        nova_group: product.raw_or_unknown("nova_group"),
        basic_nutrition: BasicNutrition {
            energy_kcal_100g: product.nutrient_or_zero("energy-kcal_100g"),
            fat_100g: product.nutrient_or_zero("fat_100g"),
            sugars_100g: product.nutrient_or_zero("sugars_100g"),
            salt_100g: product.nutrient_or_zero("salt_100g"),
            proteins_100g: product.nutrient_or_zero("proteins_100g"),
        },
    }
}

// =============================================================================
// Detail view
// =============================================================================

/// Full product view returned by `get_product_by_barcode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    pub barcode: String,
    pub name: String,
    pub brands: String,
    pub categories: String,
    pub nutriscore_grade: String,
    pub nova_group: Value,
    pub ecoscore_grade: String,
    pub nutrition_per_100g: Value,
    pub ingredients: String,
    pub allergens: String,
    pub traces: String,
    pub labels: String,
    pub packaging: String,
    pub stores: String,
    pub countries: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_nutrition_url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ingredients_url: Option<Value>,
}

pub fn detail(product: &ProductRecord) -> ProductDetail {
    ProductDetail {
        barcode: product.text_or("code", UNKNOWN),
        name: product.text_or("product_name", UNKNOWN),
        brands: product.text_or("brands", UNKNOWN),
        categories: product.text_or("categories", UNKNOWN),
        nutriscore_grade: product.text_or("nutriscore_grade", UNKNOWN),
        nova_group: product.raw_or_unknown("nova_group"),
        ecoscore_grade: product.text_or("ecoscore_grade", UNKNOWN),
        nutrition_per_100g: product.nutriments_or_empty(),
        ingredients: product.text_or("ingredients_text", "No ingredient information"),
        allergens: product.text_or("allergens", "No allergen information"),
        traces: product.text_or("traces", "No trace information"),
        labels: product.text_or("labels", "No label information"),
        packaging: product.text_or("packaging", "No packaging information"),
        stores: product.text_or("stores", "No store information"),
        countries: product.text_or("countries", "No country information"),
        image_url: product.fields.get("image_url").cloned(),
        image_nutrition_url: product.fields.get("image_nutrition_url").cloned(),
        image_ingredients_url: product.fields.get("image_ingredients_url").cloned(),
    }
}

// =============================================================================
// Single-purpose views
// =============================================================================

/// Nutrition-only view; grades pass through untouched and are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Value>,
    pub nutrition_per_100g: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriscore_grade: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nova_group: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecoscore_grade: Option<Value>,
}

pub fn nutrition_facts(product: &ProductRecord) -> NutritionFacts {
    NutritionFacts {
        product_name: product.raw("product_name").cloned(),
        barcode: product.raw("code").cloned(),
        nutrition_per_100g: product.nutriments_or_empty(),
        nutriscore_grade: product.raw("nutriscore_grade").cloned(),
        nova_group: product.raw("nova_group").cloned(),
        ecoscore_grade: product.raw("ecoscore_grade").cloned(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergenInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Value>,
    pub allergens: String,
    pub traces: String,
    pub ingredients: String,
}

pub fn allergen_info(product: &ProductRecord) -> AllergenInfo {
    AllergenInfo {
        product_name: product.raw("product_name").cloned(),
        barcode: product.raw("code").cloned(),
        allergens: product.text_or("allergens", "No allergen information available"),
        traces: product.text_or("traces", "No trace information available"),
        ingredients: product.text_or("ingredients_text", "No ingredient information available"),
    }
}

/// One row of a `compare_products` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriscore_grade: Option<Value>,
    pub nutrition_per_100g: ComparisonNutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonNutrition {
    pub energy_kcal: Number,
    pub fat: Number,
    pub saturated_fat: Number,
    pub sugars: Number,
    pub salt: Number,
    pub fiber: Number,
    pub protein: Number,
    pub carbohydrates: Number,
}

pub fn comparison_entry(product: &ProductRecord) -> ComparisonEntry {
    ComparisonEntry {
        product_name: product.raw("product_name").cloned(),
        barcode: product.raw("code").cloned(),
        nutriscore_grade: product.raw("nutriscore_grade").cloned(),
        nutrition_per_100g: ComparisonNutrition {
            energy_kcal: product.nutrient_or_zero("energy-kcal_100g"),
            fat: product.nutrient_or_zero("fat_100g"),
            saturated_fat: product.nutrient_or_zero("saturated-fat_100g"),
            sugars: product.nutrient_or_zero("sugars_100g"),
            salt: product.nutrient_or_zero("salt_100g"),
            fiber: product.nutrient_or_zero("fiber_100g"),
            protein: product.nutrient_or_zero("proteins_100g"),
            carbohydrates: product.nutrient_or_zero("carbohydrates_100g"),
        },
    }
}
