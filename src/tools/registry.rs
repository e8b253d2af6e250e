//! Built-in tool descriptors for the Open Food Facts API.

use serde_json::json;

use super::catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
use crate::handlers::args::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_SORT_BY, SORT_FIELDS};

/// Nutri-Score grades accepted by `search_by_nutriments`.
pub const NUTRISCORE_GRADES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Minimum number of barcodes accepted by `compare_products`.
pub const MIN_COMPARE: usize = 2;
/// Maximum number of barcodes accepted by `compare_products`.
pub const MAX_COMPARE: usize = 5;

fn page() -> ParamDef {
    ParamDef::optional(
        "page",
        ParamType::Number,
        "Page number for pagination (default: 1)",
    )
    .with_default(json!(DEFAULT_PAGE))
}

fn page_size() -> ParamDef {
    ParamDef::optional(
        "page_size",
        ParamType::Number,
        "Number of results per page (default: 20, max: 100)",
    )
    .with_default(json!(DEFAULT_PAGE_SIZE))
}

fn barcode(description: &str) -> ParamDef {
    ParamDef::required("barcode", ParamType::String, description)
}

fn per_100g(name: &str, description: &str) -> ParamDef {
    ParamDef::optional(name, ParamType::Number, description)
}

/// The eight tools this server exposes, in advertised order.
pub fn builtin_entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry {
            name: "search_products".into(),
            description: "Search for food products by name, brand, or category".into(),
            parameters: vec![
                ParamDef::required(
                    "query",
                    ParamType::String,
                    "Search query (product name, brand, or category)",
                ),
                page(),
                page_size(),
                ParamDef::optional(
                    "sort_by",
                    ParamType::Enum(SORT_FIELDS.iter().map(|s| s.to_string()).collect()),
                    "Sort results by: popularity, product_name, created_t, last_modified_t",
                )
                .with_default(json!(DEFAULT_SORT_BY)),
            ],
        },
        ToolEntry {
            name: "get_product_by_barcode".into(),
            description: "Get detailed product information by barcode/EAN".into(),
            parameters: vec![barcode("Product barcode/EAN (e.g., 3017620422003)")],
        },
        ToolEntry {
            name: "get_products_by_category".into(),
            description: "Get products from a specific category".into(),
            parameters: vec![
                ParamDef::required(
                    "category",
                    ParamType::String,
                    "Category name (e.g., \"breakfast-cereals\", \"yogurts\", \"beverages\")",
                ),
                page(),
                page_size(),
            ],
        },
        ToolEntry {
            name: "get_products_by_brand".into(),
            description: "Get products from a specific brand".into(),
            parameters: vec![
                ParamDef::required(
                    "brand",
                    ParamType::String,
                    "Brand name (e.g., \"Nestlé\", \"Coca-Cola\", \"Danone\")",
                ),
                page(),
                page_size(),
            ],
        },
        ToolEntry {
            name: "get_nutrition_facts".into(),
            description: "Get detailed nutrition facts for a product by barcode".into(),
            parameters: vec![barcode("Product barcode/EAN")],
        },
        ToolEntry {
            name: "compare_products".into(),
            description: "Compare nutrition facts between multiple products".into(),
            parameters: vec![ParamDef::required(
                "barcodes",
                ParamType::StringList {
                    min_items: Some(MIN_COMPARE),
                    max_items: Some(MAX_COMPARE),
                },
                "Array of product barcodes to compare",
            )],
        },
        ToolEntry {
            name: "get_allergen_info".into(),
            description: "Get allergen information for a product".into(),
            parameters: vec![barcode("Product barcode/EAN")],
        },
        ToolEntry {
            name: "search_by_nutriments".into(),
            description: "Search products by nutritional criteria".into(),
            parameters: vec![
                per_100g("max_fat", "Maximum fat content per 100g"),
                per_100g("max_sugar", "Maximum sugar content per 100g"),
                per_100g("max_salt", "Maximum salt content per 100g"),
                per_100g("min_fiber", "Minimum fiber content per 100g"),
                per_100g("min_protein", "Minimum protein content per 100g"),
                ParamDef::optional(
                    "nutriscore_grade",
                    ParamType::Enum(NUTRISCORE_GRADES.iter().map(|s| s.to_string()).collect()),
                    "Nutri-Score grade (A, B, C, D, E)",
                ),
                page(),
                page_size(),
            ],
        },
    ]
}

impl ToolCatalog {
    /// Catalog of the built-in tools.
    pub fn builtin() -> Self {
        Self::from_entries(builtin_entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = ToolCatalog::new(builtin_entries()).unwrap();
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn test_builtin_order() {
        let names: Vec<String> = ToolCatalog::builtin()
            .entries()
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "search_products",
                "get_product_by_barcode",
                "get_products_by_category",
                "get_products_by_brand",
                "get_nutrition_facts",
                "compare_products",
                "get_allergen_info",
                "search_by_nutriments",
            ]
        );
    }

    #[test]
    fn test_compare_products_schema_bounds() {
        let catalog = ToolCatalog::builtin();
        let schema = catalog.get("compare_products").unwrap().input_schema();
        assert_eq!(schema["properties"]["barcodes"]["minItems"], 2);
        assert_eq!(schema["properties"]["barcodes"]["maxItems"], 5);
        assert_eq!(schema["required"], json!(["barcodes"]));
    }

    #[test]
    fn test_search_by_nutriments_has_no_required() {
        let catalog = ToolCatalog::builtin();
        let schema = catalog.get("search_by_nutriments").unwrap().input_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(
            schema["properties"]["nutriscore_grade"]["enum"],
            json!(["A", "B", "C", "D", "E"])
        );
        assert!(schema["properties"]["max_fat"].get("default").is_none());
    }

    #[test]
    fn test_paginated_defaults_advertised() {
        let catalog = ToolCatalog::builtin();
        let schema = catalog.get("search_products").unwrap().input_schema();
        assert_eq!(schema["properties"]["page"]["default"], 1);
        assert_eq!(schema["properties"]["page_size"]["default"], 20);
        assert_eq!(schema["properties"]["sort_by"]["default"], "popularity");
    }
}
