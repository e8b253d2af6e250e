//! Listing handlers: free-text search plus category, brand and nutrient-threshold listings.

use serde_json::{Map, Value};

use super::args::{Args, DEFAULT_SORT_BY, SORT_FIELDS};
use crate::client::{OpenFoodFactsClient, QueryParams};
use crate::envelope::ResultEnvelope;
use crate::format::{self, ProductRecord};
use crate::types::{Error, Result};

/// Reshape a remote listing page into `{<label>, total_products, page, total_pages, products}`.
fn listing(label: &str, label_value: Value, data: Value) -> Result<ResultEnvelope> {
    let Value::Object(mut data) = data else {
        return Err(Error::internal("Listing response is not a JSON object"));
    };
    let products = match data.remove("products") {
        Some(Value::Array(products)) => products,
        _ => return Err(Error::internal("Listing response carried no products array")),
    };

    let summaries: Vec<Value> = products
        .into_iter()
        .filter_map(ProductRecord::from_value)
        .map(|p| serde_json::to_value(format::summary(&p)))
        .collect::<std::result::Result<_, _>>()?;

    let mut body = Map::new();
    body.insert(label.to_string(), label_value);
    for (from, to) in [("count", "total_products"), ("page", "page"), ("page_count", "total_pages")] {
        if let Some(value) = data.remove(from).filter(|v| !v.is_null()) {
            body.insert(to.to_string(), value);
        }
    }
    body.insert("products".to_string(), Value::Array(summaries));

    ResultEnvelope::json(&body)
}

fn paginated(args: &Args) -> Result<QueryParams> {
    let mut query = QueryParams::new();
    query
        .push("page", args.page()?)
        .push("page_size", args.page_size()?)
        .push("json", 1);
    Ok(query)
}

pub async fn search_products(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let search = args.required_str("query")?;
    let sort_by = args
        .optional_str("sort_by")?
        .unwrap_or_else(|| DEFAULT_SORT_BY.to_string());
    if !SORT_FIELDS.contains(&sort_by.as_str()) {
        return Err(Error::invalid_argument(format!(
            "invalid sort_by '{}', expected one of: {}",
            sort_by,
            SORT_FIELDS.join(", ")
        )));
    }

    let mut query = QueryParams::new();
    query
        .push("search_terms", &search)
        .push("page", args.page()?)
        .push("page_size", args.page_size()?)
        .push("sort_by", &sort_by)
        .push("json", 1);

    let data = client.get(&["search.json"], &query).await?;
    listing("query", Value::String(search), data)
}

pub async fn products_by_category(
    client: &OpenFoodFactsClient,
    args: &Args,
) -> Result<ResultEnvelope> {
    let category = args.required_str("category")?;
    let file = format!("{}.json", category);
    let data = client.get(&["category", &file], &paginated(args)?).await?;
    listing("category", Value::String(category), data)
}

pub async fn products_by_brand(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let brand = args.required_str("brand")?;
    let file = format!("{}.json", brand);
    let data = client.get(&["brand", &file], &paginated(args)?).await?;
    listing("brand", Value::String(brand), data)
}

/// Nutrient thresholds, in argument-name / remote-parameter pairs.
const NUTRIENT_FILTERS: [(&str, &str); 5] = [
    ("max_fat", "nutriment_fat_100g_max"),
    ("max_sugar", "nutriment_sugars_100g_max"),
    ("max_salt", "nutriment_salt_100g_max"),
    ("min_fiber", "nutriment_fiber_100g_min"),
    ("min_protein", "nutriment_proteins_100g_min"),
];

/// Build the sparse query for `search_by_nutriments`. Only `json`, `page` and
/// `page_size` are always present.
pub fn nutriment_query(args: &Args) -> Result<QueryParams> {
    let mut query = QueryParams::new();
    query
        .push("json", 1)
        .push("page", args.page()?)
        .push("page_size", args.page_size()?);

    for (arg, param) in NUTRIENT_FILTERS {
        query.push_opt(param, args.optional_f64(arg)?);
    }

    if let Some(grade) = args.optional_str("nutriscore_grade")? {
        let grade = grade.trim().to_ascii_lowercase();
        if !matches!(grade.as_str(), "a" | "b" | "c" | "d" | "e") {
            return Err(Error::invalid_argument(format!(
                "invalid nutriscore_grade '{}', expected one of: A, B, C, D, E",
                grade
            )));
        }
        query.push("nutriscore_grade", grade);
    }

    Ok(query)
}

pub async fn search_by_nutriments(
    client: &OpenFoodFactsClient,
    args: &Args,
) -> Result<ResultEnvelope> {
    let query = nutriment_query(args)?;
    let data = client.get(&["search.json"], &query).await?;
    listing("search_criteria", Value::Object(args.as_map().clone()), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn args(value: Value) -> Args {
        Args::from_value(value).unwrap()
    }

    #[test]
    fn test_nutriment_query_is_sparse() {
        let query = nutriment_query(&args(json!({"min_protein": 10}))).unwrap();
        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["json", "page", "page_size", "nutriment_proteins_100g_min"]
        );
        assert_eq!(query.get("nutriment_proteins_100g_min"), Some("10"));
        assert_eq!(query.get("nutriment_fat_100g_max"), None);
    }

    #[test]
    fn test_nutriment_query_lowercases_grade() {
        let query = nutriment_query(&args(json!({"nutriscore_grade": "B", "max_salt": 0.5})))
            .unwrap();
        assert_eq!(query.get("nutriscore_grade"), Some("b"));
        assert_eq!(query.get("nutriment_salt_100g_max"), Some("0.5"));
    }

    #[test]
    fn test_nutriment_query_rejects_bad_grade() {
        let err = nutriment_query(&args(json!({"nutriscore_grade": "F"}))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_nutriment_query_clamps_page_size() {
        let query = nutriment_query(&args(json!({"page_size": 1000, "page": 4}))).unwrap();
        assert_eq!(query.get("page_size"), Some("100"));
        assert_eq!(query.get("page"), Some("4"));
    }

    #[test]
    fn test_listing_reshapes_page() {
        let data = json!({
            "count": 2,
            "page": 1,
            "page_count": 1,
            "products": [
                {"code": "1", "product_name": "Muesli"},
                {"code": "2"}
            ]
        });
        let envelope = listing("category", json!("breakfast-cereals"), data).unwrap();
        let body: Value = serde_json::from_str(envelope.first_text().unwrap()).unwrap();

        assert_eq!(body["category"], "breakfast-cereals");
        assert_eq!(body["total_products"], 2);
        assert_eq!(body["total_pages"], 1);
        assert_eq!(body["products"][0]["name"], "Muesli");
        assert_eq!(body["products"][1]["name"], "Unknown");
    }

    #[test]
    fn test_listing_without_products_is_internal_error() {
        let err = listing("query", json!("x"), json!({"count": 0})).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
