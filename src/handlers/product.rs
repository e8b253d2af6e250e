//! Single-product handlers: lookup by barcode, nutrition facts, allergens.

use serde_json::Value;

use super::args::Args;
use crate::client::{OpenFoodFactsClient, QueryParams};
use crate::envelope::ResultEnvelope;
use crate::format::{self, ProductRecord};
use crate::types::{Error, Result};

/// Raw product lookup: `GET /api/v0/product/{barcode}.json`.
///
/// The service may answer an unknown barcode with a non-2xx status and a
/// status-0 body; that payload is returned so callers see the not-found flag.
pub(crate) async fn fetch_product_payload(
    client: &OpenFoodFactsClient,
    barcode: &str,
) -> Result<Value> {
    let file = format!("{}.json", barcode);
    let (status, payload) = client
        .get_with_status(&["api", "v0", "product", &file], &QueryParams::new())
        .await?;
    if status.is_success() || status_flag(&payload) == Some(0) {
        return Ok(payload);
    }
    Err(Error::network(
        format!(
            "Product lookup for {} returned HTTP {}: {}",
            barcode,
            status.as_u16(),
            payload
        ),
        Some(status.as_u16()),
    ))
}

/// Envelope status flag: `1` found, `0` not found.
pub(crate) fn status_flag(payload: &Value) -> Option<i64> {
    match payload.get("status")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Look up a product, failing with `NotFound` when the service reports status 0.
pub(crate) async fn fetch_product(client: &OpenFoodFactsClient, barcode: &str) -> Result<ProductRecord> {
    let mut payload = fetch_product_payload(client, barcode).await?;
    if status_flag(&payload) == Some(0) {
        return Err(Error::not_found(format!(
            "Product with barcode {} not found",
            barcode
        )));
    }

    let mut product = payload
        .get_mut("product")
        .map(Value::take)
        .and_then(ProductRecord::from_value)
        .ok_or_else(|| {
            Error::internal(format!(
                "Response for barcode {} carried no product record",
                barcode
            ))
        })?;
    product.set_code_if_missing(barcode);
    Ok(product)
}

pub async fn product_by_barcode(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let barcode = args.required_str("barcode")?;
    let product = fetch_product(client, &barcode).await?;
    ResultEnvelope::json(&format::detail(&product))
}

pub async fn nutrition_facts(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let barcode = args.required_str("barcode")?;
    let product = fetch_product(client, &barcode).await?;
    ResultEnvelope::json(&format::nutrition_facts(&product))
}

pub async fn allergen_info(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let barcode = args.required_str("barcode")?;
    let product = fetch_product(client, &barcode).await?;
    ResultEnvelope::json(&format::allergen_info(&product))
}
