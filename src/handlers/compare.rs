//! `compare_products`: concurrent fan-out over up to five barcodes.
//!
//! Every barcode is fetched on its own task; all tasks start together and the
//! handler waits for all of them. A barcode that fails for any reason is
//! dropped from the comparison. Output keeps the input order of the barcodes
//! that resolved.

use serde_json::{json, Value};

use super::args::Args;
use super::product::{fetch_product_payload, status_flag};
use crate::client::OpenFoodFactsClient;
use crate::envelope::ResultEnvelope;
use crate::format::{self, ProductRecord};
use crate::tools::{MAX_COMPARE, MIN_COMPARE};
use crate::types::{Error, Result};

/// Product from a lookup payload, only when the status flag is 1.
fn resolved_product(mut payload: Value, barcode: &str) -> Option<ProductRecord> {
    if status_flag(&payload) != Some(1) {
        return None;
    }
    let mut product = ProductRecord::from_value(payload.get_mut("product").map(Value::take)?)?;
    product.set_code_if_missing(barcode);
    Some(product)
}

/// Fetch every barcode concurrently. Results line up with `barcodes`.
async fn fetch_all(client: &OpenFoodFactsClient, barcodes: &[String]) -> Vec<Option<ProductRecord>> {
    let handles: Vec<_> = barcodes
        .iter()
        .cloned()
        .map(|barcode| {
            let client = client.clone();
            tokio::spawn(async move {
                let payload = fetch_product_payload(&client, &barcode).await;
                (barcode, payload)
            })
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok((barcode, Ok(payload))) => {
                let product = resolved_product(payload, &barcode);
                if product.is_none() {
                    tracing::debug!(%barcode, "Excluded from comparison: not found");
                }
                product
            }
            Ok((barcode, Err(e))) => {
                tracing::warn!(%barcode, error = %e, "Excluded from comparison: lookup failed");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Excluded from comparison: lookup task failed");
                None
            }
        })
        .collect()
}

pub async fn compare_products(client: &OpenFoodFactsClient, args: &Args) -> Result<ResultEnvelope> {
    let barcodes = args.string_list("barcodes")?;
    if !(MIN_COMPARE..=MAX_COMPARE).contains(&barcodes.len()) {
        return Err(Error::invalid_argument(format!(
            "Between {} and {} barcodes required for comparison, got {}",
            MIN_COMPARE,
            MAX_COMPARE,
            barcodes.len()
        )));
    }

    let products: Vec<ProductRecord> = fetch_all(client, &barcodes)
        .await
        .into_iter()
        .flatten()
        .collect();

    if products.len() < MIN_COMPARE {
        return Err(Error::invalid_argument(format!(
            "At least {} valid products required for comparison",
            MIN_COMPARE
        )));
    }

    let comparison: Vec<format::ComparisonEntry> =
        products.iter().map(format::comparison_entry).collect();
    ResultEnvelope::json(&json!({ "comparison": comparison }))
}
