//! In-process mock of the Open Food Facts API for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use openfoodfacts_mcp::types::ApiConfig;
use openfoodfacts_mcp::Dispatcher;
use serde_json::{json, Value};

/// One request the mock received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.param(key).is_some()
    }
}

/// Mock behaviour, keyed by barcode.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    products: HashMap<String, Value>,
    failing: Vec<String>,
    json_failing: Vec<String>,
    missing_as_404: bool,
    delays: HashMap<String, u64>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `product` under its `code` field.
    pub fn product(mut self, product: Value) -> Self {
        let code = product["code"].as_str().unwrap().to_string();
        self.products.insert(code, product);
        self
    }

    /// Answer lookups for `barcode` with HTTP 500.
    pub fn failing(mut self, barcode: &str) -> Self {
        self.failing.push(barcode.to_string());
        self
    }

    /// Answer lookups for `barcode` with HTTP 502 and a JSON error body.
    pub fn failing_with_json(mut self, barcode: &str) -> Self {
        self.json_failing.push(barcode.to_string());
        self
    }

    /// Answer unknown barcodes with HTTP 404 and a status-0 body, as the live
    /// service does.
    pub fn missing_as_404(mut self) -> Self {
        self.missing_as_404 = true;
        self
    }

    /// Delay lookups for `barcode`.
    pub fn delayed(mut self, barcode: &str, millis: u64) -> Self {
        self.delays.insert(barcode.to_string(), millis);
        self
    }

    /// Start serving on a random loopback port. Returns the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Start serving and build a dispatcher pointed at the mock.
    pub async fn dispatcher(&self) -> Dispatcher {
        let base_url = self.start().await;
        Dispatcher::from_config(&ApiConfig {
            base_url,
            ..ApiConfig::default()
        })
        .unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn listing(&self, query: &[(String, String)]) -> Value {
        let mut products: Vec<&Value> = self.products.values().collect();
        products.sort_by_key(|p| p["code"].as_str().unwrap_or_default().to_string());
        let page: u64 = query
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1);
        json!({
            "count": products.len(),
            "page": page,
            "page_count": 1,
            "page_size": products.len(),
            "products": products,
        })
    }
}

async fn handle(
    State(mock): State<MockApi>,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let path = uri.path().to_string();
    mock.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        query: query.clone(),
    });

    if let Some(file) = path.strip_prefix("/api/v0/product/") {
        let barcode = file.trim_end_matches(".json").to_string();
        if let Some(millis) = mock.delays.get(&barcode) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        if mock.failing.contains(&barcode) {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
        }
        if mock.json_failing.contains(&barcode) {
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "bad gateway" })),
            )
                .into_response();
        }
        return match mock.products.get(&barcode) {
            Some(product) => Json(json!({
                "code": barcode,
                "status": 1,
                "status_verbose": "product found",
                "product": product,
            }))
            .into_response(),
            None => {
                let status = if mock.missing_as_404 {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                };
                (
                    status,
                    Json(json!({
                        "code": barcode,
                        "status": 0,
                        "status_verbose": "product not found",
                    })),
                )
                    .into_response()
            }
        };
    }

    if path == "/category/garbage.json" {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    if path == "/search.json" || path.starts_with("/category/") || path.starts_with("/brand/") {
        return Json(mock.listing(&query)).into_response();
    }

    (StatusCode::NOT_FOUND, "no such endpoint").into_response()
}

pub fn nutella() -> Value {
    json!({
        "code": "3017620422003",
        "product_name": "Nutella",
        "brands": "Ferrero",
        "nutriscore_grade": "e",
        "nova_group": 4,
        "nutriments": { "fat_100g": 30.9, "energy-kcal_100g": 539, "sugars_100g": 56.3 }
    })
}

pub fn oat_drink() -> Value {
    json!({
        "code": "7394376616037",
        "product_name": "Oat Drink",
        "brands": "Oatly",
        "nutriscore_grade": "b",
        "allergens": "en:gluten",
        "traces": "en:nuts",
        "ingredients_text": "Water, oats 10%, rapeseed oil",
        "nutriments": { "fat_100g": 1.5, "sugars_100g": 4, "fiber_100g": 0.8, "proteins_100g": 1 }
    })
}

pub fn muesli() -> Value {
    json!({
        "code": "4008400401621",
        "product_name": "Crunchy Muesli",
        "nutriments": { "proteins_100g": 9.2, "carbohydrates_100g": 64 }
    })
}

/// Parse the single text block of an envelope as JSON.
pub fn payload(envelope: &openfoodfacts_mcp::ResultEnvelope) -> Value {
    assert_eq!(envelope.content.len(), 1);
    serde_json::from_str(envelope.first_text().unwrap()).unwrap()
}
