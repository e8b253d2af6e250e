//! Tool argument access and shaping.
//!
//! Arguments arrive as an untyped JSON mapping. These helpers pull typed
//! values out of it, apply defaults, and clamp pagination before anything is
//! sent to the remote service.

use serde_json::{Map, Value};

use crate::types::{Error, Result};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

pub const DEFAULT_SORT_BY: &str = "popularity";
pub const SORT_FIELDS: [&str; 4] = ["popularity", "product_name", "created_t", "last_modified_t"];

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`. Fractions truncate.
pub fn clamp_page_size(requested: f64) -> u64 {
    if requested.is_nan() {
        return DEFAULT_PAGE_SIZE;
    }
    requested.trunc().clamp(1.0, MAX_PAGE_SIZE as f64) as u64
}

/// Floor a requested page number at 1. Fractions truncate.
pub fn clamp_page(requested: f64) -> u64 {
    if requested.is_nan() || requested < 1.0 {
        return DEFAULT_PAGE;
    }
    requested.trunc().min(u32::MAX as f64) as u64
}

/// Arguments of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    map: Map<String, Value>,
}

impl Args {
    pub fn new(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// Accept an object, or `null` as an empty mapping.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::invalid_argument(format!(
                "Arguments must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Required non-blank string.
    pub fn required_str(&self, key: &str) -> Result<String> {
        match self.optional_str(key)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(Error::invalid_argument(format!(
                "Missing required field: {}",
                key
            ))),
        }
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<String>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::invalid_argument(format!(
                "{} must be a string, got {}",
                key, other
            ))),
        }
    }

    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.present(key) {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| {
                Error::invalid_argument(format!("{} must be a number, got {}", key, value))
            }),
        }
    }

    /// `page`, defaulted and floored at 1.
    pub fn page(&self) -> Result<u64> {
        Ok(self
            .optional_f64("page")?
            .map(clamp_page)
            .unwrap_or(DEFAULT_PAGE))
    }

    /// `page_size`, defaulted and clamped to `[1, MAX_PAGE_SIZE]`.
    pub fn page_size(&self) -> Result<u64> {
        Ok(self
            .optional_f64("page_size")?
            .map(clamp_page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Required list of non-blank strings.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let items = self
            .present(key)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::invalid_argument(format!("Missing required field: {}", key)))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
                _ => Err(Error::invalid_argument(format!(
                    "{}[{}] must be a non-empty string",
                    key, i
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        Args::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_null_is_empty() {
        assert_eq!(Args::from_value(Value::Null).unwrap(), Args::default());
        assert!(Args::from_value(json!([1])).is_err());
    }

    #[test]
    fn test_required_str() {
        let a = args(json!({"barcode": "3017620422003", "blank": "  ", "num": 5}));
        assert_eq!(a.required_str("barcode").unwrap(), "3017620422003");
        assert!(matches!(a.required_str("blank"), Err(Error::InvalidArgument(_))));
        assert!(matches!(a.required_str("num"), Err(Error::InvalidArgument(_))));
        assert!(matches!(a.required_str("absent"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_pagination_defaults() {
        let a = args(json!({}));
        assert_eq!(a.page().unwrap(), DEFAULT_PAGE);
        assert_eq!(a.page_size().unwrap(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_clamps() {
        assert_eq!(args(json!({"page_size": 500})).page_size().unwrap(), 100);
        assert_eq!(args(json!({"page_size": 0})).page_size().unwrap(), 1);
        assert_eq!(args(json!({"page_size": -3})).page_size().unwrap(), 1);
        assert_eq!(args(json!({"page_size": 12.9})).page_size().unwrap(), 12);
        assert_eq!(args(json!({"page": 0})).page().unwrap(), 1);
        assert_eq!(args(json!({"page": 3})).page().unwrap(), 3);
    }

    #[test]
    fn test_pagination_rejects_non_numbers() {
        assert!(args(json!({"page_size": "10"})).page_size().is_err());
    }

    #[test]
    fn test_string_list() {
        let a = args(json!({"barcodes": ["1", "2"], "bad": ["1", 2], "blank": ["", "2"]}));
        assert_eq!(a.string_list("barcodes").unwrap(), vec!["1", "2"]);
        assert!(a.string_list("bad").is_err());
        assert!(a.string_list("blank").is_err());
        assert!(a.string_list("absent").is_err());
    }

    proptest! {
        #[test]
        fn page_size_always_within_bounds(requested in any::<i64>()) {
            let clamped = clamp_page_size(requested as f64);
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&clamped));
            if (1..=MAX_PAGE_SIZE as i64).contains(&requested) {
                prop_assert_eq!(clamped, requested as u64);
            }
        }

        #[test]
        fn fractional_page_size_within_bounds(requested in -1.0e6f64..1.0e6f64) {
            let clamped = clamp_page_size(requested);
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&clamped));
        }
    }
}
