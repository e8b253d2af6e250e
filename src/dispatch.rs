//! Dispatcher: routes a tool invocation to its handler and normalizes errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OpenFoodFactsClient;
use crate::envelope::ResultEnvelope;
use crate::handlers::{self, Args};
use crate::tools::ToolCatalog;
use crate::types::{ApiConfig, Error, Result};

/// Every tool this server implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SearchProducts,
    GetProductByBarcode,
    GetProductsByCategory,
    GetProductsByBrand,
    GetNutritionFacts,
    CompareProducts,
    GetAllergenInfo,
    SearchByNutriments,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::SearchProducts,
        ToolName::GetProductByBarcode,
        ToolName::GetProductsByCategory,
        ToolName::GetProductsByBrand,
        ToolName::GetNutritionFacts,
        ToolName::CompareProducts,
        ToolName::GetAllergenInfo,
        ToolName::SearchByNutriments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SearchProducts => "search_products",
            ToolName::GetProductByBarcode => "get_product_by_barcode",
            ToolName::GetProductsByCategory => "get_products_by_category",
            ToolName::GetProductsByBrand => "get_products_by_brand",
            ToolName::GetNutritionFacts => "get_nutrition_facts",
            ToolName::CompareProducts => "compare_products",
            ToolName::GetAllergenInfo => "get_allergen_info",
            ToolName::SearchByNutriments => "search_by_nutriments",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::unknown_tool(format!("Tool {} not found", s)))
    }
}

/// One inbound `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Routes invocations to handlers. Holds only read-only state.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: OpenFoodFactsClient,
    catalog: ToolCatalog,
}

impl Dispatcher {
    pub fn new(client: OpenFoodFactsClient, catalog: ToolCatalog) -> Self {
        Self { client, catalog }
    }

    /// Dispatcher over the built-in catalog for the configured API.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(
            OpenFoodFactsClient::new(config)?,
            ToolCatalog::builtin(),
        ))
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Descriptors advertised to the host, in catalog order.
    pub fn list_tools(&self) -> Vec<Value> {
        self.catalog.descriptors()
    }

    /// Run one invocation. Every error leaving here carries a recognized category.
    pub async fn dispatch(&self, invocation: ToolInvocation) -> Result<ResultEnvelope> {
        let ToolInvocation { name, arguments } = invocation;
        tracing::debug!(tool = %name, "Dispatching tool call");

        match self.route(&name, arguments).await {
            Ok(envelope) => Ok(envelope),
            Err(e) if e.recognized_category().is_some() => {
                tracing::debug!(tool = %name, category = %e.category(), error = %e.message(), "Tool call failed");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "Tool call failed with unexpected error");
                Err(Error::internal(format!(
                    "Error executing tool {}: {}",
                    name,
                    e.message()
                )))
            }
        }
    }

    async fn route(&self, name: &str, arguments: Value) -> Result<ResultEnvelope> {
        if !self.catalog.has_tool(name) {
            return Err(Error::unknown_tool(format!("Tool {} not found", name)));
        }
        let tool: ToolName = name.parse()?;
        let args = Args::from_value(arguments)?;

        let errors = self.catalog.validate_params(name, args.as_map())?;
        if !errors.is_empty() {
            return Err(Error::invalid_argument(errors.join("; ")));
        }

        let client = &self.client;
        match tool {
            ToolName::SearchProducts => handlers::search_products(client, &args).await,
            ToolName::GetProductByBarcode => handlers::product_by_barcode(client, &args).await,
            ToolName::GetProductsByCategory => handlers::products_by_category(client, &args).await,
            ToolName::GetProductsByBrand => handlers::products_by_brand(client, &args).await,
            ToolName::GetNutritionFacts => handlers::nutrition_facts(client, &args).await,
            ToolName::CompareProducts => handlers::compare_products(client, &args).await,
            ToolName::GetAllergenInfo => handlers::allergen_info(client, &args).await,
            ToolName::SearchByNutriments => handlers::search_by_nutriments(client, &args).await,
        }
    }
}
