//! Tool catalog: typed metadata with argument validation and schema generation.
//!
//! Owns tool *metadata* only. Implementations live in `handlers`; the
//! dispatcher consults the catalog before routing a call.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    StringList {
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Enum(Vec<String>),
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ParamType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            ParamType::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            ParamType::StringList {
                min_items,
                max_items,
            } => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| format!("expected array, got {}", value_type_name(value)))?;
                for (i, item) in arr.iter().enumerate() {
                    if !item.is_string() {
                        return Err(format!(
                            "expected string at index {}, got {}",
                            i,
                            value_type_name(item)
                        ));
                    }
                }
                if let Some(min) = min_items {
                    if arr.len() < *min {
                        return Err(format!("expected at least {} items, got {}", min, arr.len()));
                    }
                }
                if let Some(max) = max_items {
                    if arr.len() > *max {
                        return Err(format!("expected at most {} items, got {}", max, arr.len()));
                    }
                }
                Ok(())
            }
            ParamType::Enum(variants) => {
                let s = value.as_str().ok_or_else(|| {
                    format!("expected string for enum, got {}", value_type_name(value))
                })?;
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(format!(
                        "invalid enum value '{}', expected one of: {}",
                        s,
                        variants.join(", ")
                    ))
                }
            }
        }
    }

    /// JSON Schema fragment for this type (without description/default).
    fn schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            ParamType::String => {
                schema.insert("type".into(), json!("string"));
            }
            ParamType::Number => {
                schema.insert("type".into(), json!("number"));
            }
            ParamType::StringList {
                min_items,
                max_items,
            } => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({ "type": "string" }));
                if let Some(min) = min_items {
                    schema.insert("minItems".into(), json!(min));
                }
                if let Some(max) = max_items {
                    schema.insert("maxItems".into(), json!(max));
                }
            }
            ParamType::Enum(variants) => {
                schema.insert("type".into(), json!("string"));
                schema.insert("enum".into(), json!(variants));
            }
        }
        schema
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamDef>,
}

impl ToolEntry {
    /// JSON Schema object advertised as the tool's `inputSchema`.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut schema = param.param_type.schema();
            schema.insert("description".into(), json!(param.description));
            if let Some(default) = &param.default {
                schema.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(schema));
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Descriptor in the shape hosts expect from `tools/list`.
    pub fn to_descriptor(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Ordered, read-only tool catalog.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: Vec<ToolEntry>,
}

impl ToolCatalog {
    /// Build a catalog from entries. Names must be non-empty and unique.
    pub fn new(entries: Vec<ToolEntry>) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(Error::invalid_argument("Tool name cannot be empty"));
            }
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(Error::invalid_argument(format!(
                    "Duplicate tool name: {}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Build a catalog from entries already known to be well-formed.
    pub(crate) fn from_entries(entries: Vec<ToolEntry>) -> Self {
        Self { entries }
    }

    /// Get a tool entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[ToolEntry] {
        &self.entries
    }

    /// Descriptors for every tool, in registration order.
    pub fn descriptors(&self) -> Vec<Value> {
        self.entries.iter().map(ToolEntry::to_descriptor).collect()
    }

    /// Validate arguments against a tool's parameter definitions.
    ///
    /// Returns a list of validation errors (empty = valid). Parameters the
    /// tool does not declare are ignored.
    pub fn validate_params(&self, name: &str, args: &Map<String, Value>) -> Result<Vec<String>> {
        let entry = self
            .get(name)
            .ok_or_else(|| Error::unknown_tool(format!("Tool {} not found", name)))?;

        let mut errors = Vec::new();
        for param_def in &entry.parameters {
            match args.get(&param_def.name) {
                None | Some(Value::Null) => {
                    if param_def.required {
                        errors.push(format!("Missing required parameter: {}", param_def.name));
                    }
                }
                Some(value) => {
                    if let Err(e) = param_def.param_type.validate(value) {
                        errors.push(format!("Parameter '{}': {}", param_def.name, e));
                    }
                }
            }
        }

        Ok(errors)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
