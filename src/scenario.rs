//! Scenario and validation-block shapes inside an `x-specs` document.
//!
//! Documents are edited as `serde_json` trees so keys this tool does not know
//! about survive a rewrite in their original order. Blocks the annotator
//! synthesizes are built from typed structs and converted into the tree.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level key holding the scenario array.
pub const SPECS_KEY: &str = "x-specs";
/// Scenario key holding the validation block.
pub const VALIDATION_KEY: &str = "validation";
/// Assertion key holding a success-case value.
pub const EXPECTED_KEY: &str = "expected";
/// Assertion key holding the expected error message (`null` = undetermined).
pub const EXPECT_ERROR_KEY: &str = "expectError";

const ASSERTIONS_KEY: &str = "assertions";

/// Field configuration stub stored under `validation.setup.fieldConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            name: "example_field".to_string(),
            field_type: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub field_config: FieldConfig,
}

/// Synthesized assertion; `expect_error: None` serializes as the `null`
/// placeholder the classifier resolves later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    pub description: String,
    pub validate_config: bool,
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationBlock {
    pub setup: Setup,
    pub assertions: Vec<Assertion>,
}

impl ValidationBlock {
    /// Placeholder block for an unannotated scenario: one assertion describing
    /// the `then` outcome with an undetermined error.
    pub fn placeholder(field: &FieldConfig, then: &str) -> Self {
        Self {
            setup: Setup {
                field_config: field.clone(),
            },
            assertions: vec![Assertion {
                description: then.to_string(),
                validate_config: true,
                expect_error: None,
            }],
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).context("serialize validation block")
    }
}

/// State of an assertion's `expectError` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectError {
    Absent,
    Undetermined,
    Resolved,
}

pub fn expect_error_state(assertion: &Map<String, Value>) -> ExpectError {
    match assertion.get(EXPECT_ERROR_KEY) {
        None => ExpectError::Absent,
        Some(Value::Null) => ExpectError::Undetermined,
        Some(_) => ExpectError::Resolved,
    }
}

/// An assertion that claims both a success value and a validation failure.
pub fn is_conflicting(assertion: &Map<String, Value>) -> bool {
    assertion.contains_key(EXPECTED_KEY) && assertion.contains_key(EXPECT_ERROR_KEY)
}

/// Mutable view over one scenario object of the `x-specs` array.
pub struct Scenario<'a> {
    fields: &'a mut Map<String, Value>,
}

impl<'a> Scenario<'a> {
    pub fn new(fields: &'a mut Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn id(&self) -> &str {
        self.text("id")
    }

    pub fn given(&self) -> &str {
        self.text("given")
    }

    pub fn when(&self) -> &str {
        self.text("when")
    }

    pub fn then(&self) -> &str {
        self.text("then")
    }

    fn text(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn is_annotated(&self) -> bool {
        self.fields.contains_key(VALIDATION_KEY)
    }

    pub fn set_validation(&mut self, block: Value) {
        self.fields.insert(VALIDATION_KEY.to_string(), block);
    }

    /// `validation.setup.fieldConfig.name`, or empty when any level is missing.
    pub fn field_name(&self) -> &str {
        self.fields
            .get(VALIDATION_KEY)
            .and_then(|validation| validation.get("setup"))
            .and_then(|setup| setup.get("fieldConfig"))
            .and_then(|field| field.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn assertions(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.fields
            .get(VALIDATION_KEY)
            .and_then(|validation| validation.get(ASSERTIONS_KEY))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    pub fn assertions_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.fields
            .get_mut(VALIDATION_KEY)
            .and_then(|validation| validation.get_mut(ASSERTIONS_KEY))
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_block_serializes_null_expect_error() {
        let block = ValidationBlock::placeholder(&FieldConfig::default(), "returns error");
        let value = block.to_value().expect("to value");
        assert_eq!(
            value,
            json!({
                "setup": { "fieldConfig": { "name": "example_field", "type": "text" } },
                "assertions": [
                    { "description": "returns error", "validateConfig": true, "expectError": null }
                ]
            })
        );
    }

    #[test]
    fn scenario_view_reads_missing_text_as_empty() {
        let mut value = json!({ "id": "S-1", "then": "ok" });
        let fields = value.as_object_mut().expect("object");
        let scenario = Scenario::new(fields);
        assert_eq!(scenario.id(), "S-1");
        assert_eq!(scenario.given(), "");
        assert_eq!(scenario.then(), "ok");
        assert!(!scenario.is_annotated());
        assert_eq!(scenario.field_name(), "");
        assert_eq!(scenario.assertions().count(), 0);
    }

    #[test]
    fn expect_error_state_distinguishes_absent_null_and_message() {
        let absent = json!({ "description": "x" });
        let null = json!({ "expectError": null });
        let message = json!({ "expectError": "is required" });
        let state = |value: &Value| expect_error_state(value.as_object().expect("object"));
        assert_eq!(state(&absent), ExpectError::Absent);
        assert_eq!(state(&null), ExpectError::Undetermined);
        assert_eq!(state(&message), ExpectError::Resolved);
    }

    #[test]
    fn conflict_requires_both_keys_even_when_expected_is_null() {
        let both = json!({ "expected": null, "expectError": "x" });
        let only_expected = json!({ "expected": 3 });
        assert!(is_conflicting(both.as_object().expect("object")));
        assert!(!is_conflicting(only_expected.as_object().expect("object")));
    }

    #[test]
    fn assertions_skip_non_object_entries() {
        let mut value = json!({
            "validation": { "assertions": [ { "expectError": null }, "junk", 4 ] }
        });
        let fields = value.as_object_mut().expect("object");
        let mut scenario = Scenario::new(fields);
        assert_eq!(scenario.assertions_mut().count(), 1);
    }
}
