use super::{EditCount, ScenarioTransform};
use crate::classifier::{classify, ScenarioSignals};
use crate::scenario::{expect_error_state, ExpectError, Scenario, EXPECT_ERROR_KEY};
use anyhow::Result;
use serde_json::Value;

/// Resolves `expectError: null` placeholders with an inferred message.
pub struct Classifier;

impl ScenarioTransform for Classifier {
    fn apply(&self, scenario: &mut Scenario<'_>, doc_path: &str) -> Result<EditCount> {
        let pending = scenario
            .assertions()
            .filter(|assertion| expect_error_state(assertion) == ExpectError::Undetermined)
            .count();
        if pending == 0 {
            return Ok(EditCount::default());
        }

        let signals = ScenarioSignals::new(
            scenario.given(),
            scenario.when(),
            scenario.then(),
            doc_path,
            scenario.field_name(),
        );
        let classification = classify(&signals);
        match classification.rule {
            Some(rule) => tracing::debug!(
                scenario = scenario.id(),
                path = doc_path,
                rule = rule.as_str(),
                "classified placeholder"
            ),
            None => tracing::warn!(
                scenario = scenario.id(),
                path = doc_path,
                "no rule matched; using fallback message"
            ),
        }

        let mut edit = EditCount::default();
        for assertion in scenario.assertions_mut() {
            if expect_error_state(assertion) != ExpectError::Undetermined {
                continue;
            }
            assertion.insert(
                EXPECT_ERROR_KEY.to_string(),
                Value::String(classification.message.to_string()),
            );
            edit.changes += 1;
            if classification.is_fallback() {
                edit.fallbacks += 1;
            }
        }
        Ok(edit)
    }
}
