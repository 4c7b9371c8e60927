use super::{EditCount, ScenarioTransform};
use crate::scenario::{is_conflicting, Scenario, EXPECT_ERROR_KEY};
use anyhow::Result;

/// Drops `expectError` from assertions that also carry an `expected` value.
pub struct Reconciler;

impl ScenarioTransform for Reconciler {
    fn apply(&self, scenario: &mut Scenario<'_>, _doc_path: &str) -> Result<EditCount> {
        let mut removed = 0;
        for assertion in scenario.assertions_mut() {
            if is_conflicting(assertion) {
                assertion.shift_remove(EXPECT_ERROR_KEY);
                removed += 1;
            }
        }
        Ok(EditCount::changed(removed))
    }
}
