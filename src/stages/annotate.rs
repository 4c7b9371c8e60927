use super::{EditCount, ScenarioTransform};
use crate::scenario::{FieldConfig, Scenario, ValidationBlock};
use anyhow::Result;

/// Gives every unannotated scenario a placeholder validation block.
pub struct Annotator<'a> {
    field: &'a FieldConfig,
}

impl<'a> Annotator<'a> {
    pub fn new(field: &'a FieldConfig) -> Self {
        Self { field }
    }
}

impl ScenarioTransform for Annotator<'_> {
    fn apply(&self, scenario: &mut Scenario<'_>, _doc_path: &str) -> Result<EditCount> {
        if scenario.is_annotated() {
            return Ok(EditCount::default());
        }
        let block = ValidationBlock::placeholder(self.field, scenario.then()).to_value()?;
        scenario.set_validation(block);
        Ok(EditCount::changed(1))
    }
}
