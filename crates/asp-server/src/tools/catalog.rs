//! The discovery catalog: a static, validated list of tool descriptors.

use std::collections::HashSet;

use crate::types::{AspError, AspResult, Envelope, ToolDescriptor};

use super::{read_range, sheet_list};

/// Ordered, read-only list of invocable tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    /// Validate and wrap a list of descriptors.
    ///
    /// Every descriptor needs a non-empty `id` and `name`, ids must be
    /// unique, and `input_schema` must be a JSON object.
    pub fn new(tools: Vec<ToolDescriptor>) -> AspResult<Self> {
        validate(&tools)?;
        Ok(Self { tools })
    }

    /// The built-in read-only spreadsheet tools.
    pub fn builtin() -> AspResult<Self> {
        Self::new(vec![sheet_list::definition(), read_range::definition()])
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The catalog as a `DISCOVER_RESPONSE` envelope.
    pub fn discover(&self) -> Envelope {
        Envelope::discover(&self.tools)
    }
}

fn validate(tools: &[ToolDescriptor]) -> AspResult<()> {
    let mut seen = HashSet::new();
    for (i, tool) in tools.iter().enumerate() {
        if tool.id.trim().is_empty() {
            return Err(AspError::InvalidCatalog(format!("tool #{i} has an empty id")));
        }
        if tool.name.trim().is_empty() {
            return Err(AspError::InvalidCatalog(format!(
                "tool '{}' has an empty name",
                tool.id
            )));
        }
        if !tool.input_schema.is_object() {
            return Err(AspError::InvalidCatalog(format!(
                "tool '{}' input_schema must be an object",
                tool.id
            )));
        }
        if !seen.insert(tool.id.as_str()) {
            return Err(AspError::InvalidCatalog(format!("duplicate tool id '{}'", tool.id)));
        }
    }
    Ok(())
}
