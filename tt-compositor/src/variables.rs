//! Spine variables for `from-var`

use std::collections::HashMap;

use crate::error::CompositorError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Result<&str, CompositorError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CompositorError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
