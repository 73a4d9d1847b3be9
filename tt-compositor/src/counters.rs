//! Named counters for `from-counter`
//!
//!     Counters are declared by `counter` rules in templates. A `file` counter starts over
//!     with every publication unit, a `publication` counter runs across the whole render.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CompositorError;

/// The range within which a counter is not reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterScope {
    #[default]
    File,
    Publication,
}

impl FromStr for CounterScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "file" => Ok(CounterScope::File),
            "publication" => Ok(CounterScope::Publication),
            other => Err(format!("unknown counter scope '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Counter {
    scope: CounterScope,
    start: i64,
    step: i64,
    value: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Counters {
    counters: HashMap<String, Counter>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a counter, replacing any previous one with the same name.
    pub fn declare(&mut self, name: &str, scope: CounterScope, start: i64, step: i64) {
        self.counters.insert(
            name.to_string(),
            Counter {
                scope,
                start,
                step,
                value: start,
            },
        );
    }

    pub fn value(&self, name: &str) -> Result<i64, CompositorError> {
        self.counters
            .get(name)
            .map(|counter| counter.value)
            .ok_or_else(|| unknown(name))
    }

    pub fn advance(&mut self, name: &str) -> Result<(), CompositorError> {
        let counter = self.counters.get_mut(name).ok_or_else(|| unknown(name))?;
        counter.value = counter
            .value
            .checked_add(counter.step)
            .ok_or_else(|| CompositorError::InvalidCounter {
                name: name.to_string(),
                field: "step".to_string(),
                value: counter.step.to_string(),
            })?;
        Ok(())
    }

    /// The current value, then one step forward.
    pub fn take(&mut self, name: &str) -> Result<i64, CompositorError> {
        let value = self.value(name)?;
        self.advance(name)?;
        Ok(value)
    }

    pub fn reset_file_scope(&mut self) {
        for counter in self.counters.values_mut() {
            if counter.scope == CounterScope::File {
                counter.value = counter.start;
            }
        }
    }
}

fn unknown(name: &str) -> CompositorError {
    CompositorError::UnknownCounter {
        name: name.to_string(),
    }
}
