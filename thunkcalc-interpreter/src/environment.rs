//! Variable environment of a session.
//!
//! A single flat scope: blocks and loops share the variables of the
//! whole session, and a variable exists from its first assignment on.

use crate::error::{EvalError, Result};
use crate::number::Number;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Variable name to value mapping
    variables: HashMap<String, Number>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable value by name
    pub fn get(&self, name: &str) -> Result<Number> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::unknown_variable(name))
    }

    /// Bind or rebind a variable
    pub fn set(&mut self, name: &str, value: Number) {
        match self.variables.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.variables.insert(name.to_string(), value);
            }
        }
    }

    /// All variable names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }
}
