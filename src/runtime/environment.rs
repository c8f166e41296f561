use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variable bindings of a running Imp program
///
/// Imp has a single global scope of integer variables. Reading a name that
/// was never assigned yields 0 rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    /// Variables ordered by name
    variables: BTreeMap<String, i64>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment {
            variables: BTreeMap::new(),
        }
    }

    /// Gets the value of a variable, 0 if it was never assigned
    pub fn get(&self, name: &str) -> i64 {
        self.variables.get(name).copied().unwrap_or(0)
    }

    /// Sets a variable value, creating it if needed
    pub fn set(&mut self, name: &str, value: i64) {
        // Avoid reallocating the key on every loop iteration.
        match self.variables.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.variables.insert(name.to_string(), value);
            }
        }
    }

    /// Checks if a variable has been assigned
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of assigned variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if nothing has been assigned yet
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Environment {
            variables: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}
