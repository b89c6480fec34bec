use indexmap::IndexMap;

use crate::value::Value;

/// The variable table: the current value of every effective declaration,
/// in declaration order. Entries start out `Unknown`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    variables: IndexMap<String, Value>,
}

impl Environment {
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            variables: names
                .into_iter()
                .map(|name| (name.clone(), Value::Unknown))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// The value of `name` if it has been computed.
    pub fn resolved(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).filter(|value| !value.is_unknown())
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.variables.iter()
    }

    /// First name still holding `Unknown`.
    pub fn first_unresolved(&self) -> Option<&str> {
        self.variables
            .iter()
            .find(|(_, value)| value.is_unknown())
            .map(|(name, _)| name.as_str())
    }
}
