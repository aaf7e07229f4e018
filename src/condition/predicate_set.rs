use crate::errors::ConditionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat mapping of field keys to comparison values
///
/// Keys are plain (`"id"`) or scoped (`"OWNER.id"`) field names, or predicate
/// symbols tagging a sub-value (`"~": {"description": "fish"}`). Values are
/// never interpreted here. Iteration follows insertion order while equality
/// ignores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateSet(Map<String, Value>);

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a field value, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.0.keys()
    }

    /// Whether the field can join this set without clashing with its value
    pub fn accepts(&self, key: &str, value: &Value) -> bool {
        self.0.get(key).is_none_or(|existing| existing == value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for PredicateSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<PredicateSet> for Value {
    fn from(set: PredicateSet) -> Self {
        Value::Object(set.0)
    }
}

impl TryFrom<Value> for PredicateSet {
    type Error = ConditionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConditionError::invalid_expression("", &other)),
        }
    }
}

impl FromIterator<(String, Value)> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
