//! Generic transformer for JSON documents
//!
//! [`ValueTransformer`] passes an object's own fields through and treats the
//! declared relation keys as includes. A requested relation is processed with
//! its own nested transformer under the nested scope, so excludes and deeper
//! includes apply at every level.

use super::{TransformArgs, Transformer, TransformerComponent, DEFAULT_RESOURCE_KEY};
use crate::resource::{Collection, Item, Resource};
use crate::scope::Scope;
use crate::Result;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Transformer for `serde_json::Value` objects with declared relations
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTransformer {
    resource_key: String,
    /// Relations in declaration order, which is also their merge order
    relations: Vec<(String, ValueTransformer)>,
}

impl ValueTransformer {
    /// Create a transformer with no relations
    pub fn new() -> Self {
        Self {
            resource_key: DEFAULT_RESOURCE_KEY.to_string(),
            relations: Vec::new(),
        }
    }

    /// Set the resource key reported to serializers
    pub fn with_resource_key(mut self, key: impl Into<String>) -> Self {
        self.resource_key = key.into();
        self
    }

    /// Declare a relation whose value is passed through without further relations
    pub fn with_relation(self, name: impl Into<String>) -> Self {
        self.with_nested(name, ValueTransformer::new())
    }

    /// Declare a relation processed by `transformer`, replacing any earlier declaration
    pub fn with_nested(mut self, name: impl Into<String>, transformer: ValueTransformer) -> Self {
        let name = name.into();
        match self.relations.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = transformer,
            None => self.relations.push((name, transformer)),
        }
        self
    }

    /// Declare a dot-delimited chain of relations, e.g. `"author.posts"`
    pub fn with_relation_path(mut self, path: &str) -> Self {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if head.is_empty() {
            return self;
        }

        let position = match self.relations.iter().position(|(name, _)| name == head) {
            Some(position) => position,
            None => {
                self.relations.push((head.to_string(), ValueTransformer::new()));
                self.relations.len() - 1
            }
        };
        if let Some(rest) = rest {
            let nested = std::mem::take(&mut self.relations[position].1);
            self.relations[position].1 = nested.with_relation_path(rest);
        }
        self
    }

    /// Transformer declared for `name`, if any
    pub fn relation(&self, name: &str) -> Option<&ValueTransformer> {
        self.relations
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, transformer)| transformer)
    }

    fn process_relation(&self, value: &Value, scope: &dyn Scope) -> Result<Value> {
        let transformer: Transformer<Value> = Transformer::component(self.clone());
        match value {
            Value::Object(_) => Item::new(value.clone(), transformer).process(scope),
            Value::Array(items) => Collection::new(items.clone(), transformer).process(scope),
            Value::Null => Ok(scope.null_default_value()),
            scalar => Ok(scalar.clone()),
        }
    }
}

impl Default for ValueTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformerComponent<Value> for ValueTransformer {
    fn transform(&self, item: &Value, _args: &TransformArgs) -> Result<Option<Value>> {
        Ok(item.as_object().map(|fields| Value::Object(fields.clone())))
    }

    fn resource_key(&self) -> &str {
        &self.resource_key
    }

    fn available_includes(&self) -> BTreeSet<String> {
        self.relations.iter().map(|(name, _)| name.clone()).collect()
    }

    fn process_includes(&self, scope: &dyn Scope, item: &Value) -> Result<Vec<Map<String, Value>>> {
        let requested = self.filter_includes(scope);
        let mut included = Vec::new();

        for (name, transformer) in &self.relations {
            if !requested.contains(name) {
                continue;
            }
            let Some(value) = item.get(name) else {
                continue;
            };

            let nested_scope = scope.nested(name);
            let processed = transformer.process_relation(value, nested_scope.as_ref())?;

            let mut relation = Map::new();
            relation.insert(name.clone(), processed);
            included.push(relation);
        }

        tracing::trace!(
            resource_key = %self.resource_key,
            relations = included.len(),
            "processed value relations"
        );
        Ok(included)
    }
}
