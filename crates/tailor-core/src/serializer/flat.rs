//! Flat serializer: the processed tree as a JSON value

use super::Serializer;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::Result;
use serde_json::{Map, Value};

/// Key under which metadata is attached
pub const META_KEY: &str = "meta";

/// Key wrapping non-object data when metadata has to sit next to it
pub const DATA_KEY: &str = "data";

/// Identity encoding; the default serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSerializer;

impl FlatSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for FlatSerializer {
    type Output = Value;

    fn data(&self, resource: &dyn Resource, scope: &dyn Scope) -> Result<Value> {
        resource.process(scope)
    }

    fn scope_root_key(&self, rendered: Value, identifier: &str) -> Result<Value> {
        if identifier.is_empty() {
            return Ok(rendered);
        }
        let mut nested = Map::new();
        nested.insert(identifier.to_string(), rendered);
        Ok(Value::Object(nested))
    }

    fn meta(&self, resource: &dyn Resource, _scope: &dyn Scope, rendered: Value) -> Result<Value> {
        let mut fields = match rendered {
            Value::Object(fields) => fields,
            other => {
                let mut wrapped = Map::new();
                wrapped.insert(DATA_KEY.to_string(), other);
                wrapped
            }
        };
        fields.insert(META_KEY.to_string(), Value::Object(resource.meta().clone()));
        Ok(Value::Object(fields))
    }
}
