//! Per-item transformation
//!
//! [`ResourceProcessor::process_item`] is the heart of the pipeline:
//!
//! 1. an absent item yields the scope's null default without calling the transformer
//! 2. the transformer runs; `None` yields the null default
//! 3. the scope's filtered excludes are removed (dot paths, plain objects only),
//!    except paths inside a relation the component resolves
//! 4. callback transformers stop here
//! 5. declared relations that were not requested (or were excluded) are removed
//! 6. components without relations stop here
//! 7. requested relation mappings are merged in order, later keys overwriting earlier ones

use super::PagingData;
use crate::scope::Scope;
use crate::transformer::{TransformArgs, Transformer};
use crate::Result;
use serde_json::{Map, Value};
use std::fmt;

/// Callback run after an item is transformed; receives the transformed value,
/// the original item and the processor, and returns the replacement value
pub type PostTransformationCallback<T> = Box<dyn Fn(Value, &T, &ResourceProcessor<T>) -> Value>;

/// Transformer, metadata and callbacks shared by every resource kind
pub struct ResourceProcessor<T> {
    transformer: Transformer<T>,
    meta: Map<String, Value>,
    paging_data: Option<PagingData>,
    post_transformation_callbacks: Vec<PostTransformationCallback<T>>,
}

impl<T> ResourceProcessor<T> {
    /// Create a processor with empty metadata
    pub fn new(transformer: Transformer<T>) -> Self {
        Self {
            transformer,
            meta: Map::new(),
            paging_data: None,
            post_transformation_callbacks: Vec::new(),
        }
    }

    pub fn transformer(&self) -> &Transformer<T> {
        &self.transformer
    }

    /// Resource key of the transformer, `"data"` for callbacks
    pub fn transformer_resource_key(&self) -> &str {
        self.transformer.resource_key()
    }

    /// Transform one item and apply the include/exclude policy of `scope`
    pub fn process_item(&self, scope: &dyn Scope, item: Option<&T>) -> Result<Value> {
        let Some(item) = item else {
            return Ok(scope.null_default_value());
        };

        let args = TransformArgs::from_scope(scope);
        let Some(transformed) = self.transformer.transform(item, &args)? else {
            return Ok(scope.null_default_value());
        };

        // Only plain mappings carry keys to filter or merge into.
        let mut fields = match transformed {
            Value::Object(fields) => fields,
            other => return Ok(other),
        };

        let component = self.transformer.as_component();
        let requested = component
            .map(|component| component.filter_includes(scope))
            .unwrap_or_default();

        for path in scope.filtered_excludes() {
            // A resolved relation strips its own interior through its nested scope.
            let owned = matches!(path.split_once('.'), Some((head, _)) if requested.contains(head));
            if !owned {
                forget(&mut fields, &path);
            }
        }

        let Some(component) = component else {
            return Ok(Value::Object(fields));
        };

        for name in component.available_includes() {
            if !requested.contains(&name) && fields.shift_remove(&name).is_some() {
                tracing::trace!(relation = %name, "stripped unrequested relation");
            }
        }

        if !component.has_includes() {
            return Ok(Value::Object(fields));
        }

        let relations = component.process_includes(scope, item)?;
        tracing::debug!(
            resource_key = component.resource_key(),
            relations = relations.len(),
            "merging relations"
        );
        Ok(Value::Object(merge_relations(fields, relations)))
    }

    /// [`process_item`](Self::process_item) followed by the post-transformation callbacks
    pub fn transform_item(&self, scope: &dyn Scope, item: Option<&T>) -> Result<Value> {
        let transformed = self.process_item(scope, item)?;
        let Some(item) = item else {
            return Ok(transformed);
        };

        Ok(self
            .post_transformation_callbacks
            .iter()
            .fold(transformed, |value, callback| callback(value, item, self)))
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Insert or overwrite a metadata entry
    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.meta.insert(key.into(), value.into());
    }

    pub fn has_meta(&self) -> bool {
        !self.meta.is_empty()
    }

    pub fn paging_data(&self) -> Option<&PagingData> {
        self.paging_data.as_ref()
    }

    pub fn set_paging_data(&mut self, paging_data: PagingData) {
        self.paging_data = Some(paging_data);
    }

    pub fn has_paging_data(&self) -> bool {
        self.paging_data.is_some()
    }

    /// Append a callback; callbacks run in the order they were added
    pub fn add_post_transformation_callback(&mut self, callback: PostTransformationCallback<T>) {
        self.post_transformation_callbacks.push(callback);
    }
}

impl<T> fmt::Debug for ResourceProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProcessor")
            .field("transformer", &self.transformer)
            .field("meta", &self.meta)
            .field("paging_data", &self.paging_data)
            .field(
                "post_transformation_callbacks",
                &self.post_transformation_callbacks.len(),
            )
            .finish()
    }
}

/// Remove a dot-delimited path, descending only through plain objects
fn forget(fields: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            fields.shift_remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(nested)) = fields.get_mut(head) {
                forget(nested, rest);
            }
        }
    }
}

/// Fold relation mappings into the base fields, later keys winning
fn merge_relations(fields: Map<String, Value>, relations: Vec<Map<String, Value>>) -> Map<String, Value> {
    relations.into_iter().fold(fields, |mut merged, relation| {
        merged.extend(relation);
        merged
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_forget_top_level_and_nested() {
        let mut fields = object(json!({
            "email": "a@example.com",
            "profile": {"token": "secret", "bio": "hi"},
            "name": "Ann"
        }));

        forget(&mut fields, "email");
        forget(&mut fields, "profile.token");

        assert_eq!(
            Value::Object(fields),
            json!({"profile": {"bio": "hi"}, "name": "Ann"})
        );
    }

    #[test]
    fn test_forget_missing_or_non_object_is_noop() {
        let mut fields = object(json!({"tags": ["a", "b"], "count": 3}));

        forget(&mut fields, "missing");
        forget(&mut fields, "tags.0");
        forget(&mut fields, "count.value");

        assert_eq!(Value::Object(fields), json!({"tags": ["a", "b"], "count": 3}));
    }

    #[test]
    fn test_forget_keeps_key_order() {
        let mut fields = object(json!({"a": 1, "b": 2, "c": 3, "d": 4}));
        forget(&mut fields, "b");
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, ["a", "c", "d"]);
    }

    #[test]
    fn test_merge_relations_last_wins() {
        let merged = merge_relations(
            object(json!({"x": 0, "id": 1})),
            vec![object(json!({"x": 1})), object(json!({"x": 2, "y": 3}))],
        );
        assert_eq!(Value::Object(merged), json!({"x": 2, "id": 1, "y": 3}));
    }
}
