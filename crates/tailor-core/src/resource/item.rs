//! Single-item resources

use super::{PostTransformationCallback, Resource, ResourceProcessor};
use crate::scope::Scope;
use crate::transformer::Transformer;
use crate::Result;
use serde_json::{Map, Value};

/// A single, possibly absent, domain item
#[derive(Debug)]
pub struct Item<T> {
    data: Option<T>,
    processor: ResourceProcessor<T>,
}

impl<T> Item<T> {
    /// Create an item resource; pass `None` for an absent item
    pub fn new(data: impl Into<Option<T>>, transformer: Transformer<T>) -> Self {
        Self {
            data: data.into(),
            processor: ResourceProcessor::new(transformer),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn processor(&self) -> &ResourceProcessor<T> {
        &self.processor
    }

    /// Insert or overwrite a metadata entry
    pub fn add_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.processor.add_meta(key, value);
        self
    }

    /// Append a callback run on the transformed item
    pub fn add_post_transformation_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(Value, &T, &ResourceProcessor<T>) -> Value + 'static,
    {
        let callback: PostTransformationCallback<T> = Box::new(callback);
        self.processor.add_post_transformation_callback(callback);
        self
    }
}

impl<T> Resource for Item<T> {
    fn process(&self, scope: &dyn Scope) -> Result<Value> {
        self.processor.transform_item(scope, self.data.as_ref())
    }

    fn meta(&self) -> &Map<String, Value> {
        self.processor.meta()
    }

    fn has_paging_data(&self) -> bool {
        self.processor.has_paging_data()
    }

    fn transformer_resource_key(&self) -> &str {
        self.processor.transformer_resource_key()
    }
}
