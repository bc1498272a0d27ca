//! Collection resources

use super::{PagingData, PostTransformationCallback, Resource, ResourceProcessor};
use crate::scope::Scope;
use crate::transformer::Transformer;
use crate::Result;
use serde_json::{Map, Value};

/// A sequence of domain items sharing one transformer
#[derive(Debug)]
pub struct Collection<T> {
    data: Option<Vec<T>>,
    processor: ResourceProcessor<T>,
}

impl<T> Collection<T> {
    /// Create a collection resource; pass `None` for an absent collection
    pub fn new(data: impl Into<Option<Vec<T>>>, transformer: Transformer<T>) -> Self {
        Self {
            data: data.into(),
            processor: ResourceProcessor::new(transformer),
        }
    }

    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    pub fn processor(&self) -> &ResourceProcessor<T> {
        &self.processor
    }

    /// Insert or overwrite a metadata entry
    pub fn add_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.processor.add_meta(key, value);
        self
    }

    /// Attach pagination details computed by the caller
    pub fn with_paging_data(mut self, paging_data: PagingData) -> Self {
        self.processor.set_paging_data(paging_data);
        self
    }

    pub fn paging_data(&self) -> Option<&PagingData> {
        self.processor.paging_data()
    }

    /// Append a callback run on every transformed item
    pub fn add_post_transformation_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(Value, &T, &ResourceProcessor<T>) -> Value + 'static,
    {
        let callback: PostTransformationCallback<T> = Box::new(callback);
        self.processor.add_post_transformation_callback(callback);
        self
    }
}

impl<T> Resource for Collection<T> {
    fn process(&self, scope: &dyn Scope) -> Result<Value> {
        let Some(items) = &self.data else {
            return Ok(scope.null_default_value());
        };

        items
            .iter()
            .map(|item| self.processor.transform_item(scope, Some(item)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
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
