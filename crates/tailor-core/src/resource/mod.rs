//! Resources: the unit of work handed to a serializer
//!
//! A resource wraps an item or a collection together with its transformer,
//! metadata and post-transformation callbacks. Both [`Item`] and
//! [`Collection`] delegate the per-item work to a [`ResourceProcessor`].
//!
//! # Module Organization
//!
//! - [`processor`] - the per-item transformation algorithm
//! - [`item`] - a single (possibly absent) item
//! - [`collection`] - a sequence of items with optional paging data

pub mod collection;
pub mod item;
pub mod processor;

#[cfg(test)]
mod prop_tests;

pub use collection::Collection;
pub use item::Item;
pub use processor::{PostTransformationCallback, ResourceProcessor};

use crate::scope::Scope;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything a serializer can render
pub trait Resource {
    /// Produce the fully filtered tree for this resource under `scope`
    fn process(&self, scope: &dyn Scope) -> Result<Value>;

    /// Metadata to attach next to the rendered data
    fn meta(&self) -> &Map<String, Value>;

    /// Whether any metadata was added
    fn has_meta(&self) -> bool {
        !self.meta().is_empty()
    }

    /// Whether paging data is attached
    fn has_paging_data(&self) -> bool;

    /// Resource key of the transformer, `"data"` for callbacks
    fn transformer_resource_key(&self) -> &str;
}

/// Pagination shape attached to collections; computed by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingData {
    pub total: u64,
    pub count: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
}
