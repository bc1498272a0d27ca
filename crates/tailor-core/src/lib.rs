//! Tailor Core - policy-driven shaping of API response trees
//!
//! This crate takes domain items, runs them through caller-supplied
//! transformers, applies the request's include/exclude policy, merges nested
//! relation data and renders the resulting tree with a pluggable serializer.
//!
//! # Main Components
//!
//! - **Scope**: resolved includes/excludes and the null-default policy
//! - **Transformer**: plain callbacks or components declaring relations
//! - **Resource**: items and collections processed by the `ResourceProcessor`
//! - **Serializer**: flat JSON trees or XML-shaped documents
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tailor_core::{Item, RequestScope, Serializer, Transformer, XmlSerializer};
//!
//! # fn main() -> tailor_core::Result<()> {
//! let item = Item::new(
//!     json!({"id": 5, "name": "Ann", "password": "hunter2"}),
//!     Transformer::callback(|user: &serde_json::Value, _args| Ok(Some(user.clone()))),
//! );
//! let scope = RequestScope::new().with_excludes(["password"]);
//!
//! let xml = XmlSerializer::new().data(&item, &scope)?;
//! assert!(xml.contains("<root><id>5</id><name>Ann</name></root>"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resource;
pub mod scope;
pub mod serializer;
pub mod transformer;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use resource::{
    Collection, Item, PagingData, PostTransformationCallback, Resource, ResourceProcessor,
};
pub use scope::{RequestScope, Scope};
pub use serializer::{
    xml::{XmlSerializer, XmlSerializerConfig},
    FlatSerializer, Serializer,
};
pub use transformer::{
    TransformArgs, TransformCallback, Transformer, TransformerComponent, ValueTransformer,
    DEFAULT_RESOURCE_KEY,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
