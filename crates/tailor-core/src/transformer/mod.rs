//! Transformers: mapping domain items to plain field mappings
//!
//! A [`Transformer`] is either a bare callback or a component implementing
//! [`TransformerComponent`]. Callbacks only map fields. Components may also
//! declare relations ("includes") that the caller can opt into; the
//! [`ResourceProcessor`](crate::ResourceProcessor) strips the ones that were not
//! requested and merges the ones that were.
//!
//! # Module Organization
//!
//! - [`value`] - a generic component for JSON documents with declared relations
//! - `tests` - dispatch and relation tests
//!
//! # Examples
//!
//! ```
//! use serde_json::{json, Value};
//! use tailor_core::{Transformer, TransformArgs};
//!
//! let transformer = Transformer::callback(|user: &Value, _args: &TransformArgs| {
//!     Ok(Some(json!({ "name": user["name"] })))
//! });
//! assert_eq!(transformer.resource_key(), "data");
//! ```

pub mod value;


pub use value::ValueTransformer;

use crate::scope::Scope;
use crate::Result;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Resource key reported for transformers that do not name their resource
pub const DEFAULT_RESOURCE_KEY: &str = "data";

/// Include/exclude sets handed to every transformer invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformArgs {
    /// Relation names requested at the current level
    pub scoped_includes: BTreeSet<String>,
    /// Field names excluded at the current level
    pub scoped_excludes: BTreeSet<String>,
    /// Every requested include path
    pub all_includes: BTreeSet<String>,
    /// Every excluded path
    pub all_excludes: BTreeSet<String>,
}

impl TransformArgs {
    /// Snapshot the include/exclude sets of a scope
    pub fn from_scope(scope: &dyn Scope) -> Self {
        Self {
            scoped_includes: scope.includes(true),
            scoped_excludes: scope.excludes(true),
            all_includes: scope.includes(false),
            all_excludes: scope.excludes(false),
        }
    }
}

/// A bare mapping function from an item to its fields
pub type TransformCallback<T> = Box<dyn Fn(&T, &TransformArgs) -> Result<Option<Value>>>;

/// A transformer that can declare and resolve relations
pub trait TransformerComponent<T> {
    /// Map the item to its fields; `None` means "no value"
    fn transform(&self, item: &T, args: &TransformArgs) -> Result<Option<Value>>;

    /// Name of the resource this transformer produces
    fn resource_key(&self) -> &str {
        DEFAULT_RESOURCE_KEY
    }

    /// Relation names this transformer can include
    fn available_includes(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Whether any relation is declared at all
    fn has_includes(&self) -> bool {
        !self.available_includes().is_empty()
    }

    /// Declared relations that the scope requested and did not also exclude
    fn filter_includes(&self, scope: &dyn Scope) -> BTreeSet<String> {
        let requested = scope.includes(true);
        let excluded = scope.excludes(true);
        self.available_includes()
            .into_iter()
            .filter(|name| requested.contains(name) && !excluded.contains(name))
            .collect()
    }

    /// Transform every requested relation of `item`, one mapping per relation.
    ///
    /// The processor merges the returned mappings into the item's fields in
    /// the order they are returned. A later mapping overwrites keys set by an
    /// earlier one and by the base transform, so implementations must return
    /// relations in the precedence order their callers rely on.
    fn process_includes(&self, scope: &dyn Scope, item: &T) -> Result<Vec<Map<String, Value>>> {
        let _ = (scope, item);
        Ok(Vec::new())
    }
}

/// Either a bare callback or a relation-aware component
pub enum Transformer<T> {
    /// Plain field mapping; cannot declare relations
    Callback(TransformCallback<T>),
    /// Component with relation capabilities
    Component(Box<dyn TransformerComponent<T>>),
}

impl<T> Transformer<T> {
    /// Wrap a closure as a callback transformer
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&T, &TransformArgs) -> Result<Option<Value>> + 'static,
    {
        Transformer::Callback(Box::new(callback))
    }

    /// Wrap a component transformer
    pub fn component<C>(component: C) -> Self
    where
        C: TransformerComponent<T> + 'static,
    {
        Transformer::Component(Box::new(component))
    }

    /// Run the underlying mapping
    pub fn transform(&self, item: &T, args: &TransformArgs) -> Result<Option<Value>> {
        match self {
            Transformer::Callback(callback) => callback(item, args),
            Transformer::Component(component) => component.transform(item, args),
        }
    }

    /// Resource key used when a caller needs a default nesting identifier
    pub fn resource_key(&self) -> &str {
        match self {
            Transformer::Callback(_) => DEFAULT_RESOURCE_KEY,
            Transformer::Component(component) => component.resource_key(),
        }
    }

    /// The relation-aware view of this transformer, if it has one
    pub fn as_component(&self) -> Option<&dyn TransformerComponent<T>> {
        match self {
            Transformer::Callback(_) => None,
            Transformer::Component(component) => Some(component.as_ref()),
        }
    }
}

impl<T> fmt::Debug for Transformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::Callback(_) => write!(f, "Transformer::Callback"),
            Transformer::Component(component) => f
                .debug_struct("Transformer::Component")
                .field("resource_key", &component.resource_key())
                .field("available_includes", &component.available_includes())
                .finish(),
        }
    }
}
