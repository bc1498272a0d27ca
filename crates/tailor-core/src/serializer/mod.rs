//! Serializers: rendering processed resources into an output encoding
//!
//! Every encoding implements [`Serializer`]. The processed tree is identical
//! for every encoding; serializers only differ in how they lay it out, nest it
//! under an identifier and attach metadata.
//!
//! - [`FlatSerializer`] returns the tree as a `serde_json::Value`
//! - [`xml::XmlSerializer`] renders an XML-shaped document

pub mod document;
pub mod flat;
pub mod xml;

pub use flat::FlatSerializer;

use crate::resource::Resource;
use crate::scope::Scope;
use crate::Result;
use serde_json::{Map, Value};

/// Contract shared by every output encoding
pub trait Serializer {
    /// Rendered form produced by this encoding
    type Output;

    /// Process the resource and render the resulting tree
    fn data(&self, resource: &dyn Resource, scope: &dyn Scope) -> Result<Self::Output>;

    /// Processed data wrapped under the last dot-delimited segment of `identifier`
    fn scope_data(
        &self,
        resource: &dyn Resource,
        scope: &dyn Scope,
        identifier: &str,
    ) -> Result<Map<String, Value>> {
        let mut scoped = Map::new();
        scoped.insert(identifier_key(identifier).to_string(), resource.process(scope)?);
        Ok(scoped)
    }

    /// Nest an already-rendered payload one level deeper under `identifier`;
    /// an empty identifier leaves the payload unchanged
    fn scope_root_key(&self, rendered: Self::Output, identifier: &str) -> Result<Self::Output>;

    /// Attach the resource's metadata without disturbing existing content
    fn meta(
        &self,
        resource: &dyn Resource,
        scope: &dyn Scope,
        rendered: Self::Output,
    ) -> Result<Self::Output>;

    /// Render data, nest it under `root_key` and attach metadata when present
    fn render(
        &self,
        resource: &dyn Resource,
        scope: &dyn Scope,
        root_key: &str,
    ) -> Result<Self::Output> {
        let rendered = self.data(resource, scope)?;
        let rendered = self.scope_root_key(rendered, root_key)?;
        if resource.has_meta() {
            self.meta(resource, scope, rendered)
        } else {
            Ok(rendered)
        }
    }
}

/// Last dot-delimited segment of an identifier (`"post.author"` -> `"author"`)
pub fn identifier_key(identifier: &str) -> &str {
    identifier
        .rsplit_once('.')
        .map_or(identifier, |(_, last)| last)
}
