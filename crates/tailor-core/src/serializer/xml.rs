//! XML-shaped serializer
//!
//! Renders the processed tree as a document rooted at `root_key`:
//!
//! - arrays become sibling `item_key` elements, in order
//! - objects become one element per key, sorted case-insensitively unless
//!   `sort_keys` is off (then insertion order is kept)
//! - scalars become the element's text; `null` leaves the element empty
//!
//! Re-rooting and metadata attachment work on the rendered text: the document
//! is parsed back, rearranged and written again.
//!
//! ```
//! use serde_json::{json, Value};
//! use tailor_core::{Item, RequestScope, Serializer, TransformArgs, Transformer, XmlSerializer};
//!
//! let item = Item::new(
//!     json!({"name": "Ann", "age": 30}),
//!     Transformer::callback(|user: &Value, _: &TransformArgs| Ok(Some(user.clone()))),
//! );
//! let xml = XmlSerializer::new().render(&item, &RequestScope::new(), "user").unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version=\"1.0\"?>\n<root><user><age>30</age><name>Ann</name></user></root>\n"
//! );
//! ```

use super::document::{Document, Element};
use super::Serializer;
use crate::resource::Resource;
use crate::scope::Scope;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element names and ordering used by [`XmlSerializer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlSerializerConfig {
    /// Name of the document's root element
    pub root_key: String,
    /// Name of the element holding attached metadata
    pub meta_key: String,
    /// Name of each element rendered for an array member
    pub item_key: String,
    /// Sort mapping keys case-insensitively
    pub sort_keys: bool,
}

impl Default for XmlSerializerConfig {
    fn default() -> Self {
        Self {
            root_key: "root".to_string(),
            meta_key: "meta".to_string(),
            item_key: "item".to_string(),
            sort_keys: true,
        }
    }
}

/// Tree-building serializer producing XML text
#[derive(Debug, Clone, Default)]
pub struct XmlSerializer {
    config: XmlSerializerConfig,
}

impl XmlSerializer {
    /// Create a serializer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: XmlSerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &XmlSerializerConfig {
        &self.config
    }

    pub fn root_key(mut self, root_key: impl Into<String>) -> Self {
        self.config.root_key = root_key.into();
        self
    }

    pub fn meta_key(mut self, meta_key: impl Into<String>) -> Self {
        self.config.meta_key = meta_key.into();
        self
    }

    pub fn item_key(mut self, item_key: impl Into<String>) -> Self {
        self.config.item_key = item_key.into();
        self
    }

    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.config.sort_keys = sort_keys;
        self
    }

    /// Fill `parent` with the rendering of `contents`
    pub fn populate_node(&self, parent: &mut Element, contents: &Value) -> Result<()> {
        match contents {
            Value::Array(items) => {
                for item in items {
                    let mut node = Element::try_new(&self.config.item_key)?;
                    self.populate_node(&mut node, item)?;
                    parent.children.push(node);
                }
            }
            Value::Object(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                if self.config.sort_keys {
                    keys.sort_by_key(|key| key.to_lowercase());
                }
                for key in keys {
                    let mut node = Element::try_new(key)?;
                    self.populate_node(&mut node, &fields[key.as_str()])?;
                    parent.children.push(node);
                }
            }
            Value::Null => {}
            Value::Bool(flag) => parent.text = flag.to_string(),
            Value::Number(number) => parent.text = number.to_string(),
            Value::String(text) => parent.text = text.clone(),
        }
        Ok(())
    }
}

impl Serializer for XmlSerializer {
    type Output = String;

    fn data(&self, resource: &dyn Resource, scope: &dyn Scope) -> Result<String> {
        let contents = resource.process(scope)?;
        let mut document = Document::new(&self.config.root_key)?;
        self.populate_node(&mut document.root, &contents)?;
        document.to_xml()
    }

    fn scope_root_key(&self, rendered: String, identifier: &str) -> Result<String> {
        if identifier.is_empty() {
            return Ok(rendered);
        }

        let mut document = Document::parse(&rendered)?;
        let mut wrapper = Element::try_new(identifier)?;
        wrapper.text = std::mem::take(&mut document.root.text);
        wrapper.children = std::mem::take(&mut document.root.children);
        document.root.children.push(wrapper);

        tracing::trace!(identifier, "re-rooted rendered document");
        document.to_xml()
    }

    fn meta(&self, resource: &dyn Resource, _scope: &dyn Scope, rendered: String) -> Result<String> {
        let mut document = Document::parse(&rendered)?;
        let mut node = Element::try_new(&self.config.meta_key)?;
        self.populate_node(&mut node, &Value::Object(resource.meta().clone()))?;
        document.root.children.push(node);
        document.to_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Collection, Item};
    use crate::scope::RequestScope;
    use crate::transformer::{TransformArgs, Transformer};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn passthrough(value: Value) -> Item<Value> {
        Item::new(
            value,
            Transformer::callback(|item: &Value, _: &TransformArgs| Ok(Some(item.clone()))),
        )
    }

    fn document(body: &str) -> String {
        format!("<?xml version=\"1.0\"?>\n{}\n", body)
    }

    fn render_contents(serializer: &XmlSerializer, contents: Value) -> Element {
        let mut root = Element::try_new("root").unwrap();
        serializer.populate_node(&mut root, &contents).unwrap();
        root
    }

    #[test]
    fn test_default_config() {
        let config = XmlSerializerConfig::default();
        assert_eq!(config.root_key, "root");
        assert_eq!(config.meta_key, "meta");
        assert_eq!(config.item_key, "item");
        assert!(config.sort_keys);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: XmlSerializerConfig =
            serde_json::from_value(json!({"root_key": "response", "sort_keys": false})).unwrap();
        assert_eq!(config.root_key, "response");
        assert_eq!(config.item_key, "item");
        assert!(!config.sort_keys);
    }

    #[test]
    fn test_sorted_keys() {
        let root = render_contents(&XmlSerializer::new(), json!({"b": 1, "a": 2}));
        assert_eq!(root.child_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_sorting_is_case_insensitive_and_stable() {
        let root = render_contents(
            &XmlSerializer::new(),
            json!({"beta": 1, "Alpha": 2, "alpha": 3, "Gamma": 4}),
        );
        assert_eq!(root.child_names(), vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_unsorted_keeps_insertion_order() {
        let root = render_contents(&XmlSerializer::new().sort_keys(false), json!({"b": 1, "a": 2}));
        assert_eq!(root.child_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_arrays_keep_order_under_item_key() {
        let root = render_contents(
            &XmlSerializer::new().item_key("entry"),
            json!({"tags": ["z", "a", {"y": 1, "x": 2}]}),
        );
        let tags = root.child("tags").unwrap();
        assert_eq!(tags.child_names(), vec!["entry", "entry", "entry"]);
        assert_eq!(tags.children[0].text, "z");
        assert_eq!(tags.children[1].text, "a");
        assert_eq!(tags.children[2].child_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_scalar_text() {
        let root = render_contents(
            &XmlSerializer::new(),
            json!({"flag": true, "off": false, "ratio": 0.5, "none": null, "name": "Ann"}),
        );
        assert_eq!(root.child("flag").unwrap().text, "true");
        assert_eq!(root.child("off").unwrap().text, "false");
        assert_eq!(root.child("ratio").unwrap().text, "0.5");
        assert_eq!(root.child("none").unwrap().text, "");
        assert_eq!(root.child("name").unwrap().text, "Ann");
    }

    #[test]
    fn test_data_end_to_end() {
        let xml = XmlSerializer::new()
            .data(&passthrough(json!({"name": "Ann", "id": 5})), &RequestScope::new())
            .unwrap();
        assert_eq!(xml, document("<root><id>5</id><name>Ann</name></root>"));
    }

    #[test]
    fn test_data_scalar_and_null_default() {
        let serializer = XmlSerializer::new();
        let absent: Item<Value> = Item::new(
            None,
            Transformer::callback(|item: &Value, _: &TransformArgs| Ok(Some(item.clone()))),
        );
        assert_eq!(
            serializer.data(&absent, &RequestScope::new()).unwrap(),
            document("<root/>")
        );
        assert_eq!(
            serializer.data(&passthrough(json!("hello")), &RequestScope::new()).unwrap(),
            document("<root>hello</root>")
        );
    }

    #[test]
    fn test_collection_data() {
        let collection = Collection::new(
            vec![json!({"id": 1}), json!({"id": 2})],
            Transformer::callback(|item: &Value, _: &TransformArgs| Ok(Some(item.clone()))),
        );
        let xml = XmlSerializer::new()
            .root_key("users")
            .item_key("user")
            .data(&collection, &RequestScope::new())
            .unwrap();
        assert_eq!(
            xml,
            document("<users><user><id>1</id></user><user><id>2</id></user></users>")
        );
    }

    #[test]
    fn test_scope_root_key_moves_children() {
        let serializer = XmlSerializer::new().sort_keys(false);
        let rendered = serializer
            .data(&passthrough(json!({"name": "Ann", "age": 30})), &RequestScope::new())
            .unwrap();

        let rerooted = serializer.scope_root_key(rendered, "user").unwrap();
        assert_eq!(
            rerooted,
            document("<root><user><name>Ann</name><age>30</age></user></root>")
        );

        let parsed = Document::parse(&rerooted).unwrap();
        assert_eq!(parsed.root.child_names(), vec!["user"]);
        assert_eq!(parsed.root.children[0].child_names(), vec!["name", "age"]);
    }

    #[test]
    fn test_scope_root_key_empty_identifier_is_noop() {
        let rendered = "not even xml".to_string();
        assert_eq!(
            XmlSerializer::new().scope_root_key(rendered.clone(), "").unwrap(),
            rendered
        );
    }

    #[test]
    fn test_scope_root_key_moves_text() {
        let serializer = XmlSerializer::new();
        let rendered = serializer
            .data(&passthrough(json!("hello")), &RequestScope::new())
            .unwrap();
        assert_eq!(
            serializer.scope_root_key(rendered, "greeting").unwrap(),
            document("<root><greeting>hello</greeting></root>")
        );
    }

    #[test]
    fn test_meta_appended_as_last_child() {
        let serializer = XmlSerializer::new();
        let item = passthrough(json!({"id": 5, "name": "Ann"})).add_meta("total", 1);
        let rendered = serializer.data(&item, &RequestScope::new()).unwrap();

        assert_eq!(
            serializer.meta(&item, &RequestScope::new(), rendered).unwrap(),
            document("<root><id>5</id><name>Ann</name><meta><total>1</total></meta></root>")
        );
    }

    #[test]
    fn test_render_with_root_key_and_meta() {
        let item = passthrough(json!({"id": 5}))
            .add_meta("version", "2")
            .add_meta("pages", json!([1, 2]));
        let xml = XmlSerializer::new()
            .meta_key("info")
            .render(&item, &RequestScope::new(), "user")
            .unwrap();

        assert_eq!(
            xml,
            document(
                "<root><user><id>5</id></user><info><pages><item>1</item><item>2</item></pages><version>2</version></info></root>"
            )
        );
    }

    #[test]
    fn test_escaped_text_survives_re_rooting() {
        let serializer = XmlSerializer::new();
        let rendered = serializer
            .data(&passthrough(json!({"note": "a < b & c"})), &RequestScope::new())
            .unwrap();
        assert_eq!(
            serializer.scope_root_key(rendered, "wrapped").unwrap(),
            document("<root><wrapped><note>a &lt; b &amp; c</note></wrapped></root>")
        );
    }

    #[test]
    fn test_invalid_names_fail() {
        let serializer = XmlSerializer::new();
        let err = serializer
            .data(&passthrough(json!({"first name": "Ann"})), &RequestScope::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidElementName { ref name } if name == "first name"));

        let rendered = serializer
            .data(&passthrough(json!({"id": 1})), &RequestScope::new())
            .unwrap();
        assert!(matches!(
            serializer.scope_root_key(rendered, "1user"),
            Err(Error::InvalidElementName { .. })
        ));
    }

    #[test]
    fn test_control_characters_in_values_fail() {
        let err = XmlSerializer::new()
            .data(&passthrough(json!({"a": "x\u{1}y"})), &RequestScope::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidText { ref text } if text == "x\u{1}y"));
    }

    #[test]
    fn test_scope_data_returns_mapping() {
        let scoped = XmlSerializer::new()
            .scope_data(&passthrough(json!({"id": 1})), &RequestScope::new(), "post.author")
            .unwrap();
        assert_eq!(Value::Object(scoped), json!({"author": {"id": 1}}));
    }
}
