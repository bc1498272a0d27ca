//! Render command handler

use crate::cli::{RenderArgs, RenderFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tailor_core::{
    Collection, FlatSerializer, Item, RequestScope, Resource, Serializer, Transformer,
    ValueTransformer, XmlSerializer,
};

/// Handle the render command
pub fn handle_render(args: RenderArgs, config: &Config) -> Result<()> {
    if !args.input.exists() {
        return Err(Error::FileNotFound {
            path: args.input.clone(),
        });
    }

    let document = read_document(&args.input)?;
    tracing::info!(input = %args.input.display(), "rendering document");

    let rendered = render_document(document, &args, config)?;

    match &args.output_file {
        Some(path) => {
            fs::write(path, &rendered)?;
            tracing::info!(path = %path.display(), "output saved");
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Read and parse the JSON input, keeping the parser's line and column on failure
fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| Error::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Run `document` through the pipeline and encode it; output always ends with a newline
pub fn render_document(document: Value, args: &RenderArgs, config: &Config) -> Result<String> {
    let transformer = args
        .relations
        .iter()
        .fold(ValueTransformer::new(), |transformer, path| {
            transformer.with_relation_path(path)
        });
    let scope = RequestScope::new()
        .with_includes(&args.include)
        .with_excludes(&args.exclude)
        .with_null_default(config.null_default.clone());
    let meta = args
        .meta
        .iter()
        .map(|(key, raw)| (key.clone(), parse_meta_value(raw)));

    let resource: Box<dyn Resource> = match document {
        Value::Array(items) => {
            tracing::debug!(items = items.len(), "rendering collection");
            let collection = Collection::<Value>::new(items, Transformer::component(transformer));
            Box::new(meta.fold(collection, |collection, (key, value)| {
                collection.add_meta(key, value)
            }))
        }
        other => {
            let item = Item::<Value>::new(other, Transformer::component(transformer));
            Box::new(meta.fold(item, |item, (key, value)| item.add_meta(key, value)))
        }
    };

    let format = args.format.unwrap_or(config.output.format);
    let root_key = args
        .root_key
        .as_deref()
        .or(config.output.root_key.as_deref())
        .unwrap_or("");

    match format {
        RenderFormat::Json | RenderFormat::JsonPretty => {
            let value = FlatSerializer::new().render(resource.as_ref(), &scope, root_key)?;
            let mut encoded = if format == RenderFormat::Json {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            encoded.push('\n');
            Ok(encoded)
        }
        RenderFormat::Xml => {
            let mut xml = config.xml.clone();
            if args.no_sort_keys {
                xml.sort_keys = false;
            }
            Ok(XmlSerializer::with_config(xml).render(resource.as_ref(), &scope, root_key)?)
        }
    }
}

/// Meta values are JSON when they parse as JSON, plain strings otherwise
fn parse_meta_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
