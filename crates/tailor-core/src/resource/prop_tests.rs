//! Property-based tests for resource processing
//!
//! These check the exclude and merge-order guarantees over generated
//! mappings rather than hand-picked fixtures.

use super::{Item, Resource};
use crate::scope::{RequestScope, Scope};
use crate::transformer::{TransformArgs, Transformer, TransformerComponent, ValueTransformer};
use crate::Result;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Strategy for flat-ish JSON objects with a nested level of plain mappings
fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z ]{0,12}".prop_map(Value::String),
    ];
    let nested = proptest::collection::btree_map("[a-e]", leaf.clone(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()));

    proptest::collection::btree_map("[a-e]", prop_oneof![leaf, nested], 0..6)
        .prop_map(|m| m.into_iter().collect())
}

/// Component whose every declared relation yields one generated mapping
struct GeneratedRelations {
    relations: Vec<(String, Map<String, Value>)>,
}

impl TransformerComponent<Map<String, Value>> for GeneratedRelations {
    fn transform(&self, item: &Map<String, Value>, _args: &TransformArgs) -> Result<Option<Value>> {
        Ok(Some(Value::Object(item.clone())))
    }

    fn available_includes(&self) -> BTreeSet<String> {
        self.relations.iter().map(|(name, _)| name.clone()).collect()
    }

    fn process_includes(
        &self,
        _scope: &dyn Scope,
        _item: &Map<String, Value>,
    ) -> Result<Vec<Map<String, Value>>> {
        Ok(self.relations.iter().map(|(_, mapping)| mapping.clone()).collect())
    }
}

fn passthrough() -> Transformer<Map<String, Value>> {
    Transformer::callback(|item: &Map<String, Value>, _: &TransformArgs| {
        Ok(Some(Value::Object(item.clone())))
    })
}

fn assert_excluded(
    processed: &Value,
    top: &[String],
    nested: &[(String, String)],
) -> std::result::Result<(), TestCaseError> {
    let object = processed.as_object().expect("processed item is an object");
    for key in top {
        prop_assert!(!object.contains_key(key), "excluded key {} survived", key);
    }
    for (outer, inner) in nested {
        if let Some(Value::Object(child)) = object.get(outer) {
            prop_assert!(!child.contains_key(inner), "excluded path {}.{} survived", outer, inner);
        }
    }
    Ok(())
}

fn exclude_paths(top: &[String], nested: &[(String, String)]) -> Vec<String> {
    top.iter()
        .cloned()
        .chain(nested.iter().map(|(outer, inner)| format!("{}.{}", outer, inner)))
        .collect()
}

proptest! {
    #[test]
    fn excluded_paths_never_survive(
        fields in object_strategy(),
        top in proptest::collection::vec("[a-e]", 0..3),
        nested in proptest::collection::vec(("[a-e]", "[a-e]"), 0..3),
    ) {
        let scope = RequestScope::new().with_excludes(exclude_paths(&top, &nested));

        let processed = Item::new(fields, passthrough()).process(&scope).unwrap();
        assert_excluded(&processed, &top, &nested)?;
    }

    #[test]
    fn excluded_paths_never_survive_alongside_includes(
        fields in object_strategy(),
        top in proptest::collection::vec("[a-e]", 0..3),
        nested in proptest::collection::vec(("[a-e]", "[a-e]"), 0..3),
        declared in proptest::collection::btree_set("[a-e]", 0..4),
    ) {
        // Every head of an exclude path is requested as an include as well.
        let includes: Vec<String> = top
            .iter()
            .cloned()
            .chain(nested.iter().map(|(outer, _)| outer.clone()))
            .collect();
        let scope = RequestScope::new()
            .with_includes(includes)
            .with_excludes(exclude_paths(&top, &nested));

        let processed = Item::new(fields.clone(), passthrough()).process(&scope).unwrap();
        assert_excluded(&processed, &top, &nested)?;

        let transformer = declared
            .iter()
            .fold(ValueTransformer::new(), |transformer, name| transformer.with_relation(name.as_str()));
        let processed = Item::<Value>::new(Value::Object(fields), Transformer::component(transformer))
            .process(&scope)
            .unwrap();
        assert_excluded(&processed, &top, &nested)?;
    }

    #[test]
    fn last_relation_wins(
        base in object_strategy(),
        mappings in proptest::collection::vec(object_strategy(), 1..4),
    ) {
        let relations: Vec<(String, Map<String, Value>)> = mappings
            .iter()
            .enumerate()
            .map(|(index, mapping)| (format!("rel{}", index), mapping.clone()))
            .collect();
        let names: Vec<String> = relations.iter().map(|(name, _)| name.clone()).collect();
        let scope = RequestScope::new().with_includes(names);
        let transformer = Transformer::component(GeneratedRelations { relations });

        let processed = Item::new(base.clone(), transformer).process(&scope).unwrap();
        let object = processed.as_object().unwrap();

        for (key, value) in object {
            let expected = mappings
                .iter()
                .rev()
                .find_map(|mapping| mapping.get(key))
                .or_else(|| base.get(key));
            prop_assert_eq!(Some(value), expected);
        }
    }
}
