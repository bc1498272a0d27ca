//! Request scopes: which relations and fields a caller asked for
//!
//! A [`Scope`] answers the include/exclude questions for one nesting level of
//! a response. [`RequestScope`] is the stock implementation, built from paths
//! that have already been resolved from the request (parsing the raw request
//! strings happens before a scope is constructed).
//!
//! Paths are dot-delimited: `"author.posts"` names the `posts` relation of the
//! `author` relation, and `"author.email"` as an exclude names the `email`
//! field inside `author`.

use serde_json::Value;
use std::collections::BTreeSet;

/// Resolved include/exclude policy for one nesting level
pub trait Scope {
    /// Requested includes; `scoped` restricts them to relation names at this level
    fn includes(&self, scoped: bool) -> BTreeSet<String>;

    /// Requested excludes; `scoped` restricts them to field names at this level
    fn excludes(&self, scoped: bool) -> BTreeSet<String>;

    /// Exclude paths, relative to this level, that apply to a transformed
    /// mapping; the processor leaves paths under a resolved relation to that
    /// relation's nested scope
    fn filtered_excludes(&self) -> BTreeSet<String>;

    /// Value returned in place of an absent item or absent transformer output
    fn null_default_value(&self) -> Value;

    /// Scope seen by the relation `relation` of an item at this level
    fn nested(&self, relation: &str) -> Box<dyn Scope>;
}

/// Scope built from already-resolved include and exclude paths
#[derive(Debug, Clone, PartialEq)]
pub struct RequestScope {
    includes: BTreeSet<String>,
    excludes: BTreeSet<String>,
    null_default: Value,
}

impl RequestScope {
    /// Create an empty scope: nothing included, nothing excluded, `null` default
    pub fn new() -> Self {
        Self {
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
            null_default: Value::Null,
        }
    }

    /// Add include paths; every ancestor of a path is included as well
    pub fn with_includes<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            let path = path.into();
            if path.is_empty() {
                continue;
            }
            for (index, _) in path.match_indices('.') {
                self.includes.insert(path[..index].to_string());
            }
            self.includes.insert(path);
        }
        self
    }

    /// Add exclude paths
    pub fn with_excludes<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(
            paths
                .into_iter()
                .map(Into::into)
                .filter(|path: &String| !path.is_empty()),
        );
        self
    }

    /// Set the value used for absent items
    pub fn with_null_default(mut self, value: Value) -> Self {
        self.null_default = value;
        self
    }

    fn strip_prefix(paths: &BTreeSet<String>, relation: &str) -> BTreeSet<String> {
        let prefix = format!("{}.", relation);
        paths
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope for RequestScope {
    fn includes(&self, scoped: bool) -> BTreeSet<String> {
        if !scoped {
            return self.includes.clone();
        }
        self.includes
            .iter()
            .map(|path| path.split('.').next().unwrap_or(path).to_string())
            .collect()
    }

    fn excludes(&self, scoped: bool) -> BTreeSet<String> {
        if !scoped {
            return self.excludes.clone();
        }
        self.excludes
            .iter()
            .filter(|path| !path.contains('.'))
            .cloned()
            .collect()
    }

    fn filtered_excludes(&self) -> BTreeSet<String> {
        // Whether an included relation owns a path depends on the transformer.
        self.excludes.clone()
    }

    fn null_default_value(&self) -> Value {
        self.null_default.clone()
    }

    fn nested(&self, relation: &str) -> Box<dyn Scope> {
        Box::new(Self {
            includes: Self::strip_prefix(&self.includes, relation),
            excludes: Self::strip_prefix(&self.excludes, relation),
            null_default: self.null_default.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_includes_imply_ancestors() {
        let scope = RequestScope::new().with_includes(["author.posts.comments"]);
        assert_eq!(
            scope.includes(false),
            set(&["author", "author.posts", "author.posts.comments"])
        );
        assert_eq!(scope.includes(true), set(&["author"]));
    }

    #[test]
    fn test_empty_paths_ignored() {
        let scope = RequestScope::new()
            .with_includes(["", "tags"])
            .with_excludes([""]);
        assert_eq!(scope.includes(false), set(&["tags"]));
        assert!(scope.excludes(false).is_empty());
    }

    #[test]
    fn test_scoped_excludes_only_current_level() {
        let scope = RequestScope::new().with_excludes(["email", "author.email"]);
        assert_eq!(scope.excludes(true), set(&["email"]));
        assert_eq!(scope.excludes(false), set(&["author.email", "email"]));
    }

    #[test]
    fn test_filtered_excludes_keep_paths_under_includes() {
        let scope = RequestScope::new()
            .with_includes(["author"])
            .with_excludes(["email", "author.email", "settings.token"]);

        assert_eq!(
            scope.filtered_excludes(),
            set(&["author.email", "email", "settings.token"])
        );
    }

    #[test]
    fn test_nested_scope_strips_relation_prefix() {
        let scope = RequestScope::new()
            .with_includes(["author.posts", "tags"])
            .with_excludes(["author.email", "author.posts.body", "title"])
            .with_null_default(json!({}));

        let author = scope.nested("author");
        assert_eq!(author.includes(false), set(&["posts"]));
        assert_eq!(author.includes(true), set(&["posts"]));
        assert_eq!(author.excludes(false), set(&["email", "posts.body"]));
        assert_eq!(author.filtered_excludes(), set(&["email", "posts.body"]));
        assert_eq!(author.null_default_value(), json!({}));

        let posts = author.nested("posts");
        assert!(posts.includes(false).is_empty());
        assert_eq!(posts.excludes(true), set(&["body"]));
    }

    #[test]
    fn test_nested_does_not_match_partial_names() {
        let scope = RequestScope::new().with_includes(["authors.posts"]);
        assert!(scope.nested("author").includes(false).is_empty());
    }

    #[test]
    fn test_default_null_value() {
        assert_eq!(RequestScope::default().null_default_value(), Value::Null);
    }
}
