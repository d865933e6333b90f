//! Message catalogs as a typed tree.
//!
//! Catalog files may use flat dotted keys (`"cart.title": "..."`), nested
//! objects (`"cart": { "title": "..." }`) or a mix of both. Loading splits
//! every key on `.` and stores it as a nested path, so a catalog has exactly
//! one representation and a dotted key resolves the same way however the
//! file spelled it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::I18nError;

/// A catalog entry: either display text or a group of nested entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageNode {
    Text(String),
    Group(BTreeMap<String, MessageNode>),
}

/// Result of walking a dotted key through a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The path ends on a message.
    Text(&'a str),
    /// The path ends on a group, not a message.
    Group,
    Missing,
}

/// How to treat malformed entries while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Fail on the first conflicting or non-string entry.
    Strict,
    /// Log and skip bad entries.
    #[default]
    Lenient,
}

/// Messages for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    root: BTreeMap<String, MessageNode>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message under a dotted key.
    ///
    /// Fails if a prefix of the key is already a message, or if the key
    /// itself is already a group or a different message.
    pub fn insert(&mut self, key: &str, text: impl Into<String>) -> Result<(), I18nError> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(I18nError::InvalidKey(key.to_string()));
        }
        let Some((last, parents)) = segments.split_last() else {
            return Err(I18nError::InvalidKey(key.to_string()));
        };

        let mut map = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let node = map
                .entry(segment.to_string())
                .or_insert_with(|| MessageNode::Group(BTreeMap::new()));
            map = match node {
                MessageNode::Group(children) => children,
                MessageNode::Text(_) => {
                    return Err(I18nError::KeyConflict {
                        key: key.to_string(),
                        reason: format!("'{}' is already a message", parents[..=depth].join(".")),
                    })
                }
            };
        }

        let text = text.into();
        match map.get(*last) {
            Some(MessageNode::Group(_)) => Err(I18nError::KeyConflict {
                key: key.to_string(),
                reason: "key is already a group".to_string(),
            }),
            Some(MessageNode::Text(existing)) if *existing != text => Err(I18nError::KeyConflict {
                key: key.to_string(),
                reason: "key is defined twice with different text".to_string(),
            }),
            Some(MessageNode::Text(_)) => Ok(()),
            None => {
                map.insert(last.to_string(), MessageNode::Text(text));
                Ok(())
            }
        }
    }

    /// Walk a dotted key.
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        let mut segments = key.split('.');
        let Some(first) = segments.next() else {
            return Lookup::Missing;
        };
        let mut node = match self.root.get(first) {
            Some(node) => node,
            None => return Lookup::Missing,
        };
        for segment in segments {
            node = match node {
                MessageNode::Group(children) => match children.get(segment) {
                    Some(child) => child,
                    None => return Lookup::Missing,
                },
                MessageNode::Text(_) => return Lookup::Missing,
            };
        }
        match node {
            MessageNode::Text(text) => Lookup::Text(text),
            MessageNode::Group(_) => Lookup::Group,
        }
    }

    /// Get the message at a dotted key, if the key names a message.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.lookup(key) {
            Lookup::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        fn count(map: &BTreeMap<String, MessageNode>) -> usize {
            map.values()
                .map(|node| match node {
                    MessageNode::Text(_) => 1,
                    MessageNode::Group(children) => count(children),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every message key in dotted form, sorted.
    pub fn keys(&self) -> Vec<String> {
        fn collect(map: &BTreeMap<String, MessageNode>, prefix: &str, out: &mut Vec<String>) {
            for (name, node) in map {
                let path = join_key(prefix, name);
                match node {
                    MessageNode::Text(_) => out.push(path),
                    MessageNode::Group(children) => collect(children, &path, out),
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, "", &mut out);
        out
    }

    /// Build a catalog from a parsed JSON object.
    pub fn from_value(value: &Value, mode: LoadMode) -> Result<Self, I18nError> {
        let Value::Object(entries) = value else {
            return Err(I18nError::InvalidCatalog {
                path: "<inline>".to_string(),
                reason: "catalog root must be an object".to_string(),
            });
        };

        let mut catalog = Self::new();
        catalog.merge_object(entries, "", mode)?;
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str, mode: LoadMode) -> Result<Self, I18nError> {
        let value: Value = serde_json::from_str(json).map_err(|e| I18nError::InvalidCatalog {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_value(&value, mode)
    }

    /// Load a catalog file.
    pub fn load_file(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self, I18nError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| I18nError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content, mode).map_err(|e| match e {
            I18nError::InvalidCatalog { reason, .. } => I18nError::InvalidCatalog {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    fn merge_object(
        &mut self,
        entries: &serde_json::Map<String, Value>,
        prefix: &str,
        mode: LoadMode,
    ) -> Result<(), I18nError> {
        for (name, value) in entries {
            let key = join_key(prefix, name);
            let result = match value {
                Value::String(text) => self.insert(&key, text.as_str()),
                Value::Object(children) => self.merge_object(children, &key, mode),
                other => Err(I18nError::InvalidCatalog {
                    path: "<inline>".to_string(),
                    reason: format!("'{}' must be a string or an object, got {}", key, other),
                }),
            };

            if let Err(e) = result {
                match mode {
                    LoadMode::Strict => return Err(e),
                    LoadMode::Lenient => warn!(key = %key, error = %e, "skipping message entry"),
                }
            }
        }
        Ok(())
    }
}

fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
