//! Nested interchange document for the token-management plugin format.
//!
//! That format has no mode axis, so a light-mode override is written as a
//! sibling token whose last segment carries a `-light` suffix.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    expression::reference_path, Bucket, FlatTokens, TokenError, TokenRecord, TokenResult,
    TokenType, TokenValue,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterchangeDocument {
    pub metadata: InterchangeMetadata,
    pub primitives: Map<String, Value>,
    pub semantic: Map<String, Value>,
    pub components: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterchangeMetadata {
    pub token_set_order: Vec<String>,
}

impl InterchangeDocument {
    fn new() -> Self {
        Self {
            metadata: InterchangeMetadata {
                token_set_order: Bucket::ALL.iter().map(|b| b.set_name().to_string()).collect(),
            },
            primitives: Map::new(),
            semantic: Map::new(),
            components: Map::new(),
        }
    }

    pub fn set(&self, bucket: Bucket) -> &Map<String, Value> {
        match bucket {
            Bucket::Primitive => &self.primitives,
            Bucket::Semantic => &self.semantic,
            Bucket::Component => &self.components,
        }
    }

    fn set_mut(&mut self, bucket: Bucket) -> &mut Map<String, Value> {
        match bucket {
            Bucket::Primitive => &mut self.primitives,
            Bucket::Semantic => &mut self.semantic,
            Bucket::Component => &mut self.components,
        }
    }
}

/// Type names as the plugin spells them.
pub fn interchange_type(type_: &TokenType) -> &str {
    match type_ {
        TokenType::Dimension => "sizing",
        TokenType::FontWeight => "fontWeights",
        other => other.as_str(),
    }
}

pub(crate) fn build_interchange(tokens: &FlatTokens) -> TokenResult<InterchangeDocument> {
    let mut doc = InterchangeDocument::new();
    let mut claimed: HashMap<(Bucket, String), String> = HashMap::new();
    let mut claim = |bucket: Bucket, position: &str, owner: String| {
        match claimed.insert((bucket, position.to_string()), owner.clone()) {
            Some(first) => Err(TokenError::DuplicatePath {
                set: bucket.set_name(),
                path: position.to_string(),
                first,
                second: owner,
            }),
            None => Ok(()),
        }
    };

    for (path, record) in tokens {
        let bucket = Bucket::of(path);
        let relative = bucket.relative_path(path);
        claim(bucket, relative, path.clone())?;
        let primary = leaf(&record.value, record, record.description.clone(), tokens);
        if !insert_leaf(doc.set_mut(bucket), relative, primary) {
            tracing::warn!(path = %path, "token overlaps a value/type/description field; left out of the interchange document");
        }

        if let Some(light) = record.light_value() {
            let sibling = format!("{relative}-light");
            claim(Bucket::Semantic, &sibling, format!("{path} (light mode)"))?;
            let description = match &record.description {
                Some(text) => format!("{text} (light mode)"),
                None => format!("Light mode variant of {relative}"),
            };
            let light = leaf(light, record, Some(description), tokens);
            if !insert_leaf(doc.set_mut(Bucket::Semantic), &sibling, light) {
                tracing::warn!(path = %sibling, "light variant overlaps a value/type/description field; left out of the interchange document");
            }
        }
    }
    Ok(doc)
}

fn leaf(
    value: &TokenValue,
    record: &TokenRecord,
    description: Option<String>,
    tokens: &FlatTokens,
) -> Map<String, Value> {
    let mut leaf = Map::new();
    leaf.insert("value".to_string(), interchange_value(value, tokens));
    leaf.insert("type".to_string(), json!(interchange_type(&record.type_)));
    if let Some(description) = description {
        leaf.insert("description".to_string(), json!(description));
    }
    leaf
}

/// References are rewritten to where their target lives in its set; unknown
/// targets are left as written.
fn interchange_value(value: &TokenValue, tokens: &FlatTokens) -> Value {
    match reference_path(value) {
        Some(target) if tokens.contains_key(target) => {
            json!(format!("{{{}}}", Bucket::of(target).relative_path(target)))
        }
        _ => json!(value),
    }
}

/// Places `leaf` at `path`, creating groups on the way. Refuses (returning
/// false, nothing changed) when the path runs through a scalar leaf field or
/// when the target node already holds one of the leaf's own fields.
fn insert_leaf(set: &mut Map<String, Value>, path: &str, leaf: Map<String, Value>) -> bool {
    let mut node = set;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(child) = entry.as_object_mut() else {
            return false;
        };
        if segments.peek().is_none() {
            if leaf.keys().any(|key| child.contains_key(key)) {
                return false;
            }
            child.extend(leaf);
            return true;
        }
        node = child;
    }
    false
}
