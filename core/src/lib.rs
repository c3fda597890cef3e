use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod bucket;
pub mod color;
mod error;
pub mod expression;
pub mod extensions;
pub mod figma;
pub mod loader;
pub mod resolve;
pub mod studio;

pub use bucket::Bucket;
pub use error::{TokenError, TokenResult};
pub use extensions::Extensions;
pub use figma::{DimensionPolicy, VariablesPayload};
pub use studio::InterchangeDocument;

/// Flattened token set keyed by dotted path, in traversal order.
pub type FlatTokens = IndexMap<String, TokenRecord>;

/// The full token set of one run: loaded, merged and flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignTokens {
    tokens: FlatTokens,
}
impl DesignTokens {
    /// Reads every JSON file below `dir` and flattens the merged tree.
    pub fn load(dir: impl AsRef<Path>) -> TokenResult<Self> {
        let tree = loader::read_token_tree(dir.as_ref())?;
        Self::from_tree(serde_json::Value::Object(tree))
    }
    pub fn from_tree(tree: serde_json::Value) -> TokenResult<Self> {
        let root: TokenOrGroup = serde_json::from_value(tree).map_err(TokenError::InvalidTree)?;
        Ok(Self {
            tokens: root.flatten(),
        })
    }
    pub fn tokens(&self) -> &FlatTokens {
        &self.tokens
    }
    pub fn get(&self, path: &str) -> Option<&TokenRecord> {
        self.tokens.get(path)
    }
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn resolve<'a>(&'a self, value: &'a TokenValue) -> TokenResult<&'a TokenValue> {
        resolve::resolve(value, &self.tokens)
    }
    pub fn to_variables_payload(&self, policy: DimensionPolicy) -> TokenResult<VariablesPayload> {
        figma::build_payload(&self.tokens, policy)
    }
    pub fn to_interchange(&self) -> TokenResult<InterchangeDocument> {
        studio::build_interchange(&self.tokens)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Duration,
    Number,
    Other(String),
}
impl TokenType {
    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Duration => "duration",
            TokenType::Number => "number",
            TokenType::Other(name) => name,
        }
    }
}
impl Default for TokenType {
    fn default() -> Self {
        TokenType::Other("other".to_string())
    }
}
impl From<String> for TokenType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "color" => TokenType::Color,
            "dimension" => TokenType::Dimension,
            "fontFamily" => TokenType::FontFamily,
            "fontWeight" => TokenType::FontWeight,
            "duration" => TokenType::Duration,
            "number" => TokenType::Number,
            _ => TokenType::Other(name),
        }
    }
}
impl From<TokenType> for String {
    fn from(type_: TokenType) -> Self {
        type_.as_str().to_string()
    }
}
impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Text(String),
    Number(serde_json::Number),
    Composite(serde_json::Value),
}
impl TokenValue {
    /// String form used wherever a literal has to become text.
    pub fn to_literal_string(&self) -> String {
        match self {
            TokenValue::Text(text) => text.clone(),
            TokenValue::Number(number) => number.to_string(),
            TokenValue::Composite(value) => value.to_string(),
        }
    }
}
impl From<&str> for TokenValue {
    fn from(text: &str) -> Self {
        TokenValue::Text(text.to_string())
    }
}

/// A leaf as written in a token file. The type is optional here because a
/// group may supply it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenDefinition {
    #[serde(alias = "$value")]
    pub value: TokenValue,
    #[serde(rename = "type", alias = "$type", default)]
    pub type_: Option<TokenType>,
    #[serde(alias = "$description", default)]
    pub description: Option<String>,
    #[serde(rename = "$extensions", alias = "extensions", default)]
    pub extensions: Option<Extensions>,
}

/// A flattened leaf with its type settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub type_: TokenType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "$extensions", skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}
impl TokenRecord {
    pub fn light_value(&self) -> Option<&TokenValue> {
        self.extensions.as_ref().and_then(Extensions::light)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenOrGroup {
    Token(TokenDefinition),
    Group(IndexMap<String, TokenOrGroup>),
    Opaque(serde_json::Value),
}
impl TokenOrGroup {
    pub fn flatten(&self) -> FlatTokens {
        let mut out = FlatTokens::new();
        self.flatten_into("", None, &mut out);
        out
    }
    fn flatten_into(&self, path: &str, inherited: Option<&TokenType>, out: &mut FlatTokens) {
        match self {
            TokenOrGroup::Token(def) => {
                if path.is_empty() {
                    tracing::warn!("token tree root has a value field; ignoring it");
                    return;
                }
                let type_ = def.type_.as_ref().or(inherited).cloned().unwrap_or_default();
                out.insert(
                    path.to_string(),
                    TokenRecord {
                        value: def.value.clone(),
                        type_,
                        description: def.description.clone(),
                        extensions: def.extensions.clone(),
                    },
                );
            }
            TokenOrGroup::Group(group) => {
                if group.contains_key("value") || group.contains_key("$value") {
                    tracing::warn!(path, "skipping malformed token definition");
                    return;
                }
                let group_type = group_type(group);
                let inherited = group_type.as_ref().or(inherited);
                for (key, child) in group {
                    if key.starts_with('$') || (key == "type" && matches!(child, TokenOrGroup::Opaque(_))) {
                        continue;
                    }
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    child.flatten_into(&child_path, inherited, out);
                }
            }
            TokenOrGroup::Opaque(_) => {}
        }
    }
}

fn group_type(group: &IndexMap<String, TokenOrGroup>) -> Option<TokenType> {
    ["$type", "type"].iter().find_map(|key| match group.get(*key) {
        Some(TokenOrGroup::Opaque(serde_json::Value::String(name))) => {
            Some(TokenType::from(name.clone()))
        }
        _ => None,
    })
}
