//! Projection of the token set onto the variables API payload: one
//! collection per bucket, its modes, one variable per token and one value per
//! variable and mode.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    color::{color_components, ColorComponents, UNRESOLVED_COLOR},
    expression::{parse_dimension, reference_path},
    resolve::{is_unresolved, resolve},
    Bucket, FlatTokens, TokenError, TokenResult, TokenType, TokenValue,
};

/// What to do with a FLOAT value that has no numeric prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionPolicy {
    /// Export `0` and log a warning.
    #[default]
    Lenient,
    /// Fail the export.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResolvedType {
    Color,
    Float,
    String,
}
impl From<&TokenType> for ResolvedType {
    fn from(type_: &TokenType) -> Self {
        match type_ {
            TokenType::Color => ResolvedType::Color,
            TokenType::Dimension
            | TokenType::FontWeight
            | TokenType::Duration
            | TokenType::Number => ResolvedType::Float,
            TokenType::FontFamily | TokenType::Other(_) => ResolvedType::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesPayload {
    pub variable_collections: Vec<VariableCollection>,
    pub variable_modes: Vec<VariableMode>,
    pub variables: Vec<Variable>,
    pub variable_mode_values: Vec<VariableModeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub action: Action,
    pub id: String,
    pub name: String,
    pub initial_mode_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMode {
    pub action: Action,
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub action: Action,
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: ResolvedType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableModeValue {
    pub variable_id: String,
    pub mode_id: String,
    pub value: ModeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModeValue {
    Color(ColorComponents),
    Float(f64),
    String(String),
    Alias(VariableAlias),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub type_: AliasType,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AliasType {
    VariableAlias,
}

/// Temporary id the API maps to a real one. Paths are unique, so this is too.
pub fn variable_id(path: &str) -> String {
    format!("var-{path}")
}

pub fn collection_id(bucket: Bucket) -> String {
    format!("collection-{}", bucket.set_name())
}

pub fn mode_id(bucket: Bucket, mode: &str) -> String {
    format!("mode-{}-{}", bucket.set_name(), mode)
}

/// Variable name inside its collection: bucket-relative path, `/`-separated.
pub fn variable_name(path: &str) -> String {
    Bucket::of(path).relative_path(path).split('.').join("/")
}

pub(crate) fn build_payload(
    tokens: &FlatTokens,
    policy: DimensionPolicy,
) -> TokenResult<VariablesPayload> {
    let mut payload = VariablesPayload {
        variable_collections: Vec::new(),
        variable_modes: Vec::new(),
        variables: Vec::new(),
        variable_mode_values: Vec::new(),
    };

    for bucket in Bucket::ALL {
        let modes = bucket.modes();
        payload.variable_collections.push(VariableCollection {
            action: Action::Create,
            id: collection_id(bucket),
            name: bucket.collection_name(),
            initial_mode_id: mode_id(bucket, modes[0]),
        });
        for mode in modes {
            payload.variable_modes.push(VariableMode {
                action: Action::Create,
                id: mode_id(bucket, mode),
                name: mode.to_case(Case::Title),
                variable_collection_id: collection_id(bucket),
            });
        }
    }

    let mut seen_names: HashMap<(Bucket, String), &str> = HashMap::new();
    for (path, record) in tokens {
        let bucket = Bucket::of(path);
        let id = variable_id(path);
        let name = variable_name(path);
        if let Some(first) = seen_names.insert((bucket, name.clone()), path) {
            return Err(TokenError::DuplicatePath {
                set: bucket.set_name(),
                path: bucket.relative_path(path).to_string(),
                first: first.to_string(),
                second: path.clone(),
            });
        }

        payload.variables.push(Variable {
            action: Action::Create,
            id: id.clone(),
            name,
            variable_collection_id: collection_id(bucket),
            resolved_type: ResolvedType::from(&record.type_),
            description: record.description.clone(),
        });

        let dark = build_mode_value(path, &record.value, &record.type_, tokens, policy)?;
        payload.variable_mode_values.push(VariableModeValue {
            variable_id: id.clone(),
            mode_id: mode_id(bucket, bucket.modes()[0]),
            value: dark,
        });

        if bucket == Bucket::Semantic {
            let light_source = record.light_value().unwrap_or(&record.value);
            let light = build_mode_value(path, light_source, &record.type_, tokens, policy)?;
            payload.variable_mode_values.push(VariableModeValue {
                variable_id: id,
                mode_id: mode_id(bucket, "light"),
                value: light,
            });
        }
    }

    tracing::info!(
        variables = payload.variables.len(),
        values = payload.variable_mode_values.len(),
        "built variables payload"
    );
    Ok(payload)
}

/// Value of one variable in one mode.
///
/// A reference to an existing token becomes an alias so the target keeps its
/// own link; the chain behind it must still end somewhere, or the alias graph
/// would loop. Anything else is resolved to a literal and shaped by the
/// declared type.
pub fn build_mode_value(
    path: &str,
    mode_value: &TokenValue,
    type_: &TokenType,
    tokens: &FlatTokens,
    policy: DimensionPolicy,
) -> TokenResult<ModeValue> {
    if let Some(target) = reference_path(mode_value) {
        if tokens.contains_key(target) {
            resolve(mode_value, tokens)?;
            return Ok(ModeValue::Alias(VariableAlias {
                type_: AliasType::VariableAlias,
                id: variable_id(target),
            }));
        }
    }

    let literal = resolve(mode_value, tokens)?;
    let unresolved = is_unresolved(literal);
    Ok(match ResolvedType::from(type_) {
        ResolvedType::Color => match literal {
            TokenValue::Text(text) if !unresolved => match color_components(text) {
                Ok(color) => ModeValue::Color(color),
                Err(err) => {
                    tracing::warn!(path, %err, "using unresolved color marker");
                    ModeValue::Color(UNRESOLVED_COLOR)
                }
            },
            other => {
                tracing::warn!(path, value = %other.to_literal_string(), "using unresolved color marker");
                ModeValue::Color(UNRESOLVED_COLOR)
            }
        },
        ResolvedType::Float => ModeValue::Float(float_value(path, literal, unresolved, policy)?),
        ResolvedType::String => ModeValue::String(literal.to_literal_string()),
    })
}

fn float_value(
    path: &str,
    literal: &TokenValue,
    unresolved: bool,
    policy: DimensionPolicy,
) -> TokenResult<f64> {
    let text = match literal {
        TokenValue::Number(number) => {
            if let Some(value) = number.as_f64() {
                return Ok(value);
            }
            number.to_string()
        }
        other => other.to_literal_string(),
    };
    if let Some(value) = parse_dimension(&text) {
        return Ok(value);
    }
    if policy == DimensionPolicy::Strict && !unresolved {
        return Err(TokenError::InvalidDimension {
            path: path.to_string(),
            value: text,
        });
    }
    tracing::warn!(path, value = %text, "non-numeric dimension exported as 0");
    Ok(0.0)
}
