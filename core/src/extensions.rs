use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::TokenValue;

/// The `$extensions` block of a token. Only `modes` is interpreted; every
/// other vendor key is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<ModeOverrides>,
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<TokenValue>,
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

impl Extensions {
    pub fn light(&self) -> Option<&TokenValue> {
        self.modes.as_ref().and_then(|modes| modes.light.as_ref())
    }
}
