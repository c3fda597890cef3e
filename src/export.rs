use std::{fs, path::Path, path::PathBuf};

use figma_tokens_core::{Bucket, DesignTokens, TokenError, VariablesPayload};
use serde::Serialize;
use thiserror::Error;

use crate::config::{ExportConfig, PushConfig};
use crate::push::{PayloadPusher, PushError, PushResponse};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Tokens(#[from] TokenError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("push is enabled but {0} is not set")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Push(#[from] PushError),
}

/// What a run produced on disk.
#[derive(Debug)]
pub struct ExportOutcome {
    pub variables_path: PathBuf,
    pub interchange_path: PathBuf,
    pub payload: VariablesPayload,
    pub tokens: usize,
}

/// Loads the token tree and writes both documents. Nothing is written when
/// loading or building fails.
pub fn write_outputs(config: &ExportConfig) -> Result<ExportOutcome, ExportError> {
    let tokens = DesignTokens::load(&config.input.dir)?;
    for bucket in Bucket::ALL {
        let count = tokens.tokens().keys().filter(|path| Bucket::of(path) == bucket).count();
        tracing::info!(bucket = bucket.set_name(), count, "categorized tokens");
    }

    let payload = tokens.to_variables_payload(config.resolve.dimension_policy)?;
    let interchange = tokens.to_interchange()?;

    let variables_path = config.output.variables_path();
    let interchange_path = config.output.interchange_path();
    fs::create_dir_all(&config.output.dir).map_err(|source| ExportError::Write {
        path: config.output.dir.clone(),
        source,
    })?;
    write_json(&variables_path, "variables payload", &payload)?;
    write_json(&interchange_path, "interchange document", &interchange)?;

    Ok(ExportOutcome {
        variables_path,
        interchange_path,
        payload,
        tokens: tokens.len(),
    })
}

fn write_json<T: Serialize>(path: &Path, what: &'static str, value: &T) -> Result<(), ExportError> {
    let mut text =
        serde_json::to_string_pretty(value).map_err(|source| ExportError::Serialize { what, source })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote {what}");
    Ok(())
}

/// Uploads an already written payload. Returns `Ok(None)` when pushing is
/// disabled, after logging how to turn it on.
pub async fn push_outputs<P: PayloadPusher + Sync>(
    pusher: &P,
    config: &PushConfig,
    payload: &VariablesPayload,
) -> Result<Option<PushResponse>, ExportError> {
    if !config.enabled {
        tracing::info!(
            "push disabled; set FIGMA_PUSH=true with FIGMA_FILE_KEY and FIGMA_ACCESS_TOKEN to upload"
        );
        return Ok(None);
    }
    let file_key = config
        .file_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(ExportError::MissingCredential("FIGMA_FILE_KEY"))?;
    let token = config
        .access_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or(ExportError::MissingCredential("FIGMA_ACCESS_TOKEN"))?;

    let url = config.endpoint(file_key);
    match pusher.push_payload(&url, token, payload).await {
        Ok(response) => {
            tracing::info!(
                file_key,
                mapped_ids = response.meta.temp_id_to_real_id.len(),
                "pushed variables"
            );
            Ok(Some(response))
        }
        Err(err) => {
            tracing::error!(%err, file_key, "push failed");
            Err(err.into())
        }
    }
}
