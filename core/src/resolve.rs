//! Follows `{path}` references through the flattened token set.

use indexmap::IndexSet;
use itertools::Itertools;

use crate::{expression::reference_path, FlatTokens, TokenError, TokenResult, TokenValue};

/// Resolves `value` to a literal.
///
/// Non-references come back unchanged. A reference to a path that is not in
/// `tokens` comes back as the unresolved `{...}` text of the last hop, which
/// is not an error. A chain that revisits a path fails with
/// [`TokenError::CyclicReference`].
pub fn resolve<'a>(value: &'a TokenValue, tokens: &'a FlatTokens) -> TokenResult<&'a TokenValue> {
    let mut visited = IndexSet::new();
    let mut current = value;
    while let Some(path) = reference_path(current) {
        let Some(record) = tokens.get(path) else {
            tracing::debug!(reference = path, "unresolved reference");
            return Ok(current);
        };
        if !visited.insert(path) {
            let chain = visited.iter().chain(std::iter::once(&path)).join(" -> ");
            return Err(TokenError::CyclicReference { chain });
        }
        current = &record.value;
    }
    Ok(current)
}

/// True when `value` is a reference whose chain never reaches a literal.
pub fn is_unresolved(value: &TokenValue) -> bool {
    reference_path(value).is_some()
}
