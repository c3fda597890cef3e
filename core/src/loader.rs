//! Reads a directory of token files and deep-merges them into one tree.
//!
//! Files are visited depth-first with entries sorted by name, so when two
//! files define the same leaf the one visited last wins. The order depends
//! only on the names in the tree, never on the filesystem.

use std::{fs, path::Path};

use serde_json::{Map, Value};
use walkdir::{DirEntry, WalkDir};

use crate::{TokenError, TokenResult};

pub fn read_token_tree(root: &Path) -> TokenResult<Map<String, Value>> {
    if !root.is_dir() {
        return Err(TokenError::MissingRoot(root.to_path_buf()));
    }

    let mut tree = Map::new();
    let mut files = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !is_token_file(&entry) {
            continue;
        }
        tracing::debug!(path = %entry.path().display(), "reading token file");
        let document = read_document(entry.path())?;
        deep_merge(&mut tree, document);
        files += 1;
    }
    tracing::info!(files, root = %root.display(), "loaded token files");
    Ok(tree)
}

fn is_token_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

fn read_document(path: &Path) -> TokenResult<Map<String, Value>> {
    let text = fs::read_to_string(path).map_err(|source| TokenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match serde_json::from_str(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TokenError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Merges `incoming` into `existing`. Two objects under the same key merge
/// recursively; in every other case the incoming value replaces the old one.
/// Existing keys keep their position and new keys are appended.
pub fn deep_merge(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        let Value::Object(next) = value else {
            existing.insert(key, value);
            continue;
        };
        if let Some(Value::Object(current)) = existing.get_mut(&key) {
            deep_merge(current, next);
            continue;
        }
        existing.insert(key, Value::Object(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn write(dir: &TempDir, rel: &str, body: &str) -> PathBuf {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn merges_objects_recursively() {
        let mut tree = object(json!({ "color": { "a": { "value": "#000" } } }));
        deep_merge(
            &mut tree,
            object(json!({ "color": { "b": { "value": "#fff" } } })),
        );
        assert_eq!(
            Value::Object(tree),
            json!({ "color": { "a": { "value": "#000" }, "b": { "value": "#fff" } } })
        );
    }

    #[test]
    fn incoming_replaces_non_objects_and_arrays() {
        let mut tree = object(json!({ "a": [1, 2], "b": { "x": 1 }, "c": 1 }));
        deep_merge(&mut tree, object(json!({ "a": [3], "b": 5, "c": { "y": 2 } })));
        assert_eq!(Value::Object(tree), json!({ "a": [3], "b": 5, "c": { "y": 2 } }));
    }

    #[test]
    fn later_files_win_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.json", r##"{ "color": { "x": { "value": "#bbbbbb", "type": "color" } } }"##);
        write(&dir, "a.json", r##"{ "color": { "x": { "value": "#aaaaaa", "type": "color" } } }"##);
        write(&dir, "a/z.json", r##"{ "color": { "y": { "value": "#111111", "type": "color" } } }"##);
        write(&dir, "notes.txt", "ignored");

        let tree = Value::Object(read_token_tree(dir.path()).unwrap());
        assert_eq!(tree["color"]["x"]["value"], json!("#bbbbbb"));
        assert_eq!(tree["color"]["y"]["value"], json!("#111111"));
    }

    #[test]
    fn directories_are_visited_in_place() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{ "k": { "value": "a.json" } }"#);
        write(&dir, "b/inner.json", r#"{ "k": { "value": "b/inner.json" } }"#);
        write(&dir, "c.JSON", r#"{ "k": { "value": "c.JSON" } }"#);

        let tree = Value::Object(read_token_tree(dir.path()).unwrap());
        assert_eq!(tree["k"]["value"], json!("c.JSON"));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", "{ \"color\": ");
        match read_token_tree(dir.path()) {
            Err(TokenError::Parse { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn top_level_must_be_an_object() {
        let dir = TempDir::new().unwrap();
        write(&dir, "list.json", "[1, 2]");
        assert!(matches!(
            read_token_tree(dir.path()),
            Err(TokenError::NotAnObject { .. })
        ));
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            read_token_tree(&missing),
            Err(TokenError::MissingRoot(path)) if path == missing
        ));
    }
}
