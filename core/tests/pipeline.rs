use std::fs;

use figma_tokens_core::{DesignTokens, DimensionPolicy, TokenError};
use serde_json::json;
use tempfile::TempDir;

fn token_dir(files: &[(&str, serde_json::Value)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(body).unwrap()).unwrap();
    }
    dir
}

#[test]
fn brand_alias_flows_into_both_documents() {
    let dir = token_dir(&[
        (
            "primitives/color.json",
            json!({ "color": { "brand": { "500": { "value": "#3366ff", "type": "color" } } } }),
        ),
        (
            "semantic/surface.json",
            json!({ "semantic": { "surface": { "accent": { "value": "{color.brand.500}", "type": "color" } } } }),
        ),
    ]);

    let tokens = DesignTokens::load(dir.path()).unwrap();
    let payload = serde_json::to_value(tokens.to_variables_payload(DimensionPolicy::Lenient).unwrap()).unwrap();
    let interchange = serde_json::to_value(tokens.to_interchange().unwrap()).unwrap();

    let accent = payload["variables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["name"] == json!("surface/accent"))
        .expect("accent variable");
    assert_eq!(accent["variableCollectionId"], json!("collection-semantic"));

    let accent_values: Vec<_> = payload["variableModeValues"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["variableId"] == accent["id"])
        .collect();
    assert_eq!(accent_values.len(), 2);
    for value in accent_values {
        assert_eq!(
            value["value"],
            json!({ "type": "VARIABLE_ALIAS", "id": "var-color.brand.500" })
        );
    }
    assert!(payload["variables"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["id"] == json!("var-color.brand.500")));

    assert_eq!(
        interchange["primitives"]["color"]["brand"]["500"]["value"],
        json!("#3366ff")
    );
    assert_eq!(
        interchange["semantic"]["surface"]["accent"]["value"],
        json!("{color.brand.500}")
    );
}

#[test]
fn every_record_is_a_create() {
    let dir = token_dir(&[(
        "tokens.json",
        json!({
            "color": { "red": { "value": "#f00", "type": "color" } },
            "text": { "primary": { "value": "{color.red}", "type": "color" } },
            "input": { "height": { "value": "40px", "type": "dimension" } }
        }),
    )]);
    let tokens = DesignTokens::load(dir.path()).unwrap();
    let payload = serde_json::to_value(tokens.to_variables_payload(DimensionPolicy::Strict).unwrap()).unwrap();

    for section in ["variableCollections", "variableModes", "variables"] {
        for record in payload[section].as_array().unwrap() {
            assert_eq!(record["action"], json!("CREATE"), "{section}: {record}");
        }
    }
    assert_eq!(payload["variables"].as_array().unwrap().len(), 3);
    // one value per single-mode variable, two for the semantic one
    assert_eq!(payload["variableModeValues"].as_array().unwrap().len(), 4);
}

#[test]
fn cyclic_references_fail_the_export() {
    let dir = token_dir(&[(
        "loop.json",
        json!({
            "a": { "value": "{b}", "type": "color" },
            "b": { "value": "{a}", "type": "color" },
            "c": { "value": "{a}", "type": "color" }
        }),
    )]);
    let tokens = DesignTokens::load(dir.path()).unwrap();
    assert!(matches!(
        tokens.to_variables_payload(DimensionPolicy::Lenient),
        Err(TokenError::CyclicReference { chain }) if chain == "b -> a -> b"
    ));
    let err = tokens.resolve(&tokens.get("c").unwrap().value).unwrap_err();
    assert!(matches!(err, TokenError::CyclicReference { .. }));
}

#[test]
fn later_file_overrides_earlier_leaf() {
    let dir = token_dir(&[
        ("10-base.json", json!({ "space": { "sm": { "value": "4px", "type": "dimension" } } })),
        ("20-brand.json", json!({ "space": { "sm": { "value": "6px", "type": "dimension" } } })),
    ]);
    let tokens = DesignTokens::load(dir.path()).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(
        serde_json::to_value(&tokens.get("space.sm").unwrap().value).unwrap(),
        json!("6px")
    );
}

#[test]
fn malformed_file_aborts_loading() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
    assert!(matches!(
        DesignTokens::load(dir.path()),
        Err(TokenError::Parse { .. })
    ));
}
