use anyhow::Result;
use mfe_deploy::core::manifest::rewrite_locator;
use mfe_deploy::domain::model::ManifestOutcome;
use mfe_deploy::{DeployConfig, DeployError, ManifestRewriter, UnitDefinition};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const PUBLIC_BASE: &str = "https://example.org/app/";
const ENTRY_FILE: &str = "remoteEntry.mjs";

fn two_unit_rewriter() -> ManifestRewriter {
    let ports = BTreeMap::from([(4201, "products".to_string()), (4202, "cart".to_string())]);
    ManifestRewriter::new(ports, PUBLIC_BASE, ENTRY_FILE)
}

fn read_json(path: &std::path::Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn test_end_to_end_manifest_rewrite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("mf-manifest.json");
    fs::write(
        &path,
        r#"{"remotes":[{"federationContainerName":"http://localhost:4201/remoteEntry.mjs"},{"federationContainerName":"http://localhost:4202/remoteEntry.mjs"},{"federationContainerName":"https://other.example/x.mjs"}]}"#,
    )?;

    let outcome = two_unit_rewriter().fix_file(&path)?;

    assert_eq!(
        read_json(&path)?,
        json!({"remotes":[
            {"federationContainerName":"https://example.org/app/products/remoteEntry.mjs"},
            {"federationContainerName":"https://example.org/app/cart/remoteEntry.mjs"},
            {"federationContainerName":"https://other.example/x.mjs"}
        ]})
    );
    match outcome {
        ManifestOutcome::Patched { rewrites } => assert_eq!(rewrites.len(), 2),
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_output_is_pretty_printed_with_unknown_fields_kept() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("mf-manifest.json");
    fs::write(
        &path,
        r#"{"id":"mfeui","remotes":[{"federationContainerName":"http://localhost:4202/remoteEntry.mjs","moduleName":"Routes","alias":"cart"}],"shared":[{"name":"@angular/core","singleton":true}]}"#,
    )?;

    two_unit_rewriter().fix_file(&path)?;

    let written = fs::read_to_string(&path)?;
    assert!(written.starts_with("{\n  \"id\": \"mfeui\",\n  \"remotes\": ["));
    assert_eq!(
        serde_json::from_str::<Value>(&written)?,
        json!({
            "id": "mfeui",
            "remotes": [{
                "federationContainerName": "https://example.org/app/cart/remoteEntry.mjs",
                "moduleName": "Routes",
                "alias": "cart"
            }],
            "shared": [{"name": "@angular/core", "singleton": true}]
        })
    );
    Ok(())
}

#[test]
fn test_every_configured_port_maps_to_its_unit() {
    let config = DeployConfig {
        site_origin: "https://example.org".to_string(),
        repo_name: "app".to_string(),
        ..DeployConfig::default()
    };
    let ports = config.port_map();

    for unit in &config.units {
        let locator = format!("http://localhost:{}/remoteEntry.mjs", unit.dev_port);
        let (name, url) = rewrite_locator(&locator, &ports, &config.public_base_url(), ENTRY_FILE)
            .expect("mapped port must be rewritten");
        assert_eq!(name, unit.name);
        assert_eq!(url, format!("{}{}/{}", PUBLIC_BASE, unit.name, ENTRY_FILE));
        assert!(!url.contains("localhost"));
    }
}

#[test]
fn test_unmatched_locators_are_byte_identical() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("mf-manifest.json");
    let locators = [
        "https://other.example/x.mjs",
        "http://localhost:9999/remoteEntry.mjs",
        "HTTP://LOCALHOST:4201/remoteEntry.mjs",
        "  spaced  ",
    ];
    let manifest = json!({
        "remotes": locators
            .iter()
            .map(|l| json!({"federationContainerName": l}))
            .collect::<Vec<_>>()
    });
    fs::write(&path, manifest.to_string())?;

    two_unit_rewriter().fix_file(&path)?;

    assert_eq!(read_json(&path)?, manifest);
    Ok(())
}

#[test]
fn test_missing_manifest_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dist/apps/mfeui/mf-manifest.json");

    let outcome = two_unit_rewriter().fix_file(&path).unwrap();

    assert_eq!(outcome, ManifestOutcome::Missing);
    assert!(!path.exists());
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_invalid_json_is_fatal_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mf-manifest.json");
    fs::write(&path, "{\"remotes\": [").unwrap();

    let err = two_unit_rewriter().fix_file(&path).unwrap_err();

    assert!(matches!(err, DeployError::ManifestFormat { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"remotes\": [");
}

#[test]
fn test_rewriter_built_from_custom_units() -> Result<()> {
    let config = DeployConfig {
        site_origin: "https://example.org".to_string(),
        repo_name: "app".to_string(),
        units: vec![UnitDefinition::new("billing", 5001)],
        ..DeployConfig::default()
    };
    let dir = TempDir::new()?;
    let path = dir.path().join("mf-manifest.json");
    fs::write(
        &path,
        r#"{"remotes":[{"federationContainerName":"http://localhost:5001/remoteEntry.mjs"}]}"#,
    )?;

    ManifestRewriter::from_config(&config).fix_file(&path)?;

    assert_eq!(
        read_json(&path)?["remotes"][0]["federationContainerName"],
        "https://example.org/app/billing/remoteEntry.mjs"
    );
    Ok(())
}

#[test]
fn test_port_sharing_a_prefix_with_a_mapped_port_is_kept() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("mf-manifest.json");
    let manifest = json!({"remotes": [
        {"federationContainerName": "http://localhost:42010/remoteEntry.mjs"},
        {"federationContainerName": "http://localhost:4202/remoteEntry.mjs"}
    ]});
    fs::write(&path, manifest.to_string())?;

    two_unit_rewriter().fix_file(&path)?;

    let written = read_json(&path)?;
    assert_eq!(
        written["remotes"][0]["federationContainerName"],
        "http://localhost:42010/remoteEntry.mjs"
    );
    assert_eq!(
        written["remotes"][1]["federationContainerName"],
        "https://example.org/app/cart/remoteEntry.mjs"
    );
    Ok(())
}
