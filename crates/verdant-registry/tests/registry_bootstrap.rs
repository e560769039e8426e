use serde_json::json;
use std::fs;
use std::path::Path;
use verdant_registry::{BootstrapError, LoadError, Registry, RegistryLoader};

fn definition_json(short: &str, relations: serde_json::Value) -> serde_json::Value {
    json!({
        "entity_type": {
            "urn": format!("urn:verdant:type:{short}"),
            "name": short,
            "domain": "access",
            "class": "core",
            "description": "",
            "schema": {
                "attributes": [
                    {"name": "title", "kind": "string", "required": true}
                ],
                "relationships": relations
            }
        }
    })
}

fn write_definition(dir: &Path, file: &str, value: &serde_json::Value) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, serde_json::to_string_pretty(value).expect("render")).expect("write file");
}

#[test]
fn bootstrap_builds_registry_from_ordered_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_definition(
        dir.path(),
        "01_role.entity.json",
        &definition_json("role", json!([])),
    );
    write_definition(
        dir.path(),
        "00_user.entity.json",
        &definition_json(
            "user_account",
            json!([{
                "name": "roles",
                "target": "urn:verdant:type:role",
                "cardinality": "many_to_many",
                "required": false
            }]),
        ),
    );

    let registry = Registry::bootstrap(vec![dir.path().to_path_buf()]).expect("bootstrap");
    assert_eq!(registry.metadata().entity_count, 2);
    assert_eq!(registry.metadata().relation_count, 1);
    assert!(registry.contains("role"));
    assert!(registry.contains("urn:verdant:type:user_account"));
    assert_eq!(registry.metadata().checksum.len(), 16);
}

#[test]
fn loader_orders_by_numeric_prefix_across_nested_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_definition(
        dir.path(),
        "10_z/00_late.entity.json",
        &definition_json("zeta", json!([])),
    );
    write_definition(
        dir.path(),
        "00_a/05_mid.entity.json",
        &definition_json("midway", json!([])),
    );
    write_definition(
        dir.path(),
        "00_a/01_first.entity.json",
        &definition_json("alpha", json!([])),
    );

    let loaded = RegistryLoader::new(vec![dir.path().to_path_buf()])
        .load()
        .expect("load");
    let names: Vec<&str> = loaded
        .definitions
        .iter()
        .map(|d| d.short_name())
        .collect();
    assert_eq!(names, vec!["alpha", "midway", "zeta"]);
}

#[test]
fn loader_fingerprints_are_stable_across_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_definition(
        dir.path(),
        "00_role.entity.json",
        &definition_json("role", json!([])),
    );

    let loader = RegistryLoader::new(vec![dir.path().to_path_buf()]);
    let first = loader.load().expect("first load");
    let second = loader.load().expect("second load");
    assert_eq!(first.checksum, second.checksum);
    assert_eq!(first.files[0].fingerprint, second.files[0].fingerprint);
    assert_eq!(first.files[0].fingerprint.len(), 16);
}

#[test]
fn loader_rejects_missing_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let err = RegistryLoader::new(vec![missing.clone()])
        .load()
        .expect_err("must fail");
    match err {
        LoadError::MissingRoot(root) => assert_eq!(root, missing),
        other => panic!("expected MissingRoot, got {other:?}"),
    }
}

#[test]
fn loader_rejects_empty_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = RegistryLoader::new(vec![dir.path().to_path_buf()])
        .load()
        .expect_err("must fail");
    assert!(matches!(err, LoadError::Empty(_)));
}

#[test]
fn loader_names_file_with_invalid_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("00_bad.entity.json"), "{ not json").expect("write");

    let err = RegistryLoader::new(vec![dir.path().to_path_buf()])
        .load()
        .expect_err("must fail");
    match err {
        LoadError::Parse { file, .. } => {
            assert!(file.ends_with("00_bad.entity.json"), "file: {file:?}");
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn loader_rejects_foreign_urn_scheme_as_definition_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut def = definition_json("role", json!([]));
    def["entity_type"]["urn"] = json!("urn:other:type:role");
    write_definition(dir.path(), "00_role.entity.json", &def);

    let err = RegistryLoader::new(vec![dir.path().to_path_buf()])
        .load()
        .expect_err("must fail");
    assert!(matches!(err, LoadError::Definition { .. }));
}

#[test]
fn broken_relation_prevents_ready_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_definition(
        dir.path(),
        "00_user.entity.json",
        &definition_json(
            "user_account",
            json!([{
                "name": "roles",
                "target": "urn:verdant:type:ghost",
                "cardinality": "one_to_many",
                "required": false
            }]),
        ),
    );

    let err = Registry::bootstrap(vec![dir.path().to_path_buf()]).expect_err("must fail");
    match err {
        BootstrapError::Validation(report) => {
            assert!(!report.is_valid());
            assert!(
                report
                    .errors
                    .iter()
                    .any(|issue| issue.message.contains("broken relation")),
                "report: {report}"
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn duplicate_entity_prevents_ready_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_definition(
        dir.path(),
        "00_role.entity.json",
        &definition_json("role", json!([])),
    );
    write_definition(
        dir.path(),
        "01_role_again.entity.json",
        &definition_json("role", json!([])),
    );

    let err = Registry::bootstrap(vec![dir.path().to_path_buf()]).expect_err("must fail");
    match err {
        BootstrapError::Validation(report) => {
            assert!(
                report
                    .errors
                    .iter()
                    .any(|issue| issue.message.contains("duplicate entity")),
                "report: {report}"
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn later_root_keeps_configured_precedence() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    write_definition(
        first.path(),
        "50_role.entity.json",
        &definition_json("role", json!([])),
    );
    write_definition(
        second.path(),
        "00_permission.entity.json",
        &definition_json("permission", json!([])),
    );

    let loaded = RegistryLoader::new(vec![
        first.path().to_path_buf(),
        second.path().to_path_buf(),
    ])
    .load()
    .expect("load");
    let names: Vec<&str> = loaded
        .definitions
        .iter()
        .map(|d| d.short_name())
        .collect();
    assert_eq!(names, vec!["role", "permission"]);
}
