use super::{
    apply_args, apply_env, load_config, load_optional, validate_config, write_config, Backend,
    IntakeConfig, CONFIG_SCHEMA_VERSION, DEFAULT_CONFIG_FILE, ENV_ACCESS_TOKEN, ENV_EMULATOR_HOST,
    ENV_PROJECT_ID,
};
use crate::cli::RootArgs;
use crate::duplicate::DuplicatePolicy;
use clap::Parser;
use std::collections::BTreeMap;

fn env_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: BTreeMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn firestore_config() -> IntakeConfig {
    IntakeConfig {
        project_id: Some("attendance-demo".to_string()),
        ..IntakeConfig::default()
    }
}

#[test]
fn defaults_match_registration_conventions() {
    let config = IntakeConfig::default();
    assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
    assert_eq!(config.backend, Backend::Firestore);
    assert_eq!(config.collection, "employees");
    assert_eq!(config.database, "(default)");
    assert_eq!(config.country_code, "254");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.duplicate_check, DuplicatePolicy::FailOpen);
}

#[test]
fn partial_file_fills_remaining_fields_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("intake.json");
    std::fs::write(
        &path,
        r#"{"schema_version": 1, "project_id": "p1", "duplicate_check": "fail_closed"}"#,
    )
    .expect("write config");

    let config = load_config(&path).expect("load");
    assert_eq!(config.project_id.as_deref(), Some("p1"));
    assert_eq!(config.duplicate_check, DuplicatePolicy::FailClosed);
    assert_eq!(config.collection, "employees");
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("intake.json");
    std::fs::write(&path, r#"{"colection": "staff"}"#).expect("write config");

    let err = load_config(&path).expect_err("typo should fail");
    assert!(format!("{err:#}").contains("colection"), "got {err:#}");
}

#[test]
fn load_optional_prefers_explicit_then_implicit_then_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(
        load_optional(None, dir.path()).expect("default"),
        IntakeConfig::default()
    );

    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE),
        r#"{"collection": "staff"}"#,
    )
    .expect("write implicit");
    assert_eq!(
        load_optional(None, dir.path()).expect("implicit").collection,
        "staff"
    );

    let explicit = dir.path().join("other.json");
    std::fs::write(&explicit, r#"{"collection": "contractors"}"#).expect("write explicit");
    assert_eq!(
        load_optional(Some(explicit.as_path()), dir.path())
            .expect("explicit")
            .collection,
        "contractors"
    );

    let missing = dir.path().join("missing.json");
    assert!(load_optional(Some(missing.as_path()), dir.path()).is_err());
}

#[test]
fn environment_fills_only_unset_fields() {
    let mut config = IntakeConfig {
        project_id: Some("from-file".to_string()),
        ..IntakeConfig::default()
    };
    apply_env(
        &mut config,
        env_lookup(&[
            (ENV_PROJECT_ID, "from-env"),
            (ENV_EMULATOR_HOST, "localhost:8080"),
            (ENV_ACCESS_TOKEN, "   "),
        ]),
    );
    assert_eq!(config.project_id.as_deref(), Some("from-file"));
    assert_eq!(config.emulator_host.as_deref(), Some("localhost:8080"));
    assert_eq!(config.access_token, None);
}

#[test]
fn cli_flags_override_file_and_environment() {
    let args = RootArgs::try_parse_from([
        "emp-intake",
        "--backend",
        "memory",
        "--project",
        "cli-project",
        "--collection",
        "staff",
        "--timeout-secs",
        "5",
        "--fail-closed",
        "list",
    ])
    .expect("parse args");
    let mut config = firestore_config();
    apply_args(&mut config, &args);

    assert_eq!(config.backend, Backend::Memory);
    assert_eq!(config.project_id.as_deref(), Some("cli-project"));
    assert_eq!(config.collection, "staff");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.duplicate_check, DuplicatePolicy::FailClosed);
}

#[test]
fn validate_requires_project_for_firestore_only() {
    let err = validate_config(&IntakeConfig::default()).expect_err("missing project");
    assert!(err.to_string().contains("project id"), "got {err}");

    let memory = IntakeConfig {
        backend: Backend::Memory,
        ..IntakeConfig::default()
    };
    validate_config(&memory).expect("memory needs no project");
    validate_config(&firestore_config()).expect("firestore with project");
}

#[test]
fn validate_rejects_bad_values() {
    let cases = [
        IntakeConfig {
            schema_version: 2,
            ..firestore_config()
        },
        IntakeConfig {
            collection: " ".to_string(),
            ..firestore_config()
        },
        IntakeConfig {
            collection: "tenants/a/employees".to_string(),
            ..firestore_config()
        },
        IntakeConfig {
            timeout_secs: 0,
            ..firestore_config()
        },
        IntakeConfig {
            country_code: "+254".to_string(),
            ..firestore_config()
        },
        IntakeConfig {
            country_code: "2540".to_string(),
            ..firestore_config()
        },
    ];
    for config in cases {
        assert!(validate_config(&config).is_err(), "accepted {config:?}");
    }
}

#[test]
fn written_config_loads_back_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("intake.json");
    let config = IntakeConfig {
        emulator_host: Some("localhost:8080".to_string()),
        ..firestore_config()
    };

    write_config(&path, &config).expect("write");
    let text = std::fs::read_to_string(&path).expect("read back");
    assert!(!text.contains("access_token"));
    assert_eq!(load_config(&path).expect("load"), config);
}
