use super::{apply_env_overrides, apply_file_settings, load_settings, parse_file_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use shared::domain::{Destination, Language, StatusCode};
use sop_router::{PolicyPreset, RoutingPolicy};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_use_canonical_policy_without_timeout() {
    let settings = Settings::default();
    assert_eq!(settings.policy, PolicyPreset::Canonical);
    assert_eq!(settings.language, Language::En);
    assert_eq!(settings.request_timeout(), None);
    assert_eq!(
        settings.routing_policy().expect("policy"),
        RoutingPolicy::canonical()
    );
}

#[test]
fn file_settings_override_defaults() {
    let file_cfg = parse_file_settings(
        r#"
api_base_url = "https://qms-api.internal"
language = "ar"
policy = "legacy"
request_timeout_secs = 15

[paths]
full_document_view = "/documents/view"
"#,
    )
    .expect("parse");

    let mut settings = Settings::default();
    apply_file_settings(&mut settings, file_cfg);

    assert_eq!(settings.api_base_url, "https://qms-api.internal");
    assert_eq!(settings.app_base_url, Settings::default().app_base_url);
    assert_eq!(settings.language, Language::Ar);
    assert_eq!(settings.policy, PolicyPreset::Legacy);
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
    assert_eq!(settings.paths.full_document_view, "/documents/view");
    assert_eq!(settings.paths.request_form, "/sop/request-form");
}

#[test]
fn unknown_file_keys_are_rejected() {
    assert!(parse_file_settings("api_url = \"http://x\"").is_err());
    assert!(parse_file_settings("policy = \"strict\"").is_err());
}

#[test]
fn env_overrides_take_precedence_over_file() {
    let mut settings = Settings {
        api_base_url: "http://from-file".into(),
        ..Settings::default()
    };
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("QMS_API_BASE_URL", "http://from-qms-env"),
            ("APP__API_BASE_URL", "http://from-app-env"),
            ("QMS_APP_BASE_URL", "http://frontend"),
            ("APP__LANGUAGE", "AR"),
            ("APP__POLICY", "legacy"),
            ("APP__REQUEST_TIMEOUT_SECS", "5"),
        ]),
    );

    assert_eq!(settings.api_base_url, "http://from-app-env");
    assert_eq!(settings.app_base_url, "http://frontend");
    assert_eq!(settings.language, Language::Ar);
    assert_eq!(settings.policy, PolicyPreset::Legacy);
    assert_eq!(settings.request_timeout_secs, Some(5));
}

#[test]
fn invalid_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("APP__LANGUAGE", "fr"),
            ("APP__POLICY", "strict"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]),
    );
    assert_eq!(settings, Settings::default());
}

#[test]
fn invalid_timeout_keeps_previous_value() {
    let mut settings = Settings {
        request_timeout_secs: Some(30),
        ..Settings::default()
    };
    apply_env_overrides(
        &mut settings,
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "-1")]),
    );
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn zero_timeout_means_client_default() {
    let settings = Settings {
        request_timeout_secs: Some(0),
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn explicit_status_lists_replace_preset_sets() {
    let settings = Settings {
        policy: PolicyPreset::Legacy,
        new_creation_statuses: Some(vec!["1".into(), "16".into(), "2".into()]),
        ..Settings::default()
    };
    let policy = settings.routing_policy().expect("policy");

    assert_eq!(
        policy.classify(&StatusCode::from("2")),
        Destination::NewCreationForm
    );
    assert_eq!(
        policy.classify(&StatusCode::from("11")),
        Destination::FullDocumentView
    );
    assert_eq!(
        policy.classify(&StatusCode::from("8")),
        Destination::RequestForm
    );
}

#[test]
fn overlapping_status_lists_are_a_config_error() {
    let settings = Settings {
        request_form_statuses: Some(vec!["8".into(), "1".into()]),
        ..Settings::default()
    };
    let err = settings.routing_policy().expect_err("overlap");
    assert!(err.to_string().contains("invalid status lists"), "{err}");
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("qms_router_missing_{suffix}.toml"));

    let settings = load_settings(&path).expect("settings");
    assert_eq!(settings.paths, Settings::default().paths);
}

#[test]
fn malformed_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("qms_router_bad_{suffix}.toml"));
    fs::write(&path, "api_base_url = [").expect("write config");

    let err = load_settings(&path).expect_err("parse error");
    assert!(err.to_string().contains("failed to parse config file"), "{err}");

    fs::remove_file(path).expect("cleanup");
}
