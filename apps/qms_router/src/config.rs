use std::{fs, io, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::Language;
use sop_router::{PathTemplates, PolicyPreset, RoutingPolicy};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "qms-router.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub app_base_url: String,
    pub language: Language,
    pub policy: PolicyPreset,
    pub request_timeout_secs: Option<u64>,
    pub request_form_statuses: Option<Vec<String>>,
    pub new_creation_statuses: Option<Vec<String>>,
    pub paths: PathTemplates,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            app_base_url: "http://127.0.0.1:3000".into(),
            language: Language::En,
            policy: PolicyPreset::Canonical,
            request_timeout_secs: None,
            request_form_statuses: None,
            new_creation_statuses: None,
            paths: PathTemplates::default(),
        }
    }
}

impl Settings {
    /// Preset policy, with either status list replaced when configured explicitly.
    pub fn routing_policy(&self) -> Result<RoutingPolicy> {
        let preset = RoutingPolicy::preset(self.policy);
        if self.request_form_statuses.is_none() && self.new_creation_statuses.is_none() {
            return Ok(preset);
        }

        let request_form: Vec<String> = match &self.request_form_statuses {
            Some(codes) => codes.clone(),
            None => preset.request_form_codes().map(str::to_string).collect(),
        };
        let new_creation: Vec<String> = match &self.new_creation_statuses {
            Some(codes) => codes.clone(),
            None => preset.new_creation_codes().map(str::to_string).collect(),
        };
        RoutingPolicy::from_codes(request_form, new_creation)
            .context("invalid status lists in configuration")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    app_base_url: Option<String>,
    language: Option<Language>,
    policy: Option<PolicyPreset>,
    request_timeout_secs: Option<u64>,
    request_form_statuses: Option<Vec<String>>,
    new_creation_statuses: Option<Vec<String>>,
    paths: Option<PathTemplates>,
}

/// Defaults, then the TOML file at `path` if it exists, then environment variables.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_file_settings(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file_settings(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config: file not found, using defaults");
        }
        Err(err) => {
            warn!(path = %path.display(), "config: ignoring unreadable file: {err}");
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_file_settings(raw: &str) -> Result<FileSettings> {
    Ok(toml::from_str(raw)?)
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.app_base_url {
        settings.app_base_url = v;
    }
    if let Some(v) = file_cfg.language {
        settings.language = v;
    }
    if let Some(v) = file_cfg.policy {
        settings.policy = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.request_form_statuses {
        settings.request_form_statuses = Some(v);
    }
    if let Some(v) = file_cfg.new_creation_statuses {
        settings.new_creation_statuses = Some(v);
    }
    if let Some(v) = file_cfg.paths {
        settings.paths = v;
    }
}

pub(crate) fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("QMS_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("QMS_APP_BASE_URL") {
        settings.app_base_url = v;
    }
    if let Some(v) = env("APP__APP_BASE_URL") {
        settings.app_base_url = v;
    }

    if let Some(v) = env("APP__LANGUAGE") {
        match v.parse() {
            Ok(language) => settings.language = language,
            Err(err) => warn!("config: ignoring APP__LANGUAGE: {err}"),
        }
    }

    if let Some(v) = env("APP__POLICY") {
        match v.parse() {
            Ok(policy) => settings.policy = policy,
            Err(err) => warn!("config: ignoring APP__POLICY: {err}"),
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(err) => warn!("config: ignoring APP__REQUEST_TIMEOUT_SECS '{v}': {err}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
