// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub data: Data,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            data: Data::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub active_filter: Option<bool>,
    pub follow_up_filter: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            active_filter: Some(true),
            follow_up_filter: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    /// Optional JSON file with case records to load instead of the
    /// embedded fixture.
    pub cases_path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("BBQ_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set BBQ_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(bbq_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [ui] and [data]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        if let Some(cases_path) = &self.data.cases_path {
            if cases_path.contains("://") {
                bail!(
                    "data.cases_path in {} looks like a URI ({}); use a filesystem path",
                    path.display(),
                    cases_path
                );
            }
            if cases_path.trim().is_empty() {
                bail!("data.cases_path in {} is empty", path.display());
            }
        }

        Ok(())
    }

    pub fn active_filter(&self) -> bool {
        self.ui.active_filter.unwrap_or(true)
    }

    pub fn follow_up_filter(&self) -> bool {
        self.ui.follow_up_filter.unwrap_or(false)
    }

    pub fn cases_path(&self) -> Option<PathBuf> {
        self.data.cases_path.as_deref().map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# bbq config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Initial state of the Active toggle\nactive_filter = true\n# Initial state of the FollowUp toggle\nfollow_up_filter = false\n\n[data]\n# Optional. Load case records from a JSON file instead of the built-in fixture\n# cases_path = \"/absolute/path/to/cases.json\"\n",
            path.display(),
        )
    }
}
