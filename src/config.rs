//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursenav/coursenav.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `COURSENAV_*` prefix, `__` between nested keys

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::Icon;

/// A group label node: its data key and display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSettings {
    pub key: String,
    pub label: String,
}

/// The past group additionally carries the icon shown next to its label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PastGroupSettings {
    pub key: String,
    pub label: String,
    pub icon: Icon,
}

/// Unified configuration for coursenav.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Template every menu item is rendered with
    pub template: String,
    /// Data key of the node all groups are inserted after
    pub anchor_key: String,
    /// Prefix for ids assigned to disclosure-controlled nodes
    pub id_prefix: String,
    /// Keys starting with this are used as ids without the prefix
    pub id_namespace: String,
    pub past_group: PastGroupSettings,
    pub ongoing_group: GroupSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template: "local_boostnavigation/mycoursesoveride".into(),
            anchor_key: "mycourses".into(),
            id_prefix: "localboostnavigation".into(),
            id_namespace: "localboost".into(),
            past_group: PastGroupSettings {
                key: "mycoursespast".into(),
                label: "Past courses".into(),
                icon: Icon {
                    pix: "i/moremenu".into(),
                    component: "moodle".into(),
                    alt: String::new(),
                },
            },
            ongoing_group: GroupSettings {
                key: "mycoursesongoing".into(),
                label: "Ongoing courses".into(),
            },
        }
    }
}

/// Get the XDG config directory for coursenav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursenav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursenav.toml"))
}

impl Settings {
    /// Load settings through every layer, reading `COURSENAV_*` from the
    /// process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, None)
    }

    /// Same as [`Settings::load`], with the environment layer read from
    /// `env` instead of the process when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut builder = Self::defaults_builder()?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("COURSENAV")
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, ApplicationError> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("template", defaults.template)
            .and_then(|b| b.set_default("anchor_key", defaults.anchor_key))
            .and_then(|b| b.set_default("id_prefix", defaults.id_prefix))
            .and_then(|b| b.set_default("id_namespace", defaults.id_namespace))
            .and_then(|b| b.set_default("past_group.key", defaults.past_group.key))
            .and_then(|b| b.set_default("past_group.label", defaults.past_group.label))
            .and_then(|b| b.set_default("past_group.icon.pix", defaults.past_group.icon.pix))
            .and_then(|b| {
                b.set_default(
                    "past_group.icon.component",
                    defaults.past_group.icon.component,
                )
            })
            .and_then(|b| b.set_default("past_group.icon.alt", defaults.past_group.icon.alt))
            .and_then(|b| b.set_default("ongoing_group.key", defaults.ongoing_group.key))
            .and_then(|b| b.set_default("ongoing_group.label", defaults.ongoing_group.label))
            .map_err(config_err)
    }

    /// Keys must be non-empty and distinct, or anchor lookup and toggle
    /// wiring would hit the wrong node.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let keys = [
            ("anchor_key", &self.anchor_key),
            ("past_group.key", &self.past_group.key),
            ("ongoing_group.key", &self.ongoing_group.key),
        ];
        for (name, value) in keys {
            if value.trim().is_empty() {
                return Err(ApplicationError::Config {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        if self.template.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "template must not be empty".into(),
            });
        }
        if self.anchor_key == self.past_group.key
            || self.anchor_key == self.ongoing_group.key
            || self.past_group.key == self.ongoing_group.key
        {
            return Err(ApplicationError::Config {
                message: "anchor_key, past_group.key and ongoing_group.key must differ".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
