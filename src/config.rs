// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Category, Channel};
use crate::engine::EngineSettings;
use crate::tv::{TransitionKind, TvSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tv: TvConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default = "default_channels")]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TvConfig {
    pub tick_rate: f64,
    pub warmup_ticks: u32,
    pub transition_ticks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_channel: Option<u32>,
    pub remember_last_channel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub step: TransitionKind,
    pub select: TransitionKind,
}

impl Default for TvConfig {
    fn default() -> Self {
        let tv = TvSettings::default();
        Self {
            tick_rate: crate::engine::DEFAULT_TICK_RATE,
            warmup_ticks: tv.warmup_ticks,
            transition_ticks: tv.transition_ticks,
            start_channel: tv.start_channel,
            remember_last_channel: tv.remember_last_channel,
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        let tv = TvSettings::default();
        Self {
            step: tv.step_effect,
            select: tv.select_effect,
        }
    }
}

fn default_channels() -> Vec<Channel> {
    vec![
        Channel::new(2, "KTVX Sitcoms", Category::Sitcom, "builtin:sitcom"),
        Channel::new(3, "Toon Town", Category::Cartoon, "builtin:cartoon"),
        Channel::new(5, "Anime Zone", Category::Anime, "builtin:anime"),
        Channel::new(7, "Weather Now", Category::Weather, "builtin:weather"),
        Channel::new(9, "Game Channel", Category::Game, "builtin:game"),
        Channel::new(13, "Test Card", Category::Other, "builtin:testcard"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tv: TvConfig::default(),
            effects: EffectsConfig::default(),
            channels: default_channels(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("crtv").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in line-up.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                "No config at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn engine_settings(&self) -> Result<EngineSettings> {
        if !self.tv.tick_rate.is_finite() || self.tv.tick_rate <= 0.0 {
            anyhow::bail!(
                "Invalid tick_rate {}: must be a positive number of ticks per second",
                self.tv.tick_rate
            );
        }

        Ok(EngineSettings {
            tick_rate: self.tv.tick_rate,
            tv: TvSettings {
                warmup_ticks: self.tv.warmup_ticks,
                transition_ticks: self.tv.transition_ticks,
                step_effect: self.effects.step,
                select_effect: self.effects.select,
                start_channel: self.tv.start_channel,
                remember_last_channel: self.tv.remember_last_channel,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_line_up_is_valid() {
        let config = Config::default();
        let catalog = crate::catalog::ChannelCatalog::load(config.channels).unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.first().id, 2);
    }

    #[test]
    fn parses_partial_file_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tv]
            warmup_ticks = 4

            [[channels]]
            id = 1
            name = "Sitcom A"
            category = "sitcom"
            content = "builtin:sitcom"

            [[channels]]
            id = 2
            name = "Late Show"
            category = "other"
            content = "file:late.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.tv.warmup_ticks, 4);
        assert_eq!(config.tv.transition_ticks, 6);
        assert_eq!(config.effects.step, TransitionKind::Static);
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels[1].content_ref.as_str(), "file:late.txt");
    }

    #[test]
    fn missing_channels_table_uses_default_line_up() {
        let config: Config = toml::from_str("[effects]\nstep = \"flicker\"\n").unwrap();
        assert_eq!(config.effects.step, TransitionKind::Flicker);
        assert_eq!(config.channels.len(), 6);
    }

    #[test]
    fn rejects_unknown_category() {
        let result: Result<Config, _> = toml::from_str(
            "[[channels]]\nid = 1\nname = \"X\"\ncategory = \"news\"\ncontent = \"builtin:game\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.tv.start_channel = Some(7);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.tv.start_channel, Some(7));
        assert_eq!(loaded.channels, config.channels);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.channels.len(), 6);
    }

    #[test]
    fn engine_settings_reject_bad_tick_rate() {
        let mut config = Config::default();
        config.tv.tick_rate = 0.0;
        assert!(config.engine_settings().is_err());
        config.tv.tick_rate = 30.0;
        let settings = config.engine_settings().unwrap();
        assert_eq!(settings.tick_rate, 30.0);
        assert_eq!(settings.tv.select_effect, TransitionKind::Flicker);
    }
}
