use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::presenter::TimerThresholds;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "duodeck";

pub const DEFAULT_PRESENTER_WIDTH: f32 = 1200.0;
pub const DEFAULT_PRESENTER_HEIGHT: f32 = 800.0;

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.start_slide",
    "timer.warning_after_secs",
    "timer.critical_after_secs",
    "presenter.width",
    "presenter.height",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presenter: Option<PresenterConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_after_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_after_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresenterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or(Error::NoConfigDir)
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Missing config is normal, a broken one is reported and skipped.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) if e.is_not_found() => Self::default(),
            Err(e) => {
                tracing::warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# duodeck configuration\n{yaml}");
        std::fs::write(path, contents).map_err(io_err)
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    /// Configured thresholds, or the defaults when the configured pair is out
    /// of order (critical before warning).
    pub fn timer_thresholds(&self) -> TimerThresholds {
        let defaults = TimerThresholds::default();
        let timer = self.timer.clone().unwrap_or_default();
        let thresholds = TimerThresholds {
            warning_after: timer
                .warning_after_secs
                .map_or(defaults.warning_after, Duration::from_secs),
            critical_after: timer
                .critical_after_secs
                .map_or(defaults.critical_after, Duration::from_secs),
        };
        if thresholds.critical_after < thresholds.warning_after {
            tracing::warn!(
                warning = thresholds.warning_after.as_secs(),
                critical = thresholds.critical_after.as_secs(),
                "timer.critical_after_secs is earlier than timer.warning_after_secs, using defaults"
            );
            return defaults;
        }
        thresholds
    }

    pub fn presenter_size(&self) -> [f32; 2] {
        let presenter = self.presenter.clone().unwrap_or_default();
        [
            presenter.width.unwrap_or(DEFAULT_PRESENTER_WIDTH),
            presenter.height.unwrap_or(DEFAULT_PRESENTER_HEIGHT),
        ]
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => return Err(Error::config_value(key, "must be 'light' or 'dark'")),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let slide = parse_positive(key, value)?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide as usize);
            }
            "timer.warning_after_secs" => {
                let secs = parse_positive(key, value)?;
                let timer = self.timer.get_or_insert_with(TimerConfig::default);
                let critical = timer
                    .critical_after_secs
                    .unwrap_or(TimerThresholds::default().critical_after.as_secs());
                if secs > critical {
                    return Err(Error::config_value(
                        key,
                        format!("must not be later than the critical threshold ({critical}s)"),
                    ));
                }
                timer.warning_after_secs = Some(secs);
            }
            "timer.critical_after_secs" => {
                let secs = parse_positive(key, value)?;
                let timer = self.timer.get_or_insert_with(TimerConfig::default);
                let warning = timer
                    .warning_after_secs
                    .unwrap_or(TimerThresholds::default().warning_after.as_secs());
                if secs < warning {
                    return Err(Error::config_value(
                        key,
                        format!("must not be earlier than the warning threshold ({warning}s)"),
                    ));
                }
                timer.critical_after_secs = Some(secs);
            }
            "presenter.width" | "presenter.height" => {
                let size: f32 = value
                    .parse()
                    .ok()
                    .filter(|v: &f32| v.is_finite() && *v >= 200.0)
                    .ok_or_else(|| Error::config_value(key, "must be a number of at least 200"))?;
                let presenter = self.presenter.get_or_insert_with(PresenterConfig::default);
                if key == "presenter.width" {
                    presenter.width = Some(size);
                } else {
                    presenter.height = Some(size);
                }
            }
            _ => {
                return Err(Error::config_value(
                    key,
                    format!("unknown key. Valid keys: {}", KEYS.join(", ")),
                ));
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::config_value(key, format!("expected a positive number, got '{value}'")))
}
