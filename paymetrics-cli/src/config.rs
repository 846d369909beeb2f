use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_paymetrics_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// IANA zone for turning received timestamps into local dates
    pub default_timezone: String,
    /// Refuse batches larger than this
    pub max_batch_size: usize,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            default_timezone: "Asia/Kolkata".to_string(),
            max_batch_size: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        let name = &self.pipeline.default_timezone;
        name.parse::<Tz>()
            .map_err(|e| anyhow!("invalid default_timezone {:?}: {}", name, e))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_paymetrics_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write defaults unless a config already exists. Returns whether it wrote.
pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config_to(path, &Config::default())?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timezone().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_init_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(init_config_at(&path).unwrap());
        assert!(!init_config_at(&path).unwrap());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[pipeline]"));
        assert!(text.contains("format = \"json\""));
        assert_eq!(load_config_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\nformat = \"csv\"\n").unwrap();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Csv);
        assert_eq!(cfg.pipeline.max_batch_size, 500);
    }

    #[test]
    fn test_bad_timezone_is_reported() {
        let mut cfg = Config::default();
        cfg.pipeline.default_timezone = "Mars/Olympus".to_string();
        assert!(cfg.timezone().is_err());
    }
}
