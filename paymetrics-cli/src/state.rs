use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

/// Overrides `~/.paymetrics` when set
pub const HOME_ENV: &str = "PAYMETRICS_HOME";

pub fn paymetrics_home() -> Result<PathBuf> {
    resolve_home(std::env::var(HOME_ENV).ok(), std::env::var("HOME").ok())
}

fn resolve_home(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".paymetrics")),
        _ => bail!("HOME is not set (or set {} explicitly)", HOME_ENV),
    }
}

pub fn ensure_paymetrics_home() -> Result<PathBuf> {
    let dir = paymetrics_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = resolve_home(Some("/tmp/pm".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/pm"));
    }

    #[test]
    fn test_home_fallback() {
        let dir = resolve_home(Some("  ".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.paymetrics"));
    }

    #[test]
    fn test_no_home_is_an_error() {
        assert!(resolve_home(None, None).is_err());
    }
}
