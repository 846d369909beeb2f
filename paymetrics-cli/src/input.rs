//! Loading batch inputs: JSON email arrays, `.eml` directories, category
//! lists and previously exported records.

use anyhow::{Context, Result};
use paymetrics_core::{CategoryDefinition, ExtractedTransaction, RawEmail};
use paymetrics_finance::read_csv;
use paymetrics_ingest::load_eml;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub fn load_json_emails(path: &Path) -> Result<Vec<RawEmail>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse emails from {}", path.display()))
}

/// Every `.eml` under `dir`, in path order. Files that fail to parse are
/// logged and left out.
pub fn load_eml_dir(dir: &Path) -> Result<Vec<RawEmail>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.eq_ignore_ascii_case("eml"))
        })
        .collect();
    files.sort();

    let mut emails = Vec::with_capacity(files.len());
    for path in files {
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let fallback_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
        match load_eml(&bytes, &fallback_id) {
            Ok(email) => emails.push(email),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unparseable eml"),
        }
    }
    Ok(emails)
}

/// The user's category list, or the built-in defaults
pub fn load_categories(path: Option<&Path>) -> Result<Vec<CategoryDefinition>> {
    let Some(path) = path else {
        return Ok(CategoryDefinition::defaults());
    };
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse categories from {}", path.display()))
}

/// Exported records, CSV when the extension says so, JSON otherwise
pub fn load_records(path: &Path) -> Result<Vec<ExtractedTransaction>> {
    let is_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
        return read_csv(file).with_context(|| format!("parse {}", path.display()));
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse records from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HDFC_EML: &str = "From: alerts@hdfcbank.net\r\n\
Subject: You have done a UPI txn\r\n\
Message-ID: <hdfc-1@hdfcbank.net>\r\n\
Content-Type: text/plain\r\n\
\r\n\
Rs.549.79 has been debited from account 2448 to VPA z@x Zomato on 02-08-25.\r\n";

    #[test]
    fn test_json_emails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.json");
        fs::write(
            &path,
            r#"[{"id": "a", "sender": "alerts@hdfcbank.net", "subject": "s", "body": "b"}]"#,
        )
        .unwrap();
        let emails = load_json_emails(&path).unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, "a");
        assert!(emails[0].received_at.is_none());
    }

    #[test]
    fn test_eml_dir_recurses_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2025").join("08");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("one.EML"), HDFC_EML).unwrap();
        fs::write(dir.path().join("notes.txt"), "not mail").unwrap();

        let emails = load_eml_dir(dir.path()).unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, "hdfc-1@hdfcbank.net");
        assert_eq!(emails[0].subject, "You have done a UPI txn");
    }

    #[test]
    fn test_eml_dir_rejects_file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.eml");
        fs::write(&path, HDFC_EML).unwrap();
        assert!(load_eml_dir(&path).is_err());
    }

    #[test]
    fn test_categories_default_and_file() {
        assert_eq!(load_categories(None).unwrap().len(), 15);

        let dir = tempdir().unwrap();
        let path = dir.path().join("cats.json");
        fs::write(&path, r#"[{"id": 1, "name": "Pets", "keywords": ["vet"]}]"#).unwrap();
        let cats = load_categories(Some(&path)).unwrap();
        assert_eq!(cats[0].keywords, vec!["vet".to_string()]);
    }
}
