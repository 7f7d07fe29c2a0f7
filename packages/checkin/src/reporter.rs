//! Persisted reporter identifier.
//!
//! The last-used reporter id is remembered between runs so that new
//! check-ins are prefilled with it. It lives in a small TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the reporter cookie.
pub const DEFAULT_COOKIE_PATH: &str = "data/reporter.toml";

/// Errors reading or writing the reporter cookie.
#[derive(Debug, Error)]
pub enum CookieError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Cookie could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tff_user_id: Option<String>,
}

/// File-backed store for the last-used reporter id.
#[derive(Debug, Clone)]
pub struct ReporterCookie {
    path: PathBuf,
}

impl Default for ReporterCookie {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_PATH)
    }
}

impl ReporterCookie {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored id. A missing file means no id.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<Option<String>, CookieError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: CookieFile = toml::de::from_str(&contents)?;
        Ok(file.tff_user_id.filter(|id| !id.is_empty()))
    }

    /// Stores `id`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError`] if the file cannot be written.
    pub fn save(&self, id: &str) -> Result<(), CookieError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = CookieFile {
            tff_user_id: Some(id.to_string()),
        };
        std::fs::write(&self.path, toml::ser::to_string(&file)?)?;
        log::debug!("Saved reporter id to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_id() {
        let cookie =
            ReporterCookie::new(std::env::temp_dir().join("suc_status_cookie_missing.toml"));
        let _ = std::fs::remove_file(cookie.path());
        assert!(cookie.load().unwrap().is_none());
    }

    #[test]
    fn saved_id_is_loaded_back() {
        let dir = std::env::temp_dir().join("suc_status_cookie_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let cookie = ReporterCookie::new(dir.join("nested").join("reporter.toml"));

        cookie.save("jdoe").unwrap();
        assert_eq!(cookie.load().unwrap().as_deref(), Some("jdoe"));

        cookie.save("").unwrap();
        assert!(cookie.load().unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join("suc_status_cookie_malformed.toml");
        std::fs::write(&path, "tff_user_id = [").unwrap();
        assert!(matches!(
            ReporterCookie::new(&path).load(),
            Err(CookieError::Parse(_))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
