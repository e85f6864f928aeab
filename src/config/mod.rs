#[cfg(feature = "cli")]
pub mod cli;
pub mod prefs;
pub mod script;

pub use prefs::{Prefs, PresubmitSettings, PREFS_FILE_NAME};
pub use script::{CheckConfig, PresubmitScript, DEFAULT_PRESUBMIT};

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Loads and validates the preferences: `prefs` when given, otherwise
/// `presubmit.toml` in the working directory, otherwise the defaults.
pub fn load_settings(prefs: Option<&Path>) -> Result<PresubmitSettings> {
    let default_path = Path::new(PREFS_FILE_NAME);
    let path = match prefs {
        Some(path) => Some(path),
        None if default_path.is_file() => Some(default_path),
        None => None,
    };

    let settings = match path {
        Some(path) => {
            tracing::debug!("Loading preferences from {}", path.display());
            let pref_dir = path.parent().unwrap_or_else(|| Path::new(""));
            Prefs::from_file(path)?.resolve(pref_dir)?
        }
        None => {
            tracing::debug!("No {} found, using defaults", PREFS_FILE_NAME);
            PresubmitSettings::default()
        }
    };

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_prefs_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, crate::utils::error::PresubmitError::IoError(_)));
    }

    #[test]
    fn test_explicit_prefs_resolve_against_their_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFS_FILE_NAME);
        std::fs::write(&path, "[presubmit]\nbasedir = \"java\"\n").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.base_dir, dir.path().join("java"));
    }
}
