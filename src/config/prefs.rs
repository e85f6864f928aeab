use crate::domain::ports::ConfigProvider;
use crate::rules::DEFAULT_COLUMN_LIMIT;
use crate::utils::error::{PresubmitError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PREFS_FILE_NAME: &str = "presubmit.toml";

/// The preferences file as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prefs {
    pub presubmit: Option<PresubmitSection>,
    #[serde(default)]
    pub java: JavaSection,
    #[serde(default)]
    pub walk: WalkSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresubmitSection {
    #[serde(default = "default_basedir")]
    pub basedir: String,
    pub license: Option<String>,
    pub license_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JavaSection {
    pub column_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkSection {
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for WalkSection {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

fn default_basedir() -> String {
    ".".to_string()
}

fn default_ignore() -> Vec<String> {
    [".git", "target", "build"].iter().map(|s| s.to_string()).collect()
}

impl Prefs {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| PresubmitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern");
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Settings with paths resolved against `pref_dir`, the directory holding the file.
    pub fn resolve(&self, pref_dir: &Path) -> Result<PresubmitSettings> {
        let section = self
            .presubmit
            .as_ref()
            .ok_or_else(|| PresubmitError::ConfigValidationError {
                field: "presubmit".to_string(),
                message: "presubmit table not found in root".to_string(),
            })?;

        validate_path("presubmit.basedir", &section.basedir)?;

        let license = match (&section.license, &section.license_file) {
            (Some(text), _) => Some(text.clone()),
            (None, Some(file)) => Some(std::fs::read_to_string(pref_dir.join(file))?),
            (None, None) => None,
        };

        Ok(PresubmitSettings {
            base_dir: pref_dir.join(&section.basedir),
            license,
            column_limit: self.java.column_limit.unwrap_or(DEFAULT_COLUMN_LIMIT),
            ignored_dirs: self.walk.ignore.clone(),
        })
    }
}

/// Resolved preferences for one run.
#[derive(Debug, Clone, Serialize)]
pub struct PresubmitSettings {
    pub base_dir: PathBuf,
    pub license: Option<String>,
    pub column_limit: usize,
    pub ignored_dirs: Vec<String>,
}

impl PresubmitSettings {
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for PresubmitSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            license: None,
            column_limit: DEFAULT_COLUMN_LIMIT,
            ignored_dirs: default_ignore(),
        }
    }
}

impl ConfigProvider for PresubmitSettings {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    fn column_limit(&self) -> usize {
        self.column_limit
    }

    fn ignored_dirs(&self) -> &[String] {
        &self.ignored_dirs
    }
}

impl Validate for PresubmitSettings {
    fn validate(&self) -> Result<()> {
        validate_path("presubmit.basedir", &self.base_dir.to_string_lossy())?;
        validate_one_of("java.column_limit", &self.column_limit, &[80, 100])?;
        if let Some(license) = &self.license {
            validate_non_empty_string("presubmit.license", license)?;
        }
        for dir in &self.ignored_dirs {
            validate_non_empty_string("walk.ignore", dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_basic_prefs() {
        let prefs = Prefs::from_toml_str(
            r#"
[presubmit]
basedir = "src"
license = "// Copyright"

[java]
column_limit = 80
"#,
        )
        .unwrap();

        let settings = prefs.resolve(Path::new("/repo")).unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/repo/src"));
        assert_eq!(settings.license(), Some("// Copyright"));
        assert_eq!(settings.column_limit(), 80);
        assert_eq!(settings.ignored_dirs(), &[".git", "target", "build"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_presubmit_table() {
        let prefs = Prefs::from_toml_str("[java]\ncolumn_limit = 100\n").unwrap();
        let err = prefs.resolve(Path::new(".")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error in presubmit: presubmit table not found in root"
        );
    }

    #[test]
    fn test_defaults() {
        let prefs = Prefs::from_toml_str("[presubmit]\n").unwrap();
        let settings = prefs.resolve(Path::new("/repo")).unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/repo/."));
        assert_eq!(settings.column_limit(), DEFAULT_COLUMN_LIMIT);
        assert!(settings.license().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRESUBMIT_TEST_BASEDIR", "java/src");
        let prefs = Prefs::from_toml_str("[presubmit]\nbasedir = \"${PRESUBMIT_TEST_BASEDIR}\"\n").unwrap();
        assert_eq!(prefs.presubmit.unwrap().basedir, "java/src");
        std::env::remove_var("PRESUBMIT_TEST_BASEDIR");

        let prefs = Prefs::from_toml_str("[presubmit]\nbasedir = \"${PRESUBMIT_TEST_UNSET}\"\n").unwrap();
        assert_eq!(prefs.presubmit.unwrap().basedir, "${PRESUBMIT_TEST_UNSET}");
    }

    #[test]
    fn test_unsupported_column_limit() {
        let prefs = Prefs::from_toml_str("[presubmit]\n[java]\ncolumn_limit = 120\n").unwrap();
        let settings = prefs.resolve(Path::new(".")).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_license_file_relative_to_prefs() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("HEADER"), "/* MIT */\n").unwrap();

        let mut prefs_file = NamedTempFile::new_in(dir.path()).unwrap();
        prefs_file
            .write_all(b"[presubmit]\nlicense_file = \"HEADER\"\n")
            .unwrap();

        let prefs = Prefs::from_file(prefs_file.path()).unwrap();
        let settings = prefs.resolve(dir.path()).unwrap();
        assert_eq!(settings.license(), Some("/* MIT */\n"));
    }
}
