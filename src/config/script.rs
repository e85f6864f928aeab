use crate::domain::model::{AffectedFile, Event, ResultLevel};
use crate::rules::{self, Rule};
use crate::utils::error::Result;
use crate::utils::validation::{validate_extensions, validate_one_of, Validate};
use serde::{Deserialize, Serialize};

/// Used when a run asks for the default script.
pub const DEFAULT_PRESUBMIT: &str = r#"
[[upload]]
suite = "java_style"
extensions = ["java"]

[[commit]]
suite = "java_style"
extensions = ["java"]
level = "error"
"#;

/// A `PRESUBMIT.toml`: the checks to run per event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresubmitScript {
    #[serde(default)]
    pub upload: Vec<CheckConfig>,
    #[serde(default)]
    pub commit: Vec<CheckConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub suite: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub level: ResultLevel,
    #[serde(default)]
    pub skip: Vec<String>,
    pub column_limit: Option<usize>,
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

impl PresubmitScript {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: PresubmitScript = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn checks_for(&self, event: Event) -> &[CheckConfig] {
        match event {
            Event::Upload => &self.upload,
            Event::Commit => &self.commit,
        }
    }
}

impl CheckConfig {
    /// The suite's rules minus the skipped ones.
    pub fn rules(&self) -> Vec<Box<dyn Rule>> {
        rules::suite(&self.suite)
            .unwrap_or_default()
            .into_iter()
            .filter(|rule| !self.skip.iter().any(|s| s == rule.name()))
            .collect()
    }

    pub fn matches(&self, file: &AffectedFile) -> bool {
        file.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl Validate for CheckConfig {
    fn validate(&self) -> Result<()> {
        validate_one_of("suite", &self.suite.as_str(), rules::suite_names())?;
        validate_extensions("extensions", &self.extensions)?;
        let names = rules::rule_names();
        for skipped in &self.skip {
            validate_one_of("skip", &skipped.as_str(), names.as_slice())?;
        }
        if let Some(limit) = self.column_limit {
            validate_one_of("column_limit", &limit, &[80, 100])?;
        }
        Ok(())
    }
}

impl Validate for PresubmitScript {
    fn validate(&self) -> Result<()> {
        self.upload.iter().chain(&self.commit).try_for_each(|check| check.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PresubmitError;

    #[test]
    fn test_default_script() {
        let script = PresubmitScript::from_toml_str(DEFAULT_PRESUBMIT).unwrap();
        assert_eq!(script.checks_for(Event::Upload).len(), 1);
        assert_eq!(script.checks_for(Event::Upload)[0].level, ResultLevel::Warning);
        assert_eq!(script.checks_for(Event::Commit)[0].level, ResultLevel::Error);
    }

    #[test]
    fn test_skip_and_matches() {
        let script = PresubmitScript::from_toml_str(
            "[[upload]]\nsuite = \"java_style\"\nskip = [\"license\", \"column_limit\"]\n",
        )
        .unwrap();
        let check = &script.upload[0];
        let names: Vec<&str> = check.rules().iter().map(|r| r.name()).collect();
        assert!(!names.contains(&"license"));
        assert!(!names.contains(&"column_limit"));
        assert_eq!(names.len(), rules::rule_names().len() - 2);

        assert!(check.matches(&AffectedFile::new("src/A.java", "/repo")));
        assert!(!check.matches(&AffectedFile::new("src/a.py", "/repo")));
        assert!(!check.matches(&AffectedFile::new("Makefile", "/repo")));
    }

    #[test]
    fn test_script_without_event_checks() {
        let script = PresubmitScript::from_toml_str("").unwrap();
        assert!(script.checks_for(Event::Upload).is_empty());
    }

    #[test]
    fn test_unknown_values_rejected() {
        let err = PresubmitScript::from_toml_str("[[upload]]\nsuite = \"python_style\"\n").unwrap_err();
        assert!(matches!(err, PresubmitError::InvalidConfigValueError { .. }));

        let err = PresubmitScript::from_toml_str("[[upload]]\nsuite = \"java_style\"\nskip = [\"tabs\"]\n")
            .unwrap_err();
        assert!(err.to_string().contains("tabs"));

        let err = PresubmitScript::from_toml_str("[[upload]]\nsuite = \"java_style\"\nlevel = \"fatal\"\n")
            .unwrap_err();
        assert!(matches!(err, PresubmitError::TomlError(_)));

        assert!(PresubmitScript::from_toml_str("[[upload]]\nsuite = \"java_style\"\ncolumn_limit = 120\n").is_err());
    }
}
