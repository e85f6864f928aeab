use crate::domain::ports::OutputSink;
use crate::java::{tokenize, LexError, Token};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The hook a presubmit run is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Event {
    #[default]
    Upload,
    Commit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultLevel {
    Error,
    #[default]
    #[serde(alias = "prompt_warning")]
    Warning,
    #[serde(alias = "message")]
    Notification,
}

impl ResultLevel {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResultLevel::Error)
    }

    pub fn should_prompt(&self) -> bool {
        matches!(self, ResultLevel::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresubmitResult {
    pub level: ResultLevel,
    /// A short one-line message.
    pub message: String,
    /// Short strings locating each problem.
    pub items: Vec<String>,
    /// Multi-line text, e.g. output from another tool.
    pub long_text: String,
}

impl PresubmitResult {
    pub fn new(level: ResultLevel, message: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            level,
            message: message.into(),
            items,
            long_text: String::new(),
        }
    }

    pub fn error(message: impl Into<String>, items: Vec<String>) -> Self {
        Self::new(ResultLevel::Error, message, items)
    }

    pub fn prompt_warning(message: impl Into<String>, items: Vec<String>) -> Self {
        Self::new(ResultLevel::Warning, message, items)
    }

    pub fn notification(message: impl Into<String>, items: Vec<String>) -> Self {
        Self::new(ResultLevel::Notification, message, items)
    }

    pub fn with_long_text(mut self, long_text: impl Into<String>) -> Self {
        self.long_text = long_text.into().trim_end().to_string();
        self
    }

    pub fn handle(&self, output: &mut dyn OutputSink) {
        output.write(&self.message);
        output.write("\n");
        for (index, item) in self.items.iter().enumerate() {
            output.write("  ");
            output.write(item);
            if index + 1 < self.items.len() {
                output.write(" \\");
            }
            output.write("\n");
        }
        if !self.long_text.is_empty() {
            output.write("\n***************\n");
            output.write(&self.long_text);
            output.write("\n***************\n");
        }
        if self.level.is_fatal() {
            output.fail();
        }
    }
}

/// A file in the change, addressed relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedFile {
    local_path: String,
    root: PathBuf,
}

impl AffectedFile {
    pub fn new(local_path: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            local_path: crate::core::paths::normpath(&local_path.into()),
            root: root.into(),
        }
    }

    pub fn local_path(&self) -> &str {
        &self.local_path
    }

    pub fn absolute_local_path(&self) -> PathBuf {
        self.root.join(&self.local_path)
    }

    pub fn file_name(&self) -> &str {
        self.local_path.rsplit('/').next().unwrap_or(&self.local_path)
    }

    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.local_path).extension().and_then(|e| e.to_str())
    }

    /// Whether the file sits in `dir` (a normalized local directory, "" for the root).
    pub fn is_under(&self, dir: &str) -> bool {
        dir.is_empty() || dir == "." || self.local_path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(['\r', '\n']) {
            Some(end) => {
                let width = if text[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[end + width..]);
                Some(&text[..end])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

/// A loaded source file, tokenized on first use.
#[derive(Debug)]
pub struct SourceFile {
    pub local_path: String,
    pub content: String,
    tokens: OnceLock<Result<Vec<Token>, LexError>>,
}

impl SourceFile {
    pub fn new(local_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            content: content.into(),
            tokens: OnceLock::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        self.local_path.rsplit('/').next().unwrap_or(&self.local_path)
    }

    /// Lines numbered from 1, trailing whitespace removed. Line breaks are
    /// `\r\n`, `\r` or `\n`, as the lexer counts them.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        split_lines(&self.content)
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
    }

    pub fn tokens(&self) -> Result<&[Token], &LexError> {
        self.tokens
            .get_or_init(|| tokenize(&self.content))
            .as_ref()
            .map(|tokens| tokens.as_slice())
    }
}

/// Everything a presubmit run looks at.
#[derive(Debug, Clone)]
pub struct Change {
    pub root: PathBuf,
    pub files: Vec<AffectedFile>,
    pub presubmit_files: Vec<PathBuf>,
}

impl Change {
    pub fn files_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a AffectedFile> + 'a {
        self.files.iter().filter(move |f| f.is_under(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Captured {
        text: String,
        failures: usize,
    }

    impl OutputSink for Captured {
        fn write(&mut self, s: &str) {
            self.text.push_str(s);
        }

        fn fail(&mut self) {
            self.failures += 1;
        }
    }

    #[test]
    fn test_handle_writes_items_with_continuations() {
        let result = PresubmitResult::prompt_warning(
            "Wildcard imports are not used.",
            vec!["A.java:3 MSG: import a.*;".into(), "A.java:4 MSG: import b.*;".into()],
        );
        let mut out = Captured::default();
        result.handle(&mut out);
        assert_eq!(
            out.text,
            "Wildcard imports are not used.\n  A.java:3 MSG: import a.*; \\\n  A.java:4 MSG: import b.*;\n"
        );
        assert_eq!(out.failures, 0);
    }

    #[test]
    fn test_error_with_long_text_fails_output() {
        let result = PresubmitResult::error("Broken", vec![]).with_long_text("line one\nline two\n\n");
        let mut out = Captured::default();
        result.handle(&mut out);
        assert_eq!(out.text, "Broken\n\n***************\nline one\nline two\n***************\n");
        assert_eq!(out.failures, 1);
    }

    #[test]
    fn test_affected_file_paths() {
        let file = AffectedFile::new("src/./main/../Foo.java", "/repo");
        assert_eq!(file.local_path(), "src/Foo.java");
        assert_eq!(file.file_name(), "Foo.java");
        assert_eq!(file.extension(), Some("java"));
        assert_eq!(file.absolute_local_path(), PathBuf::from("/repo/src/Foo.java"));
        assert!(file.is_under(""));
        assert!(file.is_under("src"));
        assert!(!file.is_under("sr"));
    }

    #[test]
    fn test_source_lines_trim_trailing_whitespace() {
        let file = SourceFile::new("A.java", "a  \r\nb\t\n");
        let lines: Vec<(usize, &str)> = file.lines().collect();
        assert_eq!(lines, vec![(1, "a"), (2, "b"), (3, "")]);
    }

    #[test]
    fn test_source_lines_follow_lexer_line_breaks() {
        let file = SourceFile::new("A.java", "class A {\r  int x;\r\n  String s = \"\\u00e9\";\r}");
        let lines: Vec<(usize, &str)> = file.lines().collect();
        assert_eq!(lines, vec![(1, "class A {"), (2, "  int x;"), (3, "  String s = \"\\u00e9\";"), (4, "}")]);

        let tokens = file.tokens().unwrap();
        let literal = tokens.iter().find(|t| t.literal().is_some()).unwrap();
        assert_eq!(literal.line, 3);
        assert_eq!(tokens.last().unwrap().line, 4);
    }

    #[test]
    fn test_level_deserializes_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: ResultLevel,
        }
        let w: Wrapper = toml::from_str("level = \"prompt_warning\"").unwrap();
        assert_eq!(w.level, ResultLevel::Warning);
        let w: Wrapper = toml::from_str("level = \"error\"").unwrap();
        assert!(w.level.is_fatal());
    }
}
