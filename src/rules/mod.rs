//! Java style rules.
//!
//! Each rule looks at one [`SourceFile`] and returns the items it found. A
//! rule with items becomes one [`PresubmitResult`] carrying the rule's
//! summary, at the level the presubmit script asked for.

pub mod column_limit;
pub mod escapes;
pub mod file_name;
pub mod imports;
pub mod license;
pub mod non_ascii;
pub mod whitespace;

use crate::domain::model::{PresubmitResult, ResultLevel, SourceFile};
use crate::java::Token;

pub const DEFAULT_COLUMN_LIMIT: usize = 100;
pub const JAVA_STYLE_SUITE: &str = "java_style";

#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub license: Option<&'a str>,
    pub column_limit: usize,
}

impl Default for RuleContext<'_> {
    fn default() -> Self {
        Self {
            license: None,
            column_limit: DEFAULT_COLUMN_LIMIT,
        }
    }
}

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn summary(&self) -> &'static str;
    fn check(&self, file: &SourceFile, ctx: &RuleContext<'_>) -> Vec<String>;
}

/// Default item formatter: `path:line MSG: msg`.
pub fn report_error_file_and_line(path: &str, line: usize, msg: &str) -> String {
    if msg.is_empty() {
        format!("{}:{}", path, line)
    } else {
        format!("{}:{} MSG: {}", path, line, msg)
    }
}

/// Tokens of `file`, or the single item explaining why it could not be tokenized.
pub(crate) fn tokens_or_item(file: &SourceFile) -> Result<&[Token], String> {
    file.tokens().map_err(|e| {
        report_error_file_and_line(&file.local_path, e.line, &format!("Could not tokenize: {}", e.message))
    })
}

pub fn java_style_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(file_name::FileNameRule),
        Box::new(whitespace::WhitespaceRule),
        Box::new(escapes::SpecialEscapesRule),
        Box::new(non_ascii::NonAsciiRule),
        Box::new(license::LicenseRule),
        Box::new(imports::WildcardImportsRule),
        Box::new(column_limit::ColumnLimitRule),
        Box::new(imports::ImportOrderRule),
    ]
}

pub fn suite(name: &str) -> Option<Vec<Box<dyn Rule>>> {
    match name {
        JAVA_STYLE_SUITE => Some(java_style_rules()),
        _ => None,
    }
}

pub fn suite_names() -> &'static [&'static str] {
    &[JAVA_STYLE_SUITE]
}

pub fn rule_names() -> Vec<&'static str> {
    java_style_rules().iter().map(|r| r.name()).collect()
}

/// Runs `rules` over `files`, one result per rule that found something.
pub fn check_files(
    rules: &[Box<dyn Rule>],
    files: &[SourceFile],
    ctx: &RuleContext<'_>,
    level: ResultLevel,
) -> Vec<PresubmitResult> {
    rules
        .iter()
        .filter_map(|rule| {
            let items: Vec<String> = files.iter().flat_map(|file| rule.check(file, ctx)).collect();
            tracing::debug!("{} over {} file(s): {} item(s)", rule.name(), files.len(), items.len());
            (!items.is_empty()).then(|| PresubmitResult::new(level, rule.summary(), items))
        })
        .collect()
}
