use super::{report_error_file_and_line, Rule, RuleContext};
use crate::domain::model::SourceFile;
use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+.-]*://\S+").expect("valid URL pattern"));

/// Lines fit the column limit, except package and import statements and
/// lines that only overflow because of a URL.
pub struct ColumnLimitRule;

impl ColumnLimitRule {
    fn overflows_only_by_url(line: &str, limit: usize) -> bool {
        URL_RE.find_iter(line).any(|m| {
            let without = line[..m.start()].chars().count() + line[m.end()..].chars().count();
            without <= limit
        })
    }
}

impl Rule for ColumnLimitRule {
    fn name(&self) -> &'static str {
        "column_limit"
    }

    fn summary(&self) -> &'static str {
        "Projects are free to choose a column limit of either 80 or 100 characters. By default, it \
         is 100 characters."
    }

    fn check(&self, file: &SourceFile, ctx: &RuleContext<'_>) -> Vec<String> {
        let limit = ctx.column_limit;
        file.lines()
            .filter(|(_, line)| !line.starts_with("package ") && !line.starts_with("import "))
            .filter_map(|(line_num, line)| {
                let len = line.chars().count();
                if len <= limit || Self::overflows_only_by_url(line, limit) {
                    return None;
                }
                Some(report_error_file_and_line(
                    &file.local_path,
                    line_num,
                    &format!("Line is {} characters, the limit is {} characters.", len, limit),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(limit: usize) -> RuleContext<'static> {
        RuleContext {
            license: None,
            column_limit: limit,
        }
    }

    #[test]
    fn test_long_line_reported() {
        let long = format!("int x = {};", "1".repeat(90));
        let file = SourceFile::new("A.java", format!("class A {{\n{}\n}}\n", long));
        assert!(ColumnLimitRule.check(&file, &ctx(100)).is_empty());
        assert_eq!(
            ColumnLimitRule.check(&file, &ctx(80)),
            vec!["A.java:2 MSG: Line is 99 characters, the limit is 80 characters.".to_string()]
        );
    }

    #[test]
    fn test_import_and_package_exempt() {
        let file = SourceFile::new(
            "A.java",
            format!("package {};\nimport {};\n", "a".repeat(120), "b".repeat(120)),
        );
        assert!(ColumnLimitRule.check(&file, &ctx(100)).is_empty());
    }

    #[test]
    fn test_url_overflow_exempt() {
        let line = format!(" * See https://example.com/{}", "p".repeat(120));
        let file = SourceFile::new("A.java", line);
        assert!(ColumnLimitRule.check(&file, &ctx(100)).is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let file = SourceFile::new("A.java", format!("// {}", "\u{221e}".repeat(97)));
        assert!(ColumnLimitRule.check(&file, &ctx(100)).is_empty());
    }
}
