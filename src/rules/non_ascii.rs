use super::{report_error_file_and_line, tokens_or_item, Rule, RuleContext};
use crate::domain::model::SourceFile;
use crate::java::{EscapeKind, Token};
use std::collections::HashSet;

/// Zero-width and bidi formatting characters: invisible when written as is.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{ad}' | '\u{200b}'..='\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2060}'..='\u{2064}' | '\u{feff}'
    ) || (c.is_control() && !c.is_ascii())
}

fn is_printable_non_ascii(c: char) -> bool {
    !c.is_ascii() && !c.is_whitespace() && !is_invisible(c)
}

/// Lines on which a comment ends or starts.
fn commented_lines(tokens: &[Token]) -> HashSet<usize> {
    tokens
        .iter()
        .filter(|t| t.is_comment())
        .flat_map(|t| [t.line, t.end_line()])
        .collect()
}

/// A unicode escape must be the more readable choice: printable characters
/// escaped without an explanatory comment are reported, as are invisible
/// characters written raw.
pub struct NonAsciiRule;

impl Rule for NonAsciiRule {
    fn name(&self) -> &'static str {
        "non_ascii"
    }

    fn summary(&self) -> &'static str {
        "For the remaining non-ASCII characters, either the actual Unicode character (e.g. \u{221e} ) \
         or the equivalent Unicode escape (e.g. \\u221e ) is used, depending only on which makes the \
         code easier to read and understand."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        let tokens = match tokens_or_item(file) {
            Ok(tokens) => tokens,
            Err(item) => return vec![item],
        };
        let commented = commented_lines(tokens);
        let mut errors = Vec::new();

        for token in tokens {
            let Some(literal) = token.literal() else {
                continue;
            };
            for escape in &literal.escapes {
                if escape.kind != EscapeKind::Unicode || !is_printable_non_ascii(escape.value) {
                    continue;
                }
                let line = token.line + literal.raw.chars().take(escape.offset).filter(|c| *c == '\n').count();
                if commented.contains(&line) {
                    continue;
                }
                errors.push(report_error_file_and_line(
                    &file.local_path,
                    line,
                    &format!(
                        "Unicode escape {} is unexplained; use the actual character or add a comment",
                        escape.value
                    ),
                ));
            }
        }

        for (line_num, line) in file.lines() {
            for c in line.chars().filter(|c| is_invisible(*c)) {
                errors.push(report_error_file_and_line(
                    &file.local_path,
                    line_num,
                    &format!("Invisible character U+{:04X} should be written as a unicode escape", c as u32),
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> Vec<String> {
        NonAsciiRule.check(&SourceFile::new("U.java", content), &RuleContext::default())
    }

    #[test]
    fn test_actual_character_is_fine() {
        assert!(check("String unitAbbrev = \"\u{3bc}s\";").is_empty());
    }

    #[test]
    fn test_escape_with_comment_is_fine() {
        assert!(check("String unitAbbrev = \"\\u03bcs\"; // Greek letter mu, \"s\"").is_empty());
    }

    #[test]
    fn test_unexplained_escape_is_reported() {
        assert_eq!(
            check("String unitAbbrev = \"\\u03bcs\";"),
            vec![
                "U.java:1 MSG: Unicode escape \u{3bc} is unexplained; use the actual character or add a comment"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_escaped_non_printables_are_fine() {
        assert!(check("return '\\ufeff' + content;").is_empty());
        assert!(check("String nbsp = \"\\u00a0\";").is_empty());
    }

    #[test]
    fn test_raw_invisible_character_is_reported() {
        assert_eq!(
            check("String s = \"a\u{200b}b\";"),
            vec!["U.java:1 MSG: Invisible character U+200B should be written as a unicode escape".to_string()]
        );
    }
}
