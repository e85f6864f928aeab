use super::{report_error_file_and_line, tokens_or_item, Rule, RuleContext};
use crate::domain::model::SourceFile;
use crate::java::EscapeKind;

/// Characters with a special escape use it rather than an octal or unicode escape.
pub struct SpecialEscapesRule;

impl Rule for SpecialEscapesRule {
    fn name(&self) -> &'static str {
        "special_escapes"
    }

    fn summary(&self) -> &'static str {
        "For any character that has a special escape sequence ( \\b, \\t, \\n, \\f, \\r, \\\", \\', \
         \\\\ ), that sequence is used rather than the corresponding octal (e.g. \\012 ) or Unicode \
         (e.g. \\u000a ) escape."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        let tokens = match tokens_or_item(file) {
            Ok(tokens) => tokens,
            Err(item) => return vec![item],
        };

        let mut errors = Vec::new();
        for token in tokens {
            let Some(literal) = token.literal() else {
                continue;
            };
            for escape in &literal.escapes {
                let Some(preferred) = escape.preferred() else {
                    continue;
                };
                let form = match escape.kind {
                    EscapeKind::Octal => "octal",
                    EscapeKind::Unicode => "unicode",
                    EscapeKind::Simple => continue,
                };
                // Text blocks span lines; count the ones before the escape.
                let line = token.line + literal.raw.chars().take(escape.offset).filter(|c| *c == '\n').count();
                errors.push(report_error_file_and_line(
                    &file.local_path,
                    line,
                    &format!(
                        "Should have used \\{} instead of the {} {}",
                        preferred, form, escape.raw
                    ),
                ));
            }
        }
        errors
    }
}
