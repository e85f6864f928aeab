use super::{report_error_file_and_line, Rule, RuleContext};
use crate::domain::model::SourceFile;

/// Whitespace characters other than U+0020, with their Unicode names.
const BANNED_WHITESPACE: &[(char, &str)] = &[
    ('\u{9}', "CHARACTER TABULATION"),
    ('\u{b}', "LINE TABULATION"),
    ('\u{c}', "FORM FEED (FF)"),
    ('\u{d}', "CARRIAGE RETURN (CR)"),
    ('\u{85}', "NEXT LINE (NEL)"),
    ('\u{a0}', "NO-BREAK SPACE"),
    ('\u{1680}', "OGHAM SPACE MARK"),
    ('\u{2000}', "EN QUAD"),
    ('\u{2001}', "EM QUAD"),
    ('\u{2002}', "EN SPACE"),
    ('\u{2003}', "EM SPACE"),
    ('\u{2004}', "THREE-PER-EM SPACE"),
    ('\u{2005}', "FOUR-PER-EM SPACE"),
    ('\u{2006}', "SIX-PER-EM SPACE"),
    ('\u{2007}', "FIGURE SPACE"),
    ('\u{2008}', "PUNCTUATION SPACE"),
    ('\u{2009}', "THIN SPACE"),
    ('\u{200a}', "HAIR SPACE"),
    ('\u{2028}', "LINE SEPARATOR"),
    ('\u{2029}', "PARAGRAPH SEPARATOR"),
    ('\u{202f}', "NARROW NO-BREAK SPACE"),
    ('\u{205f}', "MEDIUM MATHEMATICAL SPACE"),
    ('\u{3000}', "IDEOGRAPHIC SPACE"),
];

pub struct WhitespaceRule;

impl Rule for WhitespaceRule {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn summary(&self) -> &'static str {
        "Aside from the line terminator sequence, the ASCII horizontal space character (0x20) is \
         the only whitespace character that appears anywhere in a source file."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        let mut errors = Vec::new();
        for (line_num, line) in file.lines() {
            for (c, name) in BANNED_WHITESPACE {
                if line.contains(*c) {
                    errors.push(report_error_file_and_line(
                        &file.local_path,
                        line_num,
                        &format!("Contains {}", name),
                    ));
                }
            }
        }
        errors
    }
}
