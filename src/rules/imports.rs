use super::{report_error_file_and_line, Rule, RuleContext};
use crate::domain::model::SourceFile;
use crate::java::outline;
use std::collections::BTreeMap;

const IMPORT_PREFIX: &str = "import ";

/// Wildcard imports, static or otherwise, are not used.
pub struct WildcardImportsRule;

impl Rule for WildcardImportsRule {
    fn name(&self) -> &'static str {
        "wildcard_imports"
    }

    fn summary(&self) -> &'static str {
        "Wildcard imports, static or otherwise, are not used."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        file.lines()
            .filter(|(_, line)| line.starts_with(IMPORT_PREFIX) && line.contains('*'))
            .map(|(line_num, line)| report_error_file_and_line(&file.local_path, line_num, line))
            .collect()
    }
}

#[derive(Debug, Clone)]
struct ImportLine<'a> {
    text: &'a str,
    line_num: usize,
}

impl<'a> ImportLine<'a> {
    fn is_static(&self) -> bool {
        self.text[IMPORT_PREFIX.len()..].trim_start().starts_with("static ")
    }

    /// The imported name, without `static` or the semicolon.
    fn name(&self) -> &'a str {
        let rest = self.text[IMPORT_PREFIX.len()..].trim_start();
        let rest = rest.strip_prefix("static ").unwrap_or(rest).trim_start();
        rest.trim_end().trim_end_matches(';').trim_end()
    }

    fn top_level_package(&self) -> &'a str {
        self.name().split('.').next().unwrap_or_default()
    }
}

/// The import block as written, with blank lines where the source has gaps.
fn original_imports(imports: &[ImportLine<'_>]) -> String {
    let mut result = String::new();
    let mut previous = match imports.first() {
        Some(first) => first.line_num,
        None => return result,
    };
    for import in imports {
        for _ in previous..import.line_num {
            result.push('\n');
        }
        result.push_str(import.text);
        previous = import.line_num;
    }
    result
}

/// The canonical import block for a file in `package`.
fn sorted_imports(imports: &[ImportLine<'_>], package: Option<&str>) -> String {
    let in_google = package.is_some_and(|p| p == "com.google" || p.starts_with("com.google."));
    let is_google = |name: &str| name == "com.google" || name.starts_with("com.google.");

    let mut statics = Vec::new();
    let mut google = Vec::new();
    let mut third_party: BTreeMap<&str, Vec<&ImportLine<'_>>> = BTreeMap::new();
    let mut java = Vec::new();
    let mut javax = Vec::new();

    for import in imports {
        if import.is_static() {
            statics.push(import);
        } else if in_google && is_google(import.name()) {
            google.push(import);
        } else {
            match import.top_level_package() {
                "java" => java.push(import),
                "javax" => javax.push(import),
                top => third_party.entry(top).or_default().push(import),
            }
        }
    }

    let mut groups = vec![statics, google];
    groups.extend(third_party.into_values());
    groups.push(java);
    groups.push(javax);

    groups
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|mut group| {
            group.sort_by(|a, b| a.name().cmp(b.name()));
            group.iter().map(|i| i.text).collect::<Vec<_>>().join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn indented(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Import statements are grouped and ordered: static imports, `com.google`
/// imports (only inside `com.google`), one group per third-party top-level
/// package, `java`, then `javax`, each group ASCII sorted and separated by
/// one blank line.
pub struct ImportOrderRule;

impl Rule for ImportOrderRule {
    fn name(&self) -> &'static str {
        "import_order"
    }

    fn summary(&self) -> &'static str {
        "Import statements are divided into the following groups, in this order, with each group \
         separated by a single line: static imports, com.google imports, third-party imports, java \
         imports, javax imports."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        let imports: Vec<ImportLine<'_>> = file
            .lines()
            .filter(|(_, line)| line.starts_with(IMPORT_PREFIX))
            .map(|(line_num, text)| ImportLine { text, line_num })
            .collect();

        let Some(first) = imports.first() else {
            return Vec::new();
        };

        let tree = file.tokens().ok().map(outline::parse);
        let package = tree.as_ref().and_then(|tree| tree.package());
        let expected = sorted_imports(&imports, package);
        if original_imports(&imports) == expected {
            return Vec::new();
        }

        vec![report_error_file_and_line(
            &file.local_path,
            first.line_num,
            &format!(
                "Imports were not in correct format. Change the imports to the following sorted \
                 import format:\n{}",
                indented(&expected, 4)
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> Vec<String> {
        ImportOrderRule.check(&SourceFile::new("I.java", content), &RuleContext::default())
    }

    #[test]
    fn test_wildcards() {
        let file = SourceFile::new("I.java", "import java.util.*;\nimport java.io.File;\nimport static org.junit.Assert.*;\n");
        assert_eq!(
            WildcardImportsRule.check(&file, &RuleContext::default()),
            vec![
                "I.java:1 MSG: import java.util.*;".to_string(),
                "I.java:3 MSG: import static org.junit.Assert.*;".to_string(),
            ]
        );
    }

    #[test]
    fn test_well_ordered_imports_pass() {
        let content = "package com.example;\n\
                       \n\
                       import static org.junit.Assert.assertEquals;\n\
                       \n\
                       import android.os.Bundle;\n\
                       \n\
                       import com.google.common.base.Strings;\n\
                       import com.squareup.Foo;\n\
                       \n\
                       import org.apache.Thing;\n\
                       \n\
                       import java.util.List;\n\
                       import java.util.Map;\n\
                       \n\
                       import javax.inject.Inject;\n\
                       \n\
                       class A {}\n";
        assert!(check(content).is_empty(), "{:?}", check(content));
    }

    #[test]
    fn test_com_google_group_inside_google_package() {
        let content = "package com.google.app;\n\
                       import com.google.common.base.Strings;\n\
                       \n\
                       import org.apache.Thing;\n";
        assert!(check(content).is_empty());
    }

    #[test]
    fn test_package_read_from_declaration_after_comment() {
        let content = "/* generated */ package com.google.app;\n\
                       import com.google.common.base.Strings;\n\
                       \n\
                       import org.apache.Thing;\n";
        assert!(check(content).is_empty(), "{:?}", check(content));

        let outside = "/* generated */ package com.example;\n\
                       import com.google.common.base.Strings;\n\
                       \n\
                       import org.apache.Thing;\n";
        assert_eq!(check(outside).len(), 1);
    }

    #[test]
    fn test_names_sort_without_semicolons() {
        // As whole statements "Foo;" sorts after "Foo.Bar;"; as names "Foo" comes first.
        let content = "import com.example.Foo;\nimport com.example.Foo.Bar;\n";
        assert!(check(content).is_empty());
    }

    #[test]
    fn test_misordered_imports_reported() {
        let content = "package com.example;\n\
                       \n\
                       import java.util.Map;\n\
                       import java.util.List;\n\
                       import org.apache.Thing;\n\
                       import static org.junit.Assert.assertEquals;\n";
        let items = check(content);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0],
            "I.java:3 MSG: Imports were not in correct format. Change the imports to the following \
             sorted import format:\n    \
             import static org.junit.Assert.assertEquals;\n    \n    \
             import org.apache.Thing;\n    \n    \
             import java.util.List;\n    \
             import java.util.Map;"
        );
    }

    #[test]
    fn test_extra_blank_line_inside_group_reported() {
        let content = "import java.util.List;\n\nimport java.util.Map;\n";
        assert_eq!(check(content).len(), 1);
    }

    #[test]
    fn test_no_imports() {
        assert!(check("class A {}\n").is_empty());
    }
}
