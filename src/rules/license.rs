use super::{report_error_file_and_line, Rule, RuleContext};
use crate::domain::model::SourceFile;

/// License or copyright information, when configured, opens the file.
pub struct LicenseRule;

impl Rule for LicenseRule {
    fn name(&self) -> &'static str {
        "license"
    }

    fn summary(&self) -> &'static str {
        "If license or copyright information belongs in a file, it belongs here."
    }

    fn check(&self, file: &SourceFile, ctx: &RuleContext<'_>) -> Vec<String> {
        match ctx.license {
            Some(license) if !file.content.starts_with(license) => {
                vec![report_error_file_and_line(
                    &file.local_path,
                    1,
                    &format!("Beginning of file does not match the following:\n{}", license),
                )]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "/*\n * Distributed under terms of the MIT license.\n */\n";

    #[test]
    fn test_no_license_configured() {
        let file = SourceFile::new("A.java", "class A {}");
        assert!(LicenseRule.check(&file, &RuleContext::default()).is_empty());
    }

    #[test]
    fn test_license_must_open_the_file() {
        let ctx = RuleContext {
            license: Some(HEADER),
            ..RuleContext::default()
        };
        let good = SourceFile::new("A.java", format!("{}class A {{}}\n", HEADER));
        assert!(LicenseRule.check(&good, &ctx).is_empty());

        let bad = SourceFile::new("A.java", format!("\n{}class A {{}}\n", HEADER));
        assert_eq!(
            LicenseRule.check(&bad, &ctx),
            vec![format!("A.java:1 MSG: Beginning of file does not match the following:\n{}", HEADER)]
        );
    }

    #[test]
    fn test_items_name_each_unlicensed_file() {
        let ctx = RuleContext {
            license: Some("// MIT\n"),
            ..RuleContext::default()
        };
        let files = [
            SourceFile::new("a/Good.java", "// MIT\nclass Good {}\n"),
            SourceFile::new("b/Bad.java", "class Bad {}\n"),
            SourceFile::new("c/Worse.java", "class Worse {}\n"),
        ];
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(LicenseRule)];
        let results = crate::rules::check_files(&rules, &files, &ctx, crate::domain::model::ResultLevel::Error);
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].items,
            vec![
                "b/Bad.java:1 MSG: Beginning of file does not match the following:\n// MIT\n",
                "c/Worse.java:1 MSG: Beginning of file does not match the following:\n// MIT\n",
            ]
        );
    }
}
