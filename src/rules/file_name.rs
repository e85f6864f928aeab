use super::{report_error_file_and_line, Rule, RuleContext};
use crate::domain::model::SourceFile;
use crate::java::outline;

/// The file is named after the top-level type it contains, plus `.java`.
pub struct FileNameRule;

impl Rule for FileNameRule {
    fn name(&self) -> &'static str {
        "file_name"
    }

    fn summary(&self) -> &'static str {
        "The source file name consists of the case-sensitive name of the top-level class it \
         contains, plus the .java extension."
    }

    fn check(&self, file: &SourceFile, _ctx: &RuleContext<'_>) -> Vec<String> {
        let mut messages = Vec::new();
        let file_name = file.file_name();

        if !file_name.ends_with(".java") {
            messages.push(format!("{} does not end in .java", file_name));
        }
        if !file_name.chars().next().is_some_and(|c| c.is_uppercase()) {
            messages.push(format!("{} must start with upper case letter.", file_name));
        }

        let stem = file_name.strip_suffix(".java").unwrap_or(file_name);
        if let Ok(tokens) = file.tokens() {
            let tree = outline::parse(tokens);
            let types = tree.top_level_types();
            if !types.is_empty() && !types.contains(&stem) {
                messages.push(format!("{} does not declare a top-level type named {}", file_name, stem));
            }
        }

        messages
            .iter()
            .map(|msg| report_error_file_and_line(&file.local_path, 1, msg))
            .collect()
    }
}
