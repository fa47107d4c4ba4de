//! Markdown for the removal and deprecation checks.

use dtp_diff::{DeprecationReport, RemovalReport, RemovedTokens};

fn checklist(groups: &[RemovedTokens]) -> String {
    groups
        .iter()
        .flat_map(|group| {
            group
                .tokens
                .iter()
                .map(move |token| format!("- [ ] `{token}` in `{}`", group.filename))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn file_issue(filename: &str) -> String {
    format!(
        "### `{filename}`\n\n\
         ⚠️ The previous token file is removed! The main token file should not be fully \
         removed, but tokens should be moved under the deprecated folder instead.\n\n\
         - [ ] Checked if removal is approved."
    )
}

/// `## File Issues` and `## Removed Tokens` sections. Empty for a clean report.
pub fn render_removal_report(report: &RemovalReport) -> String {
    let mut sections = Vec::new();

    if !report.missing_files.is_empty() {
        let issues: Vec<String> = report.missing_files.iter().map(|f| file_issue(f)).collect();
        sections.push(format!("## File Issues\n\n{}", issues.join("\n\n")));
    }

    let mut removed = Vec::new();
    if !report.removed_main.is_empty() {
        removed.push(format!(
            "### Main Tokens\n\n\
             ⚠️ The following tokens are removed from the main tokens files:\n\n{}\n\n\
             Main tokens should be deprecated, not removed.",
            checklist(&report.removed_main)
        ));
    }
    if !report.removed_deprecated.is_empty() {
        removed.push(format!(
            "### Deprecated Tokens\n\n\
             ⚠️ The following tokens are removed from the deprecated tokens files:\n\n{}\n\n\
             Removing deprecated tokens is allowed, but review whether each removal is necessary.",
            checklist(&report.removed_deprecated)
        ));
    }
    if !removed.is_empty() {
        sections.push(format!("## Removed Tokens\n\n{}", removed.join("\n\n")));
    }

    if sections.is_empty() {
        return String::new();
    }
    format!("{}\n", sections.join("\n\n"))
}

/// Warnings about the deprecated folder layout. Empty for a clean report.
pub fn render_deprecation_report(report: &DeprecationReport) -> String {
    let mut lines = Vec::new();
    if !report.orphaned_files.is_empty() {
        lines.push("⚠️ Deprecated folder structure does not match main tokens.".to_string());
        lines.extend(
            report
                .orphaned_files
                .iter()
                .map(|f| format!("- `{f}` has no main counterpart")),
        );
    }
    if !report.deprecated_in_main.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("⚠️ Deprecated tokens found in main tokens.".to_string());
        lines.extend(
            report
                .deprecated_in_main
                .iter()
                .map(|t| format!("- `{}` in `{}`", t.token, t.filename)),
        );
    }
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n", lines.join("\n"))
}
