//! Reference-file classification into the subdirectory taxonomy.
//!
//! Attached reference files arrive as a flat list; the hub displays them
//! under a small fixed set of subdirectory tabs. Files with an explicit
//! multi-segment path keep it; everything else is grouped by filename
//! inference. Group order is part of the contract so tab order stays
//! deterministic across reloads.

use indexmap::IndexMap;
use tracing::debug;

use docflow_shared::{ReferenceFile, SubdirectoryGroup};

/// Root group for ungrouped reference files.
pub const REFERENCES: &str = "references";
/// Worked examples (`example-*`, `*-example`).
pub const EXAMPLES: &str = "references/examples";
/// Format specs, conventions, and guidelines.
pub const FORMAT_STANDARDS: &str = "references/format-standards";
/// Process descriptions and recurring patterns.
pub const PROCESS_PATTERNS: &str = "references/process-patterns";
/// System prompt material.
pub const SYSTEM_PROMPTS: &str = "references/system-prompts";

/// Group a flat reference-file list into ordered subdirectory groups.
///
/// Files keep their input order within a group; groups come back in the
/// fixed taxonomy priority with unknown paths last (stable otherwise).
/// Calling twice on the same input yields identical order and
/// membership.
pub fn classify(files: Vec<ReferenceFile>) -> Vec<SubdirectoryGroup> {
    let mut by_path: IndexMap<String, Vec<ReferenceFile>> = IndexMap::new();

    for mut file in files {
        let group = group_path_for(&file);
        file.group_path = group.clone();
        by_path.entry(group).or_default().push(file);
    }

    let mut groups: Vec<SubdirectoryGroup> = by_path
        .into_iter()
        .map(|(path, files)| {
            let (display_name, icon) = display_for(&path);
            SubdirectoryGroup {
                path,
                display_name,
                icon,
                files,
            }
        })
        .collect();

    // Stable sort: unknown paths keep first-seen order after the fixed
    // taxonomy.
    groups.sort_by_key(|g| priority(&g.path));

    debug!(group_count = groups.len(), "references classified");
    groups
}

/// The group a single file belongs to.
///
/// An explicit path with more than one segment wins; otherwise the group
/// is inferred from the filename.
pub fn group_path_for(file: &ReferenceFile) -> String {
    if !file.path.is_empty() {
        let segments: Vec<&str> = file.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() > 1 {
            return segments[..segments.len() - 1].join("/");
        }
    }

    infer_group(&file.name).to_string()
}

/// Ordered filename pattern table; first match wins.
fn infer_group(name: &str) -> &'static str {
    let name = name.to_lowercase();
    let stem = name.strip_suffix(".md").unwrap_or(&name);

    if name.starts_with("example-") || stem.ends_with("-example") {
        return EXAMPLES;
    }
    if name.contains("-spec")
        || name.contains("-conventions")
        || name.contains("-guidelines")
        || name.starts_with("format-")
    {
        return FORMAT_STANDARDS;
    }
    if name.contains("best-practices")
        || name.contains("common-patterns")
        || name.contains("-process")
        || name.contains("patterns")
    {
        return PROCESS_PATTERNS;
    }
    if name.contains("prompt") {
        return SYSTEM_PROMPTS;
    }

    REFERENCES
}

/// Display name and icon for a group path. Unknown paths fall back to
/// their last segment and a generic icon.
fn display_for(path: &str) -> (String, String) {
    let (name, icon) = match path {
        REFERENCES => ("Guides", "\u{1F4DA}"),
        EXAMPLES => ("Examples", "\u{1F4A1}"),
        FORMAT_STANDARDS => ("Standards", "\u{1F4DD}"),
        PROCESS_PATTERNS => ("Patterns", "\u{1F504}"),
        SYSTEM_PROMPTS | "references/prompts" => ("Prompts", "\u{1F916}"),
        _ => {
            let last = path.rsplit('/').next().unwrap_or(path);
            return (last.to_string(), "\u{1F4C1}".to_string());
        }
    };
    (name.to_string(), icon.to_string())
}

/// Fixed taxonomy sort priority; unknown paths sort last.
fn priority(path: &str) -> usize {
    match path {
        REFERENCES => 0,
        EXAMPLES => 1,
        FORMAT_STANDARDS => 2,
        PROCESS_PATTERNS => 3,
        SYSTEM_PROMPTS | "references/prompts" => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ReferenceFile {
        ReferenceFile {
            name: name.into(),
            ..Default::default()
        }
    }

    fn at_path(name: &str, path: &str) -> ReferenceFile {
        ReferenceFile {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    #[test]
    fn classify_by_filename_in_priority_order() {
        let groups = classify(vec![
            named("example-deploy.md"),
            named("naming-conventions.md"),
            named("random.md"),
        ]);

        let paths: Vec<&str> = groups.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["references", "references/examples", "references/format-standards"]
        );
        assert_eq!(groups[0].files[0].name, "random.md");
    }

    #[test]
    fn explicit_multi_segment_path_wins_over_filename() {
        let groups = classify(vec![at_path(
            "example-deploy.md",
            "references/format-standards/example-deploy.md",
        )]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].path, "references/format-standards");
    }

    #[test]
    fn single_segment_path_falls_back_to_filename_inference() {
        let groups = classify(vec![at_path("example-deploy.md", "example-deploy.md")]);
        assert_eq!(groups[0].path, EXAMPLES);
    }

    #[test]
    fn filename_pattern_table_first_match_wins() {
        // `example-` beats the `-spec` rule.
        assert_eq!(group_path_for(&named("example-spec.md")), EXAMPLES);
        // `patterns` is checked before `prompt`.
        assert_eq!(group_path_for(&named("prompt-patterns.md")), PROCESS_PATTERNS);
    }

    #[test]
    fn filename_patterns_cover_taxonomy() {
        assert_eq!(group_path_for(&named("deploy-example.md")), EXAMPLES);
        assert_eq!(group_path_for(&named("format-reference.md")), FORMAT_STANDARDS);
        assert_eq!(group_path_for(&named("quality-guidelines.md")), FORMAT_STANDARDS);
        assert_eq!(group_path_for(&named("best-practices.md")), PROCESS_PATTERNS);
        assert_eq!(
            group_path_for(&named("generation-process.md")),
            PROCESS_PATTERNS
        );
        assert_eq!(group_path_for(&named("system-prompt.md")), SYSTEM_PROMPTS);
        assert_eq!(group_path_for(&named("README.md")), REFERENCES);
    }

    #[test]
    fn display_table_and_icons() {
        let groups = classify(vec![
            named("deploy-guide.md"),
            named("example-deploy.md"),
            named("workflow-format-spec.md"),
            named("common-patterns.md"),
            named("deploy-prompt.md"),
        ]);

        let labels: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.display_name.as_str(), g.icon.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Guides", "\u{1F4DA}"),
                ("Examples", "\u{1F4A1}"),
                ("Standards", "\u{1F4DD}"),
                ("Patterns", "\u{1F504}"),
                ("Prompts", "\u{1F916}"),
            ]
        );
    }

    #[test]
    fn unknown_path_gets_generic_display() {
        let groups = classify(vec![at_path("notes.md", "archive/old/notes.md")]);

        assert_eq!(groups[0].path, "archive/old");
        assert_eq!(groups[0].display_name, "old");
        assert_eq!(groups[0].icon, "\u{1F4C1}");
    }

    #[test]
    fn unknown_paths_sort_last_and_stay_stable() {
        let groups = classify(vec![
            at_path("b.md", "zeta/b.md"),
            at_path("a.md", "alpha/a.md"),
            named("example-x.md"),
        ]);

        let paths: Vec<&str> = groups.iter().map(|g| g.path.as_str()).collect();
        // Taxonomy first, then unknowns in first-seen order.
        assert_eq!(paths, vec!["references/examples", "zeta", "alpha"]);
    }

    #[test]
    fn group_path_recorded_on_files() {
        let groups = classify(vec![named("example-deploy.md")]);
        assert_eq!(groups[0].files[0].group_path, EXAMPLES);
    }

    #[test]
    fn classify_is_deterministic() {
        let files = vec![
            named("example-deploy.md"),
            named("naming-conventions.md"),
            named("random.md"),
            at_path("nested.md", "references/system-prompts/nested.md"),
        ];

        let first = classify(files.clone());
        let second = classify(files);
        assert_eq!(first, second);
    }

    #[test]
    fn files_keep_input_order_within_group() {
        let groups = classify(vec![
            named("one.md"),
            named("two.md"),
            named("three.md"),
        ]);

        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["one.md", "two.md", "three.md"]);
    }
}
