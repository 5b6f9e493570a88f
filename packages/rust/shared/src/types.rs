//! Core domain types for Docflow workflow documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered frontmatter field map. Keys are unique; writing an
/// existing key replaces its value (last write wins on malformed input).
pub type Fields = IndexMap<String, Value>;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A frontmatter field value.
///
/// Scalars stay strings unless numeric coercion is explicitly requested at
/// parse time; version-like identifiers (`"1.0"`) survive a round-trip by
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A plain string scalar.
    Str(String),
    /// A numeric scalar (only produced by opt-in coercion).
    Num(f64),
    /// A list of strings (inline `[a, b]` or block `- item` arrays).
    List(Vec<String>),
}

impl Value {
    /// The string form of a scalar, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list form, if this is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

// ---------------------------------------------------------------------------
// StepRecord
// ---------------------------------------------------------------------------

/// One `## Step N` section of a workflow document, with labeled sub-fields.
///
/// Numbers are taken verbatim from the source (they may be non-contiguous)
/// and records keep source order. A record is re-derived wholesale on
/// re-parse, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number as written in the header (1-based).
    pub number: u32,
    /// Header title, or a `Step N` placeholder when absent.
    pub title: String,
    /// The `**Instruction:**` text (text fences unwrapped).
    pub instruction: String,
    /// Items from the `**Skills:**` list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    /// Items from the `**Tools:**` list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Items from the `**Resources:**` list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    /// The `**Deliverable:**` text (italic wrapper unwrapped).
    pub deliverable: String,
    /// A standalone `*Note: ...*` run, if present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    /// Classified entries from the `**Uses:**` block.
    #[serde(default, skip_serializing_if = "UsesBlock::is_empty")]
    pub uses: UsesBlock,
}

/// Classified entries of a step's `**Uses:**` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsesBlock {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl UsesBlock {
    /// True when no entries were classified.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.skills.is_empty() && self.references.is_empty()
    }
}

// ---------------------------------------------------------------------------
// StepIo
// ---------------------------------------------------------------------------

/// Inferred inputs and outputs for one step.
///
/// Derived data only: recomputed on demand from instruction/deliverable
/// text, never persisted, never a source of truth. Each list holds 1-3
/// entries; the inference falls back to synthetic placeholders rather
/// than returning an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepIo {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

// ---------------------------------------------------------------------------
// StepConnection
// ---------------------------------------------------------------------------

/// How a step-to-step connection was justified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Lexical overlap between an output and an input phrase.
    Matched,
    /// Fallback edge preserving document order.
    Sequential,
}

/// A directed data-flow edge between two adjacent steps.
///
/// `source_step`/`target_step` are indices into the step list (not step
/// numbers); handles index into the source's outputs and the target's
/// inputs. Every adjacent pair has at least one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConnection {
    pub source_step: usize,
    pub target_step: usize,
    pub source_handle: usize,
    pub target_handle: usize,
    /// The matched output text, or `"Sequential"` for fallback edges.
    pub label: String,
    pub kind: ConnectionKind,
}

// ---------------------------------------------------------------------------
// ReferenceFile
// ---------------------------------------------------------------------------

/// A supplementary attachment associated with a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFile {
    /// Base file name (e.g. `example-deploy.md`).
    pub name: String,
    /// Explicit relative path, when the source provided one. May be empty.
    #[serde(default)]
    pub path: String,
    /// Whether the attachment is markdown (non-markdown files are tracked
    /// by name only).
    #[serde(default)]
    pub is_markdown: bool,
    /// Markdown body; `None` for binary/opaque attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Parsed frontmatter of markdown attachments.
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub frontmatter: Fields,
    /// Subdirectory group derived by the classifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group_path: String,
}

/// One subdirectory tab in the reference taxonomy, with its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdirectoryGroup {
    /// Group path (e.g. `references/examples`).
    pub path: String,
    /// Human-readable tab label.
    pub display_name: String,
    /// Tab icon.
    pub icon: String,
    /// Member files, in input order.
    pub files: Vec<ReferenceFile>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive a display name from a content directory name.
///
/// Workflow directories carry a `workflow_<date>_<seq>_<slug>` prefix; the
/// slug is what gets displayed. Other directories just have their
/// separators replaced.
pub fn display_name(dir_name: &str) -> String {
    if dir_name.starts_with("workflow_") {
        let parts: Vec<&str> = dir_name.split('_').collect();
        if parts.len() >= 4 {
            return parts[3..].join(" ").replace('-', " ");
        }
    }

    dir_name.replace('-', " ").replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_serializes_untagged() {
        let scalar = Value::Str("Demo".into());
        assert_eq!(serde_json::to_string(&scalar).unwrap(), "\"Demo\"");

        let list = Value::List(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[\"a\",\"b\"]");

        let num = Value::Num(2.0);
        let parsed: Value = serde_json::from_str("2.0").unwrap();
        assert_eq!(parsed, num);
    }

    #[test]
    fn connection_kind_names() {
        let edge = StepConnection {
            source_step: 0,
            target_step: 1,
            source_handle: 0,
            target_handle: 0,
            label: "Sequential".into(),
            kind: ConnectionKind::Sequential,
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"kind\":\"sequential\""));

        let parsed: StepConnection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, ConnectionKind::Sequential);
    }

    #[test]
    fn reference_file_defaults() {
        let file: ReferenceFile = serde_json::from_str(r#"{"name":"random.md"}"#).unwrap();
        assert_eq!(file.name, "random.md");
        assert!(file.path.is_empty());
        assert!(file.content.is_none());
        assert!(file.frontmatter.is_empty());
    }

    #[test]
    fn display_name_strips_workflow_prefix() {
        assert_eq!(
            display_name("workflow_20251115_008_deploy_gitthub_workflow"),
            "deploy gitthub workflow"
        );
        assert_eq!(display_name("api-testing-skill"), "api testing skill");
        assert_eq!(display_name("data_pipeline"), "data pipeline");
    }
}
