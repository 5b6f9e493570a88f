//! Labeled-field extraction for one step slice.
//!
//! Fields are delimited by bold `**Label:**` markers. A field's span runs
//! from its marker to the earliest following boundary; the boundary set is
//! shared by every field (all recognized labels, `##`/`###` headings, and
//! `---` breaks, evaluated together) so that extracting one field never
//! over-consumes into the next. The `regex` crate has no look-ahead, so
//! the boundary scan is done positionally over a marker index.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use docflow_shared::UsesBlock;

/// Matches any recognized field marker at the start of a line.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\*\*(instruction|skills|tools|resources|deliverable|note|uses):\*\*")
        .expect("label regex")
});

/// Matches non-label boundaries: section headings and thematic breaks.
static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:#{2,3}[ \t]|---[ \t]*$)").expect("break regex"));

/// Matches a `- item` / `* item` bullet line.
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*][ \t]+(.+)$").expect("bullet regex"));

/// Matches a markdown link label `[text]`.
static LINK_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("link label regex"));

/// Matches an instruction wrapped in a ```text fence.
static TEXT_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```(?:text)?[ \t]*\n(.*?)```\z").expect("text fence regex")
});

/// Matches an italic `_..._` run.
static ITALIC_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+)_").expect("italic regex"));

/// Matches a standalone `*Note: ...*` italic run.
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*Note:\s*([^*]+)\*").expect("note regex"));

/// Extracted sub-fields of one step. Missing sections are empty, never
/// absent, so callers need no per-field checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepFields {
    pub instruction: String,
    pub skills: Vec<String>,
    pub tools: Vec<String>,
    pub resources: Vec<String>,
    pub deliverable: String,
    pub note: String,
    pub uses: UsesBlock,
}

/// Extract all labeled fields from a step's raw content.
pub fn extract(raw_content: &str) -> StepFields {
    let index = MarkerIndex::build(raw_content);

    let instruction = index
        .span("instruction")
        .map(unwrap_text_fence)
        .unwrap_or_default();

    let skills = index.span("skills").map(parse_list).unwrap_or_default();
    let tools = index.span("tools").map(parse_list).unwrap_or_default();
    let resources = index.span("resources").map(parse_list).unwrap_or_default();

    let deliverable = index
        .span("deliverable")
        .map(unwrap_italic)
        .unwrap_or_default();

    let note = NOTE_RE
        .captures(raw_content)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    let uses = index.span("uses").map(parse_uses).unwrap_or_default();

    StepFields {
        instruction,
        skills,
        tools,
        resources,
        deliverable,
        note,
        uses,
    }
}

// ---------------------------------------------------------------------------
// Marker index (the shared look-ahead boundary table)
// ---------------------------------------------------------------------------

/// Positions of every label marker and boundary in one step slice.
struct MarkerIndex<'a> {
    content: &'a str,
    /// (lowercased label, marker start, marker end) in source order.
    markers: Vec<(String, usize, usize)>,
    /// Starts of heading/break boundaries.
    breaks: Vec<usize>,
}

impl<'a> MarkerIndex<'a> {
    fn build(content: &'a str) -> Self {
        let markers = LABEL_RE
            .captures_iter(content)
            .map(|caps| {
                let whole = caps.get(0).expect("match");
                (caps[1].to_lowercase(), whole.start(), whole.end())
            })
            .collect();

        let breaks = BREAK_RE.find_iter(content).map(|m| m.start()).collect();

        Self {
            content,
            markers,
            breaks,
        }
    }

    /// The trimmed text between a label's marker and the next boundary.
    fn span(&self, label: &str) -> Option<&'a str> {
        let marker = self.markers.iter().find(|(name, _, _)| name == label)?;
        let content_start = marker.2;

        let end = self
            .markers
            .iter()
            .map(|&(_, start, _)| start)
            .chain(self.breaks.iter().copied())
            .filter(|&pos| pos >= content_start)
            .min()
            .unwrap_or(self.content.len());

        Some(self.content[content_start..end].trim())
    }
}

// ---------------------------------------------------------------------------
// Field shapes
// ---------------------------------------------------------------------------

/// Unwrap an optional ```text fence around an instruction span.
fn unwrap_text_fence(span: &str) -> String {
    match TEXT_FENCE_RE.captures(span) {
        Some(caps) => caps[1].trim().to_string(),
        None => span.to_string(),
    }
}

/// Unwrap the italic `_..._` run of a deliverable span, if present.
fn unwrap_italic(span: &str) -> String {
    match ITALIC_RUN_RE.captures(span) {
        Some(caps) => caps[1].trim().to_string(),
        None => span.to_string(),
    }
}

/// Parse a span as a list: bullet lines first, then link labels, then a
/// comma/newline split.
fn parse_list(span: &str) -> Vec<String> {
    let bullets: Vec<String> = BULLET_RE
        .captures_iter(span)
        .map(|caps| caps[1].trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }

    if span.is_empty() {
        return Vec::new();
    }

    let links: Vec<String> = LINK_LABEL_RE
        .captures_iter(span)
        .map(|caps| caps[1].trim().to_string())
        .collect();
    if !links.is_empty() {
        return links;
    }

    span.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Decompose a `**Uses:**` span into classified sub-lists.
///
/// Lines are stripped of a leading `- ` bullet and classified by their
/// `tools:` / `skills:` / `references:` prefix (case-insensitive); each
/// sub-list is comma-split and trimmed.
fn parse_uses(span: &str) -> UsesBlock {
    let mut uses = UsesBlock::default();

    for line in span.lines() {
        let trimmed = line.trim();
        let trimmed = trimmed
            .strip_prefix('-')
            .map(str::trim_start)
            .unwrap_or(trimmed);
        let lower = trimmed.to_lowercase();

        let (target, rest) = if lower.starts_with("tools:") {
            (&mut uses.tools, &trimmed["tools:".len()..])
        } else if lower.starts_with("skills:") {
            (&mut uses.skills, &trimmed["skills:".len()..])
        } else if lower.starts_with("references:") {
            (&mut uses.references, &trimmed["references:".len()..])
        } else {
            continue;
        };

        target.extend(
            rest.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from),
        );
    }

    uses
}
