//! Step segmentation: split a document body into ordered step slices.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Title used for the synthesized record when a body has no step headers.
pub const DEFAULT_STEP_TITLE: &str = "Complete Workflow";

/// Matches `## Step N: Title`, `## Step N`, and the `###` forms.
static STEP_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^#{2,3}[ \t]+Step[ \t]+(\d+)(?::[ \t]*([^\n]*))?[ \t]*$")
        .expect("step header regex")
});

/// An unfielded step slice: header data plus the raw content between this
/// header and the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStep {
    /// Step number verbatim from the header (may be non-contiguous).
    pub number: u32,
    /// Header title, or `Step N` when the header carried none.
    pub title: String,
    /// Content between this header and the next header (or end of body).
    pub raw_content: String,
}

/// Split a body into step slices at `## Step N` / `### Step N` headers.
///
/// Numbers and order are taken literally from the source; a document with
/// steps "1, 3, 2" produces records in that order. A non-empty body with
/// zero headers yields exactly one synthetic record covering the whole
/// body, so callers never see an empty list for a non-empty body.
pub fn segment(body: &str) -> Vec<RawStep> {
    struct Header<'a> {
        number: u32,
        title: Option<&'a str>,
        content_start: usize,
        start: usize,
    }

    let mut headers: Vec<Header> = Vec::new();
    for caps in STEP_HEADER_RE.captures_iter(body) {
        let whole = caps.get(0).expect("match");
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        headers.push(Header {
            number,
            title: caps.get(2).map(|m| m.as_str()),
            content_start: whole.end(),
            start: whole.start(),
        });
    }

    if headers.is_empty() {
        if body.trim().is_empty() {
            return Vec::new();
        }
        debug!("no step headers found, synthesizing single step");
        return vec![RawStep {
            number: 1,
            title: DEFAULT_STEP_TITLE.to_string(),
            raw_content: body.to_string(),
        }];
    }

    let mut steps = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let content_end = headers
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(body.len());

        let title = match header.title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("Step {}", header.number),
        };

        steps.push(RawStep {
            number: header.number,
            title,
            raw_content: body[header.content_start..content_end].trim().to_string(),
        });
    }

    debug!(step_count = steps.len(), "body segmented");
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_two_steps() {
        let body = "## Step 1: Setup\nDo X\n## Step 2: Deploy\nDo Y";
        let steps = segment(body);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].number, 1);
        assert_eq!(steps[0].title, "Setup");
        assert_eq!(steps[0].raw_content, "Do X");
        assert_eq!(steps[1].number, 2);
        assert_eq!(steps[1].title, "Deploy");
        assert_eq!(steps[1].raw_content, "Do Y");
    }

    #[test]
    fn segment_accepts_h3_and_untitled_headers() {
        let body = "### Step 1: First\nA\n### Step 2\nB";
        let steps = segment(body);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "First");
        assert_eq!(steps[1].title, "Step 2");
    }

    #[test]
    fn segment_empty_title_after_colon_gets_placeholder() {
        let steps = segment("## Step 4:\ncontent");
        assert_eq!(steps[0].number, 4);
        assert_eq!(steps[0].title, "Step 4");
    }

    #[test]
    fn segment_preserves_source_numbering_and_order() {
        let body = "## Step 1: A\nx\n## Step 3: C\ny\n## Step 2: B\nz";
        let steps = segment(body);

        let numbers: Vec<u32> = steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 3, 2]);
    }

    #[test]
    fn segment_no_headers_synthesizes_whole_body_step() {
        let body = "Just prose.\n\nNo steps at all.";
        let steps = segment(body);

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].number, 1);
        assert_eq!(steps[0].title, DEFAULT_STEP_TITLE);
        assert_eq!(steps[0].raw_content, body);
    }

    #[test]
    fn segment_empty_body_yields_no_steps() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\n  ").is_empty());
    }

    #[test]
    fn segment_is_idempotent() {
        let body = "## Step 1: A\ncontent\n## Step 2: B\nmore";
        assert_eq!(segment(body), segment(body));
    }

    #[test]
    fn segment_mixed_header_levels() {
        let body = "## Step 1: Collect\nfirst\n### Step 2\nsecond";
        let steps = segment(body);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].raw_content, "first");
        assert_eq!(steps[1].raw_content, "second");
    }
}
