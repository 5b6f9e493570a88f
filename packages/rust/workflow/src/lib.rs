//! Step parsing for workflow documents.
//!
//! The one canonical step-extraction pipeline: [`segment`] locates
//! `## Step N` sections, [`fields::extract`] pulls their labeled
//! sub-fields, and [`parse_steps`] combines both into [`StepRecord`]s.
//! Every consumer goes through this module; there is deliberately no
//! second extraction path to drift from.

pub mod fields;
pub mod segment;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use docflow_frontmatter::FrontmatterDocument;
use docflow_shared::{StepRecord, Value};

pub use fields::StepFields;
pub use segment::{DEFAULT_STEP_TITLE, RawStep, segment as segment_body};

/// Parse a document body into fielded step records.
///
/// A non-empty body always yields at least one record (the segmenter
/// synthesizes a whole-body step when no headers exist). Records are
/// re-derived wholesale on every call; nothing is cached or patched.
#[instrument(skip(body), fields(len = body.len()))]
pub fn parse_steps(body: &str) -> Vec<StepRecord> {
    let steps: Vec<StepRecord> = segment::segment(body)
        .into_iter()
        .map(|raw| {
            let f = fields::extract(&raw.raw_content);
            StepRecord {
                number: raw.number,
                title: raw.title,
                instruction: f.instruction,
                skills: f.skills,
                tools: f.tools,
                resources: f.resources,
                deliverable: f.deliverable,
                note: f.note,
                uses: f.uses,
            }
        })
        .collect();

    debug!(step_count = steps.len(), "steps parsed");
    steps
}

/// Parse a body, falling back to metadata step titles when the body
/// yields nothing (empty documents whose frontmatter still lists steps).
pub fn parse_steps_with_titles(body: &str, titles: &[String]) -> Vec<StepRecord> {
    let steps = parse_steps(body);
    if !steps.is_empty() || titles.is_empty() {
        return steps;
    }

    debug!(
        title_count = titles.len(),
        "empty body, synthesizing steps from metadata titles"
    );

    titles
        .iter()
        .enumerate()
        .map(|(i, title)| StepRecord {
            number: (i + 1) as u32,
            title: title.clone(),
            instruction: String::new(),
            skills: Vec::new(),
            tools: Vec::new(),
            resources: Vec::new(),
            deliverable: String::new(),
            note: String::new(),
            uses: Default::default(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Whole-document parse
// ---------------------------------------------------------------------------

/// A fully parsed workflow document: frontmatter plus step records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub document: FrontmatterDocument,
    pub steps: Vec<StepRecord>,
}

/// Parse raw document text end to end: frontmatter, then steps.
///
/// When the body has no steps, the frontmatter `steps:` list (if any)
/// supplies fallback titles.
pub fn parse_document(raw: &str) -> ParsedDocument {
    let document = docflow_frontmatter::parse(raw);

    let titles: Vec<String> = document
        .fields
        .get("steps")
        .and_then(Value::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let steps = parse_steps_with_titles(&document.body, &titles);

    ParsedDocument { document, steps }
}
