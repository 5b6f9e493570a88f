//! Input/output inference from step free text.
//!
//! This is a best-effort heuristic, not a precise parser: it looks for
//! cue words ("requires", "produces", ...) and harvests the short phrase
//! that follows each one. Treat the results as display hints. The cue
//! lists live here and nowhere else; swapping the heuristic must not
//! touch the segmenter or the connection resolver.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use docflow_shared::StepIo;

/// Phrases following these words are candidate inputs.
const INPUT_CUES: [&str; 12] = [
    "requires", "needs", "using", "with", "from", "receives", "takes", "accepts", "given",
    "based on", "input", "provide",
];

/// Phrases following these words are candidate outputs.
const OUTPUT_CUES: [&str; 10] = [
    "produces",
    "creates",
    "generates",
    "outputs",
    "returns",
    "results in",
    "provides",
    "delivers",
    "saves",
    "commits",
];

/// Captures longer than this are treated as noise, not genuine phrases.
const MAX_PHRASE_LEN: usize = 50;

/// Deliverables shorter than this are taken wholesale as an output.
const MAX_LITERAL_DELIVERABLE_LEN: usize = 100;

/// Each list is capped at this many entries.
const MAX_ENTRIES: usize = 3;

static INPUT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_cues(&INPUT_CUES));
static OUTPUT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_cues(&OUTPUT_CUES));

/// Matches `a/an/the <noun phrase>` in long deliverable text.
static NOUN_PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:a|an|the)\s+([a-z\s-]+?)(?:[,.]|$)").expect("noun regex"));

/// One pattern per cue: the cue word, then a short lazy phrase ending at
/// punctuation or end of text. Runs against lowercased instruction text.
fn compile_cues(cues: &[&str]) -> Vec<Regex> {
    cues.iter()
        .map(|cue| {
            Regex::new(&format!(r"{cue}\s+([a-z\s-]+?)(?:[,.]|$)")).expect("cue regex")
        })
        .collect()
}

/// Infer inputs and outputs for one step.
///
/// Both lists come back deduplicated (first occurrence wins) and capped
/// at three entries; when nothing is found they fall back to a synthetic
/// `Step {n-1} output` / `Step {n} result` placeholder, so callers always
/// receive one to three entries per list.
pub fn infer_io(instruction: &str, deliverable: &str, step_number: u32) -> StepIo {
    let text = instruction.to_lowercase();

    let mut inputs = harvest(&text, &INPUT_PATTERNS);
    let mut outputs = harvest(&text, &OUTPUT_PATTERNS);

    if !deliverable.is_empty() {
        if deliverable.chars().count() < MAX_LITERAL_DELIVERABLE_LEN {
            // A concise deliverable is itself the best output description.
            outputs.push(deliverable.to_string());
        } else {
            let lower = deliverable.to_lowercase();
            for caps in NOUN_PHRASE_RE.captures_iter(&lower) {
                let phrase = caps[1].trim();
                if !phrase.is_empty() && phrase.chars().count() < MAX_PHRASE_LEN {
                    outputs.push(phrase.to_string());
                }
            }
        }
    }

    let inputs = dedup_and_cap(inputs);
    let outputs = dedup_and_cap(outputs);

    debug!(
        step = step_number,
        inputs = inputs.len(),
        outputs = outputs.len(),
        "io inferred"
    );

    StepIo {
        inputs: non_empty_or(inputs, || {
            format!("Step {} output", step_number.saturating_sub(1))
        }),
        outputs: non_empty_or(outputs, || format!("Step {step_number} result")),
    }
}

/// Collect phrase captures for every pattern, dropping noise.
fn harvest(text: &str, patterns: &[Regex]) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let phrase = caps[1].trim();
            if !phrase.is_empty() && phrase.chars().count() < MAX_PHRASE_LEN {
                found.push(phrase.to_string());
            }
        }
    }
    found
}

/// First-occurrence dedup, capped at [`MAX_ENTRIES`].
fn dedup_and_cap(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
        if unique.len() == MAX_ENTRIES {
            break;
        }
    }
    unique
}

fn non_empty_or(items: Vec<String>, fallback: impl FnOnce() -> String) -> Vec<String> {
    if items.is_empty() {
        vec![fallback()]
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_from_cue_words() {
        let io = infer_io(
            "Create the report using the manifest file. Produces a summary table.",
            "",
            2,
        );

        assert_eq!(io.inputs, vec!["the manifest file"]);
        assert_eq!(io.outputs, vec!["a summary table"]);
    }

    #[test]
    fn infer_short_deliverable_taken_wholesale() {
        let io = infer_io("Do the thing.", "A validated skill package", 2);
        assert_eq!(io.outputs, vec!["A validated skill package"]);
    }

    #[test]
    fn infer_long_deliverable_mined_for_noun_phrases() {
        let deliverable = "After the full validation pass completes and every reviewer on \
                           the distribution list has approved, this step emits a deployment record.";
        assert!(deliverable.chars().count() >= 100);

        let io = infer_io("", deliverable, 2);
        // The overlong leading clause is discarded as noise; the short
        // trailing noun phrase survives.
        assert_eq!(io.outputs, vec!["deployment record"]);
    }

    #[test]
    fn infer_discards_overlong_captures() {
        // 60+ letters after the cue: noise, not a phrase.
        let instruction = format!("Build it using {}.", "a ".repeat(40));
        let io = infer_io(&instruction, "", 3);
        assert_eq!(io.inputs, vec!["Step 2 output"]);
    }

    #[test]
    fn infer_dedups_and_caps_at_three() {
        let instruction = "Start from the manifest, with the manifest. Also needs a token, \
                           requires a login, takes a password, accepts a cookie.";
        let io = infer_io(instruction, "", 2);

        assert_eq!(io.inputs.len(), 3);
        // "the manifest" is hit by both the `with` and `from` cues but
        // dedup keeps a single occurrence.
        assert_eq!(
            io.inputs.iter().filter(|i| *i == "the manifest").count(),
            1
        );
    }

    #[test]
    fn infer_defaults_when_nothing_found() {
        let io = infer_io("", "", 1);
        assert_eq!(io.inputs, vec!["Step 0 output"]);
        assert_eq!(io.outputs, vec!["Step 1 result"]);

        let io = infer_io("zzz qqq", "", 4);
        assert_eq!(io.inputs, vec!["Step 3 output"]);
        assert_eq!(io.outputs, vec!["Step 4 result"]);
    }

    #[test]
    fn infer_bounds_hold_for_arbitrary_text() {
        let samples = [
            ("", ""),
            ("using a, with b, from c, given d, takes e.", "Out"),
            ("no cues here at all", "x"),
        ];
        for (instruction, deliverable) in samples {
            let io = infer_io(instruction, deliverable, 2);
            assert!((1..=3).contains(&io.inputs.len()), "{instruction:?}");
            assert!((1..=3).contains(&io.outputs.len()), "{instruction:?}");
        }
    }

    #[test]
    fn infer_is_idempotent() {
        let a = infer_io("Create the report using the manifest.", "A report", 2);
        let b = infer_io("Create the report using the manifest.", "A report", 2);
        assert_eq!(a, b);
    }
}
