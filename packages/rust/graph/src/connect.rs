//! Data-flow connection resolution between adjacent steps.

use tracing::debug;

use docflow_shared::{ConnectionKind, StepConnection, StepIo};

/// Minimum token length for the shared-word match.
const MIN_COMMON_WORD_LEN: usize = 3;

/// Resolve directed edges between each adjacent step pair.
///
/// Every output of step `i` is crossed against every input of step
/// `i + 1`; lexical overlap (substring either way, or a shared token of
/// three-plus characters) produces a `Matched` edge labelled with the
/// output text. A pair with no matches gets exactly one `Sequential`
/// fallback edge, so the result always has full step-to-step
/// connectivity: at least one edge per adjacent pair, possibly many.
pub fn resolve_connections(steps: &[StepIo]) -> Vec<StepConnection> {
    let mut connections: Vec<StepConnection> = Vec::new();

    for i in 0..steps.len().saturating_sub(1) {
        let current = &steps[i];
        let next = &steps[i + 1];
        let before = connections.len();

        for (out_idx, output) in current.outputs.iter().enumerate() {
            for (in_idx, input) in next.inputs.iter().enumerate() {
                if phrases_overlap(output, input) {
                    connections.push(StepConnection {
                        source_step: i,
                        target_step: i + 1,
                        source_handle: out_idx,
                        target_handle: in_idx,
                        label: output.clone(),
                        kind: ConnectionKind::Matched,
                    });
                }
            }
        }

        // No lexical match for this pair: preserve document order with a
        // generic edge.
        if connections.len() == before {
            connections.push(StepConnection {
                source_step: i,
                target_step: i + 1,
                source_handle: 0,
                target_handle: 0,
                label: "Sequential".to_string(),
                kind: ConnectionKind::Sequential,
            });
        }
    }

    debug!(
        step_count = steps.len(),
        edge_count = connections.len(),
        "connections resolved"
    );

    connections
}

/// Case-insensitive substring either way, or a shared word.
fn phrases_overlap(output: &str, input: &str) -> bool {
    let output = output.to_lowercase();
    let input = input.to_lowercase();

    output.contains(&input)
        || input.contains(&output)
        || has_common_word(&output, &input, MIN_COMMON_WORD_LEN)
}

/// True when the two phrases share a whitespace token of at least
/// `min_len` characters (exact token equality).
fn has_common_word(a: &str, b: &str, min_len: usize) -> bool {
    let words_a: Vec<&str> = a
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .collect();

    b.split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .any(|wb| words_a.iter().any(|wa| *wa == wb))
}
