//! Frontmatter codec for workflow documents.
//!
//! Parses and serializes the restricted YAML subset used by hub documents:
//! scalars, quoted strings, inline `[a, b]` arrays, and block `- item`
//! arrays, fenced by `---` lines. Parsing is fail-soft: input without a
//! well-formed fence pair is returned unchanged as a body with an empty
//! field map, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use docflow_shared::{Fields, Value};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A document split into its frontmatter field map and body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontmatterDocument {
    /// Parsed fields, in source order. Empty when the input had no
    /// frontmatter block.
    pub fields: Fields,
    /// The text following the closing fence (one conventional blank
    /// separator line is consumed; see [`serialize`]).
    pub body: String,
}

/// Options for [`parse_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Coerce numeric-looking scalars to [`Value::Num`].
    ///
    /// Off by default: `"1.0"`-style identifiers must survive a
    /// round-trip as strings.
    pub coerce_numeric_scalars: bool,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches a fenced frontmatter block at the start of the document.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\n(.*?)\n---[ \t]*\n(.*)\z").expect("fence regex")
});

/// Matches an indented `- item` block array line.
static ARRAY_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+-\s+(.+)$").expect("array item regex"));

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a raw document with default options.
pub fn parse(raw: &str) -> FrontmatterDocument {
    parse_with(raw, &ParseOptions::default())
}

/// Parse a raw document into frontmatter fields and body.
///
/// If `raw` does not begin with a `---` fence closed by another `---` on
/// its own line, the whole input becomes the body and the field map is
/// empty. That is the "no frontmatter" case, not an error.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn parse_with(raw: &str, opts: &ParseOptions) -> FrontmatterDocument {
    let Some(caps) = FENCE_RE.captures(raw) else {
        return FrontmatterDocument {
            fields: Fields::new(),
            body: raw.to_string(),
        };
    };

    let block = caps.get(1).map_or("", |m| m.as_str());
    let rest = caps.get(2).map_or("", |m| m.as_str());

    // The serializer emits one blank separator line after the closing
    // fence; consume exactly that much so serialize/parse round-trips.
    let body = rest.strip_prefix('\n').unwrap_or(rest).to_string();

    let mut fields = Fields::new();
    let mut state = ScanState::default();

    for line in block.lines() {
        scan_line(line, &mut fields, &mut state, opts);
    }

    debug!(field_count = fields.len(), "frontmatter parsed");

    FrontmatterDocument { fields, body }
}

/// Accumulator threaded through the line scan. Keeps the parser
/// reentrant: no state outlives a single `parse_with` call.
#[derive(Debug, Default)]
struct ScanState {
    current_key: Option<String>,
    in_array: bool,
}

/// Fold one frontmatter line into the field map.
fn scan_line(line: &str, fields: &mut Fields, state: &mut ScanState, opts: &ParseOptions) {
    // Block array item?
    if let Some(caps) = ARRAY_ITEM_RE.captures(line) {
        // Items outside an open block array are tolerated and dropped.
        if state.in_array {
            if let Some(key) = &state.current_key {
                let item = unquote(caps[1].trim()).to_string();
                match fields.get_mut(key) {
                    Some(Value::List(items)) => items.push(item),
                    // A scalar written before its block items: restart as a list.
                    _ => {
                        fields.insert(key.clone(), Value::List(vec![item]));
                    }
                }
            }
        }
        return;
    }

    // `key: value` line? Keys never start with whitespace.
    if line.starts_with(' ') || line.starts_with('\t') {
        return;
    }
    let Some(colon) = line.find(':') else {
        return;
    };
    if colon == 0 {
        return;
    }

    let key = line[..colon].trim().to_string();
    let value = line[colon + 1..].trim();

    if value.starts_with('[') && value.ends_with(']') {
        // Inline array.
        let inner = &value[1..value.len() - 1];
        let items: Vec<String> = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(|tok| unquote(tok.trim()).to_string())
                .collect()
        };
        fields.insert(key.clone(), Value::List(items));
        state.in_array = false;
    } else if value.is_empty() || value == "|" || value == ">" {
        // Start of a block array (or multiline scalar, treated alike).
        fields.insert(key.clone(), Value::List(Vec::new()));
        state.in_array = true;
    } else {
        let scalar = unquote(value);
        // "nan"/"inf" parse as f64 but are not numeric frontmatter values.
        let coerced = opts
            .coerce_numeric_scalars
            .then(|| scalar.parse::<f64>().ok().filter(|n| n.is_finite()))
            .flatten();
        let parsed = match coerced {
            Some(n) => Value::Num(n),
            None => Value::Str(scalar.to_string()),
        };
        fields.insert(key.clone(), parsed);
        state.in_array = false;
    }

    state.current_key = Some(key);
}

/// Strip one matching pair of surrounding quotes.
fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serialize a field map and body back to raw document text.
///
/// Left inverse of [`parse`]: lists become block arrays with two-space
/// indent, strings are quoted, numbers are emitted bare. The body follows
/// the closing fence after one blank separator line.
pub fn serialize(fields: &Fields, body: &str) -> String {
    let mut out = String::from("---\n");

    for (key, value) in fields {
        match value {
            Value::Str(s) => {
                out.push_str(&format!("{key}: \"{}\"\n", escape_quotes(s)));
            }
            Value::Num(n) => {
                out.push_str(&format!("{key}: {n}\n"));
            }
            Value::List(items) => {
                out.push_str(&format!("{key}:\n"));
                for item in items {
                    out.push_str(&format!("  - {item}\n"));
                }
            }
        }
    }

    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Escape quote characters in a scalar being emitted inside quotes.
fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
