//! Intake of upstream response text: bracket-span extraction and bounded
//! repair.
//!
//! The image-understanding service answers with free text that usually
//! wraps a JSON object in prose. Intake takes the span from the first `{`
//! to the last `}` as the parse candidate and, when a strict parse fails,
//! applies a fixed set of repair transforms exactly once before parsing a
//! second and final time. There is no fixpoint iteration and no retry.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::IntakeError;

/// Metadata key under which intake records when the document was processed.
pub const ANALYSIS_TIMESTAMP_KEY: &str = "analysisTimestamp";

/// Untyped document tree recovered from upstream response text.
///
/// Created here, consumed immediately by normalization, never stored.
#[derive(Debug, Clone)]
pub struct RawDocument(Value);

impl RawDocument {
    /// Borrow the underlying JSON tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume into the underlying JSON tree.
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Extract and parse the JSON payload of an upstream response.
///
/// On success the current UTC time is stamped into
/// `metadata.analysisTimestamp`, the one deliberate point of
/// non-determinism in the pipeline.
pub fn parse_response(response_text: &str) -> Result<RawDocument, IntakeError> {
    let candidate = extract_json_span(response_text).ok_or(IntakeError::NoJsonPayload)?;
    debug!(bytes = candidate.len(), "Extracted candidate span");

    let mut root = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value,
        Err(first_error) => {
            let repaired = repair_json(candidate);
            match serde_json::from_str::<Value>(&repaired) {
                Ok(value) => {
                    warn!("Accepted upstream payload after repair pass");
                    value
                }
                Err(_) => {
                    return Err(IntakeError::Unparseable {
                        source: first_error,
                    });
                }
            }
        }
    };

    stamp_timestamp(&mut root);
    Ok(RawDocument(root))
}

/// Take the span from the first `{` to the last `}`, inclusive.
///
/// Not a lexical scan: prose and stray brackets outside the outer braces
/// are tolerated, mismatched braces inside the span are not specially
/// handled.
fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Apply the repair transforms in fixed order, each exactly once.
fn repair_json(candidate: &str) -> String {
    let pass = strip_trailing_commas(candidate);
    let pass = quote_bare_keys(&pass);
    single_to_double_quotes(&pass)
}

/// Remove any comma followed only by whitespace and a closing `}` or `]`.
/// The inside of double-quoted string literals is left untouched.
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if !matches!(chars.get(j), Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Wrap bare identifier-like object keys in double quotes.
///
/// A key candidate is an `[A-Za-z_][A-Za-z0-9_]*` token whose previous
/// significant character is `{` or `,` and whose next significant character
/// is `:`.
fn quote_bare_keys(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut in_string = false;
    let mut escaped = false;
    let mut last_significant = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if c == '"' {
            in_string = true;
            last_significant = Some(c);
            out.push(c);
            i += 1;
            continue;
        }
        if (c.is_ascii_alphabetic() || c == '_') && matches!(last_significant, Some('{' | ',')) {
            let mut j = i;
            while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            let mut k = j;
            while k < chars.len() && chars[k].is_whitespace() {
                k += 1;
            }
            let is_key = matches!(chars.get(k), Some(':'));
            if is_key {
                out.push('"');
            }
            out.extend(&chars[i..j]);
            if is_key {
                out.push('"');
            }
            last_significant = Some(c);
            i = j;
            continue;
        }
        if !c.is_whitespace() {
            last_significant = Some(c);
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Convert single-quoted string literals to double-quoted ones, escaping any
/// embedded `"` and unescaping `\'`.
///
/// Known, accepted risk: an apostrophe inside a single-quoted literal
/// terminates it early and usually corrupts the rest of the span. The
/// corrupted candidate then fails the final parse; no smarter recovery is
/// attempted.
fn single_to_double_quotes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_double = false;
    let mut in_converted = false;
    let mut escaped = false;
    for c in input.chars() {
        if in_double {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_double = false;
            }
            continue;
        }
        if in_converted {
            if escaped {
                escaped = false;
                if c == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(c);
                }
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' {
                out.push('"');
                in_converted = false;
            } else if c == '"' {
                out.push('\\');
                out.push('"');
            } else {
                out.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_double = true;
                out.push(c);
            }
            '\'' => {
                in_converted = true;
                out.push('"');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Stamp the current UTC time into `metadata.analysisTimestamp`, creating
/// the metadata object when absent or not an object.
fn stamp_timestamp(root: &mut Value) {
    let Value::Object(map) = root else {
        return;
    };
    if !map.get("metadata").is_some_and(Value::is_object) {
        map.insert(
            "metadata".to_string(),
            Value::Object(serde_json::Map::new()),
        );
    }
    if let Some(Value::Object(metadata)) = map.get_mut("metadata") {
        metadata.insert(
            ANALYSIS_TIMESTAMP_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }
}
