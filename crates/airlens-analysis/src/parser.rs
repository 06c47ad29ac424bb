// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of a [`Classification`] from a raw model reply.
//!
//! The prompt pins the reply to a single JSON object, but models wrap it
//! in prose, markdown fences, or drop JSON entirely. The parser walks the
//! reply for balanced `{...}` candidates and takes the first one that is
//! valid JSON. When the JSON path yields no valid class, a text scan for
//! a spelled-out class ("Class III", "class 2") recovers a degraded
//! classification at reduced confidence. A reply that survives neither
//! path is unparseable.

use std::sync::LazyLock;

use airlens_core::{AirlensError, Classification, MallampatiClass};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Confidence assumed when the reply's JSON omits the field.
const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Confidence assigned to classifications recovered by the text scan.
const FALLBACK_CONFIDENCE: f64 = 0.6;

static CLASS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bclass\s+(iv|iii|ii|i|[1-4])\b").unwrap());

/// Parses a model reply into a [`Classification`].
///
/// The first parseable JSON object is validated for a `mallampatiClass`
/// of exactly 1 through 4. Out-of-range, fractional, and string-typed
/// class values are rejected rather than coerced; rejection falls
/// through to the text scan, and only when that also finds nothing does
/// the reply count as unparseable.
pub fn parse_classification(reply: &str) -> Result<Classification, AirlensError> {
    if let Some(object) = first_json_object(reply)
        && let Some(classification) = classification_from_json(&object)
    {
        return Ok(classification);
    }

    if let Some(class) = scan_class_token(reply) {
        debug!(class = class.number(), "recovered class from reply text");
        return Ok(degraded_classification(class));
    }

    Err(AirlensError::UnparseableResponse)
}

/// Renders a classification back into the flat reply shape.
///
/// Used for debug logging and for asserting that parsed output survives a
/// second parse unchanged.
pub fn canonical_json(classification: &Classification) -> String {
    serde_json::json!({
        "mallampatiClass": classification.class.number(),
        "confidence": classification.confidence,
        "visibleStructures": classification.visible_structures,
        "reasoning": classification.reasoning,
    })
    .to_string()
}

fn classification_from_json(value: &Value) -> Option<Classification> {
    let class = value
        .get("mallampatiClass")
        .and_then(Value::as_f64)
        .filter(|n| n.fract() == 0.0)
        .and_then(|n| MallampatiClass::from_number(n as u8))?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_CONFIDENCE);

    let visible_structures = value
        .get("visibleStructures")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Some(Classification {
        class,
        confidence,
        description: class.description().to_owned(),
        visible_structures,
        reasoning,
        degraded: false,
    })
}

fn degraded_classification(class: MallampatiClass) -> Classification {
    Classification {
        class,
        confidence: FALLBACK_CONFIDENCE,
        description: class.description().to_owned(),
        visible_structures: Vec::new(),
        reasoning: String::new(),
        degraded: true,
    }
}

/// Returns the first balanced `{...}` span that parses as a JSON object.
fn first_json_object(text: &str) -> Option<Value> {
    json_candidates(text)
        .into_iter()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find(Value::is_object)
}

/// Collects balanced `{...}` spans in order of their opening brace.
///
/// Nested spans are collected too, so a valid object buried inside a
/// broken outer one is still found. Braces inside JSON strings do not
/// count toward the balance.
fn json_candidates(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'{'
            && let Some(end) = balanced_end(bytes, i)
        {
            candidates.push(&text[i..=end]);
        }
    }
    candidates
}

fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn scan_class_token(text: &str) -> Option<MallampatiClass> {
    CLASS_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| class_from_token(m.as_str()))
}

fn class_from_token(token: &str) -> Option<MallampatiClass> {
    match token.to_ascii_uppercase().as_str() {
        "I" | "1" => Some(MallampatiClass::I),
        "II" | "2" => Some(MallampatiClass::II),
        "III" | "3" => Some(MallampatiClass::III),
        "IV" | "4" => Some(MallampatiClass::IV),
        _ => None,
    }
}
