//! Validation grammar and comparison dispatch

use crate::directive::Directive;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Comparison captured by a validation phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    Equal,
    StrictlyEqual,
    DeeplyEqual,
    Match,
    Contain,
    GreaterThan,
    LessThan,
    HaveType,
    HaveMembers,
}

/// Comparison vocabulary. Multi-word phrases must precede their single-word
/// overlaps ("deeply equal" before "equal"): regexp alternation is
/// first-match, so this ordering is a correctness invariant.
pub const VALIDATION_VOCABULARY: &[(&str, ComparisonKind)] = &[
    ("strictly equal", ComparisonKind::StrictlyEqual),
    ("deeply equal", ComparisonKind::DeeplyEqual),
    ("greater than", ComparisonKind::GreaterThan),
    ("less than", ComparisonKind::LessThan),
    ("have member", ComparisonKind::HaveMembers),
    ("have type", ComparisonKind::HaveType),
    ("equal", ComparisonKind::Equal),
    ("match", ComparisonKind::Match),
    ("contain", ComparisonKind::Contain),
    ("above", ComparisonKind::GreaterThan),
    ("below", ComparisonKind::LessThan),
];

static VALIDATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    let vocabulary = VALIDATION_VOCABULARY
        .iter()
        .map(|(phrase, _)| *phrase)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"^(?:is |do |does |to )?(?:(?P<not>not|to not) )?(?:to )?(?:be )?(?:(?P<soft>softly) )?(?P<kind>{vocabulary})(?:s|es)?$"
    ))
    .expect("validation grammar regexp is valid")
});

/// Parse a validation phrase such as `to equal`, `does not contain` or
/// `to be softly above` into a structured directive.
///
/// The whole phrase must match; partial matches are rejected.
pub fn parse_validation(phrase: &str) -> Result<Directive<ComparisonKind>> {
    let captures = VALIDATION_REGEX
        .captures(phrase)
        .ok_or_else(|| Error::UnrecognizedValidation(phrase.to_string()))?;

    let word = captures.name("kind").map(|m| m.as_str()).unwrap_or_default();
    let kind = VALIDATION_VOCABULARY
        .iter()
        .find(|(vocabulary_word, _)| *vocabulary_word == word)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnrecognizedValidation(phrase.to_string()))?;

    Ok(Directive::new(
        kind,
        captures.name("not").is_some(),
        captures.name("soft").is_some(),
        phrase,
    ))
}

impl ComparisonKind {
    /// Apply this comparison, before negation.
    pub fn compare(&self, actual: &Value, expected: &Value) -> Result<bool> {
        match self {
            ComparisonKind::Equal => Ok(loose_eq(actual, expected)),
            ComparisonKind::StrictlyEqual => Ok(actual == expected),
            ComparisonKind::DeeplyEqual => Ok(deep_eq(actual, expected)),
            ComparisonKind::Match => {
                let pattern = Regex::new(&text_of(expected))?;
                Ok(pattern.is_match(&text_of(actual)))
            }
            ComparisonKind::Contain => Ok(contains(actual, expected)),
            ComparisonKind::GreaterThan => Ok(to_number(actual)? > to_number(expected)?),
            ComparisonKind::LessThan => Ok(to_number(actual)? < to_number(expected)?),
            ComparisonKind::HaveType => Ok(type_name(actual) == text_of(expected)),
            ComparisonKind::HaveMembers => Ok(have_members(actual, expected)),
        }
    }

    /// The canonical vocabulary phrase for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonKind::Equal => "equal",
            ComparisonKind::StrictlyEqual => "strictly equal",
            ComparisonKind::DeeplyEqual => "deeply equal",
            ComparisonKind::Match => "match",
            ComparisonKind::Contain => "contain",
            ComparisonKind::GreaterThan => "greater than",
            ComparisonKind::LessThan => "less than",
            ComparisonKind::HaveType => "have type",
            ComparisonKind::HaveMembers => "have member",
        }
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a value the way it reads in a step argument: strings bare,
/// everything else as JSON.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON runtime type tag, as used by `have type` phrases.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn to_number(value: &Value) -> Result<f64> {
    to_f64(value).ok_or_else(|| Error::NotANumber(text_of(value)))
}

/// Type-coercing equality: equal by structure, or equal after numeric
/// coercion of number-like strings and booleans.
fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if deep_eq(actual, expected) {
        return true;
    }
    matches!((to_f64(actual), to_f64(expected)), (Some(a), Some(b)) if a == b)
}

/// Structural equality; numbers compare by numeric value regardless of
/// integer/float representation.
fn deep_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| deep_eq(a, b)))
        }
        _ => actual == expected,
    }
}

/// Substring containment for strings, deep membership for arrays.
fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(s) => s.contains(&text_of(expected)),
        Value::Array(items) => items.iter().any(|item| deep_eq(item, expected)),
        _ => false,
    }
}

/// Every member of the expected array occurs in the actual array.
fn have_members(actual: &Value, expected: &Value) -> bool {
    let (Value::Array(actual), Value::Array(expected)) = (actual, expected) else {
        return false;
    };
    expected
        .iter()
        .all(|member| actual.iter().any(|item| deep_eq(item, member)))
}
