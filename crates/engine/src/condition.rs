//! Element condition grammar and state dispatch

use crate::directive::Directive;
use crate::error::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target element state captured by a condition phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Present,
    Visible,
    Invisible,
    InViewport,
    Enabled,
    Disabled,
}

/// Condition vocabulary. Multi-word phrases come first: regexp alternation
/// is first-match.
pub const CONDITION_VOCABULARY: &[(&str, ConditionKind)] = &[
    ("in viewport", ConditionKind::InViewport),
    ("present", ConditionKind::Present),
    ("invisible", ConditionKind::Invisible),
    ("visible", ConditionKind::Visible),
    ("enabled", ConditionKind::Enabled),
    ("disabled", ConditionKind::Disabled),
];

static CONDITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    let vocabulary = CONDITION_VOCABULARY
        .iter()
        .map(|(phrase, _)| *phrase)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"^(?:(?P<not>not|to not) )?(?:to )?(?:be )?(?:(?P<soft>softly) )?(?P<kind>{vocabulary})$"
    ))
    .expect("condition grammar regexp is valid")
});

/// Parse a condition phrase such as `to be visible` or
/// `not to be softly present` into a structured directive.
///
/// The whole phrase must match; partial matches are rejected.
pub fn parse_condition(phrase: &str) -> Result<Directive<ConditionKind>> {
    let captures = CONDITION_REGEX
        .captures(phrase)
        .ok_or_else(|| Error::UnrecognizedCondition(phrase.to_string()))?;

    let word = captures.name("kind").map(|m| m.as_str()).unwrap_or_default();
    let kind = CONDITION_VOCABULARY
        .iter()
        .find(|(vocabulary_word, _)| *vocabulary_word == word)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnrecognizedCondition(phrase.to_string()))?;

    Ok(Directive::new(
        kind,
        captures.name("not").is_some(),
        captures.name("soft").is_some(),
        phrase,
    ))
}

/// State probes the engine needs from an element handle.
///
/// Implemented by the embedding automation layer; the engine only reads.
#[async_trait]
pub trait ElementState: Send + Sync {
    async fn is_attached(&self) -> Result<bool>;
    async fn is_visible(&self) -> Result<bool>;
    async fn is_in_viewport(&self) -> Result<bool>;
    async fn is_enabled(&self) -> Result<bool>;
}

impl ConditionKind {
    /// Probe `element` for this condition, before negation is applied.
    pub async fn check<E>(&self, element: &E) -> Result<bool>
    where
        E: ElementState + ?Sized,
    {
        Ok(match self {
            ConditionKind::Present => element.is_attached().await?,
            ConditionKind::Visible => element.is_visible().await?,
            ConditionKind::Invisible => !element.is_visible().await?,
            ConditionKind::InViewport => element.is_in_viewport().await?,
            ConditionKind::Enabled => element.is_enabled().await?,
            ConditionKind::Disabled => !element.is_enabled().await?,
        })
    }

    /// The vocabulary word for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Present => "present",
            ConditionKind::Visible => "visible",
            ConditionKind::Invisible => "invisible",
            ConditionKind::InViewport => "in viewport",
            ConditionKind::Enabled => "enabled",
            ConditionKind::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
