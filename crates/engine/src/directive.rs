//! Parsed assertion directives shared by both grammars

/// Structured result of parsing a condition or validation phrase.
///
/// `negate` and `soft` are independent flags, both false when the phrase
/// carries no marker. The phrase is kept verbatim for failure messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<K> {
    /// Invert the pass/fail outcome.
    pub negate: bool,
    /// Record failures instead of raising them.
    pub soft: bool,
    /// The single kind captured by the grammar.
    pub kind: K,
    /// The phrase as written in the step.
    pub phrase: String,
}

impl<K> Directive<K> {
    pub fn new(kind: K, negate: bool, soft: bool, phrase: impl Into<String>) -> Self {
        Self {
            negate,
            soft,
            kind,
            phrase: phrase.into(),
        }
    }
}
