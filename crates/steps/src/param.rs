//! Cucumber parameter types binding the engine grammars
//!
//! Step expressions use `{validation}` and `{state}` placeholders; the
//! regexes here pre-filter candidate phrases and `FromStr` delegates to the
//! engine parsers, so a phrase that matches always parses.

use cucumber::Parameter;
use std::str::FromStr;
use stepwright_engine::{
    parse_condition, parse_validation, ComparisonKind, ConditionKind, Directive, Error,
};

/// A `{validation}` step parameter: a comparison phrase parsed into a
/// directive, e.g. `to equal`, `does not contain`, `to be softly above`.
#[derive(Debug, Parameter)]
#[param(
    name = "validation",
    regex = r"(?:is |do |does |to )?(?:not |to not )?(?:to )?(?:be )?(?:softly )?(?:strictly equal|deeply equal|greater than|less than|have member|have type|equal|match|contain|above|below)(?:s|es)?"
)]
pub struct Validation(pub Directive<ComparisonKind>);

impl FromStr for Validation {
    type Err = Error;

    fn from_str(phrase: &str) -> Result<Self, Self::Err> {
        parse_validation(phrase).map(Self)
    }
}

/// A `{state}` step parameter: an element condition phrase parsed into a
/// directive, e.g. `to be visible`, `not to be present`.
#[derive(Debug, Parameter)]
#[param(
    name = "state",
    regex = r"(?:not |to not )?(?:to )?(?:be )?(?:softly )?(?:present|invisible|visible|in viewport|enabled|disabled)"
)]
pub struct State(pub Directive<ConditionKind>);

impl FromStr for State {
    type Err = Error;

    fn from_str(phrase: &str) -> Result<Self, Self::Err> {
        parse_condition(phrase).map(Self)
    }
}
