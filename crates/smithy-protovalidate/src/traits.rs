//! Textual Smithy trait extraction.
//!
//! A "trait" here is `@identifier` followed by any text up to the next `@`,
//! `{` or `}`. Only `@length`, `@range` and `@uniqueItems` are understood;
//! anything else is skipped.

use crate::constraints::Constraints;
use regex::Regex;
use std::sync::OnceLock;

fn trait_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(\w+)([^@{}]*)").expect("trait regex"))
}

fn min_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bmin\s*:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("min regex"))
}

fn max_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bmax\s*:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("max regex"))
}

/// Which supported trait an `@identifier` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    Length,
    Range,
    UniqueItems,
}

impl TraitKind {
    pub fn from_identifier(ident: &str) -> Option<Self> {
        match ident {
            "length" => Some(Self::Length),
            "range" => Some(Self::Range),
            "uniqueItems" => Some(Self::UniqueItems),
            _ => None,
        }
    }
}

fn capture(re: &Regex, args: &str) -> Option<String> {
    re.captures(args)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collect every supported trait in `span` into a single constraint value.
///
/// Traits accumulate left to right through [`Constraints::merge`], so a later
/// `@length(max: ..)` overrides an earlier one while keeping the earlier `min`.
pub fn gather_constraints(span: &str) -> Constraints {
    let mut acc = Constraints::default();

    for caps in trait_re().captures_iter(span) {
        let ident = &caps[1];
        let args = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let partial = match TraitKind::from_identifier(ident) {
            Some(TraitKind::Length) => {
                Constraints::length(capture(min_re(), args), capture(max_re(), args))
            }
            Some(TraitKind::Range) => {
                Constraints::range(capture(min_re(), args), capture(max_re(), args))
            }
            Some(TraitKind::UniqueItems) => Constraints::unique_items(),
            None => continue,
        };

        acc = acc.merge(&partial);
    }

    acc
}
