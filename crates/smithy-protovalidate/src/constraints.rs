//! The constraint model shared by every stage of the pipeline.
//!
//! Bounds are kept as the literal text found in the Smithy source (`"1"`,
//! `"-40"`, `"0.5"`) so they can be emitted into `.proto` options verbatim.

/// Optional bounds for string length, numeric range, collection length, plus
/// the uniqueness flag.
///
/// `@length` populates both the string and repeated bounds; which pair ends up
/// in the output is decided by the shape of the target field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub str_min: Option<String>,
    pub str_max: Option<String>,
    pub num_min: Option<String>,
    pub num_max: Option<String>,
    pub rep_min: Option<String>,
    pub rep_max: Option<String>,
    pub unique: bool,
}

impl Constraints {
    /// `true` iff no bound is set and `unique` is false.
    pub fn is_empty(&self) -> bool {
        self.str_min.is_none()
            && self.str_max.is_none()
            && self.num_min.is_none()
            && self.num_max.is_none()
            && self.rep_min.is_none()
            && self.rep_max.is_none()
            && !self.unique
    }

    /// Merge `other` on top of `self`.
    ///
    /// Each bound takes `other`'s value when present and keeps `self`'s
    /// otherwise; `unique` is OR-ed. Operand order matters: member-level
    /// traits are merged as `other` over alias-level traits.
    pub fn merge(&self, other: &Constraints) -> Constraints {
        fn pick(base: &Option<String>, over: &Option<String>) -> Option<String> {
            over.clone().or_else(|| base.clone())
        }

        Constraints {
            str_min: pick(&self.str_min, &other.str_min),
            str_max: pick(&self.str_max, &other.str_max),
            num_min: pick(&self.num_min, &other.num_min),
            num_max: pick(&self.num_max, &other.num_max),
            rep_min: pick(&self.rep_min, &other.rep_min),
            rep_max: pick(&self.rep_max, &other.rep_max),
            unique: self.unique || other.unique,
        }
    }

    /// A constraint produced by `@length(min, max)`.
    pub fn length(min: Option<String>, max: Option<String>) -> Self {
        Constraints {
            str_min: min.clone(),
            str_max: max.clone(),
            rep_min: min,
            rep_max: max,
            ..Default::default()
        }
    }

    /// A constraint produced by `@range(min, max)`.
    pub fn range(min: Option<String>, max: Option<String>) -> Self {
        Constraints {
            num_min: min,
            num_max: max,
            ..Default::default()
        }
    }

    /// A constraint produced by `@uniqueItems`.
    pub fn unique_items() -> Self {
        Constraints {
            unique: true,
            ..Default::default()
        }
    }
}
