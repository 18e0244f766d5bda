//! Rendering protovalidate field options from a resolved constraint.

use crate::constraints::Constraints;

/// Qualifier of the protovalidate field-option extension.
pub const FIELD_OPTION: &str = "(buf.validate.field)";

/// Numeric rule family, chosen from the declared proto scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericCategory {
    Double,
    Float,
    Int64,
    Int32,
}

impl NumericCategory {
    /// `double` and `float` map to themselves, any type ending in `64`
    /// (`int64`, `uint64`, `sfixed64`, ...) to `int64`, everything else to `int32`.
    pub fn from_proto_type(ty: &str) -> Self {
        match ty {
            "double" => Self::Double,
            "float" => Self::Float,
            t if t.ends_with("64") => Self::Int64,
            _ => Self::Int32,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Int32 => "int32",
        }
    }
}

/// Unqualified rule assignments (`string.min_len = 1`, ...) applicable to a
/// field of type `ty`, in emission order.
pub fn field_rules(ty: &str, repeated: bool, c: &Constraints) -> Vec<String> {
    let mut rules = Vec::new();

    if repeated {
        if let Some(min) = &c.rep_min {
            rules.push(format!("repeated.min_items = {min}"));
        }
        if let Some(max) = &c.rep_max {
            rules.push(format!("repeated.max_items = {max}"));
        }
        if c.unique {
            rules.push("repeated.unique = true".to_string());
        }
    } else if ty == "string" {
        if let Some(min) = &c.str_min {
            rules.push(format!("string.min_len = {min}"));
        }
        if let Some(max) = &c.str_max {
            rules.push(format!("string.max_len = {max}"));
        }
    } else {
        let cat = NumericCategory::from_proto_type(ty).as_str();
        if let Some(min) = &c.num_min {
            rules.push(format!("{cat}.gte = {min}"));
        }
        if let Some(max) = &c.num_max {
            rules.push(format!("{cat}.lte = {max}"));
        }
    }

    rules
}

/// The option text to splice in front of a field's `;`, or `None` when no
/// rule applies to this field shape.
///
/// One rule stays inline (` [(buf.validate.field).string.max_len = 5]`); two
/// or more are laid out one per line.
pub fn build_field_option(ty: &str, repeated: bool, c: &Constraints) -> Option<String> {
    let rules = field_rules(ty, repeated, c);

    match rules.as_slice() {
        [] => None,
        [single] => Some(format!(" [{FIELD_OPTION}.{single}]")),
        many => {
            let lined = many
                .iter()
                .map(|rule| format!("{FIELD_OPTION}.{rule}"))
                .collect::<Vec<_>>()
                .join(",\n  ");
            Some(format!(" [\n  {lined}\n]"))
        }
    }
}
