//! Line-oriented patching of generated `.proto` files.
//!
//! A file is treated as a sequence of lines. Field declarations inside a
//! `message` block that have a resolved constraint get a protovalidate option
//! spliced in front of their `;`. Afterwards the protovalidate import is
//! normalised: existing copies are collapsed to the first one, and a missing
//! import is added only when a field was patched.

use crate::options::build_field_option;
use crate::resolve::ConstraintIndex;
use regex::Regex;
use std::sync::OnceLock;

/// Canonical import line for the protovalidate definitions.
pub const VALIDATE_IMPORT: &str = r#"import "buf/validate/validate.proto";"#;

/// Marker that shows a field already carries protovalidate options.
const FIELD_OPTION_MARKER: &str = "buf.validate.field";

fn message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*message\s+(\w+)\s*\{").expect("message regex"))
}

fn field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(repeated\s+|optional\s+)?(\w+)\s+(\w+)\s*=\s*(\d+)([^;]*);")
            .expect("field regex")
    })
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*import\s+"buf/validate/validate\.proto";$"#).expect("import regex")
    })
}

/// A field declaration line, as matched by the field grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl<'a> {
    pub repeated: bool,
    pub ty: &'a str,
    pub name: &'a str,
    /// Text between the tag and the `;` (existing options, if any).
    pub tail: &'a str,
    /// Byte offset of the terminating `;` within the line.
    pub terminator: usize,
}

impl<'a> FieldDecl<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = field_re().captures(line)?;
        let whole = caps.get(0)?;
        let label = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");

        Some(FieldDecl {
            repeated: label == "repeated",
            ty: caps.get(2)?.as_str(),
            name: caps.get(3)?.as_str(),
            tail: caps.get(5).map(|m| m.as_str()).unwrap_or(""),
            terminator: whole.end() - 1,
        })
    }

    pub fn has_validate_option(&self) -> bool {
        self.tail.contains(FIELD_OPTION_MARKER)
    }
}

/// Result of patching one `.proto` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// The full rewritten file text.
    pub text: String,
    /// Number of field declarations that received an option.
    pub patched_fields: usize,
    /// At least one field was patched.
    pub dirty: bool,
    /// The input already contained one or more protovalidate imports.
    pub had_import: bool,
}

impl PatchOutcome {
    /// A patched file, or one whose imports needed normalising, is written back.
    pub fn should_write(&self) -> bool {
        self.dirty || self.had_import
    }
}

/// Patch the lines of a single `.proto` file against `index`.
pub fn patch_proto(text: &str, index: &ConstraintIndex) -> PatchOutcome {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut message: Option<String> = None;
    let mut patched_fields = 0usize;

    for line in lines.iter_mut() {
        if let Some(caps) = message_re().captures(line) {
            message = caps.get(1).map(|m| m.as_str().to_string());
            continue;
        }

        let Some(ctx) = message.as_deref() else {
            continue;
        };
        let Some(field) = FieldDecl::parse(line) else {
            continue;
        };
        if field.has_validate_option() {
            continue;
        }
        let Some(constraints) = index.member(ctx, field.name) else {
            continue;
        };
        let Some(option) = build_field_option(field.ty, field.repeated, constraints) else {
            continue;
        };

        tracing::debug!(
            message = ctx,
            field = field.name,
            ty = field.ty,
            repeated = field.repeated,
            "patching field"
        );

        let (head, rest) = line.split_at(field.terminator);
        let rewritten = format!("{head}{option}{rest}");
        *line = rewritten;
        patched_fields += 1;
    }

    let dirty = patched_fields > 0;
    let had_import = normalize_import(&mut lines, dirty);

    let mut out = lines.join("\n");
    if text.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }

    PatchOutcome {
        text: out,
        patched_fields,
        dirty,
        had_import,
    }
}

/// Collapse protovalidate imports to the first occurrence, or insert one when
/// `dirty` and none exists. Returns whether any import was present beforehand.
///
/// A new import goes after the leading `syntax` and `package` lines when the
/// file starts with exactly those two, otherwise at line index 1.
pub fn normalize_import(lines: &mut Vec<String>, dirty: bool) -> bool {
    let positions: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| import_re().is_match(line))
        .map(|(idx, _)| idx)
        .collect();

    if let Some((&first, rest)) = positions.split_first() {
        lines[first] = VALIDATE_IMPORT.to_string();
        for &idx in rest.iter().rev() {
            lines.remove(idx);
        }
        return true;
    }

    if dirty {
        let insert_at = if lines.len() > 1
            && lines[0].starts_with("syntax")
            && lines[1].starts_with("package")
        {
            2
        } else {
            1
        };
        lines.insert(insert_at.min(lines.len()), VALIDATE_IMPORT.to_string());
    }

    false
}
