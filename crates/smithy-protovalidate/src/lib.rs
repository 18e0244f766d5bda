//! Protovalidate option injection for Smithy-generated `.proto` files.
//!
//! `.proto` files produced by smithy-translate lose the semantic constraints
//! the Smithy model expressed through traits. This crate reads the Smithy
//! sources, resolves the effective constraint of every structure member, and
//! rewrites the matching `.proto` field declarations with
//! `(buf.validate.field)` options:
//!
//! - `@length(min, max)` → `string.min_len` / `string.max_len`, or
//!   `repeated.min_items` / `repeated.max_items` for repeated fields
//! - `@range(min, max)` → `<double|float|int64|int32>.gte` / `.lte`
//! - `@uniqueItems` → `repeated.unique = true`
//!
//! Neither language is parsed. Both sides are handled as regex-addressable
//! text, and anything that does not match the expected shapes is left alone.
//! Running the injection again over its own output changes nothing.

pub mod constraints;
pub mod corpus;
pub mod error;
pub mod options;
pub mod patch;
pub mod resolve;
pub mod traits;

pub use constraints::Constraints;
pub use error::{InjectError, Result};
pub use options::{build_field_option, NumericCategory, FIELD_OPTION};
pub use patch::{patch_proto, PatchOutcome, VALIDATE_IMPORT};
pub use resolve::ConstraintIndex;
pub use traits::gather_constraints;

use std::fmt;
use std::path::{Path, PathBuf};

/// Options controlling an injection run.
#[derive(Debug, Clone)]
pub struct InjectOptions {
    /// Extension of Smithy source files (without dot).
    pub source_extension: String,
    /// Extension of target protobuf files (without dot).
    pub target_extension: String,
    /// Compute every patch but leave the files on disk untouched.
    pub dry_run: bool,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            source_extension: "smithy".to_string(),
            target_extension: "proto".to_string(),
            dry_run: false,
        }
    }
}

/// What an injection run did (or would do, under `dry_run`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectSummary {
    pub patched_fields: usize,
    pub proto_files: usize,
    /// Files written back, or that would be written under `dry_run`.
    pub rewritten: Vec<PathBuf>,
    /// Files whose bytes differ after patching.
    pub changed: Vec<PathBuf>,
}

impl fmt::Display for InjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patched {} field(s)", self.patched_fields)?;
        write!(f, "across  {} .proto file(s).", self.proto_files)
    }
}

/// Resolve constraints from every Smithy file under `smithy_root`, then patch
/// every `.proto` file under `proto_root`.
///
/// The Smithy corpus is fully read and resolved before any `.proto` file is
/// touched. The first I/O failure aborts the run.
pub fn inject(
    smithy_root: &Path,
    proto_root: &Path,
    options: &InjectOptions,
) -> Result<InjectSummary> {
    let sources = corpus::load_sources(smithy_root, &options.source_extension)?;
    let index = ConstraintIndex::from_sources(&sources);
    tracing::info!(
        sources = sources.len(),
        aliases = index.aliases().len(),
        members = index.members().len(),
        "resolved smithy constraints"
    );

    inject_with_index(proto_root, &index, options)
}

/// Patch every target file under `proto_root` against an already built index.
pub fn inject_with_index(
    proto_root: &Path,
    index: &ConstraintIndex,
    options: &InjectOptions,
) -> Result<InjectSummary> {
    let mut summary = InjectSummary::default();

    for path in corpus::collect_files(proto_root, &options.target_extension)? {
        summary.proto_files += 1;

        let original = corpus::read_text(&path)?;
        let outcome = patch_proto(&original, index);
        summary.patched_fields += outcome.patched_fields;

        if !outcome.should_write() {
            continue;
        }
        if outcome.text != original {
            summary.changed.push(path.clone());
        }

        if options.dry_run {
            tracing::info!(path = %path.display(), fields = outcome.patched_fields, "would rewrite");
        } else {
            corpus::write_text(&path, &outcome.text)?;
            tracing::info!(path = %path.display(), fields = outcome.patched_fields, "rewrote");
        }
        summary.rewritten.push(path);
    }

    Ok(summary)
}
