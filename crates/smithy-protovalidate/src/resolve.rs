//! Two-pass constraint resolution over the Smithy corpus.
//!
//! Pass 1 collects constraints attached to `string` and `list` aliases.
//! Pass 2 walks every `structure` block and computes the effective constraint
//! of each member, layering direct member traits over the alias constraint of
//! the member's target type.
//!
//! Both passes are regex-driven and deliberately shallow: a block ends at the
//! first `}` after its opening brace, and a `string` alias sees every trait
//! earlier in its file.

use crate::constraints::Constraints;
use crate::traits::gather_constraints;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn string_alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bstring\s+(\w+)\b").expect("string alias regex"))
}

fn list_alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\blist\s+(\w+)\s*\{").expect("list alias regex"))
}

fn structure_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bstructure\s+(\w+)\s*\{").expect("structure regex"))
}

fn member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)(?:\s*(?P<traits>(?:@\w+[^\n]*\n\s*)*))\s*(?P<name>\w+)\s*:\s*(?P<target>\w+)",
        )
        .expect("member regex")
    })
}

/// Alias name → constraint attached to the alias declaration.
pub type AliasConstraints = HashMap<String, Constraints>;

/// (structure name, member name) → effective member constraint.
pub type MemberConstraints = HashMap<(String, String), Constraints>;

/// Index of the first `}` after `open` (the index of a `{`), or `text.len()`
/// when the block is never closed.
fn shallow_block_close(text: &str, open: usize) -> usize {
    text[open..]
        .find('}')
        .map(|rel| open + rel)
        .unwrap_or(text.len())
}

/// Pass 1: build the alias constraint map.
///
/// Files are processed in order and later declarations overwrite earlier ones
/// with the same alias name. Within a file, `list` aliases are applied after
/// `string` aliases.
pub fn resolve_aliases<'a, I>(sources: I) -> AliasConstraints
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aliases = AliasConstraints::new();

    for text in sources {
        // The trait window for a string alias is the whole file prefix.
        for caps in string_alias_re().captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let constraints = gather_constraints(&text[..whole.start()]);
            tracing::trace!(alias = name.as_str(), ?constraints, "string alias");
            aliases.insert(name.as_str().to_string(), constraints);
        }

        for caps in list_alias_re().captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // The match ends on the opening brace.
            let open = whole.end() - 1;
            let end = (shallow_block_close(text, open) + 1).min(text.len());
            let constraints = gather_constraints(&text[whole.start()..end]);
            tracing::trace!(alias = name.as_str(), ?constraints, "list alias");
            aliases.insert(name.as_str().to_string(), constraints);
        }
    }

    aliases
}

/// Pass 2: build the member constraint map against a complete alias map.
///
/// Only non-empty effective constraints are stored, so a missing key always
/// means "nothing to enforce".
pub fn resolve_members<'a, I>(sources: I, aliases: &AliasConstraints) -> MemberConstraints
where
    I: IntoIterator<Item = &'a str>,
{
    let mut members = MemberConstraints::new();

    for text in sources {
        for st in structure_re().captures_iter(text) {
            let (Some(whole), Some(structure)) = (st.get(0), st.get(1)) else {
                continue;
            };
            let body_end = shallow_block_close(text, whole.end() - 1);
            let body = &text[whole.end()..body_end];

            for mem in member_re().captures_iter(body) {
                let traits = mem.name("traits").map(|m| m.as_str()).unwrap_or("");
                let (Some(name), Some(target)) = (mem.name("name"), mem.name("target")) else {
                    continue;
                };

                let direct = gather_constraints(traits);
                let effective = match aliases.get(target.as_str()) {
                    Some(alias) => alias.merge(&direct),
                    None => direct,
                };

                if effective.is_empty() {
                    continue;
                }

                tracing::debug!(
                    structure = structure.as_str(),
                    member = name.as_str(),
                    target = target.as_str(),
                    "resolved member constraint"
                );
                members.insert(
                    (structure.as_str().to_string(), name.as_str().to_string()),
                    effective,
                );
            }
        }
    }

    members
}

/// The read-only result of both passes, consulted while patching `.proto` files.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    aliases: AliasConstraints,
    members: MemberConstraints,
}

impl ConstraintIndex {
    /// Run pass 1 to completion, then pass 2, over the same source texts.
    pub fn from_sources<S: AsRef<str>>(sources: &[S]) -> Self {
        let aliases = resolve_aliases(sources.iter().map(|s| s.as_ref()));
        let members = resolve_members(sources.iter().map(|s| s.as_ref()), &aliases);
        Self { aliases, members }
    }

    pub fn alias(&self, name: &str) -> Option<&Constraints> {
        self.aliases.get(name)
    }

    /// Effective constraint for `member` of `structure`, if any.
    pub fn member(&self, structure: &str, member: &str) -> Option<&Constraints> {
        self.members
            .get(&(structure.to_string(), member.to_string()))
    }

    pub fn aliases(&self) -> &AliasConstraints {
        &self.aliases
    }

    pub fn members(&self) -> &MemberConstraints {
        &self.members
    }
}
