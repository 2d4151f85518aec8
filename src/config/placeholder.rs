//! Subnet placeholder tokens
//!
//! A configuration string that is exactly `@{subnet}` or `@{subnet|tag}`
//! stands for the CIDR of a subnet in the deployment's subnet map. With no
//! tag the current VM section's tag is used. Only tokens spanning the whole
//! string are recognized, and a token that names an unknown key or subnet is
//! passed through untouched.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^@\{(?P<key>[^|}]*)(?:\|(?P<value>[^}]*))?\}$"));

/// The only placeholder key that resolves
const SUBNET_KEY: &str = "subnet";

/// Port used when a rule does not name one
pub const ANY_PORT: &str = "*";

/// Outcome of matching a value against the placeholder grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// The value is not a placeholder token
    NoMatch,
    /// A token whose key or subnet is unknown
    Unresolved,
    /// The subnet address the token stands for
    Resolved(String),
}

/// Match `value` against the placeholder grammar and look it up
#[must_use]
pub fn parse_placeholder(
    value: &str,
    subnets: &BTreeMap<String, String>,
    current_tag: &str,
) -> Placeholder {
    let Ok(pattern) = PLACEHOLDER.as_ref() else {
        return Placeholder::NoMatch;
    };
    let Some(captures) = pattern.captures(value) else {
        return Placeholder::NoMatch;
    };

    let key = captures.name("key").map_or("", |m| m.as_str().trim());
    if !key.eq_ignore_ascii_case(SUBNET_KEY) {
        return Placeholder::Unresolved;
    }

    let tag = captures
        .name("value")
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(current_tag);

    subnets
        .get(tag)
        .map_or(Placeholder::Unresolved, |cidr| Placeholder::Resolved(cidr.clone()))
}

/// Replace a placeholder token with its subnet address
///
/// Values that are not tokens, or tokens that cannot be resolved, are
/// returned unchanged.
#[must_use]
pub fn resolve_placeholder(
    value: &str,
    subnets: &BTreeMap<String, String>,
    current_tag: &str,
) -> String {
    match parse_placeholder(value, subnets, current_tag) {
        Placeholder::Resolved(cidr) => cidr,
        Placeholder::NoMatch | Placeholder::Unresolved => value.to_owned(),
    }
}

/// Port part of a split rule: the second element, or `*`
#[must_use]
pub fn port_component<'a>(parts: &[&'a str]) -> &'a str {
    parts.get(1).copied().unwrap_or(ANY_PORT)
}

/// Split a firewall rule such as `@{subnet|db}-1433` into address and port
///
/// The split happens at the first `-` after a leading token's closing brace,
/// so subnet tags inside the token may contain dashes.
#[must_use]
pub fn split_rule(rule: &str) -> Vec<&str> {
    let search_from = if rule.starts_with("@{") {
        rule.find('}').map_or(0, |end| end + 1)
    } else {
        0
    };

    match rule[search_from..].find('-') {
        Some(offset) => {
            let at = search_from + offset;
            vec![&rule[..at], &rule[at + 1..]]
        }
        None => vec![rule],
    }
}
