//! Input entries and their syntactic validation.

use clap::ValueEnum;
use regex::Regex;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::sync::LazyLock;

/// One label of 1-63 alphanumerics/hyphens (no leading or trailing hyphen),
/// a dot, then an alphabetic suffix of at least two letters.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.[A-Za-z]{2,}$")
        .expect("domain pattern is valid")
});

/// Kind of entry being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryKind {
    /// IPv4 or IPv6 address.
    Ip,
    /// Domain name.
    Domain,
}

impl EntryKind {
    /// API collection path for this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntryKind::Ip => "ip_addresses",
            EntryKind::Domain => "domains",
        }
    }

    /// Check whether a raw entry is syntactically valid for this kind.
    pub fn is_valid(&self, entry: &str) -> bool {
        match self {
            EntryKind::Ip => is_valid_ip(entry),
            EntryKind::Domain => is_valid_domain(entry),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Ip => write!(f, "ip"),
            EntryKind::Domain => write!(f, "domain"),
        }
    }
}

pub fn is_valid_ip(entry: &str) -> bool {
    entry.parse::<IpAddr>().is_ok()
}

pub fn is_valid_domain(entry: &str) -> bool {
    DOMAIN_RE.is_match(entry)
}

/// Entries split by validity, each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

/// Partition entries into valid and invalid lists for the given kind.
pub fn partition<I, S>(entries: I, kind: EntryKind) -> Validated
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut validated = Validated::default();
    for entry in entries {
        let entry = entry.into();
        if kind.is_valid(&entry) {
            validated.valid.push(entry);
        } else {
            validated.invalid.push(entry);
        }
    }
    validated
}

/// Read newline-delimited entries, trimming whitespace and skipping blank lines.
pub fn read_entries(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_entries(&content))
}

fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and validate an input file.
pub fn load(path: &Path, kind: EntryKind) -> std::io::Result<Validated> {
    Ok(partition(read_entries(path)?, kind))
}
