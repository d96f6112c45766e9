//! Comparable version values.
//!
//! A [`Version`] keeps the raw string it was built from and a cached sort key
//! derived from it. Comparisons only ever look at the sort key, so
//! `Version::new("1.0") == Version::new("1.0.0")` while their `as_str()`
//! forms stay different.
//!
//! Two parsers feed the sort key:
//!
//! - **PEP 440** (via `pep440_rs`) for anything that looks like a modern
//!   Python version (`1.2`, `2!1.0rc1`, `1.0.post2.dev3+local.7`). Numbers
//!   beyond `u64` still compare numerically.
//! - a **legacy** fallback for everything else, so that any two strings are
//!   comparable. Legacy versions always sort before PEP 440 versions.
//!
//! # Examples
//!
//! ```
//! use zetup_meta::version::Version;
//!
//! assert!(Version::new("1.0a1") < Version::new("1.0"));
//! assert!(Version::new("1.0") < "1.0.post1");
//! assert_eq!(Version::new("1.0"), "1.0.0");
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// A number too large for `u64`, kept as its digits without leading zeros.
///
/// Orders by length first, then lexically, which is numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Digits(String);

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

/// Ordering key. Variant order puts every legacy version below every
/// PEP 440 version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Key {
    Legacy(Vec<String>),
    /// `oversized` holds every number of `u64::MAX` or more, in reading
    /// order. `version` has those numbers clamped to `u64::MAX`, so ties
    /// between clamped versions are broken by the real digits.
    Pep440 {
        version: pep440_rs::Version,
        oversized: Vec<Digits>,
    },
}

/// A version string together with its cached ordering key.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    key: Key,
}

impl Version {
    /// Build a version from any string. Never fails: text that is not a
    /// PEP 440 version gets a legacy key.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let key = match parse_pep440(&raw) {
            Some(version) => Key::Pep440 {
                version,
                oversized: oversized_numbers(&raw),
            },
            None => Key::Legacy(legacy_key(&raw)),
        };
        Self { raw, key }
    }

    /// Parse a strict PEP 440 version.
    pub fn parse(raw: &str) -> Result<Self> {
        let version = Self::new(raw);
        if version.is_legacy() {
            return Err(Error::parse(raw, format!("invalid version: '{}'", raw.trim())));
        }
        Ok(version)
    }

    /// The raw string, trimmed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed PEP 440 form. Numbers that do not fit in `u64` appear
    /// clamped to `u64::MAX`.
    pub fn pep440(&self) -> Option<&pep440_rs::Version> {
        match &self.key {
            Key::Pep440 { version, .. } => Some(version),
            Key::Legacy(_) => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self.key, Key::Legacy(_))
    }

    /// Whether some number in the version does not fit in `u64`.
    pub fn is_oversized(&self) -> bool {
        matches!(&self.key, Key::Pep440 { oversized, .. } if !oversized.is_empty())
    }

    pub fn is_prerelease(&self) -> bool {
        self.pep440().is_some_and(pep440_rs::Version::any_prerelease)
    }

    /// Canonical spelling for PEP 440 versions, the raw string otherwise.
    pub fn normalized(&self) -> String {
        match self.pep440() {
            Some(version) if !self.is_oversized() => version.to_string(),
            _ => self.raw.clone(),
        }
    }
}

/// PEP 440 parse, retried with oversized numbers clamped.
fn parse_pep440(raw: &str) -> Option<pep440_rs::Version> {
    pep440_rs::Version::from_str(raw)
        .or_else(|_| pep440_rs::Version::from_str(&clamp_numbers(raw)))
        .ok()
}

/// Replace every digit run that overflows `u64` with `u64::MAX`.
pub(crate) fn clamp_numbers(raw: &str) -> Cow<'_, str> {
    DIGIT_RUN.replace_all(raw, |caps: &Captures<'_>| {
        let digits = &caps[0];
        match digits.parse::<u64>() {
            Ok(_) => digits.to_string(),
            Err(_) => u64::MAX.to_string(),
        }
    })
}

fn oversized_numbers(raw: &str) -> Vec<Digits> {
    DIGIT_RUN
        .find_iter(raw)
        .filter_map(|m| {
            let digits = m.as_str().trim_start_matches('0');
            match digits.parse::<u64>() {
                _ if digits.is_empty() => None,
                Ok(n) if n < u64::MAX => None,
                _ => Some(Digits(digits.to_string())),
            }
        })
        .collect()
}

/// Sort key of the pre-PEP 440 `pkg_resources` parser.
fn legacy_key(raw: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for part in legacy_parts(&raw.to_lowercase()) {
        if part.starts_with('*') {
            if part.as_str() < "*final" {
                while parts.last().is_some_and(|p| p == "*final-") {
                    parts.pop();
                }
            }
            while parts.last().is_some_and(|p| p == "00000000") {
                parts.pop();
            }
        }
        parts.push(part);
    }
    parts
}

fn legacy_parts(lowered: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for token in legacy_tokens(lowered) {
        let token = match token.as_str() {
            "pre" | "preview" | "rc" => "c",
            "-" => "final-",
            "dev" => "@",
            other => other,
        };
        if token.is_empty() || token == "." {
            continue;
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            parts.push(format!("{token:0>8}"));
        } else {
            parts.push(format!("*{token}"));
        }
    }
    parts.push("*final".to_string());
    parts
}

/// Split into digit runs, letter runs, single `.`/`-`, and whatever lies
/// between them.
fn legacy_tokens(s: &str) -> Vec<String> {
    #[derive(PartialEq)]
    enum Class {
        Digit,
        Alpha,
        Other,
    }
    let class = |c: char| {
        if c.is_ascii_digit() {
            Class::Digit
        } else if c.is_ascii_lowercase() {
            Class::Alpha
        } else {
            Class::Other
        }
    };

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_class: Option<Class> = None;
    for c in s.chars() {
        if c == '.' || c == '-' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current_class = None;
            tokens.push(c.to_string());
            continue;
        }
        let cls = class(c);
        if current_class.as_ref() != Some(&cls) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(c);
        current_class = Some(cls);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.key == Version::new(other).key
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialOrd<str> for Version {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.key.cmp(&Version::new(other).key))
    }
}

impl PartialOrd<&str> for Version {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.partial_cmp(*other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Version::new(raw))
    }
}
