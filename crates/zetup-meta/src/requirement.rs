//! A single requirement line.
//!
//! The text format is line-oriented:
//!
//! ```text
//! name[extra1,extra2] >=1.0, <2.0 ; python_version >= "3.8"  # import_name
//! ```
//!
//! Everything after the first `#` outside a quoted marker value is the
//! import-name hint, i.e. the module
//! that has to be importable for the requirement to count as installed.
//! Without a hint the canonical key is used.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::specifier::Clause;
use crate::version::Version;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<rest>.*)$")
        .unwrap()
});

static EXTRA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").unwrap());

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.]+").unwrap());

/// Display-safe project name: runs of characters other than letters,
/// digits and `.` collapse to a single `-`.
pub fn safe_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "-").into_owned()
}

/// Lookup key for a distribution name.
pub fn canonical_key(name: &str) -> String {
    safe_name(name).to_lowercase()
}

/// Split off the `# import_name` hint. A `#` inside a quoted string, as in
/// `platform_version == "#1 SMP"`, belongs to the marker.
fn split_hint(line: &str) -> (&str, Option<&str>) {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '#') => return (&line[..i], Some(line[i + 1..].trim())),
            _ => {}
        }
    }
    (line, None)
}

/// One parsed requirement.
///
/// Equality ignores how the name was spelled: `Foo_Bar` and `Foo-Bar` are the
/// same requirement.
#[derive(Debug, Clone)]
pub struct Requirement {
    unsafe_name: String,
    project_name: String,
    key: String,
    extras: Vec<String>,
    clauses: Vec<Clause>,
    marker: Option<String>,
    import_name: String,
}

impl Requirement {
    /// Parse one line, including an optional `# import_name` hint.
    pub fn parse(line: &str) -> Result<Self> {
        let (spec, hint) = split_hint(line);

        let mut requirement = Self::parse_spec(spec).map_err(|err| match err {
            Error::Parse { reason, .. } => Error::parse(line.trim(), reason),
            other => other,
        })?;
        if let Some(hint) = hint.filter(|h| !h.is_empty()) {
            requirement.import_name = hint.to_string();
        }
        Ok(requirement)
    }

    fn parse_spec(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let caps = NAME_PATTERN
            .captures(spec)
            .ok_or_else(|| Error::parse(spec, "expected a distribution name"))?;

        let unsafe_name = caps["name"].to_string();
        let project_name = safe_name(&unsafe_name);
        let key = project_name.to_lowercase();

        let extras = match caps.name("extras") {
            Some(m) => parse_extras(m.as_str())?,
            None => Vec::new(),
        };

        let rest = caps.name("rest").map_or("", |m| m.as_str());
        let (constraint, marker) = match rest.split_once(';') {
            Some((constraint, marker)) => {
                let marker = marker.trim();
                if marker.is_empty() {
                    return Err(Error::parse(spec, "empty environment marker"));
                }
                (constraint.trim(), Some(marker.to_string()))
            }
            None => (rest.trim(), None),
        };

        let constraint = match constraint.strip_prefix('(') {
            Some(inner) => inner
                .strip_suffix(')')
                .ok_or_else(|| Error::parse(spec, "unbalanced parenthesis"))?
                .trim(),
            None => constraint,
        };

        let mut clauses = Vec::new();
        if !constraint.is_empty() {
            for part in constraint.split(',') {
                if part.trim().is_empty() {
                    return Err(Error::parse(spec, "empty version clause"));
                }
                clauses.push(Clause::parse(part)?);
            }
        }

        Ok(Self {
            import_name: key.clone(),
            unsafe_name,
            project_name,
            key,
            extras,
            clauses,
            marker,
        })
    }

    /// Canonical (lowercase, safe) distribution name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The name exactly as written.
    pub fn unsafe_name(&self) -> &str {
        &self.unsafe_name
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn import_name(&self) -> &str {
        &self.import_name
    }

    /// Override the module used to verify this requirement.
    pub fn set_import_name(&mut self, name: impl Into<String>) {
        self.import_name = name.into();
    }

    /// Whether `version` satisfies every clause.
    pub fn contains(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.contains(version))
    }

    /// The requirement with its import-name hint attached.
    pub fn to_hinted_line(&self) -> String {
        format!("{self} # {}", self.import_name)
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.project_name == other.project_name
            && self.extras == other.extras
            && self.clauses == other.clauses
            && self.marker == other.marker
            && self.import_name == other.import_name
    }
}

impl Eq for Requirement {}

fn parse_extras(text: &str) -> Result<Vec<String>> {
    let mut extras = Vec::new();
    for extra in text.split(',').map(str::trim) {
        if extra.is_empty() {
            continue;
        }
        if !EXTRA_PATTERN.is_match(extra) {
            return Err(Error::parse(text, format!("invalid extra name '{extra}'")));
        }
        extras.push(extra.to_string());
    }
    Ok(extras)
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.project_name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let clauses: Vec<String> = self.clauses.iter().map(Clause::to_string).collect();
        f.write_str(&clauses.join(","))?;
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
