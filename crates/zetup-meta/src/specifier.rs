//! Version comparison clauses.
//!
//! A [`Clause`] pairs an [`Operator`] with a [`Version`] and decides whether a
//! candidate version is contained in it. Containment is delegated to
//! `pep440_rs` and follows the usual Python packaging rules:
//!
//! - `==1.0` ignores the candidate's local label unless the clause has one
//! - `==1.*` / `!=1.*` match on a zero-padded release prefix
//! - `~=1.4.2` means `>=1.4.2, ==1.4.*`
//! - `<2.0` does not admit `2.0a1`, and `>1.0` does not admit `1.0.post1`
//! - `===` compares the raw strings
//!
//! Pre-releases are never filtered out by a clause on their own. Legacy
//! candidates, and versions with numbers beyond `u64`, are compared by
//! [`Version`] ordering instead.

use std::fmt;
use std::str::FromStr;

use pep440_rs::VersionSpecifier;

use crate::error::{Error, Result};
use crate::version::{Version, clamp_numbers};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `===`
    Arbitrary,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Arbitrary => "===",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operator plus version, e.g. `>=1.0` or `==2.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    operator: Operator,
    version: Version,
    wildcard: bool,
    /// `None` only for `===`, which compares raw text.
    specifier: Option<VersionSpecifier>,
}

impl Clause {
    /// Parse a single clause like `>=1.2` or `!=3.*`.
    pub fn parse(text: &str) -> Result<Self> {
        let s = text.trim();
        let (operator, rest) = if let Some(rest) = s.strip_prefix("===") {
            (Operator::Arbitrary, rest)
        } else if let Some(rest) = s.strip_prefix("==") {
            (Operator::Equal, rest)
        } else if let Some(rest) = s.strip_prefix("~=") {
            (Operator::Compatible, rest)
        } else if let Some(rest) = s.strip_prefix("!=") {
            (Operator::NotEqual, rest)
        } else if let Some(rest) = s.strip_prefix("<=") {
            (Operator::LessEqual, rest)
        } else if let Some(rest) = s.strip_prefix(">=") {
            (Operator::GreaterEqual, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (Operator::Less, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (Operator::Greater, rest)
        } else {
            return Err(Error::parse(text, "expected a comparison operator"));
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(Error::parse(text, format!("missing version after '{operator}'")));
        }
        if rest.contains(char::is_whitespace) {
            return Err(Error::parse(text, format!("unexpected whitespace in '{rest}'")));
        }

        if operator == Operator::Arbitrary {
            return Ok(Self {
                operator,
                version: Version::new(rest),
                wildcard: false,
                specifier: None,
            });
        }

        let specifier = VersionSpecifier::from_str(&format!("{operator}{}", clamp_numbers(rest)))
            .map_err(|e| Error::parse(text, e.to_string()))?;
        let (bare, wildcard) = match rest.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (rest, false),
        };

        Ok(Self {
            operator,
            version: Version::parse(bare).map_err(|_| Error::parse(text, format!("invalid version '{bare}'")))?,
            wildcard,
            specifier: Some(specifier),
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Whether `candidate` satisfies this clause.
    pub fn contains(&self, candidate: &Version) -> bool {
        let Some(specifier) = &self.specifier else {
            return candidate.as_str().eq_ignore_ascii_case(self.version.as_str());
        };
        match candidate.pep440() {
            Some(pep) if self.wildcard || self.operator == Operator::Compatible => specifier.contains(pep),
            Some(pep) if !self.version.is_oversized() && !candidate.is_oversized() => specifier.contains(pep),
            _ => self.contains_by_key(candidate),
        }
    }

    /// Plain key comparison, for legacy candidates and for numbers beyond
    /// `u64`.
    fn contains_by_key(&self, candidate: &Version) -> bool {
        if self.wildcard {
            return self.operator == Operator::NotEqual;
        }
        match self.operator {
            Operator::Equal => candidate == &self.version,
            Operator::NotEqual => candidate != &self.version,
            Operator::LessEqual => candidate <= &self.version,
            Operator::GreaterEqual => candidate >= &self.version,
            Operator::Less => candidate < &self.version,
            Operator::Greater => candidate > &self.version,
            Operator::Compatible | Operator::Arbitrary => false,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.wildcard {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

impl FromStr for Clause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn contains(clause: &str, version: &str) -> bool {
        Clause::parse(clause).unwrap().contains(&Version::new(version))
    }

    #[rstest]
    #[case(">=1.0", "1.0", true)]
    #[case(">=1.0", "0.9", false)]
    #[case("<2.0", "1.9.9", true)]
    #[case("<2.0", "2.0", false)]
    #[case("<2.0", "2.0rc1", false)]
    #[case("<2.0rc2", "2.0rc1", true)]
    #[case(">1.0", "1.0.post1", false)]
    #[case(">1.0", "1.0.1", true)]
    #[case(">1.0", "1.0+local", false)]
    #[case(">1.0.post1", "1.0.post2", true)]
    #[case("<=1.0", "1.0+local", true)]
    #[case("==1.0", "1.0.0", true)]
    #[case("==1.0", "1.0+local", true)]
    #[case("==1.0+local", "1.0", false)]
    #[case("!=1.0", "1.0.1", true)]
    #[case("==1.*", "1.9", true)]
    #[case("==1.0.*", "1", true)]
    #[case("==1.*", "2.0", false)]
    #[case("==1.0.*", "1.0a1", true)]
    #[case("!=1.*", "1.5", false)]
    #[case("~=1.4.2", "1.4.5", true)]
    #[case("~=1.4.2", "1.5.0", false)]
    #[case("~=1.4", "1.9", true)]
    #[case("~=1.4", "2.0", false)]
    #[case("~=1.4", "1.3", false)]
    #[case("===1.0", "1.0", true)]
    #[case("===1.0", "1.0.0", false)]
    fn test_contains(#[case] clause: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(contains(clause, version), expected, "{clause} contains {version}");
    }

    #[rstest]
    #[case("1.0")]
    #[case(">=")]
    #[case(">=foo")]
    #[case(">=1.*")]
    #[case("==1.0a1.*")]
    #[case("~=1")]
    #[case(">=1.0+local")]
    #[case("== 1.0 beta")]
    fn test_parse_rejects(#[case] text: &str) {
        assert!(Clause::parse(text).is_err(), "{text} should be rejected");
    }

    #[test]
    fn test_display_keeps_written_version() {
        assert_eq!(Clause::parse(" >= 1.0.0 ").unwrap().to_string(), ">=1.0.0");
        assert_eq!(Clause::parse("!=2.*").unwrap().to_string(), "!=2.*");
        assert_eq!(Clause::parse("===foobar").unwrap().to_string(), "===foobar");
    }

    #[rstest]
    #[case(">=20240101000000000000", "20240101000000000001", true)]
    #[case(">=20240101000000000000", "2024.1", false)]
    #[case(">20240101000000000000", "30000000000000000000", true)]
    #[case("<20240101000000000000", "30000000000000000000", false)]
    #[case("==1.99999999999999999999", "1.99999999999999999999", true)]
    #[case("!=1.99999999999999999999", "1.99999999999999999998", true)]
    fn test_large_numbers(#[case] clause: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(contains(clause, version), expected, "{clause} contains {version}");
    }

    #[test]
    fn test_legacy_candidate_compares_by_key() {
        assert!(contains("<1.0", "0.9-custom"));
        assert!(!contains(">=1.0", "0.9-custom"));
        assert!(!contains("==1.*", "weird-version"));
    }
}
