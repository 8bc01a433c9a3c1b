//! Compiler version selection
//!
//! Source files declare the compiler versions they accept with a version
//! pragma such as `^0.8.0` or `>=0.7.0 <0.9.0`. Given the declared compiler
//! profiles, the toolchain builds each file with the highest version that
//! satisfies its pragma.

use super::settings::CompilerProfile;
use crate::error::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.patch` compiler version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompilerVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl CompilerVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        CompilerVersion {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for CompilerVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || ConfigError::invalid("version", format!("\"{s}\" is not major.minor.patch"));
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64> {
            parts
                .next()
                .and_then(|part| part.parse::<u64>().ok())
                .ok_or_else(invalid)
        };
        let version = CompilerVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Exact,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Caret,
    Tilde,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: CompilerVersion,
}

impl Comparator {
    fn parse(token: &str) -> Result<Self> {
        // Longest operators first so ">=" is not read as ">".
        const OPS: [(&str, Op); 7] = [
            (">=", Op::GreaterEq),
            ("<=", Op::LessEq),
            (">", Op::Greater),
            ("<", Op::Less),
            ("=", Op::Exact),
            ("^", Op::Caret),
            ("~", Op::Tilde),
        ];
        let (op, rest) = OPS
            .iter()
            .find_map(|(prefix, op)| token.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .unwrap_or((Op::Exact, token));
        Ok(Comparator {
            op,
            version: rest.trim().parse()?,
        })
    }

    fn matches(&self, candidate: &CompilerVersion) -> bool {
        let v = self.version;
        match self.op {
            Op::Exact => *candidate == v,
            Op::Greater => *candidate > v,
            Op::GreaterEq => *candidate >= v,
            Op::Less => *candidate < v,
            Op::LessEq => *candidate <= v,
            Op::Tilde => {
                *candidate >= v && *candidate < CompilerVersion::new(v.major, v.minor + 1, 0)
            }
            Op::Caret => {
                let upper = if v.major > 0 {
                    CompilerVersion::new(v.major + 1, 0, 0)
                } else if v.minor > 0 {
                    CompilerVersion::new(0, v.minor + 1, 0)
                } else {
                    CompilerVersion::new(0, 0, v.patch + 1)
                };
                *candidate >= v && *candidate < upper
            }
        }
    }
}

/// A parsed version pragma: alternatives separated by `||`, each a set of
/// comparators that must all hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPragma {
    alternatives: Vec<Vec<Comparator>>,
}

impl VersionPragma {
    pub fn matches(&self, version: &CompilerVersion) -> bool {
        self.alternatives
            .iter()
            .any(|set| set.iter().all(|comparator| comparator.matches(version)))
    }
}

impl FromStr for VersionPragma {
    type Err = ConfigError;

    /// Accepts either the bare constraint (`^0.8.0`) or the full statement
    /// (`pragma solidity ^0.8.0;`).
    fn from_str(s: &str) -> Result<Self> {
        let mut body = s.trim();
        if let Some(rest) = body.strip_prefix("pragma") {
            body = rest.trim_start();
            body = body.strip_prefix("solidity").unwrap_or(body);
        }
        let body = body.trim().trim_end_matches(';').trim();
        if body.is_empty() {
            return Err(ConfigError::invalid("pragma", "empty version constraint"));
        }

        let mut alternatives = Vec::new();
        for alternative in body.split("||") {
            let tokens = normalize_operators(alternative);
            let set = tokens
                .split_whitespace()
                .map(Comparator::parse)
                .collect::<Result<Vec<_>>>()?;
            if set.is_empty() {
                return Err(ConfigError::invalid(
                    "pragma",
                    format!("\"{s}\" has an empty alternative"),
                ));
            }
            alternatives.push(set);
        }
        Ok(VersionPragma { alternatives })
    }
}

/// Join operators written apart from their version (`>= 0.8.0`) so that
/// whitespace separates comparators only.
fn normalize_operators(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_op = false;
    for c in input.chars() {
        if c.is_whitespace() && pending_op {
            continue;
        }
        pending_op = matches!(c, '>' | '<' | '=' | '^' | '~');
        out.push(c);
    }
    out
}

/// Pick the compiler profile to build a source file with.
///
/// Returns the profile with the highest version satisfying the pragma;
/// profiles whose version does not parse never match.
pub fn select_compiler<'a>(
    compilers: &'a [CompilerProfile],
    pragma: &str,
) -> Result<&'a CompilerProfile> {
    let pragma: VersionPragma = pragma.parse()?;
    compilers
        .iter()
        .filter_map(|profile| {
            let version = profile.version.parse::<CompilerVersion>().ok()?;
            pragma.matches(&version).then_some((version, profile))
        })
        .max_by_key(|(version, _)| *version)
        .map(|(_, profile)| profile)
        .ok_or_else(|| {
            ConfigError::invalid(
                "solidity.compilers",
                "no configured compiler satisfies the version pragma",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> CompilerVersion {
        s.parse().unwrap()
    }

    fn pragma(s: &str) -> VersionPragma {
        s.parse().unwrap()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(v("0.8.18"), CompilerVersion::new(0, 8, 18));
        assert!("0.8".parse::<CompilerVersion>().is_err());
        assert!("0.8.18.1".parse::<CompilerVersion>().is_err());
        assert!("v0.8.18".parse::<CompilerVersion>().is_err());
        assert_eq!(v("0.8.18").to_string(), "0.8.18");
    }

    #[test]
    fn test_caret_and_tilde() {
        assert!(pragma("^0.8.0").matches(&v("0.8.18")));
        assert!(!pragma("^0.8.0").matches(&v("0.9.0")));
        assert!(!pragma("^0.8.19").matches(&v("0.8.18")));
        assert!(pragma("^1.2.3").matches(&v("1.9.0")));
        assert!(!pragma("^0.0.3").matches(&v("0.0.4")));
        assert!(pragma("~0.8.1").matches(&v("0.8.18")));
        assert!(!pragma("~0.8.1").matches(&v("0.9.0")));
    }

    #[test]
    fn test_ranges_and_alternatives() {
        assert!(pragma(">=0.7.0 <0.9.0").matches(&v("0.8.18")));
        assert!(pragma(">= 0.7.0 < 0.9.0").matches(&v("0.7.0")));
        assert!(!pragma(">=0.7.0 <0.9.0").matches(&v("0.9.0")));
        assert!(pragma("0.6.12 || ^0.8.0").matches(&v("0.6.12")));
        assert!(pragma("=0.8.18").matches(&v("0.8.18")));
        assert!(pragma("pragma solidity ^0.8.0;").matches(&v("0.8.18")));
    }

    #[test]
    fn test_invalid_pragmas() {
        assert!("".parse::<VersionPragma>().is_err());
        assert!("^0.8".parse::<VersionPragma>().is_err());
        assert!("^0.8.0 ||".parse::<VersionPragma>().is_err());
    }

    #[test]
    fn test_select_highest_matching_compiler() {
        let compilers = vec![
            CompilerProfile::new("0.8.18", true, 200),
            CompilerProfile::new("0.6.12", false, 200),
            CompilerProfile::new("0.8.20", true, 1000),
        ];
        assert_eq!(select_compiler(&compilers, "^0.8.0").unwrap().version, "0.8.20");
        assert_eq!(select_compiler(&compilers, "<0.8.20 >=0.8.0").unwrap().version, "0.8.18");
        assert_eq!(select_compiler(&compilers, "^0.6.0").unwrap().version, "0.6.12");
        assert!(select_compiler(&compilers, "^0.7.0").is_err());
    }
}
