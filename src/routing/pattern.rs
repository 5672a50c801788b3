//! Route path patterns.
//!
//! # Responsibilities
//! - Parse `/literal/{param}/{*rest}` patterns
//! - Reject syntax the HTTP router cannot take (`:param`, `*wild`)
//! - Detect patterns the HTTP router cannot hold side by side
//!
//! # Design Decisions
//! - Literal matching is case-sensitive
//! - A trailing slash is significant (`/users` and `/users/` differ)
//! - Parameters occupy a whole segment

use std::fmt;
use std::str::FromStr;

use crate::routing::RouteError;

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

/// A validated route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let pieces: Vec<&str> = rest.split('/').collect();
            let last = pieces.len() - 1;
            for (i, piece) in pieces.iter().enumerate() {
                if piece.is_empty() {
                    if i == last {
                        segments.push(Segment::Literal(String::new()));
                        continue;
                    }
                    return Err(invalid("empty segment"));
                }
                if piece.starts_with(':') || piece.starts_with('*') {
                    return Err(invalid("use '{name}' or '{*name}' for parameters"));
                }

                let segment = match piece.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    Some(inner) => match inner.strip_prefix('*') {
                        Some(name) => {
                            if i != last {
                                return Err(invalid("catch-all parameter must be the last segment"));
                            }
                            Segment::CatchAll(param_name(name).ok_or_else(|| invalid("bad parameter name"))?)
                        }
                        None => Segment::Param(param_name(inner).ok_or_else(|| invalid("bad parameter name"))?),
                    },
                    None => {
                        if piece.contains('{') || piece.contains('}') {
                            return Err(invalid("parameters must span a whole segment"));
                        }
                        Segment::Literal(piece.to_string())
                    }
                };
                segments.push(segment);
            }
        }

        let mut seen = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) | Segment::CatchAll(name) = segment {
                if seen.contains(&name) {
                    return Err(invalid("duplicate parameter name"));
                }
                seen.push(name);
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether both patterns cannot live in the same router.
    ///
    /// Walking the common prefix, a literal mismatch keeps the two apart. A
    /// parameter facing a catch-all, or two parameters with different names
    /// at the same position, is ambiguous.
    pub fn conflicts_with(&self, other: &RoutePattern) -> bool {
        for (left, right) in self.segments.iter().zip(&other.segments) {
            match (left, right) {
                (Segment::Literal(a), Segment::Literal(b)) if a == b => continue,
                (Segment::Literal(_), _) | (_, Segment::Literal(_)) => return false,
                (Segment::Param(a), Segment::Param(b)) if a == b => continue,
                (Segment::CatchAll(a), Segment::CatchAll(b)) if a == b => return false,
                _ => return true,
            }
        }
        false
    }
}

fn param_name(name: &str) -> Option<String> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

impl FromStr for RoutePattern {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
