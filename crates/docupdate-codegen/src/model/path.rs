// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Target path grammar.
//!
//! ```text
//! path    = segment ( "." segment )*
//! segment = name index?
//! index   = "[" ( "$" | "" | ident | digits ) "]"
//! ```
//!
//! | Written | Rendered | Meaning |
//! |---------|----------|---------|
//! | `items[$]` | `items.$` | element matched by the query |
//! | `items[]` | `items.$[]` | every element |
//! | `items[hit]` | `items.$[hit]` | elements matched by array filter `hit` |
//! | `items[2]` | `items.2` | element at index 2 |

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Array addressing attached to a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathIndex {
    /// `[$]`
    Positional,
    /// `[]`
    AllPositional,
    /// `[name]`
    Filtered(String),
    /// `[3]`
    Element(usize)
}

impl PathIndex {
    /// Rendered form placed after the member name.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Positional => "$".to_string(),
            Self::AllPositional => "$[]".to_string(),
            Self::Filtered(name) => format!("$[{name}]"),
            Self::Element(position) => position.to_string()
        }
    }
}

/// One member step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Member name as written.
    pub member: String,
    /// Optional array addressing.
    pub index: Option<PathIndex>
}

/// Syntax errors in a written path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathSyntaxError {
    /// Nothing to parse.
    #[error("path is empty")]
    Empty,
    /// A segment has no member name or contains reserved characters.
    #[error("invalid path segment `{0}`")]
    InvalidSegment(String),
    /// Malformed `[...]` part.
    #[error("invalid array index in `{0}`")]
    InvalidIndex(String)
}

/// Parsed target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    segments: Vec<PathSegment>
}

impl TargetPath {
    /// Parse the written form.
    ///
    /// # Errors
    ///
    /// Returns [`PathSyntaxError`] for empty paths, empty or malformed
    /// segments and malformed indexes.
    pub fn parse(text: &str) -> Result<Self, PathSyntaxError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PathSyntaxError::Empty);
        }
        let segments = text
            .split('.')
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            segments
        })
    }

    /// Segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether the last segment addresses an array element.
    #[must_use]
    pub fn ends_with_index(&self) -> bool {
        self.segments.last().is_some_and(|segment| segment.index.is_some())
    }
}

impl FromStr for TargetPath {
    type Err = PathSyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.member)?;
            match &segment.index {
                Some(PathIndex::Positional) => f.write_str("[$]")?,
                Some(PathIndex::AllPositional) => f.write_str("[]")?,
                Some(PathIndex::Filtered(name)) => write!(f, "[{name}]")?,
                Some(PathIndex::Element(position)) => write!(f, "[{position}]")?,
                None => {}
            }
        }
        Ok(())
    }
}

fn parse_segment(raw: &str) -> Result<PathSegment, PathSyntaxError> {
    let (member, index) = match raw.find('[') {
        Some(open) => {
            let rest = &raw[open + 1..];
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| PathSyntaxError::InvalidIndex(raw.to_string()))?;
            (&raw[..open], Some(parse_index(raw, inner)?))
        }
        None => (raw, None)
    };
    let valid = !member.is_empty()
        && member
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '[' | ']' | '$' | '.'));
    if !valid {
        return Err(PathSyntaxError::InvalidSegment(raw.to_string()));
    }
    Ok(PathSegment {
        member: member.to_string(),
        index
    })
}

fn parse_index(raw: &str, inner: &str) -> Result<PathIndex, PathSyntaxError> {
    match inner {
        "$" => Ok(PathIndex::Positional),
        "" => Ok(PathIndex::AllPositional),
        digits if digits.chars().all(|c| c.is_ascii_digit()) => digits
            .parse()
            .map(PathIndex::Element)
            .map_err(|_| PathSyntaxError::InvalidIndex(raw.to_string())),
        name if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && name.starts_with(|c: char| c.is_ascii_lowercase()) =>
        {
            Ok(PathIndex::Filtered(name.to_string()))
        }
        _ => Err(PathSyntaxError::InvalidIndex(raw.to_string()))
    }
}
