use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid segment regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{0} doesn't look like a module path")]
    NoModule(String),
    #[error("{path}: invalid segment {segment:?}")]
    InvalidSegment { path: String, segment: String },
}

/// A `module.sub.Symbol` string naming a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DottedPath(String);

impl DottedPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if !raw.contains('.') {
            return Err(PathError::NoModule(raw.to_string()));
        }

        if let Some(segment) = raw.split('.').find(|segment| !SEGMENT_RE.is_match(segment)) {
            return Err(PathError::InvalidSegment {
                path: raw.to_string(),
                segment: segment.to_string(),
            });
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DottedPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
