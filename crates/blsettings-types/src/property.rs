//! Hierarchical property names and their validator.
//!
//! A property name is a slash-separated key such as `/Net/ThemeName`. The
//! validator is the single gate for every name that reaches a channel: a
//! [`PropertyName`] can only be built from a string that passes [`validate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a candidate property name was rejected.
///
/// The `Display` text is the message shown next to the property entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidPropertyReason {
    /// Empty, absent, or not starting with `/`.
    #[error("Property names must start with a '/' character")]
    MissingLeadingSlash,
    /// Exactly `/`.
    #[error("The root element ('/') is not a valid property name")]
    RootNotAllowed,
    /// A character outside the allowed set.
    #[error(
        "Property names can only include the ASCII characters A-Z, a-z, 0-9, '_', '-', ':', \
         '.', ',', '[', ']', '{{', '}}', '<', '>' and '|', as well as '/' as a separator"
    )]
    IllegalCharacter,
    /// Two `/` in a row.
    #[error("Property names cannot have two or more consecutive '/' characters")]
    ConsecutiveSeparators,
    /// Last character is `/`.
    #[error("Property names cannot end with a '/' character")]
    TrailingSeparator,
}

fn is_allowed(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'_' | b'-' | b'/' | b'{' | b'}' | b'<' | b'>' | b'|' | b',' | b'[' | b']' | b'.' | b':'
        )
}

/// Check a candidate property name.
///
/// Checks run in a fixed order: leading slash, root-only, then one scan over
/// the remaining bytes where an illegal character at an index is reported
/// before a doubled separator at that same index, and finally the trailing
/// separator. The first violation wins.
pub fn validate(property: &str) -> Result<(), InvalidPropertyReason> {
    let bytes = property.as_bytes();

    if bytes.first() != Some(&b'/') {
        return Err(InvalidPropertyReason::MissingLeadingSlash);
    }
    if bytes.len() == 1 {
        return Err(InvalidPropertyReason::RootNotAllowed);
    }

    // Each window is (previous, current) for indices 1..len.
    for pair in bytes.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if !is_allowed(cur) {
            return Err(InvalidPropertyReason::IllegalCharacter);
        }
        if cur == b'/' && prev == b'/' {
            return Err(InvalidPropertyReason::ConsecutiveSeparators);
        }
    }

    if bytes.last() == Some(&b'/') {
        return Err(InvalidPropertyReason::TrailingSeparator);
    }

    Ok(())
}

/// Like [`validate`], treating an absent name as a missing leading slash.
pub fn validate_optional(property: Option<&str>) -> Result<(), InvalidPropertyReason> {
    match property {
        Some(p) => validate(p),
        None => Err(InvalidPropertyReason::MissingLeadingSlash),
    }
}

/// A validated property name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyName(String);

impl PropertyName {
    /// Validate and wrap a property name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidPropertyReason> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything up to and including the last `/`.
    ///
    /// For `/Xft/DPI` this is `/Xft/`; for a top-level name it is `/`.
    pub fn parent_prefix(&self) -> &str {
        // A valid name always contains its leading slash.
        let idx = self.0.rfind('/').unwrap_or(0);
        &self.0[..=idx]
    }

    /// The name's components without separators.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0[1..].split('/')
    }

    /// Whether this name lives somewhere under `prefix` (a `/`-terminated
    /// parent prefix or a full name).
    pub fn is_under(&self, prefix: &str) -> bool {
        if prefix.ends_with('/') {
            self.0.starts_with(prefix)
        } else {
            self.0 == prefix
                || (self.0.starts_with(prefix) && self.0.as_bytes().get(prefix.len()) == Some(&b'/'))
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PropertyName {
    type Err = InvalidPropertyReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = InvalidPropertyReason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PropertyName {
    type Error = InvalidPropertyReason;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PropertyName> for String {
    fn from(name: PropertyName) -> Self {
        name.0
    }
}
