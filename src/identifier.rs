//! Identifier - validated names for addressable network nodes.
//!
//! A plain identifier is a letter or underscore followed by letters, digits and
//! underscores. Unicode letters and digits are accepted. A *segmented*
//! identifier is a sequence of plain segments joined by single dots
//! (`motor.M_1`); dots may never lead, trail or repeat.

use crate::error::{Result, SelnetError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Immutable, validated node name.
///
/// Equality and hashing compare the stored text, so `HashMap<Identifier, _>`
/// can be queried with a plain `&str`.
///
/// # Examples
///
/// ```
/// use selnet::Identifier;
///
/// let id = Identifier::new("S_prime_1").unwrap();
/// assert_eq!(id.as_str(), "S_prime_1");
/// assert!(Identifier::new("1st").is_err());
/// assert!(Identifier::segmented("motor.M_1").is_ok());
/// assert!(Identifier::new("motor.M_1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a plain identifier (no dots).
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();
        if is_valid_segment(text) {
            Ok(Identifier(text.to_owned()))
        } else {
            Err(SelnetError::InvalidIdentifier(text.to_owned()))
        }
    }

    /// Create an identifier that may contain single `.` segment separators.
    pub fn segmented(text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();
        if text.split('.').all(is_valid_segment) {
            Ok(Identifier(text.to_owned()))
        } else {
            Err(SelnetError::InvalidIdentifier(text.to_owned()))
        }
    }

    /// Get the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier contains segment separators.
    pub fn is_segmented(&self) -> bool {
        self.0.contains('.')
    }

    /// Iterate over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Identifier of the `index`-th auto-generated child: `{self}_{index}`.
    ///
    /// Valid by construction, so no re-validation is needed.
    pub fn child(&self, index: usize) -> Identifier {
        Identifier(format!("{}_{}", self.0, index))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

impl TryFrom<String> for Identifier {
    type Error = SelnetError;

    fn try_from(text: String) -> Result<Self> {
        Identifier::segmented(&text)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = SelnetError;

    fn try_from(text: &str) -> Result<Self> {
        Identifier::segmented(text)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> String {
        id.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
