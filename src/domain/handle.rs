use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A stable, opaque key for a record in the family-tree store.
///
/// Handles are never shown to readers of a report; they only link people,
/// families, events and places together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(NonEmptyString);

impl Handle {
    /// Creates a new `Handle` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandleError` if the string is empty or contains
    /// whitespace.
    pub fn new(s: String) -> Result<Self, InvalidHandleError> {
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidHandleError(s));
        }
        let non_empty = NonEmptyString::new(s).map_err(InvalidHandleError)?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Handle {
    type Error = InvalidHandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Handle {
    type Error = InvalidHandleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0.as_str().to_owned()
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Handle {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Handle {
    type Err = InvalidHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string cannot be used as a handle or external id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid handle '{0}': must be non-empty and contain no whitespace")]
pub struct InvalidHandleError(String);

/// The external display identifier of a record (for example `I0001`).
///
/// This is what users type on the command line and what appears in option
/// files; the store maps it to a [`Handle`].
pub type RecordId = Handle;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_accepts_plain_token() {
        let handle = Handle::new("p0001".to_string()).unwrap();
        assert_eq!(handle.as_str(), "p0001");
        assert_eq!(handle.to_string(), "p0001");
    }

    #[test]
    fn handle_rejects_empty() {
        assert!(Handle::new(String::new()).is_err());
    }

    #[test]
    fn handle_rejects_whitespace() {
        let err = Handle::try_from("I 0001").unwrap_err();
        assert_eq!(err, InvalidHandleError("I 0001".to_string()));
    }

    #[test]
    fn handle_deserializes_from_yaml_string() {
        let handle: Handle = serde_yaml::from_str("I0042").unwrap();
        assert_eq!(&*handle, "I0042");
    }
}
