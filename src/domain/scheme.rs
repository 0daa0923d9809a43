use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The genealogical numbering convention used to label descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumberingScheme {
    /// Henry: one symbol per generation, `1`-`9` then `A`-`Z`.
    Henry,
    /// Modified Henry: `1`-`9`, then `(10)`, `(11)`, ...
    ModifiedHenry,
    /// d'Aboville: dot-separated sibling ordinals.
    #[default]
    DAboville,
    /// Record (Modified Register): one sequential number per person.
    Record,
}

impl NumberingScheme {
    /// All schemes, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Henry,
        Self::ModifiedHenry,
        Self::DAboville,
        Self::Record,
    ];

    /// The canonical option value for this scheme.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Henry => "Henry",
            Self::ModifiedHenry => "Modified Henry",
            Self::DAboville => "d'Aboville",
            Self::Record => "Record",
        }
    }
}

impl fmt::Display for NumberingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumberingScheme {
    type Err = UnknownSchemeError;

    /// Parses a scheme name.
    ///
    /// Matching ignores case, spaces, hyphens, underscores and apostrophes, so
    /// `Modified Henry`, `modified-henry` and `daboville` are all accepted.
    /// `Modified Register` is accepted as an alias for [`Self::Record`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_' | '\'' | '\u{2019}'))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "henry" => Ok(Self::Henry),
            "modifiedhenry" => Ok(Self::ModifiedHenry),
            "daboville" => Ok(Self::DAboville),
            "record" | "modifiedregister" => Ok(Self::Record),
            _ => Err(UnknownSchemeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for NumberingScheme {
    type Error = UnknownSchemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NumberingScheme> for String {
    fn from(scheme: NumberingScheme) -> Self {
        scheme.name().to_string()
    }
}

/// Error returned for a numbering scheme name that is not recognised.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "no such numbering: '{0}' (expected one of: Henry, Modified Henry, d'Aboville, Record)"
)]
pub struct UnknownSchemeError(String);
