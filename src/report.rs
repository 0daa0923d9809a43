//! Descendant report rendering.
//!
//! [`DescendantReport`] numbers the descendants of a centre person and writes
//! them, generation by generation, into any [`Document`]. Text that depends
//! on the reader's language goes through a [`Locale`].

mod document;
mod locale;
pub mod markdown;
mod names;
mod privacy;
mod writer;

pub use document::{Document, IndexKind, IndexMark, Style};
pub use locale::{EnglishLocale, Locale};
pub use markdown::MarkdownDocument;
pub use writer::DescendantReport;

use crate::domain::RecordId;

/// Errors that prevent a report from being written.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The configured centre person is not in the family tree.
    #[error("person {0} is not in the database")]
    PersonNotFound(RecordId),

    /// No centre person was configured.
    #[error("no centre person given (set `pid` in the options or pass --person)")]
    MissingCentrePerson,
}
