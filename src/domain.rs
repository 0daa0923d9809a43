//! Domain models for descendant reports.
//!
//! This module contains the core domain types: people, families and events
//! as the family-tree store hands them out, the numbering schemes and the
//! codes they produce, and the report options.

mod code;
pub use code::DescendantCode;

mod config;
pub use config::{
    DateFormat, LivingPeople, MAX_GENERATIONS, NameFormat, OptionsError, PlaceFormat,
    ReportOptions, ReportStructure,
};

/// Partial genealogical dates.
pub mod date;
pub use date::Date;

mod event;
pub use event::{Event, EventType, Place};

mod family;
pub use family::{Family, Relationship};

/// Record handles and external ids.
pub mod handle;
pub use handle::{Handle, RecordId};

mod person;
pub use person::{Gender, Name, Person};

/// Numbering scheme selection.
pub mod scheme;
pub use scheme::NumberingScheme;
