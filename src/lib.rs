//! Genealogical descendant reports
//!
//! Number everyone descended from a centre person under one of four
//! numbering schemes (Henry, Modified Henry, d'Aboville and Record) and write
//! them out generation by generation.
//!
//! ```no_run
//! use descendants::{DescendantReport, FamilyTree, MarkdownDocument, ReportOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = FamilyTree::load("family.yaml".as_ref())?;
//! let mut options = ReportOptions::default();
//! options.center_person = Some("I0001".parse()?);
//!
//! let mut report = DescendantReport::new(&tree, options)?;
//! let mut doc = MarkdownDocument::new();
//! report.write_report(&mut doc);
//! println!("{}", doc.finish());
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub use domain::{
    DateFormat, DescendantCode, Handle, LivingPeople, NameFormat, NumberingScheme, PlaceFormat,
    RecordId, ReportOptions,
};

pub mod numbering;
pub use numbering::{Numbering, assign_numbers};

pub mod report;
pub use report::{DescendantReport, MarkdownDocument};

pub mod storage;
pub use storage::{Database, DanglingReference, FamilyTree, ReferenceKind};
