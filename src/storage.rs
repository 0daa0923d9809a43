//! Family-tree storage.
//!
//! The [`Database`] trait is the read-only view the numbering engine and the
//! report writer work against. [`FamilyTree`] is the in-memory store this
//! crate ships, loaded from YAML.

mod database;
mod family_tree;
mod yaml;

pub use database::Database;
pub use family_tree::{DanglingReference, FamilyTree, InsertError, ReferenceKind};
pub use yaml::LoadError;
