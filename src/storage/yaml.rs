//! YAML family-tree files.
//!
//! A tree file has four top-level lists:
//!
//! ```yaml
//! people:
//!   - handle: p1
//!     id: I0001
//!     name: { first: Ada, surname: Byron }
//!     gender: female
//!     birth: e1
//! families:
//!   - handle: f1
//!     mother: p1
//!     children: [p2]
//!     relationship: married
//! events:
//!   - handle: e1
//!     type: birth
//!     date: 1815-12-10
//!     place: london
//! places:
//!   - handle: london
//!     name: London
//! ```
//!
//! Ids default to the handle. A person's `families` and `parent_families`
//! may be omitted; any family not listed explicitly is appended in file
//! order.

use std::{fs, io, path::Path};

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    domain::{Date, Event, EventType, Family, Gender, Handle, Name, Person, Place, RecordId, Relationship},
    storage::{FamilyTree, InsertError},
};

/// Errors that can occur when loading a family tree.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The tree file could not be read.
    #[error("failed to read family tree: {0}")]
    Io(#[from] io::Error),
    /// The YAML is malformed, or holds an invalid handle, date or enum value.
    #[error("failed to parse family tree: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Two records share a handle or id.
    #[error("inconsistent family tree: {0}")]
    Insert(#[from] InsertError),
}

impl FamilyTree {
    /// Loads a family tree from a YAML file.
    ///
    /// # Errors
    ///
    /// See [`LoadError`].
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses a family tree from YAML text.
    ///
    /// # Errors
    ///
    /// See [`LoadError`].
    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        let file: TreeFile = serde_yaml::from_str(content)?;
        let tree = file.into_tree()?;

        let dangling = tree.dangling_references().len();
        if dangling > 0 {
            warn!(count = dangling, "family tree holds dangling references");
        }
        debug!(people = tree.len(), "loaded family tree");

        Ok(tree)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeFile {
    #[serde(default)]
    people: Vec<PersonRecord>,
    #[serde(default)]
    families: Vec<FamilyRecord>,
    #[serde(default)]
    events: Vec<EventRecord>,
    #[serde(default)]
    places: Vec<PlaceRecord>,
}

impl TreeFile {
    fn into_tree(self) -> Result<FamilyTree, InsertError> {
        let mut tree = FamilyTree::default();

        for place in self.places {
            tree.insert_place(place.into())?;
        }
        for event in self.events {
            tree.insert_event(event.into())?;
        }
        for person in self.people {
            tree.insert_person(person.into())?;
        }
        // Inserting families links members, after any explicit lists above.
        for family in self.families {
            tree.insert_family(family.into())?;
        }

        Ok(tree)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersonRecord {
    handle: Handle,
    id: Option<RecordId>,
    #[serde(default)]
    name: Name,
    #[serde(default)]
    gender: Gender,
    #[serde(default)]
    alternate_names: Vec<Name>,
    birth: Option<Handle>,
    death: Option<Handle>,
    #[serde(default)]
    events: Vec<Handle>,
    #[serde(default)]
    families: Vec<Handle>,
    #[serde(default)]
    parent_families: Vec<Handle>,
    #[serde(default)]
    private: bool,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        let id = record.id.unwrap_or_else(|| record.handle.clone());
        let mut person = Self::new(record.handle, id, record.name)
            .with_gender(record.gender)
            .with_private(record.private);

        for name in record.alternate_names {
            person = person.with_alternate_name(name);
        }
        if let Some(birth) = record.birth {
            person = person.with_birth(birth);
        }
        if let Some(death) = record.death {
            person = person.with_death(death);
        }
        for event in record.events {
            person = person.with_event(event);
        }
        for family in record.families {
            person.add_family(family);
        }
        for family in record.parent_families {
            person.add_parent_family(family);
        }

        person
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FamilyRecord {
    handle: Handle,
    id: Option<RecordId>,
    father: Option<Handle>,
    mother: Option<Handle>,
    #[serde(default)]
    children: Vec<Handle>,
    #[serde(default)]
    relationship: Relationship,
    #[serde(default)]
    private: bool,
}

impl From<FamilyRecord> for Family {
    fn from(record: FamilyRecord) -> Self {
        let id = record.id.unwrap_or_else(|| record.handle.clone());
        let mut family = Self::new(record.handle, id)
            .with_relationship(record.relationship)
            .with_private(record.private);

        if let Some(father) = record.father {
            family = family.with_father(father);
        }
        if let Some(mother) = record.mother {
            family = family.with_mother(mother);
        }
        for child in record.children {
            family = family.with_child(child);
        }

        family
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventRecord {
    handle: Handle,
    #[serde(rename = "type")]
    kind: EventType,
    date: Option<Date>,
    place: Option<Handle>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    private: bool,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let mut event = Self::new(record.handle, record.kind)
            .with_description(record.description)
            .with_private(record.private);

        if let Some(date) = record.date {
            event = event.with_date(date);
        }
        if let Some(place) = record.place {
            event = event.with_place(place);
        }

        event
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceRecord {
    handle: Handle,
    name: String,
    enclosed_by: Option<Handle>,
}

impl From<PlaceRecord> for Place {
    fn from(record: PlaceRecord) -> Self {
        let place = Self::new(record.handle, record.name);
        match record.enclosed_by {
            Some(parent) => place.within(parent),
            None => place,
        }
    }
}
