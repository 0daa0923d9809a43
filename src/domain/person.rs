use serde::{Deserialize, Serialize};

use crate::domain::{Handle, RecordId};

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Not recorded.
    #[default]
    Unknown,
}

/// A personal name split into the parts a report needs to arrange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Given name(s).
    #[serde(default)]
    pub first: String,
    /// Family name.
    #[serde(default)]
    pub surname: String,
    /// Generational or honorific suffix (e.g. `Jr`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
}

impl Name {
    /// Creates a name from given name and surname.
    #[must_use]
    pub fn new(first: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            surname: surname.into(),
            suffix: String::new(),
        }
    }

    /// Returns a copy of this name with the given suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Whether no part of the name is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.surname.is_empty() && self.suffix.is_empty()
    }
}

/// An individual in the family tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    handle: Handle,
    id: RecordId,
    gender: Gender,
    name: Name,
    alternate_names: Vec<Name>,
    birth: Option<Handle>,
    death: Option<Handle>,
    events: Vec<Handle>,
    families: Vec<Handle>,
    parent_families: Vec<Handle>,
    private: bool,
}

impl Person {
    /// Creates a person with no events or family links.
    #[must_use]
    pub const fn new(handle: Handle, id: RecordId, name: Name) -> Self {
        Self {
            handle,
            id,
            gender: Gender::Unknown,
            name,
            alternate_names: Vec::new(),
            birth: None,
            death: None,
            events: Vec::new(),
            families: Vec::new(),
            parent_families: Vec::new(),
            private: false,
        }
    }

    /// Sets the gender.
    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Adds an alternate name.
    #[must_use]
    pub fn with_alternate_name(mut self, name: Name) -> Self {
        self.alternate_names.push(name);
        self
    }

    /// Sets the birth event reference.
    #[must_use]
    pub fn with_birth(mut self, event: Handle) -> Self {
        self.birth = Some(event);
        self
    }

    /// Sets the death event reference.
    #[must_use]
    pub fn with_death(mut self, event: Handle) -> Self {
        self.death = Some(event);
        self
    }

    /// Adds a reference to another event (baptism, burial, ...).
    #[must_use]
    pub fn with_event(mut self, event: Handle) -> Self {
        self.events.push(event);
        self
    }

    /// Marks the person as private.
    #[must_use]
    pub const fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Appends a family in which this person is a parent.
    pub fn add_family(&mut self, family: Handle) {
        if !self.families.contains(&family) {
            self.families.push(family);
        }
    }

    /// Appends a family in which this person is a child.
    pub fn add_parent_family(&mut self, family: Handle) {
        if !self.parent_families.contains(&family) {
            self.parent_families.push(family);
        }
    }

    /// The stable store handle.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The external display identifier.
    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    /// The recorded gender.
    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// The primary name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Other names the person is known by.
    #[must_use]
    pub fn alternate_names(&self) -> &[Name] {
        &self.alternate_names
    }

    /// The birth event, if recorded.
    #[must_use]
    pub const fn birth(&self) -> Option<&Handle> {
        self.birth.as_ref()
    }

    /// The death event, if recorded.
    #[must_use]
    pub const fn death(&self) -> Option<&Handle> {
        self.death.as_ref()
    }

    /// All other event references, in recorded order.
    #[must_use]
    pub fn events(&self) -> &[Handle] {
        &self.events
    }

    /// Families in which this person is a parent, in store order.
    #[must_use]
    pub fn families(&self) -> &[Handle] {
        &self.families
    }

    /// Families in which this person is a child.
    #[must_use]
    pub fn parent_families(&self) -> &[Handle] {
        &self.parent_families
    }

    /// Whether the record is marked private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }
}
