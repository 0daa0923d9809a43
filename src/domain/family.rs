use serde::{Deserialize, Serialize};

use crate::domain::{Handle, RecordId};

/// The kind of union a family records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// A marriage.
    Married,
    /// A civil union or registered partnership.
    CivilUnion,
    /// A couple who did not marry.
    Unmarried,
    /// Not recorded.
    #[default]
    Unknown,
}

impl Relationship {
    /// The abbreviation printed before a spouse's name, if any.
    #[must_use]
    pub const fn abbreviation(self) -> Option<&'static str> {
        match self {
            Self::Married => Some("M."),
            Self::CivilUnion => Some("CU."),
            Self::Unmarried | Self::Unknown => None,
        }
    }
}

/// A couple (or single parent) and their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    handle: Handle,
    id: RecordId,
    father: Option<Handle>,
    mother: Option<Handle>,
    children: Vec<Handle>,
    relationship: Relationship,
    private: bool,
}

impl Family {
    /// Creates a family with no parents or children.
    #[must_use]
    pub const fn new(handle: Handle, id: RecordId) -> Self {
        Self {
            handle,
            id,
            father: None,
            mother: None,
            children: Vec::new(),
            relationship: Relationship::Unknown,
            private: false,
        }
    }

    /// Sets the father.
    #[must_use]
    pub fn with_father(mut self, father: Handle) -> Self {
        self.father = Some(father);
        self
    }

    /// Sets the mother.
    #[must_use]
    pub fn with_mother(mut self, mother: Handle) -> Self {
        self.mother = Some(mother);
        self
    }

    /// Appends a child. The order of calls is the listing order.
    #[must_use]
    pub fn with_child(mut self, child: Handle) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the relationship type.
    #[must_use]
    pub const fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = relationship;
        self
    }

    /// Marks the family as private.
    #[must_use]
    pub const fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
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

    /// The father, if recorded.
    #[must_use]
    pub const fn father(&self) -> Option<&Handle> {
        self.father.as_ref()
    }

    /// The mother, if recorded.
    #[must_use]
    pub const fn mother(&self) -> Option<&Handle> {
        self.mother.as_ref()
    }

    /// Both parents, mother first, skipping absent ones.
    pub fn parents(&self) -> impl Iterator<Item = &Handle> {
        self.mother.iter().chain(self.father.iter())
    }

    /// Child references in listing order.
    #[must_use]
    pub fn children(&self) -> &[Handle] {
        &self.children
    }

    /// The relationship type.
    #[must_use]
    pub const fn relationship(&self) -> Relationship {
        self.relationship
    }

    /// Whether the record is marked private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }

    /// The partner of `person` in this family, if any.
    ///
    /// Returns `None` when `person` is not a parent here or the other parent
    /// is unknown.
    #[must_use]
    pub fn spouse_of(&self, person: &Handle) -> Option<&Handle> {
        if self.father.as_ref() == Some(person) {
            self.mother.as_ref()
        } else if self.mother.as_ref() == Some(person) {
            self.father.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> Handle {
        Handle::try_from(s).unwrap()
    }

    #[test]
    fn spouse_is_the_other_parent() {
        let family = Family::new(handle("f1"), handle("F0001"))
            .with_father(handle("p1"))
            .with_mother(handle("p2"));

        assert_eq!(family.spouse_of(&handle("p1")), Some(&handle("p2")));
        assert_eq!(family.spouse_of(&handle("p2")), Some(&handle("p1")));
        assert_eq!(family.spouse_of(&handle("p3")), None);
    }

    #[test]
    fn single_parent_has_no_spouse() {
        let family = Family::new(handle("f1"), handle("F0001")).with_mother(handle("p2"));
        assert_eq!(family.spouse_of(&handle("p2")), None);
        assert_eq!(family.parents().collect::<Vec<_>>(), vec![&handle("p2")]);
    }

    #[test]
    fn children_keep_listing_order() {
        let family = Family::new(handle("f1"), handle("F0001"))
            .with_child(handle("c2"))
            .with_child(handle("c1"));
        assert_eq!(family.children(), &[handle("c2"), handle("c1")]);
    }
}
