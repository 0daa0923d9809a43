//! In-memory family-tree store
//!
//! The [`FamilyTree`] knows nothing about files. It holds people, families,
//! events and places keyed by handle, and answers the [`Database`] queries
//! the numbering engine and report writer make.

use std::collections::{BTreeMap, HashMap};

use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{Event, Family, Handle, Person, Place, RecordId},
    storage::Database,
};

/// An in-memory family tree.
///
/// Records are stored in separate maps:
/// - People: `HashMap<Handle, Person>`, plus `BTreeMap<RecordId, Handle>` for
///   lookups by external id
/// - Families, events and places: `HashMap<Handle, _>`
///
/// Family order matters to the report, so the order families were inserted in
/// is kept alongside.
#[derive(Debug, Default)]
pub struct FamilyTree {
    people: HashMap<Handle, Person>,
    people_by_id: BTreeMap<RecordId, Handle>,
    families: HashMap<Handle, Family>,
    family_order: Vec<Handle>,
    events: HashMap<Handle, Event>,
    places: HashMap<Handle, Place>,
}

/// Errors that can occur when inserting records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    /// A record with the same handle already exists.
    #[error("duplicate handle {0}")]
    DuplicateHandle(Handle),
    /// A person or family with the same external id already exists.
    #[error("duplicate id {0}")]
    DuplicateId(RecordId),
}

/// What a dangling reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// A family's father or mother.
    Parent,
    /// A family's child list.
    Child,
    /// A person's family or parent-family list.
    Family,
    /// A person's event list, birth or death.
    Event,
    /// An event's place, or a place's enclosing place.
    Place,
}

/// A reference to a record that does not exist in the tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingReference {
    /// The record holding the reference.
    pub from: Handle,
    /// What kind of reference it is.
    pub kind: ReferenceKind,
    /// The missing handle.
    pub target: Handle,
}

impl FamilyTree {
    /// Inserts a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle or external id is already taken.
    pub fn insert_person(&mut self, person: Person) -> Result<(), InsertError> {
        if self.people.contains_key(person.handle()) {
            return Err(InsertError::DuplicateHandle(person.handle().clone()));
        }
        if self.people_by_id.contains_key(person.id()) {
            return Err(InsertError::DuplicateId(person.id().clone()));
        }

        self.people_by_id
            .insert(person.id().clone(), person.handle().clone());
        self.people.insert(person.handle().clone(), person);
        Ok(())
    }

    /// Inserts a family and links its members to it.
    ///
    /// Each parent already in the tree gets the family appended to their
    /// families, and each child already in the tree gets it appended to
    /// their parent families. Families already listed are left where they are,
    /// so an explicit ordering set up beforehand is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is already taken.
    pub fn insert_family(&mut self, family: Family) -> Result<(), InsertError> {
        let handle = family.handle().clone();
        if self.families.contains_key(&handle) {
            return Err(InsertError::DuplicateHandle(handle));
        }

        for parent in family.parents() {
            if let Some(person) = self.people.get_mut(parent) {
                person.add_family(handle.clone());
            }
        }
        for child in family.children() {
            if let Some(person) = self.people.get_mut(child) {
                person.add_parent_family(handle.clone());
            }
        }

        self.family_order.push(handle.clone());
        self.families.insert(handle, family);
        Ok(())
    }

    /// Inserts an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is already taken.
    pub fn insert_event(&mut self, event: Event) -> Result<(), InsertError> {
        if self.events.contains_key(event.handle()) {
            return Err(InsertError::DuplicateHandle(event.handle().clone()));
        }
        self.events.insert(event.handle().clone(), event);
        Ok(())
    }

    /// Inserts a place.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is already taken.
    pub fn insert_place(&mut self, place: Place) -> Result<(), InsertError> {
        if self.places.contains_key(place.handle()) {
            return Err(InsertError::DuplicateHandle(place.handle().clone()));
        }
        self.places.insert(place.handle().clone(), place);
        Ok(())
    }

    /// Number of people in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the tree holds no people.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Families in insertion order.
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.family_order
            .iter()
            .filter_map(|handle| self.families.get(handle))
    }

    /// People sorted by external id.
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people_by_id
            .values()
            .filter_map(|handle| self.people.get(handle))
    }

    /// Whether any person is recorded as their own ancestor.
    #[must_use]
    pub fn has_ancestry_loops(&self) -> bool {
        let (graph, _) = self.ancestry_graph();
        is_cyclic_directed(&graph)
    }

    /// Return every ancestry loop as a sorted set of person handles.
    ///
    /// Such data is inconsistent (someone is their own ancestor). The
    /// numbering engine still terminates on it because traversal depth is
    /// bounded, but the codes it produces are meaningless.
    #[must_use]
    #[instrument(skip(self))]
    pub fn ancestry_loops(&self) -> Vec<Vec<Handle>> {
        let (graph, handles) = self.ancestry_graph();
        let mut loops = Vec::new();

        for component in tarjan_scc(&graph) {
            if component.len() > 1 {
                let mut members: Vec<_> = component
                    .iter()
                    .map(|&node| handles[node].clone())
                    .collect();
                members.sort();
                loops.push(members);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                loops.push(vec![handles[node].clone()]);
            }
        }

        loops.sort();
        loops
    }

    /// Every reference to a record that is not in the tree, sorted.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut check = |from: &Handle, kind: ReferenceKind, target: &Handle, exists: bool| {
            if !exists {
                dangling.push(DanglingReference {
                    from: from.clone(),
                    kind,
                    target: target.clone(),
                });
            }
        };

        for family in self.families.values() {
            for parent in family.parents() {
                check(
                    family.handle(),
                    ReferenceKind::Parent,
                    parent,
                    self.people.contains_key(parent),
                );
            }
            for child in family.children() {
                check(
                    family.handle(),
                    ReferenceKind::Child,
                    child,
                    self.people.contains_key(child),
                );
            }
        }

        for person in self.people.values() {
            for family in person.families().iter().chain(person.parent_families()) {
                check(
                    person.handle(),
                    ReferenceKind::Family,
                    family,
                    self.families.contains_key(family),
                );
            }
            for event in person
                .birth()
                .into_iter()
                .chain(person.death())
                .chain(person.events())
            {
                check(
                    person.handle(),
                    ReferenceKind::Event,
                    event,
                    self.events.contains_key(event),
                );
            }
        }

        for event in self.events.values() {
            if let Some(place) = event.place() {
                check(
                    event.handle(),
                    ReferenceKind::Place,
                    place,
                    self.places.contains_key(place),
                );
            }
        }

        for place in self.places.values() {
            if let Some(parent) = place.enclosed_by() {
                check(
                    place.handle(),
                    ReferenceKind::Place,
                    parent,
                    self.places.contains_key(parent),
                );
            }
        }

        dangling.sort();
        dangling
    }

    /// Builds a parent → child graph over slot numbers.
    ///
    /// Returns the graph and the handle for each slot.
    fn ancestry_graph(&self) -> (DiGraphMap<usize, ()>, Vec<Handle>) {
        let mut handles: Vec<Handle> = self.people.keys().cloned().collect();
        handles.sort();
        let slots: HashMap<&Handle, usize> = handles
            .iter()
            .enumerate()
            .map(|(slot, handle)| (handle, slot))
            .collect();

        let mut graph = DiGraphMap::with_capacity(handles.len(), handles.len() * 2);
        for slot in 0..handles.len() {
            graph.add_node(slot);
        }

        for family in self.families.values() {
            for parent in family.parents().filter_map(|p| slots.get(p)) {
                for child in family.children().iter().filter_map(|c| slots.get(c)) {
                    graph.add_edge(*parent, *child, ());
                }
            }
        }

        (graph, handles)
    }
}

impl Database for FamilyTree {
    fn person(&self, handle: &Handle) -> Option<&Person> {
        self.people.get(handle)
    }

    fn person_by_id(&self, id: &RecordId) -> Option<&Person> {
        let handle = self.people_by_id.get(id)?;
        self.people.get(handle)
    }

    fn family(&self, handle: &Handle) -> Option<&Family> {
        self.families.get(handle)
    }

    fn event(&self, handle: &Handle) -> Option<&Event> {
        self.events.get(handle)
    }

    fn place(&self, handle: &Handle) -> Option<&Place> {
        self.places.get(handle)
    }
}
