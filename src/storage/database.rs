use crate::domain::{Event, EventType, Family, Handle, Person, Place, RecordId};

/// Read access to a family-tree store.
///
/// The numbering engine and the report writer only ever read through this
/// trait, so any host application can supply its own store.
pub trait Database {
    /// Resolves a person by handle.
    fn person(&self, handle: &Handle) -> Option<&Person>;

    /// Resolves a person by external display id.
    fn person_by_id(&self, id: &RecordId) -> Option<&Person>;

    /// Resolves a family by handle.
    fn family(&self, handle: &Handle) -> Option<&Family>;

    /// Resolves an event by handle.
    fn event(&self, handle: &Handle) -> Option<&Event>;

    /// Resolves a place by handle.
    fn place(&self, handle: &Handle) -> Option<&Place>;

    /// Families in which `person` is a parent, skipping dangling references.
    fn families_of<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Family> + 'a {
        person
            .families()
            .iter()
            .filter_map(move |handle| self.family(handle))
    }

    /// Whether any of the person's families lists at least one child.
    fn has_children(&self, person: &Person) -> bool {
        self.families_of(person).any(|family| !family.children().is_empty())
    }

    /// The other parent in `family`, if recorded and resolvable.
    fn spouse<'a>(&'a self, person: &Person, family: &Family) -> Option<&'a Person> {
        family
            .spouse_of(person.handle())
            .and_then(|handle| self.person(handle))
    }

    /// The birth event, or the first baptism/christening when no birth is
    /// recorded.
    fn birth_or_fallback(&self, person: &Person) -> Option<&Event> {
        primary_or_fallback(self, person.birth(), person, &EventType::BIRTH_FALLBACKS)
    }

    /// The death event, or the first burial/cremation when no death is
    /// recorded.
    fn death_or_fallback(&self, person: &Person) -> Option<&Event> {
        primary_or_fallback(self, person.death(), person, &EventType::DEATH_FALLBACKS)
    }
}

fn primary_or_fallback<'a, D: Database + ?Sized>(
    db: &'a D,
    primary: Option<&Handle>,
    person: &Person,
    fallbacks: &[EventType],
) -> Option<&'a Event> {
    primary.and_then(|handle| db.event(handle)).or_else(|| {
        person
            .events()
            .iter()
            .filter_map(|handle| db.event(handle))
            .find(|event| fallbacks.contains(&event.kind()))
    })
}
