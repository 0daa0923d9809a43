use serde::{Deserialize, Serialize};

use crate::domain::{Date, Handle};

/// The kinds of event a descendant report knows how to summarise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Birth.
    Birth,
    /// Baptism; stands in for a missing birth.
    Baptism,
    /// Christening; stands in for a missing birth.
    Christening,
    /// Death.
    Death,
    /// Burial; stands in for a missing death.
    Burial,
    /// Cremation; stands in for a missing death.
    Cremation,
    /// Marriage.
    Marriage,
    /// Anything else.
    Other,
}

impl EventType {
    /// Event types accepted in place of a missing birth, in preference order.
    pub const BIRTH_FALLBACKS: [Self; 2] = [Self::Baptism, Self::Christening];

    /// Event types accepted in place of a missing death, in preference order.
    pub const DEATH_FALLBACKS: [Self; 2] = [Self::Burial, Self::Cremation];
}

/// Something that happened to a person, optionally dated and placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    handle: Handle,
    kind: EventType,
    date: Option<Date>,
    place: Option<Handle>,
    description: String,
    private: bool,
}

impl Event {
    /// Creates an undated, unplaced event.
    #[must_use]
    pub const fn new(handle: Handle, kind: EventType) -> Self {
        Self {
            handle,
            kind,
            date: None,
            place: None,
            description: String::new(),
            private: false,
        }
    }

    /// Sets the date.
    #[must_use]
    pub const fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the place.
    #[must_use]
    pub fn with_place(mut self, place: Handle) -> Self {
        self.place = Some(place);
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the event as private.
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

    /// The event type.
    #[must_use]
    pub const fn kind(&self) -> EventType {
        self.kind
    }

    /// The date, if recorded.
    #[must_use]
    pub const fn date(&self) -> Option<&Date> {
        self.date.as_ref()
    }

    /// The place, if recorded.
    #[must_use]
    pub const fn place(&self) -> Option<&Handle> {
        self.place.as_ref()
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the record is marked private.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }
}

/// A named location, optionally enclosed by a larger one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    handle: Handle,
    name: String,
    enclosed_by: Option<Handle>,
}

impl Place {
    /// Creates a top-level place.
    #[must_use]
    pub fn new(handle: Handle, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            enclosed_by: None,
        }
    }

    /// Sets the enclosing place.
    #[must_use]
    pub fn within(mut self, parent: Handle) -> Self {
        self.enclosed_by = Some(parent);
        self
    }

    /// The stable store handle.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The place's own name (without enclosing places).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing place, if any.
    #[must_use]
    pub const fn enclosed_by(&self) -> Option<&Handle> {
        self.enclosed_by.as_ref()
    }
}
