use chrono::{Datelike, Local};

use crate::{
    domain::{Event, LivingPeople, Name, Person, ReportOptions},
    storage::Database,
};

/// People with no death record and a birth this many years ago or more are
/// taken to be dead.
const MAX_AGE: i32 = 110;

/// How much of a person the report may show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Visibility {
    /// Name and details.
    Full,
    /// The given name replaced, details hidden.
    Name(Name),
}

/// Applies the private-record and living-people options.
#[derive(Debug, Clone)]
pub(crate) struct Privacy {
    include_private: bool,
    living_people: LivingPeople,
    years_past_death: u32,
    current_year: i32,
}

impl Privacy {
    pub(crate) fn new(options: &ReportOptions) -> Self {
        Self::with_year(options, Local::now().year())
    }

    pub(crate) const fn with_year(options: &ReportOptions, current_year: i32) -> Self {
        Self {
            include_private: options.include_private,
            living_people: options.living_people,
            years_past_death: options.years_past_death,
            current_year,
        }
    }

    /// Whether an event may be shown.
    pub(crate) const fn shows_event(&self, event: &Event) -> bool {
        self.include_private || !event.is_private()
    }

    /// What to show of `person`.
    pub(crate) fn visibility<D: Database>(&self, db: &D, person: &Person) -> Visibility {
        if person.is_private() && !self.include_private {
            return Visibility::Name(Name::new("Private", ""));
        }

        if self.living_people == LivingPeople::IncludeAll || !self.probably_alive(db, person) {
            return Visibility::Full;
        }

        let name = person.name();
        Visibility::Name(match self.living_people {
            LivingPeople::LastNameOnly => Name::new("", name.surname.clone()),
            LivingPeople::ReplaceName => Name::new("Living", ""),
            LivingPeople::IncludeAll | LivingPeople::FullNameOnly => name.clone(),
        })
    }

    /// Whether `person` may still be alive, allowing `years_past_death` after
    /// a recorded death.
    pub(crate) fn probably_alive<D: Database>(&self, db: &D, person: &Person) -> bool {
        if let Some(death) = db.death_or_fallback(person) {
            let Some(date) = death.date() else {
                return false;
            };
            let window = i32::try_from(self.years_past_death).unwrap_or(i32::MAX);
            return date.year().saturating_add(window) >= self.current_year;
        }

        db.birth_or_fallback(person)
            .and_then(Event::date)
            .is_none_or(|birth| self.current_year - birth.year() < MAX_AGE)
    }
}
