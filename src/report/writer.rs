use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::{
    domain::{Event, Family, Handle, Name, Person, PlaceFormat, Relationship, ReportOptions},
    numbering::{Numbering, assign_numbers},
    report::{
        Document, EnglishLocale, Error, IndexMark, Locale, Style,
        names::{display_name, index_key},
        privacy::{Privacy, Visibility},
    },
    storage::Database,
};

const EMPTY_GENERATION_NOTE: &str = "All people in this generation have no children themselves, \
                                     so they are displayed as children in the previous generation.";

/// A descendant report for one centre person.
///
/// Construction resolves the centre person and numbers their descendants.
/// [`DescendantReport::write_report`] then renders one section per
/// generation into a [`Document`].
pub struct DescendantReport<'a, D> {
    db: &'a D,
    options: ReportOptions,
    center: &'a Person,
    numbering: Numbering,
    locale: Box<dyn Locale>,
    privacy: Privacy,
    printed_refs: HashMap<Handle, String>,
}

impl<'a, D: Database> DescendantReport<'a, D> {
    /// Prepares a report on the descendants of the options' centre person.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCentrePerson`] when no centre person is
    /// configured and [`Error::PersonNotFound`] when the id does not resolve.
    #[instrument(skip_all, fields(person = ?options.center_person, numbering = %options.numbering))]
    pub fn new(db: &'a D, options: ReportOptions) -> Result<Self, Error> {
        let id = options
            .center_person
            .as_ref()
            .ok_or(Error::MissingCentrePerson)?;
        let center = db
            .person_by_id(id)
            .ok_or_else(|| Error::PersonNotFound(id.clone()))?;

        if options.locale != "en" {
            warn!(locale = %options.locale, "unsupported report language, using English");
        }

        let numbering = assign_numbers(
            db,
            center.handle(),
            options.max_generations(),
            options.numbering,
        );
        debug!(visits = numbering.len(), generations = numbering.generations().len(), "numbered descendants");

        Ok(Self {
            db,
            locale: Box::new(EnglishLocale::new(options.date_format)),
            privacy: Privacy::new(&options),
            options,
            center,
            numbering,
            printed_refs: HashMap::new(),
        })
    }

    /// Replaces the report language.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Locale + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    /// Judges who may be living against `year` instead of the current year.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.privacy = Privacy::with_year(&self.options, year);
        self
    }

    /// The centre person.
    #[must_use]
    pub const fn center(&self) -> &Person {
        self.center
    }

    /// The numbering the report is written from.
    #[must_use]
    pub const fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    /// Writes the whole report into `doc`.
    #[instrument(skip_all)]
    pub fn write_report(&mut self, doc: &mut impl Document) {
        self.printed_refs.clear();

        let title = format!("Descendant Report for {}", self.name(self.center));
        doc.start_paragraph(Style::Title, None);
        doc.write_text(&title, Some(&IndexMark::contents(title.as_str(), 1)));
        doc.end_paragraph();

        let generations = self.numbering.generations().to_vec();
        for (generation, bucket) in generations.iter().enumerate() {
            if self.options.page_break_between_generations && generation > 0 {
                doc.page_break();
            }

            let heading = format!("Generation {}", generation + 1);
            doc.start_paragraph(Style::Generation, None);
            doc.write_text(&heading, Some(&IndexMark::contents(heading.as_str(), 2)));
            doc.end_paragraph();

            if generation > 0 && !self.generation_has_children(bucket.iter().copied()) {
                doc.write_styled_note(EMPTY_GENERATION_NOTE, Style::ChildListSimple);
                continue;
            }

            for &index in bucket.iter() {
                self.write_person(doc, index);
            }
        }
    }

    /// Whether anyone visited at `indices` has a family with children.
    fn generation_has_children(&self, mut indices: impl Iterator<Item = usize>) -> bool {
        indices.any(|index| {
            self.numbering
                .person_at(index)
                .and_then(|handle| self.db.person(handle))
                .is_some_and(|person| self.db.has_children(person))
        })
    }

    fn write_person(&mut self, doc: &mut impl Document, index: usize) {
        let db = self.db;
        let Some(person) = self.numbering.person_at(index).and_then(|h| db.person(h)) else {
            warn!(index, "numbered person not found");
            return;
        };

        // childless descendants appear in their parents' child tables
        if person.handle() != self.center.handle() && !db.has_children(person) {
            return;
        }

        let code = self.code(person.handle());
        doc.start_paragraph(Style::FirstEntry, Some(code.as_str()).filter(|c| !c.is_empty()));
        doc.start_bold();
        doc.write_text(&self.name(person), Some(&self.mark(person)));
        doc.end_bold();
        doc.end_paragraph();
        self.write_details(doc, person, Style::FirstDetails);
        self.write_alternate_names(doc, person);

        self.printed_refs
            .entry(person.handle().clone())
            .or_insert_with(|| code.clone());

        for family in db.families_of(person) {
            if let Some(spouse) = db.spouse(person, family) {
                if let Some(reference) = self.printed_refs.get(spouse.handle()).cloned() {
                    self.write_reference(doc, spouse, &reference, Style::FirstEntrySpouse);
                    continue;
                }

                self.write_spouse(
                    doc,
                    spouse,
                    family.relationship(),
                    Style::FirstEntrySpouse,
                    Style::FirstDetailsSpouse,
                );
                self.remember_spouse(spouse, person, &code);
            }

            if self.options.list_children {
                self.write_children(doc, family, person);
            }
        }
    }

    fn write_children(&mut self, doc: &mut impl Document, family: &Family, parent: &Person) {
        let db = self.db;
        if family.children().is_empty() {
            return;
        }

        let title = match db.spouse(parent, family) {
            Some(spouse) => format!("Children of {} and {}", self.name(parent), self.name(spouse)),
            None => format!("Children of {}", self.name(parent)),
        };
        doc.start_paragraph(Style::ChildTitle, None);
        doc.write_text(&title, None);
        doc.end_paragraph();

        doc.start_table(&format!("child-table-{}", family.id()), Style::ChildTable);
        for child_handle in family.children() {
            let Some(child) = db.person(child_handle) else {
                warn!(family = %family.handle(), child = %child_handle, "skipping unresolved child");
                continue;
            };
            let has_children = db.has_children(child);
            let code = self.code(child.handle());

            doc.start_row();
            doc.start_cell(Style::ChildTableCell);
            doc.start_paragraph(Style::ChildListLeftSimple, None);
            let prefix = if has_children { "+ " } else { "" };
            doc.write_text(&format!("{prefix}{code}"), None);
            doc.end_paragraph();
            doc.end_cell();

            doc.start_cell(Style::ChildTableCell);
            doc.start_paragraph(Style::ChildListSimple, None);
            doc.write_text(&self.name(child), Some(&self.mark(child)));
            doc.end_paragraph();
            if !has_children {
                self.write_compact_entry(doc, child, &code);
            }
            doc.end_cell();
            doc.end_row();
        }
        doc.end_table();
    }

    /// Details and spouses of a child who gets no entry of their own.
    fn write_compact_entry(&mut self, doc: &mut impl Document, child: &Person, code: &str) {
        let db = self.db;
        self.write_details(doc, child, Style::FirstDetails);

        for family in db.families_of(child) {
            let Some(spouse) = db.spouse(child, family) else {
                continue;
            };
            if let Some(reference) = self.printed_refs.get(spouse.handle()).cloned() {
                self.write_reference(doc, spouse, &reference, Style::ChildListSimpleIndented);
                continue;
            }

            self.write_spouse(
                doc,
                spouse,
                family.relationship(),
                Style::ChildListSimpleIndented,
                Style::FirstDetailsSpouse,
            );
            self.remember_spouse(spouse, child, code);
        }
    }

    fn write_spouse(
        &self,
        doc: &mut impl Document,
        spouse: &Person,
        relationship: Relationship,
        style: Style,
        details_style: Style,
    ) {
        let mut text = String::from("=");
        if let Some(abbreviation) = relationship.abbreviation() {
            text.push_str(&format!(" ({abbreviation})"));
        }
        text.push(' ');
        text.push_str(&self.name(spouse));

        let code = self.code(spouse.handle());
        if !code.is_empty() {
            text.push_str(&format!(". See reference {code} for their individual record"));
        }

        doc.start_paragraph(style, None);
        doc.write_text(&text, Some(&self.mark(spouse)));
        doc.end_paragraph();
        self.write_details(doc, spouse, details_style);
    }

    fn write_reference(&self, doc: &mut impl Document, spouse: &Person, reference: &str, style: Style) {
        doc.start_paragraph(style, None);
        doc.write_text(
            &format!("= {}, see {reference} for family details.", self.name(spouse)),
            Some(&self.mark(spouse)),
        );
        doc.end_paragraph();
    }

    /// Records where a spouse from outside the tree was described.
    fn remember_spouse(&mut self, spouse: &Person, partner: &Person, partner_code: &str) {
        if self.numbering.code(spouse.handle()).is_some() {
            return;
        }
        let reference = format!("= of: {partner_code} {}", self.name(partner));
        self.printed_refs.insert(spouse.handle().clone(), reference);
    }

    fn write_details(&self, doc: &mut impl Document, person: &Person, style: Style) {
        if !self.options.lifespan || !self.shows_details(person) {
            return;
        }

        let birth = self
            .db
            .birth_or_fallback(person)
            .filter(|e| self.privacy.shows_event(e));
        let death = self
            .db
            .death_or_fallback(person)
            .filter(|e| self.privacy.shows_event(e));

        if let Some(line) = birth.and_then(|e| self.event_line(e)) {
            doc.start_paragraph(style, None);
            doc.write_text(&line, None);
            doc.end_paragraph();
        }

        if let Some(mut line) = death.and_then(|e| self.event_line(e)) {
            let age = birth
                .and_then(Event::date)
                .zip(death.and_then(Event::date))
                .and_then(|(b, d)| self.locale.age_between(b, d));
            if let Some(age) = age {
                line.push_str(&format!(" ({age})"));
            }
            doc.start_paragraph(style, None);
            doc.write_text(&line, None);
            doc.end_paragraph();
        }
    }

    fn write_alternate_names(&self, doc: &mut impl Document, person: &Person) {
        if person.alternate_names().is_empty() || !self.shows_details(person) {
            return;
        }
        let names: Vec<String> = person
            .alternate_names()
            .iter()
            .map(|name| display_name(name, self.options.name_format))
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return;
        }

        doc.start_paragraph(Style::Entry, None);
        doc.write_text(&format!("Also known as: {}", names.join(", ")), None);
        doc.end_paragraph();
    }

    /// `b. 1900 - Springfield`; `None` when the event is undated.
    fn event_line(&self, event: &Event) -> Option<String> {
        let date = event.date()?;
        let mut line = format!(
            "{} {}",
            self.locale.event_abbreviation(event.kind()),
            self.locale.format_date(date)
        );
        if let Some(place) = event.place().and_then(|p| self.place_name(p)) {
            line.push_str(" - ");
            line.push_str(&place);
        }
        Some(line)
    }

    fn place_name(&self, handle: &Handle) -> Option<String> {
        let place = self.db.place(handle)?;
        if self.options.place_format == PlaceFormat::Name {
            return Some(place.name().to_string());
        }

        let mut parts = vec![place.name()];
        let mut seen = HashSet::from([place.handle()]);
        let mut next = place.enclosed_by();
        while let Some(parent) = next.and_then(|h| self.db.place(h)) {
            if !seen.insert(parent.handle()) {
                break;
            }
            parts.push(parent.name());
            next = parent.enclosed_by();
        }
        Some(parts.join(", "))
    }

    fn code(&self, person: &Handle) -> String {
        self.numbering
            .code(person)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn shown_name(&self, person: &Person) -> Name {
        match self.privacy.visibility(self.db, person) {
            Visibility::Full => person.name().clone(),
            Visibility::Name(name) => name,
        }
    }

    fn shows_details(&self, person: &Person) -> bool {
        self.privacy.visibility(self.db, person) == Visibility::Full
    }

    fn name(&self, person: &Person) -> String {
        let name = display_name(&self.shown_name(person), self.options.name_format);
        if name.is_empty() {
            self.locale.unknown().to_string()
        } else {
            name
        }
    }

    fn mark(&self, person: &Person) -> IndexMark {
        let key = index_key(&self.shown_name(person));
        match self.numbering.code(person.handle()) {
            Some(code) => IndexMark::alphabetical(format!("{key} #:{code}...")),
            None => IndexMark::alphabetical(format!("{key}...")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Date, EventType, NumberingScheme, Place},
        report::MarkdownDocument,
        storage::FamilyTree,
    };

    fn h(s: &str) -> Handle {
        Handle::try_from(s).unwrap()
    }

    fn person(handle: &str, first: &str, surname: &str) -> Person {
        Person::new(h(handle), h(&handle.to_uppercase()), Name::new(first, surname))
    }

    /// John and Mary have Anne and Tom. Anne marries Peter and has Lucy.
    fn sample() -> FamilyTree {
        let mut tree = FamilyTree::default();
        tree.insert_place(Place::new(h("town"), "Springfield").within(h("county")))
            .unwrap();
        tree.insert_place(Place::new(h("county"), "Shelby")).unwrap();
        tree.insert_event(
            Event::new(h("e1"), EventType::Birth)
                .with_date("1850-06-01".parse().unwrap())
                .with_place(h("town")),
        )
        .unwrap();
        tree.insert_event(
            Event::new(h("e2"), EventType::Burial).with_date("1920-03-05".parse().unwrap()),
        )
        .unwrap();

        tree.insert_person(person("john", "John", "Smith").with_birth(h("e1")).with_event(h("e2")))
            .unwrap();
        tree.insert_person(person("mary", "Mary", "Jones")).unwrap();
        tree.insert_person(person("anne", "Anne", "Smith")).unwrap();
        tree.insert_person(person("tom", "Tom", "Smith")).unwrap();
        tree.insert_person(person("peter", "Peter", "Brown")).unwrap();
        tree.insert_person(person("lucy", "Lucy", "Brown")).unwrap();

        tree.insert_family(
            Family::new(h("f1"), h("F1"))
                .with_father(h("john"))
                .with_mother(h("mary"))
                .with_child(h("anne"))
                .with_child(h("tom"))
                .with_relationship(Relationship::Married),
        )
        .unwrap();
        tree.insert_family(
            Family::new(h("f2"), h("F2"))
                .with_father(h("peter"))
                .with_mother(h("anne"))
                .with_child(h("lucy")),
        )
        .unwrap();
        tree
    }

    fn options(numbering: NumberingScheme) -> ReportOptions {
        let mut options = ReportOptions::default();
        options.center_person = Some(h("JOHN"));
        options.numbering = numbering;
        options
    }

    fn render(tree: &FamilyTree, options: ReportOptions) -> String {
        let mut report = DescendantReport::new(tree, options).unwrap().with_current_year(2025);
        let mut doc = MarkdownDocument::new();
        report.write_report(&mut doc);
        doc.finish()
    }

    #[test]
    fn missing_centre_person_is_an_error() {
        let tree = sample();

        let error = DescendantReport::new(&tree, ReportOptions::default()).err();
        assert_eq!(error, Some(Error::MissingCentrePerson));

        let mut options = ReportOptions::default();
        options.center_person = Some(h("I9999"));
        let error = DescendantReport::new(&tree, options).err();
        assert_eq!(error, Some(Error::PersonNotFound(h("I9999"))));
    }

    #[test]
    fn title_and_generation_headings() {
        let out = render(&sample(), options(NumberingScheme::DAboville));

        assert!(out.starts_with("# Descendant Report for John Smith\n\n## Generation 1\n\n"));
        assert!(out.contains("## Generation 2\n\n"));
        assert!(out.contains("## Generation 3\n\n"));
    }

    #[test]
    fn main_entry_with_details_and_spouse() {
        let out = render(&sample(), options(NumberingScheme::DAboville));

        assert!(out.contains("1 **John Smith**\n\n"));
        assert!(out.contains("b. 1850 - Springfield, Shelby\n\n"));
        assert!(out.contains("bur. 1920 (69 years)\n\n"));
        assert!(out.contains("= (M.) Mary Jones\n\n"));
        assert!(out.contains("#### Children of John Smith and Mary Jones\n\n"));
    }

    #[test]
    fn child_table_marks_parents_and_lists_leaf_children() {
        let out = render(&sample(), options(NumberingScheme::DAboville));

        assert!(out.contains("| + 1.1 | Anne Smith |\n"));
        assert!(out.contains("| 1.2 | Tom Smith |\n"));
        assert!(out.contains("| 1.1.1 | Lucy Brown |\n"));
    }

    #[test]
    fn childless_descendants_get_no_entry_of_their_own() {
        let out = render(&sample(), options(NumberingScheme::DAboville));

        assert!(out.contains("1.1 **Anne Smith**\n\n"));
        assert!(!out.contains("**Tom Smith**"));
        assert!(out.contains(EMPTY_GENERATION_NOTE));
    }

    #[test]
    fn descendant_spouse_is_referenced() {
        let mut tree = sample();
        // Tom later marries his niece Lucy
        tree.insert_family(
            Family::new(h("f3"), h("F3"))
                .with_father(h("tom"))
                .with_mother(h("lucy"))
                .with_child(h("kid")),
        )
        .unwrap();
        tree.insert_person(person("kid", "Kid", "Smith")).unwrap();

        let out = render(&tree, options(NumberingScheme::Henry));

        assert!(out.contains("= Lucy Brown. See reference 111 for their individual record"));
        assert!(out.contains("= Tom Smith, see 12 for family details."));
    }

    #[test]
    fn outside_spouse_reference_names_the_partner() {
        let mut tree = sample();
        // Peter also has a family with Mary, after Anne's entry has been written
        tree.insert_family(
            Family::new(h("f4"), h("F4"))
                .with_father(h("peter"))
                .with_mother(h("mary")),
        )
        .unwrap();
        let mut options = options(NumberingScheme::DAboville);
        options.list_children = false;

        let mut report = DescendantReport::new(&tree, options).unwrap();
        let mut doc = MarkdownDocument::new();
        report.write_report(&mut doc);

        assert_eq!(
            report.printed_refs.get(&h("peter")).map(String::as_str),
            Some("= of: 1.1 Anne Smith")
        );
        assert_eq!(
            report.printed_refs.get(&h("mary")).map(String::as_str),
            Some("= of: 1 John Smith")
        );
    }

    #[test]
    fn index_marks_carry_codes() {
        let out = render(&sample(), options(NumberingScheme::Henry));

        assert!(out.contains("- SMITH, John #:1..."));
        assert!(out.contains("- SMITH, Anne #:11..."));
        assert!(out.contains("- JONES, Mary..."));
    }

    #[test]
    fn page_breaks_between_generations() {
        let mut options = options(NumberingScheme::Record);
        options.page_break_between_generations = true;
        let out = render(&sample(), options);

        assert_eq!(out.matches("page-break-after").count(), 2);
        assert!(!out.starts_with("<div"));
    }

    #[test]
    fn lifespan_off_hides_details() {
        let mut options = options(NumberingScheme::DAboville);
        options.lifespan = false;
        let out = render(&sample(), options);
        assert!(!out.contains("b. 1850"));
    }

    #[test]
    fn living_people_are_masked() {
        let mut tree = sample();
        tree.insert_event(
            Event::new(h("e3"), EventType::Birth).with_date(Date::year_only(1990)),
        )
        .unwrap();
        tree.insert_person(person("zoe", "Zoe", "Brown").with_birth(h("e3")))
            .unwrap();
        tree.insert_family(Family::new(h("f5"), h("F5")).with_mother(h("lucy")).with_child(h("zoe")))
            .unwrap();

        let mut options = options(NumberingScheme::DAboville);
        options.living_people = crate::domain::LivingPeople::ReplaceName;
        let out = render(&tree, options);

        assert!(out.contains("| 1.1.1.1 | Living |"));
        assert!(!out.contains("Zoe"));
        assert!(!out.contains("b. 1990"));
    }

    struct FrenchAbbreviations;

    impl Locale for FrenchAbbreviations {
        fn format_date(&self, date: &Date) -> String {
            EnglishLocale::default().format_date(date)
        }

        fn age_between(&self, start: &Date, end: &Date) -> Option<String> {
            EnglishLocale::default().age_between(start, end)
        }

        fn event_abbreviation(&self, kind: EventType) -> &'static str {
            match kind {
                EventType::Birth => "n.",
                EventType::Burial => "inh.",
                _ => "e.",
            }
        }

        fn unknown(&self) -> &'static str {
            "Inconnu"
        }
    }

    #[test]
    fn custom_locale_supplies_abbreviations() {
        let tree = sample();
        let mut report = DescendantReport::new(&tree, options(NumberingScheme::Henry))
            .unwrap()
            .with_locale(FrenchAbbreviations);
        let mut doc = MarkdownDocument::new();
        report.write_report(&mut doc);
        let out = doc.finish();

        assert!(out.contains("n. 1850"));
        assert!(out.contains("inh. 1920"));
        assert!(!out.contains("b. 1850"));
    }

    #[test]
    fn rewriting_gives_the_same_output() {
        let tree = sample();
        let mut report = DescendantReport::new(&tree, options(NumberingScheme::Henry))
            .unwrap()
            .with_current_year(2025);

        let mut first = MarkdownDocument::new();
        report.write_report(&mut first);
        let mut second = MarkdownDocument::new();
        report.write_report(&mut second);

        assert_eq!(first.finish(), second.finish());
    }
}
