use std::fmt;

/// Paragraph, table and cell styles used by the descendant report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// The report title.
    Title,
    /// A `Generation N` heading.
    Generation,
    /// The title above a child table.
    ChildTitle,
    /// A child table.
    ChildTable,
    /// A cell in a child table.
    ChildTableCell,
    /// The code cell of a child row.
    ChildListLeftSimple,
    /// The name cell of a child row.
    ChildListSimple,
    /// Detail lines inside a child row.
    ChildListSimpleIndented,
    /// Details under a main entry.
    Entry,
    /// A descendant's main entry.
    FirstEntry,
    /// Vital details of a descendant.
    FirstDetails,
    /// A spouse line.
    FirstEntrySpouse,
    /// Vital details of a spouse.
    FirstDetailsSpouse,
}

impl Style {
    /// The style sheet name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "DR-Title",
            Self::Generation => "DR-Generation",
            Self::ChildTitle => "DR-ChildTitle",
            Self::ChildTable => "DR-ChildTable",
            Self::ChildTableCell => "DR-ChildTableCell",
            Self::ChildListLeftSimple => "DR-ChildListLeftSimple",
            Self::ChildListSimple => "DR-ChildListSimple",
            Self::ChildListSimpleIndented => "DR-ChildListSimpleIndented",
            Self::Entry => "DR-Entry",
            Self::FirstEntry => "DR-First-Entry",
            Self::FirstDetails => "DR-First-Details",
            Self::FirstEntrySpouse => "DR-First-Entry-Spouse",
            Self::FirstDetailsSpouse => "DR-First-Details-Spouse",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which index an [`IndexMark`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// The alphabetical index of people.
    Alphabetical,
    /// The table of contents.
    TableOfContents,
}

/// An index or table-of-contents entry attached to a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMark {
    /// The text listed in the index.
    pub key: String,
    /// Which index.
    pub kind: IndexKind,
    /// Nesting level (table of contents only).
    pub level: u8,
}

impl IndexMark {
    /// An alphabetical index entry.
    #[must_use]
    pub fn alphabetical(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: IndexKind::Alphabetical,
            level: 1,
        }
    }

    /// A table-of-contents entry at `level`.
    #[must_use]
    pub fn contents(key: impl Into<String>, level: u8) -> Self {
        Self {
            key: key.into(),
            kind: IndexKind::TableOfContents,
            level,
        }
    }
}

/// A document the report writes into.
///
/// Calls arrive in nesting order: paragraphs and tables are opened and
/// closed, rows sit inside tables, cells inside rows, and paragraphs may
/// appear inside cells.
pub trait Document {
    /// Opens a paragraph, optionally led by a label such as a person's code.
    fn start_paragraph(&mut self, style: Style, leader: Option<&str>);

    /// Closes the current paragraph.
    fn end_paragraph(&mut self);

    /// Writes text, optionally marking it for an index.
    fn write_text(&mut self, text: &str, mark: Option<&IndexMark>);

    /// Starts bold text.
    fn start_bold(&mut self);

    /// Ends bold text.
    fn end_bold(&mut self);

    /// Starts a new page.
    fn page_break(&mut self);

    /// Opens a table.
    fn start_table(&mut self, name: &str, style: Style);

    /// Closes the current table.
    fn end_table(&mut self);

    /// Opens a table row.
    fn start_row(&mut self);

    /// Closes the current row.
    fn end_row(&mut self);

    /// Opens a table cell.
    fn start_cell(&mut self, style: Style);

    /// Closes the current cell.
    fn end_cell(&mut self);

    /// Writes a self-contained note paragraph.
    fn write_styled_note(&mut self, text: &str, style: Style);
}
