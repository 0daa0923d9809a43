//! Markdown rendering of a report.

use std::collections::BTreeMap;

use crate::report::{Document, IndexKind, IndexMark, Style};

/// A [`Document`] that renders to Markdown.
///
/// Titles and generation headings become `#` and `##` headings, tables
/// become pipe tables, and alphabetical index marks are collected into an
/// `Index` section appended by [`MarkdownDocument::finish`].
#[derive(Debug, Default)]
pub struct MarkdownDocument {
    out: String,
    paragraph: Option<String>,
    table: Option<Table>,
    index: BTreeMap<String, Vec<String>>,
    section: Option<String>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Vec<String>>,
    cell: Option<Vec<String>>,
}

impl MarkdownDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the alphabetical index and returns the rendered Markdown.
    #[must_use]
    pub fn finish(mut self) -> String {
        if !self.index.is_empty() {
            self.out.push_str("## Index\n\n");
            for (key, sections) in &self.index {
                self.out.push_str("- ");
                self.out.push_str(key);
                if !sections.is_empty() {
                    self.out.push_str(" (");
                    self.out.push_str(&sections.join(", "));
                    self.out.push(')');
                }
                self.out.push('\n');
            }
        }
        self.out
    }

    fn push(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        } else if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            match cell.last_mut() {
                Some(last) => last.push_str(text),
                None => cell.push(text.to_string()),
            }
        } else {
            self.out.push_str(text);
        }
    }

    fn mark(&mut self, mark: &IndexMark) {
        match mark.kind {
            IndexKind::Alphabetical => {
                let sections = self.index.entry(mark.key.clone()).or_default();
                if let Some(section) = &self.section {
                    if !sections.contains(section) {
                        sections.push(section.clone());
                    }
                }
            }
            IndexKind::TableOfContents if mark.level >= 2 => {
                self.section = Some(mark.key.clone());
            }
            IndexKind::TableOfContents => {}
        }
    }
}

fn heading(style: Style) -> &'static str {
    match style {
        Style::Title => "# ",
        Style::Generation => "## ",
        Style::ChildTitle => "#### ",
        _ => "",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl Document for MarkdownDocument {
    fn start_paragraph(&mut self, style: Style, leader: Option<&str>) {
        let in_cell = self.table.as_ref().is_some_and(|t| t.cell.is_some());
        let mut paragraph = if in_cell {
            String::new()
        } else {
            heading(style).to_string()
        };
        if let Some(leader) = leader.filter(|l| !l.is_empty()) {
            paragraph.push_str(leader);
            paragraph.push(' ');
        }
        self.paragraph = Some(paragraph);
    }

    fn end_paragraph(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };
        let paragraph = paragraph.trim_end().to_string();

        if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            cell.push(paragraph);
        } else {
            self.out.push_str(&paragraph);
            self.out.push_str("\n\n");
        }
    }

    fn write_text(&mut self, text: &str, mark: Option<&IndexMark>) {
        if let Some(mark) = mark {
            self.mark(mark);
        }
        self.push(text);
    }

    fn start_bold(&mut self) {
        self.push("**");
    }

    fn end_bold(&mut self) {
        self.push("**");
    }

    fn page_break(&mut self) {
        self.out
            .push_str("<div style=\"page-break-after: always\"></div>\n\n");
    }

    fn start_table(&mut self, _name: &str, _style: Style) {
        self.table = Some(Table::default());
    }

    fn end_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        self.out.push('|');
        self.out.push_str(&"   |".repeat(columns));
        self.out.push_str("\n|");
        self.out.push_str(&"---|".repeat(columns));
        self.out.push('\n');

        for row in &table.rows {
            self.out.push('|');
            for column in 0..columns {
                let cell = row.get(column).map_or("", String::as_str);
                self.out.push(' ');
                self.out.push_str(cell);
                self.out.push_str(" |");
            }
            self.out.push('\n');
        }
        self.out.push('\n');
    }

    fn start_row(&mut self) {
        if let Some(table) = self.table.as_mut() {
            table.rows.push(Vec::new());
        }
    }

    fn end_row(&mut self) {}

    fn start_cell(&mut self, _style: Style) {
        if let Some(table) = self.table.as_mut() {
            table.cell = Some(Vec::new());
        }
    }

    fn end_cell(&mut self) {
        let Some(table) = self.table.as_mut() else {
            return;
        };
        let Some(paragraphs) = table.cell.take() else {
            return;
        };
        let content = paragraphs
            .iter()
            .map(|p| escape_cell(p))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("<br>");
        match table.rows.last_mut() {
            Some(row) => row.push(content),
            None => table.rows.push(vec![content]),
        }
    }

    fn write_styled_note(&mut self, text: &str, style: Style) {
        self.start_paragraph(style, None);
        self.push("*");
        self.push(text);
        self.push("*");
        self.end_paragraph();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_bold() {
        let mut doc = MarkdownDocument::new();
        doc.start_paragraph(Style::Title, None);
        doc.write_text("Descendant Report for Ann", None);
        doc.end_paragraph();
        doc.start_paragraph(Style::FirstEntry, Some("1.2"));
        doc.start_bold();
        doc.write_text("Ann Smith", None);
        doc.end_bold();
        doc.end_paragraph();

        assert_eq!(
            doc.finish(),
            "# Descendant Report for Ann\n\n1.2 **Ann Smith**\n\n"
        );
    }

    #[test]
    fn tables_escape_pipes_and_join_paragraphs() {
        let mut doc = MarkdownDocument::new();
        doc.start_table("children", Style::ChildTable);
        doc.start_row();
        doc.start_cell(Style::ChildListLeftSimple);
        doc.start_paragraph(Style::ChildListLeftSimple, None);
        doc.write_text("+ 1.(1|2).1", None);
        doc.end_paragraph();
        doc.end_cell();
        doc.start_cell(Style::ChildTableCell);
        doc.start_paragraph(Style::ChildListSimple, None);
        doc.write_text("Bob", None);
        doc.end_paragraph();
        doc.start_paragraph(Style::ChildListSimpleIndented, None);
        doc.write_text("b. 1900", None);
        doc.end_paragraph();
        doc.end_cell();
        doc.end_row();
        doc.end_table();

        assert_eq!(
            doc.finish(),
            "|   |   |\n|---|---|\n| + 1.(1\\|2).1 | Bob<br>b. 1900 |\n\n"
        );
    }

    #[test]
    fn index_lists_people_by_section() {
        let mut doc = MarkdownDocument::new();
        doc.write_text("", Some(&IndexMark::contents("Generation 1", 2)));
        doc.write_text("Ann", Some(&IndexMark::alphabetical("SMITH, Ann #:1")));
        doc.write_text("", Some(&IndexMark::contents("Generation 2", 2)));
        doc.write_text("Bob", Some(&IndexMark::alphabetical("JONES, Bob")));
        doc.write_text("Ann", Some(&IndexMark::alphabetical("SMITH, Ann #:1")));

        let out = doc.finish();
        assert!(out.ends_with(
            "## Index\n\n- JONES, Bob (Generation 2)\n- SMITH, Ann #:1 (Generation 1, Generation 2)\n"
        ));
    }

    #[test]
    fn notes_are_italic() {
        let mut doc = MarkdownDocument::new();
        doc.write_styled_note("Nothing here.", Style::Entry);
        assert_eq!(doc.finish(), "*Nothing here.*\n\n");
    }
}
