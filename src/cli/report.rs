use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use descendants::{
    DateFormat, DescendantReport, LivingPeople, MarkdownDocument, NameFormat, PlaceFormat,
    ReportOptions,
};
use tracing::{info, instrument};

use super::{Selection, load_tree};

#[derive(Debug, Parser)]
#[command(about = "Write a descendant report as Markdown")]
pub struct Report {
    #[command(flatten)]
    selection: Selection,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How names are written
    #[arg(long, value_enum)]
    name_format: Option<NameFormat>,

    /// How dates are written
    #[arg(long, value_enum)]
    date_format: Option<DateFormat>,

    /// How places are written
    #[arg(long, value_enum)]
    place_format: Option<PlaceFormat>,

    /// How people who may still be alive are shown
    #[arg(long, value_enum)]
    living_people: Option<LivingPeople>,

    /// Start each generation on a new page
    #[arg(long)]
    page_breaks: bool,

    /// Leave out the child tables
    #[arg(long)]
    no_children: bool,

    /// Leave out birth and death details
    #[arg(long)]
    no_lifespan: bool,

    /// Leave out records marked private
    #[arg(long)]
    exclude_private: bool,
}

impl Report {
    #[instrument(skip(options))]
    pub fn run(self, mut options: ReportOptions) -> anyhow::Result<()> {
        self.apply(&mut options)?;

        let tree = load_tree(&self.selection.tree)?;
        let mut report = DescendantReport::new(&tree, options)?;

        // rendered in full before anything is written
        let mut doc = MarkdownDocument::new();
        report.write_report(&mut doc);
        let markdown = doc.finish();

        match &self.output {
            Some(path) => {
                std::fs::write(path, &markdown)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), people = report.numbering().codes().len(), "report written");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(markdown.as_bytes())
                    .context("failed to write report")?;
            }
        }

        Ok(())
    }

    fn apply(&self, options: &mut ReportOptions) -> anyhow::Result<()> {
        self.selection.apply(options)?;

        if let Some(name_format) = self.name_format {
            options.name_format = name_format;
        }
        if let Some(date_format) = self.date_format {
            options.date_format = date_format;
        }
        if let Some(place_format) = self.place_format {
            options.place_format = place_format;
        }
        if let Some(living_people) = self.living_people {
            options.living_people = living_people;
        }
        options.page_break_between_generations |= self.page_breaks;
        options.list_children &= !self.no_children;
        options.lifespan &= !self.no_lifespan;
        options.include_private &= !self.exclude_private;

        Ok(())
    }
}
