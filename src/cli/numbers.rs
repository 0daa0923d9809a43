use std::collections::HashMap;

use anyhow::Context;
use clap::Parser;
use descendants::{Database, NumberingScheme, ReportOptions, assign_numbers, report};
use serde::Serialize;
use tracing::instrument;

use super::{
    Selection, load_tree,
    terminal::{self, Palette},
};

#[derive(Debug, Parser)]
#[command(about = "List the descendant numbers of a person")]
pub struct Numbers {
    #[command(flatten)]
    selection: Selection,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One visit, in traversal order.
#[derive(Debug, Serialize)]
struct Row {
    index: usize,
    generation: usize,
    id: String,
    name: String,
    code: String,
}

#[derive(Debug, Serialize)]
struct Output {
    numbering: NumberingScheme,
    rows: Vec<Row>,
}

impl Numbers {
    #[instrument(skip(options))]
    pub fn run(self, mut options: ReportOptions) -> anyhow::Result<()> {
        self.selection.apply(&mut options)?;

        let tree = load_tree(&self.selection.tree)?;
        let id = options
            .center_person
            .as_ref()
            .ok_or(report::Error::MissingCentrePerson)?;
        let root = tree
            .person_by_id(id)
            .ok_or_else(|| report::Error::PersonNotFound(id.clone()))?;

        let numbering = assign_numbers(
            &tree,
            root.handle(),
            options.max_generations(),
            options.numbering,
        );

        let generation_of: HashMap<usize, usize> = numbering
            .generations()
            .iter()
            .enumerate()
            .flat_map(|(generation, bucket)| bucket.iter().map(move |&index| (index, generation + 1)))
            .collect();

        let rows: Vec<Row> = numbering
            .index_to_person()
            .iter()
            .filter_map(|(&index, handle)| {
                let person = tree.person(handle)?;
                let name = person.name();
                Some(Row {
                    index,
                    generation: generation_of.get(&index).copied().unwrap_or_default(),
                    id: person.id().to_string(),
                    name: format!("{} {}", name.first, name.surname).trim().to_string(),
                    code: numbering
                        .code(handle)
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                })
            })
            .collect();

        match self.output {
            OutputFormat::Table => render_table(&rows, numbering.scheme(), Palette::detect()),
            OutputFormat::Json => {
                let output = Output {
                    numbering: numbering.scheme(),
                    rows,
                };
                serde_json::to_writer_pretty(std::io::stdout(), &output)
                    .context("failed to render json output")?;
                println!();
            }
        }

        Ok(())
    }
}

fn render_table(rows: &[Row], scheme: NumberingScheme, palette: Palette) {
    let headers = ["#", "Gen", "Code", "Id"];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.index.to_string(),
                row.generation.to_string(),
                row.code.clone(),
                row.id.clone(),
            ]
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    // two spaces after every column
    let used = widths.iter().map(|width| width + 2).sum();
    let name_width = terminal::name_width(used);

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    if name_width.is_some() {
        print!("Name");
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    if name_width.is_some() {
        print!("----");
    }
    println!();

    for (row, values) in rows.iter().zip(&cells) {
        for (idx, (value, width)) in values.iter().zip(&widths).enumerate() {
            let padded = format!("{value:<width$}");
            match idx {
                0 => print!("{}  ", palette.muted(&padded)),
                2 => print!("{}  ", palette.code(scheme, &padded)),
                _ => print!("{padded}  "),
            }
        }
        if let Some(width) = name_width {
            print!("{}", terminal::truncate(&row.name, width));
        }
        println!();
    }
}
