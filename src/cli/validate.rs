use std::path::PathBuf;

use clap::Parser;
use descendants::{DanglingReference, FamilyTree, Handle, ReferenceKind};
use serde::Serialize;
use tracing::instrument;

use super::{load_tree, terminal::Palette};

#[derive(Debug, Parser)]
#[command(about = "Check a family tree for ancestry loops and dangling references")]
pub struct Validate {
    /// Family tree file (YAML)
    tree: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

#[derive(Debug, Default, Serialize)]
struct ValidationResult {
    people: usize,
    ancestry_loops: Vec<Vec<String>>,
    dangling_references: Vec<Dangling>,
}

#[derive(Debug, Serialize)]
struct Dangling {
    from: String,
    kind: &'static str,
    target: String,
}

impl From<DanglingReference> for Dangling {
    fn from(reference: DanglingReference) -> Self {
        let kind = match reference.kind {
            ReferenceKind::Parent => "parent",
            ReferenceKind::Child => "child",
            ReferenceKind::Family => "family",
            ReferenceKind::Event => "event",
            ReferenceKind::Place => "place",
        };
        Self {
            from: reference.from.to_string(),
            kind,
            target: reference.target.to_string(),
        }
    }
}

impl ValidationResult {
    fn check(tree: &FamilyTree) -> Self {
        Self {
            people: tree.len(),
            ancestry_loops: tree
                .ancestry_loops()
                .into_iter()
                .map(|people| people.iter().map(Handle::to_string).collect())
                .collect(),
            dangling_references: tree
                .dangling_references()
                .into_iter()
                .map(Dangling::from)
                .collect(),
        }
    }

    fn count_issues(&self) -> usize {
        self.ancestry_loops.len() + self.dangling_references.len()
    }
}

impl Validate {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let tree = load_tree(&self.tree)?;
        let result = ValidationResult::check(&tree);

        match self.output {
            OutputFormat::Table => self.output_table(&result),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Summary => println!("issues={}", result.count_issues()),
        }

        // Exit with appropriate code
        if result.count_issues() > 0 {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, result: &ValidationResult) {
        if self.quiet {
            return;
        }

        let palette = Palette::detect();
        println!("Validating {}...\n", self.tree.display());

        if result.ancestry_loops.is_empty() {
            println!("✓ Ancestry:   {} people, no loops", result.people);
        } else {
            println!(
                "{}",
                palette.problem(&format!(
                    "✗ Ancestry:   {} loops found",
                    result.ancestry_loops.len()
                ))
            );
            for people in &result.ancestry_loops {
                println!("  • {}", people.join(" → "));
            }
        }

        if result.dangling_references.is_empty() {
            println!("✓ References: all records resolve");
        } else {
            println!(
                "{}",
                palette.problem(&format!(
                    "✗ References: {} dangling references",
                    result.dangling_references.len()
                ))
            );
            for dangling in &result.dangling_references {
                println!("  • {} → {} {}", dangling.from, dangling.kind, dangling.target);
            }
        }

        let total_issues = result.count_issues();
        if total_issues == 0 {
            println!("\n{}", palette.healthy("Family tree is healthy (0 issues)"));
        } else {
            println!(
                "\n{}",
                palette.problem(&format!("Summary: {total_issues} issues found"))
            );
        }
    }
}
