use std::path::{Path, PathBuf};

mod init;
mod numbers;
mod report;
mod terminal;
mod validate;

use clap::ArgAction;
use descendants::{FamilyTree, NumberingScheme, RecordId, ReportOptions};
use init::Init;
use numbers::Numbers;
use report::Report;
use tracing::{instrument, warn};
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Report options file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(self.options.as_deref())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Write a descendant report as Markdown
    Report(Report),

    /// List the descendant numbers of a person
    Numbers(Numbers),

    /// Check a family tree for ancestry loops and dangling references
    Validate(Validate),

    /// Write a default options file
    Init(Init),
}

impl Command {
    fn run(self, options: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Report(command) => command.run(load_options(options)?)?,
            Self::Numbers(command) => command.run(load_options(options)?)?,
            Self::Validate(command) => command.run()?,
            Self::Init(command) => command.run(options)?,
        }
        Ok(())
    }
}

/// Reads the options file, or the defaults when none is given.
fn load_options(path: Option<&Path>) -> anyhow::Result<ReportOptions> {
    match path {
        Some(path) => ReportOptions::load(path).map_err(|e| anyhow::anyhow!(e)),
        None => Ok(ReportOptions::default()),
    }
}

/// Loads a family tree, warning about ancestry loops.
#[instrument]
fn load_tree(path: &Path) -> anyhow::Result<FamilyTree> {
    let tree = FamilyTree::load(path)
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;

    for ancestry_loop in tree.ancestry_loops() {
        let people: Vec<&str> = ancestry_loop.iter().map(|h| h.as_str()).collect();
        warn!(people = ?people, "ancestry loop: numbering will repeat these people");
    }

    Ok(tree)
}

/// Parses a person id given on the command line.
fn parse_person(s: &str) -> Result<RecordId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Which tree, centre person, scheme and depth to number.
#[derive(Debug, clap::Args)]
struct Selection {
    /// Family tree file (YAML)
    tree: PathBuf,

    /// External id of the centre person (overrides `pid`)
    #[arg(short, long, value_parser = parse_person)]
    person: Option<RecordId>,

    /// Numbering scheme (overrides `numbering`)
    #[arg(short, long)]
    numbering: Option<NumberingScheme>,

    /// Number of generations, 1 to 100 (overrides `gen`)
    #[arg(short, long)]
    generations: Option<usize>,
}

impl Selection {
    fn apply(&self, options: &mut ReportOptions) -> anyhow::Result<()> {
        if let Some(person) = &self.person {
            options.center_person = Some(person.clone());
        }
        if let Some(numbering) = self.numbering {
            options.numbering = numbering;
        }
        if let Some(generations) = self.generations {
            options.set_max_generations(generations)?;
        }
        Ok(())
    }
}
