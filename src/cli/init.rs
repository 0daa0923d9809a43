use std::path::{Path, PathBuf};

use clap::Parser;
use descendants::ReportOptions;
use tracing::instrument;

const DEFAULT_PATH: &str = "descendants.toml";

#[derive(Debug, Parser)]
#[command(about = "Write a default options file")]
pub struct Init {
    /// Where to write the options (defaults to --options, then descendants.toml)
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument]
    pub fn run(self, options: Option<&Path>) -> anyhow::Result<()> {
        let path = self
            .path
            .as_deref()
            .or(options)
            .unwrap_or_else(|| Path::new(DEFAULT_PATH));

        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        ReportOptions::default()
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;

        println!("Wrote default report options to {}", path.display());
        println!();
        println!("Next steps:");
        println!("  set `pid` to the id of the centre person");
        println!("  descendants --options {} report family.yaml", path.display());

        Ok(())
    }
}
