mod generate;
mod info;
mod inspect;

pub use generate::cmd_generate;
pub use info::cmd_info;
pub use inspect::cmd_inspect;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use recipe_lib::host::{DirectoryHost, PackageHost, StaticHost};
use recipe_lib::options::OptionAssignment;
use recipe_lib::settings::Settings;

/// Evaluation inputs shared by `generate` and `inspect`.
#[derive(Debug, Args)]
pub struct EvalArgs {
  /// Option value, `key=value` for the recipe or `owner:key=value` for a dependency
  #[arg(short = 'o', long = "option", value_name = "ASSIGNMENT")]
  pub options: Vec<OptionAssignment>,

  /// Setting override, `name=value` (os, arch, compiler, build_type)
  #[arg(short = 's', long = "setting", value_name = "NAME=VALUE")]
  pub settings: Vec<String>,

  /// JSON description of the resolved packages and their option schemas
  #[arg(long, value_name = "FILE", conflicts_with = "packages")]
  pub host: Option<PathBuf>,

  /// Package directory laid out as <name>/<version> [default: <dir>/packages]
  #[arg(long, value_name = "DIR")]
  pub packages: Option<PathBuf>,
}

impl EvalArgs {
  /// Detected settings with the `-s` overrides applied.
  pub fn settings(&self) -> Result<Settings> {
    let mut settings = Settings::detect().context("Failed to detect platform settings")?;
    for assignment in &self.settings {
      settings
        .assign(assignment)
        .with_context(|| format!("Invalid setting: {}", assignment))?;
    }
    Ok(settings)
  }

  /// The package host for a recipe at `root`.
  pub fn host(&self, root: &Path) -> Result<Box<dyn PackageHost>> {
    if let Some(file) = &self.host {
      debug!(path = %file.display(), "loading host description");
      let host =
        StaticHost::from_file(file).with_context(|| format!("Failed to load host description: {}", file.display()))?;
      return Ok(Box::new(host));
    }

    let packages = self.packages.clone().unwrap_or_else(|| root.join("packages"));
    debug!(path = %packages.display(), "using package directory");
    Ok(Box::new(DirectoryHost::new(packages)))
  }
}
