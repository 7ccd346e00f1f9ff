//! Implementation of the `recipe generate` command.
//!
//! Runs every lifecycle phase of the doodle-duel recipe against the selected
//! package host and writes the generated build inputs relative to the recipe
//! directory.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use recipe_lib::doodle::DoodleDuel;
use recipe_lib::evaluation::Evaluation;

use super::EvalArgs;
use crate::output::{OutputFormat, print_json, print_stat, print_success, symbols};

pub fn cmd_generate(dir: &Path, eval: &EvalArgs, output: OutputFormat) -> Result<()> {
  if !dir.is_dir() {
    bail!("Recipe directory not found: {}", dir.display());
  }

  let settings = eval.settings()?;
  let host = eval.host(dir)?;

  let outcome = Evaluation::new(DoodleDuel, host.as_ref(), dir, settings)
    .with_assignments(eval.options.iter().cloned())
    .run()
    .context("Recipe evaluation failed")?;

  info!(artifacts = outcome.artifacts.len(), "generation complete");

  if output.is_json() {
    return print_json(&outcome);
  }

  print_success(&format!(
    "Generated build inputs for {}/{}",
    outcome.recipe.name, outcome.recipe.version
  ));
  print_stat("Settings", &format_settings(&outcome.settings));
  print_stat("Requirements", &outcome.requirements.len().to_string());
  println!();
  for artifact in &outcome.artifacts {
    println!("  {} {} ({})", symbols::ARROW, artifact.path.display(), artifact.generator);
  }

  Ok(())
}

pub(super) fn format_settings(settings: &recipe_lib::settings::Settings) -> String {
  let mut parts = vec![
    format!("os={}", settings.os),
    format!("arch={}", settings.arch),
    format!("build_type={}", settings.build_type),
  ];
  if let Some(compiler) = &settings.compiler {
    parts.push(format!("compiler={}", compiler));
  }
  parts.join(" ")
}
