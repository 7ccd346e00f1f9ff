//! Implementation of the `recipe inspect` command.
//!
//! Evaluates the recipe in the given directory up to option application and
//! prints the declared requirements and the final option set. Nothing is
//! written to disk.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};

use recipe_lib::doodle::DoodleDuel;
use recipe_lib::evaluation::Evaluation;
use recipe_lib::options::Provenance;
use recipe_lib::requirements::RequirementKind;

use super::EvalArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols};

pub fn cmd_inspect(dir: &Path, eval: &EvalArgs, output: OutputFormat) -> Result<()> {
  if !dir.is_dir() {
    bail!("Recipe directory not found: {}", dir.display());
  }

  let settings = eval.settings()?;
  let host = eval.host(dir)?;

  let mut evaluation =
    Evaluation::new(DoodleDuel, host.as_ref(), dir, settings).with_assignments(eval.options.iter().cloned());
  evaluation.configure_only().context("Recipe evaluation failed")?;

  let Some(options) = evaluation.options() else {
    bail!("Recipe evaluation stopped before options were applied");
  };

  if output.is_json() {
    return print_json(&serde_json::json!({
      "recipe": evaluation.info(),
      "settings": evaluation.settings(),
      "requirements": evaluation.requirements(),
      "options": options.iter().collect::<Vec<_>>(),
    }));
  }

  print_info(&format!("{} ({})", evaluation.info().reference(), evaluation.info().package_type));
  print_stat("Settings", &super::generate::format_settings(evaluation.settings()));

  println!();
  println!("Requirements:");
  for requirement in evaluation.requirements() {
    let kind = match requirement.kind {
      RequirementKind::Regular => String::new(),
      RequirementKind::Test => format!(" {}", "(test)".if_supports_color(Stream::Stdout, |s| s.dimmed())),
    };
    println!("  {} {}{}", symbols::INFO, requirement.reference(), kind);
  }

  println!();
  println!("Options:");
  for entry in options.iter() {
    let marker = match entry.provenance {
      Provenance::Default => symbols::INFO,
      Provenance::Override => symbols::TILDE,
    };
    println!("  {} {}:{}={}", marker, entry.owner, entry.key, entry.value);
  }

  Ok(())
}
