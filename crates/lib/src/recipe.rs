//! The recipe interface.
//!
//! A recipe answers one hook per lifecycle phase. Hooks only declare: they fill
//! in the registry, requirement set or dispatcher they are handed and never
//! touch the filesystem. [`crate::evaluation::Evaluation`] calls them in order.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::generate::Dispatcher;
use crate::layout::{Layout, LayoutError};
use crate::options::{OptionError, OptionRegistry, OptionSet};
use crate::requirements::{RequirementError, RequirementSet};

#[derive(Debug, Error)]
pub enum RecipeError {
  #[error(transparent)]
  Option(#[from] OptionError),

  #[error(transparent)]
  Requirement(#[from] RequirementError),

  #[error(transparent)]
  Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
  Application,
}

impl PackageType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Application => "application",
    }
  }
}

impl fmt::Display for PackageType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Recipe metadata, recorded in generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeInfo {
  pub name: String,
  pub version: String,
  pub package_type: PackageType,
}

impl RecipeInfo {
  pub fn new(name: &str, version: &str, package_type: PackageType) -> Self {
    Self {
      name: name.to_string(),
      version: version.to_string(),
      package_type,
    }
  }

  pub fn reference(&self) -> String {
    format!("{}/{}", self.name, self.version)
  }
}

pub trait Recipe {
  fn info(&self) -> RecipeInfo;

  /// Declare the recipe's own options and their defaults.
  fn options(&self, _options: &mut OptionRegistry) -> Result<(), RecipeError> {
    Ok(())
  }

  /// Where build outputs and generated files land. Flat unless overridden.
  fn layout(&self) -> Layout {
    Layout::flat()
  }

  /// Declare the regular requirements.
  fn requirements(&self, requirements: &mut RequirementSet, options: &OptionRegistry) -> Result<(), RecipeError>;

  /// Declare build-time requirements, usually gated on recipe options.
  fn build_requirements(
    &self,
    _requirements: &mut RequirementSet,
    _options: &OptionRegistry,
  ) -> Result<(), RecipeError> {
    Ok(())
  }

  /// Stage overrides for options owned by dependencies.
  fn configure(&self, _options: &mut OptionRegistry) -> Result<(), RecipeError> {
    Ok(())
  }

  /// Configure the generators and build variables.
  fn generate(&self, options: &OptionSet, dispatcher: &mut Dispatcher) -> Result<(), RecipeError>;
}
