//! Generation of native-build inputs.
//!
//! The [`Dispatcher`] holds the generators a recipe configured plus the raw
//! build variables. When dispatched it resolves the variables once against the
//! final options and settings, then runs each generator in order. Every
//! generator writes its artifact atomically; the first failure stops dispatch
//! and artifacts already written stay on disk.
//!
//! # Submodules
//!
//! - [`deps`] - dependency-location manifest (`recipe-deps.json`)
//! - [`toolchain`] - CMake toolchain file (`recipe_toolchain.cmake`)
//! - [`variables`] - build variables and their resolution

pub mod deps;
pub mod toolchain;
pub mod variables;

pub use deps::DependencyManifestGenerator;
pub use toolchain::ToolchainGenerator;
pub use variables::{ResolvedVariables, Variables};

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::host::{HostError, ResolvedPackage};
use crate::layout::ResolvedLayout;
use crate::options::OptionSet;
use crate::placeholder::PlaceholderError;
use crate::recipe::RecipeInfo;
use crate::requirements::{Requirement, RequirementSet};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("failed to resolve dependency '{name}': {source}")]
  Resolve {
    name: String,
    #[source]
    source: HostError,
  },

  #[error("invalid build variable name '{0}'")]
  InvalidVariable(String),

  #[error("unresolvable build variable '{key}': {source}")]
  Variable {
    key: String,
    #[source]
    source: PlaceholderError,
  },

  #[error("{generator}: failed to render artifact: {source}")]
  Render {
    generator: &'static str,
    #[source]
    source: fmt::Error,
  },

  #[error("{generator}: failed to serialize artifact: {source}")]
  Serialize {
    generator: &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("{generator}: failed to write {}: {source}", path.display())]
  Write {
    generator: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A requirement together with the package the host resolved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
  pub requirement: Requirement,
  pub package: ResolvedPackage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  DependencyManifest,
  Toolchain,
  Presets,
}

/// A file written by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub generator: &'static str,
  pub kind: ArtifactKind,
  pub path: PathBuf,
}

/// Final, read-only evaluation state handed to the dispatcher.
pub struct GenerateInput<'a> {
  pub recipe: &'a RecipeInfo,
  pub layout: &'a ResolvedLayout,
  pub settings: &'a Settings,
  pub requirements: &'a RequirementSet,
  pub options: &'a OptionSet,
  pub dependencies: &'a [ResolvedDependency],
}

/// What a generator sees: the final input plus the resolved variables.
pub struct GenerateContext<'a> {
  pub input: &'a GenerateInput<'a>,
  pub variables: &'a ResolvedVariables,
}

/// Turns the final evaluation state into artifacts on disk.
pub trait Generator {
  fn name(&self) -> &'static str;

  /// Write this generator's artifact(s) and report where they went.
  fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<Artifact>, GenerateError>;
}

/// The generators and build variables configured by a recipe.
#[derive(Default)]
pub struct Dispatcher {
  generators: Vec<Box<dyn Generator>>,
  variables: Variables,
}

impl Dispatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, generator: impl Generator + 'static) {
    self.generators.push(Box::new(generator));
  }

  pub fn variables(&self) -> &Variables {
    &self.variables
  }

  pub fn variables_mut(&mut self) -> &mut Variables {
    &mut self.variables
  }

  pub fn generator_names(&self) -> Vec<&'static str> {
    self.generators.iter().map(|g| g.name()).collect()
  }

  /// Resolve variables and run every generator in order.
  pub fn generate(&self, input: &GenerateInput<'_>) -> Result<Vec<Artifact>, GenerateError> {
    if self.generators.is_empty() {
      warn!(recipe = %input.recipe.name, "no generators configured, nothing to write");
    }

    let variables = self.variables.resolve(input.options, input.settings)?;
    let ctx = GenerateContext {
      input,
      variables: &variables,
    };

    let mut artifacts = Vec::new();
    for generator in &self.generators {
      let produced = generator.generate(&ctx)?;
      for artifact in &produced {
        info!(generator = generator.name(), path = %artifact.path.display(), "wrote artifact");
      }
      artifacts.extend(produced);
    }
    Ok(artifacts)
  }
}

/// Render a path the way CMake and JSON consumers expect it, with `/` separators.
pub(crate) fn portable_path(path: &std::path::Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}
