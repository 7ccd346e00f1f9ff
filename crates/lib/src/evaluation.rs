//! One evaluation of a recipe, driven phase by phase by the host.
//!
//! The host calls, in this order and each exactly once:
//!
//! 1. [`Evaluation::resolve_layout`] - declares the recipe's options, applies
//!    caller values, anchors the layout at the recipe directory
//! 2. [`Evaluation::declare_requirements`] - regular requirements
//! 3. [`Evaluation::declare_build_requirements`] - option-gated requirements
//! 4. [`Evaluation::apply_options`] - stages dependency overrides and applies
//!    them through the capability probe
//! 5. [`Evaluation::generate`] - resolves dependencies and writes artifacts
//!
//! and then [`Evaluation::finish`]. A call made out of order is rejected with a
//! [`PhaseError`] and leaves the evaluation untouched. Any other error moves the
//! evaluation to [`Phase::Failed`]; retrying means starting a new evaluation.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generate::{Artifact, Dispatcher, GenerateError, GenerateInput, ResolvedDependency};
use crate::host::PackageHost;
use crate::layout::ResolvedLayout;
use crate::options::{CapabilityProbe, OptionAssignment, OptionRegistry, OptionSet};
use crate::recipe::{Recipe, RecipeError, RecipeInfo};
use crate::requirements::RequirementSet;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Created,
  LayoutResolved,
  RequirementsDeclared,
  BuildRequirementsDeclared,
  OptionsApplied,
  Generated,
  Done,
  Failed,
}

impl Phase {
  /// The phase reached by completing the operation allowed in this one.
  fn next(self) -> Self {
    match self {
      Self::Created => Self::LayoutResolved,
      Self::LayoutResolved => Self::RequirementsDeclared,
      Self::RequirementsDeclared => Self::BuildRequirementsDeclared,
      Self::BuildRequirementsDeclared => Self::OptionsApplied,
      Self::OptionsApplied => Self::Generated,
      Self::Generated => Self::Done,
      Self::Done => Self::Done,
      Self::Failed => Self::Failed,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Created => "created",
      Self::LayoutResolved => "layout_resolved",
      Self::RequirementsDeclared => "requirements_declared",
      Self::BuildRequirementsDeclared => "build_requirements_declared",
      Self::OptionsApplied => "options_applied",
      Self::Generated => "generated",
      Self::Done => "done",
      Self::Failed => "failed",
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Done | Self::Failed)
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An operation called in the wrong phase.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{operation} called in phase '{current}', only allowed in phase '{expected}'")]
pub struct PhaseError {
  pub operation: &'static str,
  pub current: Phase,
  pub expected: Phase,
}

/// A fatal evaluation error, tagged with the operation that raised it.
#[derive(Debug, Error)]
pub enum EvaluationError {
  #[error(transparent)]
  Order(#[from] PhaseError),

  #[error("{phase}: {source}")]
  Recipe {
    phase: &'static str,
    #[source]
    source: RecipeError,
  },

  #[error("{phase}: {source}")]
  Generate {
    phase: &'static str,
    #[source]
    source: GenerateError,
  },
}

impl EvaluationError {
  /// The operation that failed.
  pub fn phase(&self) -> &'static str {
    match self {
      Self::Order(e) => e.operation,
      Self::Recipe { phase, .. } | Self::Generate { phase, .. } => phase,
    }
  }
}

/// What a completed evaluation produced.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
  pub recipe: RecipeInfo,
  pub settings: Settings,
  pub requirements: RequirementSet,
  pub options: OptionSet,
  pub artifacts: Vec<Artifact>,
}

pub struct Evaluation<'h, R> {
  recipe: R,
  info: RecipeInfo,
  host: &'h dyn PackageHost,
  root: PathBuf,
  settings: Settings,
  assignments: Vec<OptionAssignment>,

  phase: Phase,
  registry: OptionRegistry,
  layout: Option<ResolvedLayout>,
  requirements: RequirementSet,
  options: Option<OptionSet>,
  artifacts: Vec<Artifact>,
}

impl<'h, R: Recipe> Evaluation<'h, R> {
  pub fn new(recipe: R, host: &'h dyn PackageHost, root: impl Into<PathBuf>, settings: Settings) -> Self {
    let info = recipe.info();
    Self {
      recipe,
      info,
      host,
      root: root.into(),
      settings,
      assignments: Vec::new(),
      phase: Phase::Created,
      registry: OptionRegistry::new(),
      layout: None,
      requirements: RequirementSet::new(),
      options: None,
      artifacts: Vec::new(),
    }
  }

  /// Caller-supplied option values. Recipe options are set when the layout is
  /// resolved; dependency overrides are staged after the recipe's own.
  pub fn with_assignments(mut self, assignments: impl IntoIterator<Item = OptionAssignment>) -> Self {
    self.assignments.extend(assignments);
    self
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn info(&self) -> &RecipeInfo {
    &self.info
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn requirements(&self) -> &RequirementSet {
    &self.requirements
  }

  /// The final option set, once options are applied.
  pub fn options(&self) -> Option<&OptionSet> {
    self.options.as_ref()
  }

  pub fn resolve_layout(&mut self) -> Result<(), EvaluationError> {
    const OP: &str = "resolve_layout";
    self.enter(OP, Phase::Created)?;
    let result = self.run_resolve_layout().map_err(|source| recipe_error(OP, source));
    self.advance(OP, result)
  }

  pub fn declare_requirements(&mut self) -> Result<(), EvaluationError> {
    const OP: &str = "declare_requirements";
    self.enter(OP, Phase::LayoutResolved)?;
    let result = self
      .recipe
      .requirements(&mut self.requirements, &self.registry)
      .map_err(|source| recipe_error(OP, source));
    self.advance(OP, result)
  }

  pub fn declare_build_requirements(&mut self) -> Result<(), EvaluationError> {
    const OP: &str = "declare_build_requirements";
    self.enter(OP, Phase::RequirementsDeclared)?;
    let result = self
      .recipe
      .build_requirements(&mut self.requirements, &self.registry)
      .map_err(|source| recipe_error(OP, source));
    self.advance(OP, result)
  }

  pub fn apply_options(&mut self) -> Result<(), EvaluationError> {
    const OP: &str = "apply_options";
    self.enter(OP, Phase::BuildRequirementsDeclared)?;
    let result = self.run_apply_options().map_err(|source| recipe_error(OP, source));
    self.advance(OP, result)
  }

  pub fn generate(&mut self) -> Result<(), EvaluationError> {
    const OP: &str = "generate";
    self.enter(OP, Phase::OptionsApplied)?;
    let result = self.run_generate(OP);
    self.advance(OP, result)
  }

  /// Close a generated evaluation and hand back what it produced.
  pub fn finish(mut self) -> Result<Outcome, EvaluationError> {
    const OP: &str = "finish";
    self.enter(OP, Phase::Generated)?;
    let options = self.final_options(OP)?.clone();
    self.advance(OP, Ok(()))?;

    Ok(Outcome {
      recipe: self.info,
      settings: self.settings,
      requirements: self.requirements,
      options,
      artifacts: self.artifacts,
    })
  }

  /// Drive every phase in order.
  pub fn run(mut self) -> Result<Outcome, EvaluationError> {
    self.resolve_layout()?;
    self.declare_requirements()?;
    self.declare_build_requirements()?;
    self.apply_options()?;
    self.generate()?;
    self.finish()
  }

  /// Drive the phases up to and including option application, writing nothing.
  pub fn configure_only(&mut self) -> Result<(), EvaluationError> {
    self.resolve_layout()?;
    self.declare_requirements()?;
    self.declare_build_requirements()?;
    self.apply_options()
  }

  fn enter(&self, operation: &'static str, expected: Phase) -> Result<(), PhaseError> {
    if self.phase != expected {
      debug!(operation, current = %self.phase, "rejected out-of-order call");
      return Err(PhaseError {
        operation,
        current: self.phase,
        expected,
      });
    }
    Ok(())
  }

  fn advance(&mut self, operation: &'static str, result: Result<(), EvaluationError>) -> Result<(), EvaluationError> {
    match result {
      Ok(()) => {
        self.phase = self.phase.next();
        info!(recipe = %self.info.name, phase = %self.phase, "{operation} complete");
        Ok(())
      }
      Err(e) => {
        warn!(recipe = %self.info.name, operation, error = %e, "evaluation failed");
        self.phase = Phase::Failed;
        Err(e)
      }
    }
  }

  fn final_options(&self, operation: &'static str) -> Result<&OptionSet, PhaseError> {
    self.options.as_ref().ok_or(PhaseError {
      operation,
      current: self.phase,
      expected: Phase::OptionsApplied,
    })
  }

  fn run_resolve_layout(&mut self) -> Result<(), RecipeError> {
    self.recipe.options(&mut self.registry)?;
    for assignment in &self.assignments {
      if let OptionAssignment::Recipe { key, value } = assignment {
        self.registry.set_value(key, value.clone())?;
      }
    }

    let layout = self.recipe.layout().resolve(&self.root)?;
    debug!(
      build = %layout.resolve_build_path().display(),
      generators = %layout.resolve_generator_path().display(),
      "layout resolved"
    );
    self.layout = Some(layout);
    Ok(())
  }

  fn run_apply_options(&mut self) -> Result<(), RecipeError> {
    self.recipe.configure(&mut self.registry)?;
    for assignment in &self.assignments {
      if let OptionAssignment::Dependency { target, key, value } = assignment {
        self.registry.set_override(target, key, value.clone());
      }
    }

    let probe = CapabilityProbe::new(self.host);
    self.options = Some(self.registry.apply(&self.requirements, &probe)?);
    Ok(())
  }

  fn run_generate(&mut self, operation: &'static str) -> Result<(), EvaluationError> {
    let generate_error = |source: GenerateError| EvaluationError::Generate {
      phase: operation,
      source,
    };

    let options = self.final_options(operation)?;
    let layout = self.layout.as_ref().ok_or(PhaseError {
      operation,
      current: self.phase,
      expected: Phase::LayoutResolved,
    })?;

    let mut dependencies = Vec::with_capacity(self.requirements.len());
    for requirement in &self.requirements {
      let package = self.host.resolve(requirement).map_err(|source| {
        generate_error(GenerateError::Resolve {
          name: requirement.name.clone(),
          source,
        })
      })?;
      debug!(requirement = %requirement, folder = %package.package_folder.display(), "resolved dependency");
      dependencies.push(ResolvedDependency {
        requirement: requirement.clone(),
        package,
      });
    }

    let mut dispatcher = Dispatcher::new();
    self
      .recipe
      .generate(options, &mut dispatcher)
      .map_err(|source| recipe_error(operation, source))?;

    let input = GenerateInput {
      recipe: &self.info,
      layout,
      settings: &self.settings,
      requirements: &self.requirements,
      options,
      dependencies: &dependencies,
    };
    let artifacts = dispatcher.generate(&input).map_err(generate_error)?;
    self.artifacts = artifacts;
    Ok(())
  }
}

fn recipe_error(phase: &'static str, source: RecipeError) -> EvaluationError {
  EvaluationError::Recipe { phase, source }
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::path::Path;

  use tempfile::TempDir;
  use tracing_test::traced_test;

  use super::*;
  use crate::doodle::DoodleDuel;
  use crate::generate::deps::DEPS_MANIFEST_FILENAME;
  use crate::generate::toolchain::{PRESETS_FILENAME, TOOLCHAIN_FILENAME};
  use crate::host::{DirectoryHost, StaticHost};
  use crate::layout::Layout;
  use crate::options::{OptionError, OptionValue};
  use crate::platform::{Arch, Os, Platform};
  use crate::requirements::RequirementError;
  use crate::util::testutil::doodle_host;

  fn settings() -> Settings {
    Settings::new(Platform::new(Arch::X86_64, Os::Linux))
  }

  fn assignments(raw: &[&str]) -> Vec<OptionAssignment> {
    raw.iter().map(|a| a.parse().unwrap()).collect()
  }

  fn run_doodle(host: &StaticHost, root: &Path, raw: &[&str]) -> Result<Outcome, EvaluationError> {
    Evaluation::new(DoodleDuel, host, root, settings())
      .with_assignments(assignments(raw))
      .run()
  }

  fn manifest_names(root: &Path) -> Vec<String> {
    let content = fs::read_to_string(root.join(DEPS_MANIFEST_FILENAME)).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
    manifest["dependencies"]
      .as_array()
      .unwrap()
      .iter()
      .map(|d| d["name"].as_str().unwrap().to_string())
      .collect()
  }

  /// DoodleDuel minus its dependency overrides.
  struct WithoutOverrides;

  impl Recipe for WithoutOverrides {
    fn info(&self) -> RecipeInfo {
      DoodleDuel.info()
    }

    fn options(&self, options: &mut OptionRegistry) -> Result<(), RecipeError> {
      DoodleDuel.options(options)
    }

    fn requirements(&self, requirements: &mut RequirementSet, options: &OptionRegistry) -> Result<(), RecipeError> {
      DoodleDuel.requirements(requirements, options)
    }

    fn build_requirements(
      &self,
      requirements: &mut RequirementSet,
      options: &OptionRegistry,
    ) -> Result<(), RecipeError> {
      DoodleDuel.build_requirements(requirements, options)
    }

    fn generate(&self, options: &OptionSet, dispatcher: &mut Dispatcher) -> Result<(), RecipeError> {
      DoodleDuel.generate(options, dispatcher)
    }
  }

  mod doodle_duel {
    use super::*;

    #[test]
    fn default_build_has_five_dependencies_and_tests_off() {
      let temp = TempDir::new().unwrap();
      let outcome = run_doodle(&doodle_host(true), temp.path(), &[]).unwrap();

      assert_eq!(
        manifest_names(temp.path()),
        vec!["raylib", "fmt", "entt", "imgui", "glfw"]
      );
      let toolchain = fs::read_to_string(temp.path().join(TOOLCHAIN_FILENAME)).unwrap();
      assert!(toolchain.contains("set(DOODLEDUEL_BUILD_TESTS \"false\""));
      assert!(!toolchain.to_lowercase().contains("preset"));
      assert!(!temp.path().join(PRESETS_FILENAME).exists());
      assert_eq!(outcome.artifacts.len(), 2);
    }

    #[test]
    fn build_tests_adds_catch2() {
      let temp = TempDir::new().unwrap();
      let outcome = run_doodle(&doodle_host(true), temp.path(), &["build_tests=true"]).unwrap();

      assert_eq!(
        manifest_names(temp.path()),
        vec!["raylib", "fmt", "entt", "imgui", "glfw", "catch2"]
      );
      let toolchain = fs::read_to_string(temp.path().join(TOOLCHAIN_FILENAME)).unwrap();
      assert!(toolchain.contains("set(DOODLEDUEL_BUILD_TESTS \"true\""));
      assert_eq!(outcome.requirements.conditional().count(), 1);
    }

    #[test]
    fn supported_backends_are_applied() {
      let temp = TempDir::new().unwrap();
      let outcome = run_doodle(&doodle_host(true), temp.path(), &[]).unwrap();

      assert_eq!(
        outcome.options.dependency_value("imgui", "backend_glfw"),
        Some(&OptionValue::Bool(true))
      );
      assert_eq!(
        outcome.options.dependency_value("imgui", "backend_opengl3"),
        Some(&OptionValue::Bool(true))
      );
    }

    #[test]
    fn unsupported_backends_match_no_override_output() {
      let host = doodle_host(false);
      let with = TempDir::new().unwrap();
      let without = TempDir::new().unwrap();

      let outcome = run_doodle(&host, with.path(), &[]).unwrap();
      Evaluation::new(WithoutOverrides, &host, without.path(), settings())
        .run()
        .unwrap();

      assert_eq!(outcome.options.dependency_value("imgui", "backend_glfw"), None);
      for file in [DEPS_MANIFEST_FILENAME, TOOLCHAIN_FILENAME] {
        assert_eq!(
          fs::read(with.path().join(file)).unwrap(),
          fs::read(without.path().join(file)).unwrap(),
          "{file} differs"
        );
      }
    }

    #[test]
    #[traced_test]
    fn schemaless_host_still_generates() {
      let temp = TempDir::new().unwrap();
      let host = DirectoryHost::new(temp.path().join("packages"));

      let outcome = Evaluation::new(DoodleDuel, &host, temp.path(), settings())
        .run()
        .unwrap();

      assert!(outcome.options.dependency_options("imgui").is_empty());
      assert!(logs_contain("capability probe failed"));
    }

    #[test]
    fn caller_dependency_override_is_staged_after_recipe() {
      let temp = TempDir::new().unwrap();
      let outcome = run_doodle(&doodle_host(true), temp.path(), &["imgui:backend_opengl3=false"]).unwrap();

      assert_eq!(
        outcome.options.dependency_value("imgui", "backend_opengl3"),
        Some(&OptionValue::Bool(false))
      );
    }
  }

  mod ordering {
    use super::*;

    #[test]
    fn out_of_order_calls_are_rejected() {
      let temp = TempDir::new().unwrap();
      let host = doodle_host(true);
      let mut eval = Evaluation::new(DoodleDuel, &host, temp.path(), settings());

      let err = eval.declare_requirements().unwrap_err();
      assert!(matches!(
        err,
        EvaluationError::Order(PhaseError {
          operation: "declare_requirements",
          current: Phase::Created,
          expected: Phase::LayoutResolved,
        })
      ));
      // rejection leaves the evaluation usable
      assert_eq!(eval.phase(), Phase::Created);

      eval.resolve_layout().unwrap();
      assert!(matches!(eval.apply_options(), Err(EvaluationError::Order(_))));
      assert!(matches!(eval.resolve_layout(), Err(EvaluationError::Order(_))));
      assert_eq!(eval.phase(), Phase::LayoutResolved);

      eval.declare_requirements().unwrap();
      eval.declare_build_requirements().unwrap();
      let err = eval.generate().unwrap_err();
      assert!(matches!(
        err,
        EvaluationError::Order(PhaseError {
          operation: "generate",
          current: Phase::BuildRequirementsDeclared,
          expected: Phase::OptionsApplied,
        })
      ));
      assert_eq!(eval.phase(), Phase::BuildRequirementsDeclared);
      assert!(!temp.path().join(DEPS_MANIFEST_FILENAME).exists());

      eval.apply_options().unwrap();
      eval.generate().unwrap();
      let err = eval.generate().unwrap_err();
      assert!(matches!(
        err,
        EvaluationError::Order(PhaseError {
          operation: "generate",
          current: Phase::Generated,
          expected: Phase::OptionsApplied,
        })
      ));
      assert_eq!(eval.phase(), Phase::Generated);
    }

    #[test]
    fn phases_advance_linearly() {
      let temp = TempDir::new().unwrap();
      let host = doodle_host(true);
      let mut eval = Evaluation::new(DoodleDuel, &host, temp.path(), settings());

      eval.resolve_layout().unwrap();
      assert_eq!(eval.phase(), Phase::LayoutResolved);
      eval.declare_requirements().unwrap();
      assert_eq!(eval.phase(), Phase::RequirementsDeclared);
      eval.declare_build_requirements().unwrap();
      assert_eq!(eval.phase(), Phase::BuildRequirementsDeclared);
      eval.apply_options().unwrap();
      assert_eq!(eval.phase(), Phase::OptionsApplied);
      assert!(eval.options().is_some());
      eval.generate().unwrap();
      assert_eq!(eval.phase(), Phase::Generated);

      let outcome = eval.finish().unwrap();
      assert_eq!(outcome.recipe.name, "doodle-duel");
    }

    #[test]
    fn configure_only_writes_nothing() {
      let temp = TempDir::new().unwrap();
      let host = doodle_host(true);
      let mut eval = Evaluation::new(DoodleDuel, &host, temp.path(), settings());

      eval.configure_only().unwrap();

      assert_eq!(eval.phase(), Phase::OptionsApplied);
      assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn failure_is_terminal() {
      let temp = TempDir::new().unwrap();
      let host = doodle_host(true);
      let mut eval = Evaluation::new(DoodleDuel, &host, temp.path(), settings())
        .with_assignments(assignments(&["build_tests=maybe"]));

      assert!(eval.resolve_layout().is_err());
      assert_eq!(eval.phase(), Phase::Failed);
      assert!(eval.phase().is_terminal());

      let err = eval.declare_requirements().unwrap_err();
      assert!(matches!(
        err,
        EvaluationError::Order(PhaseError {
          current: Phase::Failed,
          ..
        })
      ));
    }
  }

  mod errors {
    use super::*;

    struct Conflicting;

    impl Recipe for Conflicting {
      fn info(&self) -> RecipeInfo {
        DoodleDuel.info()
      }

      fn requirements(&self, requirements: &mut RequirementSet, _options: &OptionRegistry) -> Result<(), RecipeError> {
        requirements.requires("fmt/10.2.1")?;
        requirements.requires("fmt/11.0.0")?;
        Ok(())
      }

      fn generate(&self, _options: &OptionSet, _dispatcher: &mut Dispatcher) -> Result<(), RecipeError> {
        Ok(())
      }
    }

    struct OverridesUndeclared;

    impl Recipe for OverridesUndeclared {
      fn info(&self) -> RecipeInfo {
        DoodleDuel.info()
      }

      fn requirements(&self, requirements: &mut RequirementSet, _options: &OptionRegistry) -> Result<(), RecipeError> {
        requirements.requires("imgui/1.89.9")?;
        Ok(())
      }

      fn configure(&self, options: &mut OptionRegistry) -> Result<(), RecipeError> {
        options.set_override("sdl", "shared", true);
        Ok(())
      }

      fn generate(&self, _options: &OptionSet, _dispatcher: &mut Dispatcher) -> Result<(), RecipeError> {
        Ok(())
      }
    }

    struct Escaping;

    impl Recipe for Escaping {
      fn info(&self) -> RecipeInfo {
        DoodleDuel.info()
      }

      fn layout(&self) -> Layout {
        Layout::new("../build", ".")
      }

      fn requirements(&self, _requirements: &mut RequirementSet, _options: &OptionRegistry) -> Result<(), RecipeError> {
        Ok(())
      }

      fn generate(&self, _options: &OptionSet, _dispatcher: &mut Dispatcher) -> Result<(), RecipeError> {
        Ok(())
      }
    }

    #[test]
    fn conflict_carries_phase_and_both_constraints() {
      let host = doodle_host(true);
      let err = Evaluation::new(Conflicting, &host, "/recipe", settings())
        .run()
        .unwrap_err();

      assert_eq!(err.phase(), "declare_requirements");
      assert!(matches!(
        err,
        EvaluationError::Recipe {
          source: RecipeError::Requirement(RequirementError::Conflict { .. }),
          ..
        }
      ));
      let message = err.to_string();
      assert!(message.contains("10.2.1") && message.contains("11.0.0"));
    }

    #[test]
    fn override_on_undeclared_owner_fails_apply_options() {
      let host = doodle_host(true);
      let err = Evaluation::new(OverridesUndeclared, &host, "/recipe", settings())
        .run()
        .unwrap_err();

      assert_eq!(err.phase(), "apply_options");
      assert!(matches!(
        err,
        EvaluationError::Recipe {
          source: RecipeError::Option(OptionError::UnknownOwner { .. }),
          ..
        }
      ));
    }

    #[test]
    fn unknown_caller_option_fails_before_requirements() {
      let host = doodle_host(true);
      let mut eval = Evaluation::new(DoodleDuel, &host, "/recipe", settings())
        .with_assignments(assignments(&["build_docs=true"]));

      let err = eval.resolve_layout().unwrap_err();

      assert_eq!(err.phase(), "resolve_layout");
      assert!(eval.requirements().is_empty());
    }

    #[test]
    fn escaping_layout_is_rejected() {
      let host = doodle_host(true);
      let err = Evaluation::new(Escaping, &host, "/recipe", settings())
        .run()
        .unwrap_err();

      assert!(matches!(
        err,
        EvaluationError::Recipe {
          source: RecipeError::Layout(_),
          ..
        }
      ));
    }

    #[test]
    fn unknown_package_fails_generate() {
      let temp = TempDir::new().unwrap();
      let host = StaticHost::new();
      let err = Evaluation::new(DoodleDuel, &host, temp.path(), settings())
        .run()
        .unwrap_err();

      assert_eq!(err.phase(), "generate");
      assert!(err.to_string().contains("raylib"));
      assert!(!temp.path().join(DEPS_MANIFEST_FILENAME).exists());
    }
  }

  #[test]
  fn concurrent_evaluations_are_independent() {
    let host = doodle_host(true);
    let off = TempDir::new().unwrap();
    let on = TempDir::new().unwrap();

    std::thread::scope(|s| {
      let a = s.spawn(|| run_doodle(&host, off.path(), &[]));
      let b = s.spawn(|| run_doodle(&host, on.path(), &["build_tests=true"]));
      a.join().unwrap().unwrap();
      b.join().unwrap().unwrap();
    });

    assert_eq!(manifest_names(off.path()).len(), 5);
    assert_eq!(manifest_names(on.path()).len(), 6);
  }
}
