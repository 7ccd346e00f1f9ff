//! Test fixtures shared by the recipe-lib unit tests.
//!
//! Everything here is built around the doodle-duel dependency set so the tests
//! read like real evaluations.

use std::collections::BTreeMap;
use std::path::Path;

use tempfile::TempDir;

use crate::generate::{Artifact, Dispatcher, GenerateError, GenerateInput, ResolvedDependency};
use crate::host::{HostPackage, OptionSchema, PackageHost, StaticHost};
use crate::layout::{Layout, ResolvedLayout};
use crate::options::{CapabilityProbe, OptionRegistry, OptionValue};
use crate::platform::{Arch, Os, Platform};
use crate::recipe::{PackageType, RecipeInfo};
use crate::requirements::RequirementSet;
use crate::settings::Settings;

const PACKAGES: &[(&str, &str, &[&str])] = &[
  ("raylib", "5.5", &["raylib"]),
  ("fmt", "10.2.1", &["fmt"]),
  ("entt", "3.15.0", &[]),
  ("imgui", "1.89.9", &["imgui"]),
  ("glfw", "3.4", &["glfw3"]),
  ("catch2", "3.5.2", &["Catch2", "Catch2Main"]),
];

fn schema(keys: &[&str]) -> OptionSchema {
  let bool_values = vec![OptionValue::Bool(true), OptionValue::Bool(false)];
  OptionSchema {
    options: keys.iter().map(|k| (k.to_string(), bool_values.clone())).collect(),
  }
}

/// A host knowing every doodle-duel package under `/pkgs/<name>/<version>`.
///
/// With `imgui_backends`, imgui's schema exposes `backend_glfw` and
/// `backend_opengl3`; without, it only exposes `shared`.
pub fn doodle_host(imgui_backends: bool) -> StaticHost {
  let mut host = StaticHost::new();
  for (name, version, libs) in PACKAGES {
    let keys: &[&str] = match *name {
      "imgui" if imgui_backends => &["shared", "backend_glfw", "backend_opengl3"],
      _ => &["shared"],
    };
    let package = HostPackage::new(version, format!("/pkgs/{name}/{version}"))
      .with_options(schema(keys))
      .with_libs(libs);
    host = host.with_package(name, package);
  }
  host
}

/// The five regular doodle-duel requirements, in declaration order.
pub fn doodle_requirements() -> RequirementSet {
  let mut requirements = RequirementSet::new();
  for (name, version, _) in &PACKAGES[..5] {
    requirements.add_requirement(name, version, true).unwrap();
  }
  requirements
}

/// Final evaluation state for exercising generators directly, rooted in a temp dir.
pub struct Fixture {
  dir: TempDir,
  info: RecipeInfo,
  layout: ResolvedLayout,
  settings: Settings,
  requirements: RequirementSet,
  build_tests: bool,
  overrides: BTreeMap<(String, String), OptionValue>,
}

impl Fixture {
  pub fn new(build_tests: bool) -> Self {
    let dir = TempDir::new().unwrap();
    let layout = Layout::flat().resolve(dir.path()).unwrap();

    let mut requirements = doodle_requirements();
    requirements.add_conditional(build_tests, "catch2", "3.5.2").unwrap();

    Self {
      dir,
      info: RecipeInfo::new("doodle-duel", "1.0.0", PackageType::Application),
      layout,
      settings: Settings::new(Platform::new(Arch::X86_64, Os::Linux)),
      requirements,
      build_tests,
      overrides: BTreeMap::new(),
    }
  }

  pub fn with_dependency_option(mut self, target: &str, key: &str, value: impl Into<OptionValue>) -> Self {
    self.overrides.insert((target.to_string(), key.to_string()), value.into());
    self
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  pub fn dispatch(&self, dispatcher: &Dispatcher) -> Result<Vec<Artifact>, GenerateError> {
    let host = doodle_host(true);

    let mut registry = OptionRegistry::new();
    registry.declare_default("build_tests", [true, false], false).unwrap();
    registry.set_value("build_tests", self.build_tests).unwrap();
    for ((target, key), value) in &self.overrides {
      registry.set_override(target, key, value.clone());
    }
    let options = registry
      .apply(&self.requirements, &CapabilityProbe::new(&host))
      .unwrap();

    let dependencies: Vec<_> = self
      .requirements
      .iter()
      .map(|requirement| ResolvedDependency {
        requirement: requirement.clone(),
        package: host.resolve(requirement).unwrap(),
      })
      .collect();

    dispatcher.generate(&GenerateInput {
      recipe: &self.info,
      layout: &self.layout,
      settings: &self.settings,
      requirements: &self.requirements,
      options: &options,
      dependencies: &dependencies,
    })
  }
}
