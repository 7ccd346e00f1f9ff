//! Dependency-location manifest.
//!
//! One record per requirement, in declaration order, telling the native build
//! where each dependency's headers and libraries live.
//!
//! ```json
//! {
//!   "version": 1,
//!   "recipe": { "name": "doodle-duel", "version": "1.0.0", "package_type": "application" },
//!   "settings": { "os": "linux", "arch": "x86_64", "build_type": "Release" },
//!   "dependencies": [
//!     {
//!       "name": "imgui",
//!       "version": "1.89.9",
//!       "constraint": "1.89.9",
//!       "kind": "regular",
//!       "package_folder": "/pkgs/imgui/1.89.9",
//!       "include_dirs": ["/pkgs/imgui/1.89.9/include"],
//!       "lib_dirs": ["/pkgs/imgui/1.89.9/lib"],
//!       "libs": ["imgui"],
//!       "options": { "backend_glfw": true }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Artifact, ArtifactKind, GenerateContext, GenerateError, Generator, portable_path};
use crate::options::OptionValue;
use crate::recipe::RecipeInfo;
use crate::requirements::RequirementKind;
use crate::settings::Settings;
use crate::util::fs::write_atomic;

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

pub const DEPS_MANIFEST_FILENAME: &str = "recipe-deps.json";

const NAME: &str = "deps";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
  version: u32,
  recipe: &'a RecipeInfo,
  settings: &'a Settings,
  dependencies: Vec<Entry<'a>>,
}

#[derive(Debug, Serialize)]
struct Entry<'a> {
  name: &'a str,
  version: &'a str,
  constraint: &'a str,
  kind: RequirementKind,
  package_folder: String,
  include_dirs: Vec<String>,
  lib_dirs: Vec<String>,
  libs: &'a [String],
  options: BTreeMap<String, OptionValue>,
}

/// Writes `recipe-deps.json` into the generators folder.
#[derive(Debug, Clone, Default)]
pub struct DependencyManifestGenerator;

impl DependencyManifestGenerator {
  pub fn new() -> Self {
    Self
  }

  fn render(&self, ctx: &GenerateContext<'_>) -> Result<String, GenerateError> {
    let input = ctx.input;
    let dependencies = input
      .dependencies
      .iter()
      .map(|dep| Entry {
        name: &dep.requirement.name,
        version: &dep.package.version,
        constraint: &dep.requirement.constraint,
        kind: dep.requirement.kind,
        package_folder: portable_path(&dep.package.package_folder),
        include_dirs: dep.package.include_dirs.iter().map(|p| portable_path(p)).collect(),
        lib_dirs: dep.package.lib_dirs.iter().map(|p| portable_path(p)).collect(),
        libs: &dep.package.libs,
        options: input.options.dependency_options(&dep.requirement.name),
      })
      .collect();

    let manifest = Manifest {
      version: MANIFEST_VERSION,
      recipe: input.recipe,
      settings: input.settings,
      dependencies,
    };

    let mut json = serde_json::to_string_pretty(&manifest).map_err(|source| GenerateError::Serialize {
      generator: NAME,
      source,
    })?;
    json.push('\n');
    Ok(json)
  }
}

impl Generator for DependencyManifestGenerator {
  fn name(&self) -> &'static str {
    NAME
  }

  fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
    let content = self.render(ctx)?;
    let path = ctx.input.layout.generators_dir().join(DEPS_MANIFEST_FILENAME);

    write_atomic(&path, content.as_bytes()).map_err(|source| GenerateError::Write {
      generator: NAME,
      path: path.clone(),
      source,
    })?;

    Ok(vec![Artifact {
      generator: NAME,
      kind: ArtifactKind::DependencyManifest,
      path,
    }])
  }
}
