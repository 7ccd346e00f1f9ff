//! CMake toolchain file.
//!
//! The toolchain carries the fixed directives every configuration needs (build
//! type, dependency prefix paths) followed by the recipe's build variables, one
//! `set()` per variable, values written as given. When `user_presets` is on, a
//! `CMakeUserPresets.json` pointing at the toolchain is written next to the
//! recipe as well; hosts that manage presets across several recipes turn it off.

use std::fmt::{self, Write as _};
use std::path::Path;

use serde_json::json;

use super::{Artifact, ArtifactKind, GenerateContext, GenerateError, Generator, portable_path};
use crate::util::fs::write_atomic;

pub const TOOLCHAIN_FILENAME: &str = "recipe_toolchain.cmake";

pub const PRESETS_FILENAME: &str = "CMakeUserPresets.json";

const NAME: &str = "toolchain";

/// Writes `recipe_toolchain.cmake` into the generators folder.
#[derive(Debug, Clone)]
pub struct ToolchainGenerator {
  pub user_presets: bool,
}

impl Default for ToolchainGenerator {
  fn default() -> Self {
    Self { user_presets: true }
  }
}

impl ToolchainGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_user_presets(mut self, enabled: bool) -> Self {
    self.user_presets = enabled;
    self
  }

  fn render(&self, ctx: &GenerateContext<'_>) -> Result<String, fmt::Error> {
    let input = ctx.input;
    let settings = input.settings;
    let mut out = String::new();

    writeln!(
      out,
      "# {} for {}/{}, generated by recipe. Do not edit.",
      TOOLCHAIN_FILENAME, input.recipe.name, input.recipe.version
    )?;
    writeln!(out, "include_guard()")?;
    writeln!(out)?;

    writeln!(
      out,
      "# Settings: os={} arch={} build_type={}{}",
      settings.os,
      settings.arch,
      settings.build_type,
      settings
        .compiler
        .as_deref()
        .map(|c| format!(" compiler={c}"))
        .unwrap_or_default()
    )?;
    writeln!(out, "if(NOT CMAKE_CONFIGURATION_TYPES)")?;
    writeln!(
      out,
      "  set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Build type\" FORCE)",
      settings.build_type
    )?;
    writeln!(out, "endif()")?;
    writeln!(out)?;

    writeln!(out, "# Dependency locations")?;
    writeln!(out, "set(CMAKE_FIND_PACKAGE_PREFER_CONFIG ON)")?;
    writeln!(out, "list(PREPEND CMAKE_PREFIX_PATH \"${{CMAKE_CURRENT_LIST_DIR}}\")")?;
    for dep in input.dependencies {
      writeln!(
        out,
        "list(APPEND CMAKE_PREFIX_PATH \"{}\")",
        cmake_escape(&portable_path(&dep.package.package_folder))
      )?;
    }

    if !ctx.variables.is_empty() {
      writeln!(out)?;
      writeln!(out, "# Variables")?;
      for (key, value) in ctx.variables.iter() {
        writeln!(
          out,
          "set({} \"{}\" CACHE STRING \"Variable from recipe\" FORCE)",
          key,
          cmake_escape(value)
        )?;
      }
    }

    Ok(out)
  }

  fn write_presets(&self, ctx: &GenerateContext<'_>, toolchain: &Path) -> Result<Artifact, GenerateError> {
    let input = ctx.input;
    let preset_name = format!("recipe-{}", input.settings.build_type.as_str().to_ascii_lowercase());
    let presets = json!({
      "version": 4,
      "configurePresets": [{
        "name": preset_name,
        "displayName": format!("{} {}", input.recipe.name, input.settings.build_type),
        "binaryDir": portable_path(&input.layout.build_dir()),
        "toolchainFile": portable_path(toolchain),
      }],
    });

    let mut content = serde_json::to_string_pretty(&presets).map_err(|source| GenerateError::Serialize {
      generator: NAME,
      source,
    })?;
    content.push('\n');

    let path = input.layout.root().join(PRESETS_FILENAME);
    write_atomic(&path, content.as_bytes()).map_err(|source| GenerateError::Write {
      generator: NAME,
      path: path.clone(),
      source,
    })?;

    Ok(Artifact {
      generator: NAME,
      kind: ArtifactKind::Presets,
      path,
    })
  }
}

/// Escape for a CMake quoted argument. `${}` references are left for CMake to expand.
fn cmake_escape(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Generator for ToolchainGenerator {
  fn name(&self) -> &'static str {
    NAME
  }

  fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<Artifact>, GenerateError> {
    let path = ctx.input.layout.generators_dir().join(TOOLCHAIN_FILENAME);
    let content = self.render(ctx).map_err(|source| GenerateError::Render { generator: NAME, source })?;
    write_atomic(&path, content.as_bytes()).map_err(|source| GenerateError::Write {
      generator: NAME,
      path: path.clone(),
      source,
    })?;

    let mut artifacts = vec![Artifact {
      generator: NAME,
      kind: ArtifactKind::Toolchain,
      path: path.clone(),
    }];

    if self.user_presets {
      artifacts.push(self.write_presets(ctx, &path)?);
    }

    Ok(artifacts)
  }
}
