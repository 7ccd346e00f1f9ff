//! Where a recipe's build outputs and generated files go.
//!
//! Paths are relative to the recipe directory. The default is the flat layout:
//! both folders are the recipe directory itself, so downstream tooling can
//! hard-code where the generated files are. Recipes that need one tree per
//! configuration supply their own [`Layout`].

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
  #[error("{folder} folder must be relative to the recipe directory, got {}", path.display())]
  Absolute { folder: &'static str, path: PathBuf },

  #[error("{folder} folder escapes the recipe directory: {}", path.display())]
  Escapes { folder: &'static str, path: PathBuf },
}

/// A layout policy, expressed relative to the recipe directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub build: PathBuf,
  pub generators: PathBuf,
}

impl Default for Layout {
  fn default() -> Self {
    Self::flat()
  }
}

impl Layout {
  /// Build and generator output both in the recipe directory.
  pub fn flat() -> Self {
    Self {
      build: PathBuf::from("."),
      generators: PathBuf::from("."),
    }
  }

  pub fn new(build: impl Into<PathBuf>, generators: impl Into<PathBuf>) -> Self {
    Self {
      build: build.into(),
      generators: generators.into(),
    }
  }

  /// Anchor this layout at `root`, the recipe directory.
  pub fn resolve(self, root: &Path) -> Result<ResolvedLayout, LayoutError> {
    check_relative("build", &self.build)?;
    check_relative("generators", &self.generators)?;
    Ok(ResolvedLayout {
      root: root.to_path_buf(),
      layout: self,
    })
  }
}

fn check_relative(folder: &'static str, path: &Path) -> Result<(), LayoutError> {
  if path.has_root() {
    return Err(LayoutError::Absolute {
      folder,
      path: path.to_path_buf(),
    });
  }

  let mut depth: i32 = 0;
  for component in path.components() {
    match component {
      Component::ParentDir => depth -= 1,
      Component::Normal(_) => depth += 1,
      Component::CurDir => {}
      Component::RootDir | Component::Prefix(_) => {
        return Err(LayoutError::Absolute {
          folder,
          path: path.to_path_buf(),
        });
      }
    }
    if depth < 0 {
      return Err(LayoutError::Escapes {
        folder,
        path: path.to_path_buf(),
      });
    }
  }
  Ok(())
}

/// A layout anchored at a recipe directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
  root: PathBuf,
  layout: Layout,
}

impl ResolvedLayout {
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Build folder, relative to the recipe directory.
  pub fn resolve_build_path(&self) -> &Path {
    &self.layout.build
  }

  /// Generators folder, relative to the recipe directory.
  pub fn resolve_generator_path(&self) -> &Path {
    &self.layout.generators
  }

  pub fn build_dir(&self) -> PathBuf {
    join_clean(&self.root, &self.layout.build)
  }

  pub fn generators_dir(&self) -> PathBuf {
    join_clean(&self.root, &self.layout.generators)
  }
}

/// Join without leaving `.` components in the result.
fn join_clean(root: &Path, relative: &Path) -> PathBuf {
  let mut out = root.to_path_buf();
  for component in relative.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}
