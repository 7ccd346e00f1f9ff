use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{HostError, OptionSchema, PackageHost, ResolvedPackage};
use crate::requirements::Requirement;

/// A package as listed in a host description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPackage {
  pub version: String,
  pub package_folder: PathBuf,

  /// `None` means the host has no schema information for this package.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<OptionSchema>,

  #[serde(default = "default_include_dirs")]
  pub include_dirs: Vec<PathBuf>,

  #[serde(default = "default_lib_dirs")]
  pub lib_dirs: Vec<PathBuf>,

  #[serde(default)]
  pub libs: Vec<String>,
}

fn default_include_dirs() -> Vec<PathBuf> {
  vec![PathBuf::from("include")]
}

fn default_lib_dirs() -> Vec<PathBuf> {
  vec![PathBuf::from("lib")]
}

impl HostPackage {
  pub fn new(version: &str, package_folder: impl Into<PathBuf>) -> Self {
    Self {
      version: version.to_string(),
      package_folder: package_folder.into(),
      options: None,
      include_dirs: default_include_dirs(),
      lib_dirs: default_lib_dirs(),
      libs: Vec::new(),
    }
  }

  pub fn with_options(mut self, options: OptionSchema) -> Self {
    self.options = Some(options);
    self
  }

  pub fn with_libs(mut self, libs: &[&str]) -> Self {
    self.libs = libs.iter().map(|l| l.to_string()).collect();
    self
  }
}

/// On-disk host description.
///
/// ```json
/// {
///   "packages": {
///     "imgui": {
///       "version": "1.89.9",
///       "package_folder": "/home/me/.pkgs/imgui/1.89.9",
///       "options": { "shared": [true, false] },
///       "libs": ["imgui"]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescription {
  pub packages: BTreeMap<String, HostPackage>,
}

/// A host backed by a fixed package table.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
  packages: BTreeMap<String, HostPackage>,
}

impl StaticHost {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load a host description file.
  ///
  /// Relative package folders are taken relative to the file's directory.
  pub fn from_file(path: &Path) -> Result<Self, HostError> {
    let content = fs::read_to_string(path).map_err(|source| HostError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let mut description: HostDescription = serde_json::from_str(&content).map_err(|source| HostError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for package in description.packages.values_mut() {
      if package.package_folder.is_relative() {
        package.package_folder = base.join(&package.package_folder);
      }
    }

    debug!(path = %path.display(), packages = description.packages.len(), "loaded host description");
    Ok(Self::from(description))
  }

  pub fn with_package(mut self, name: &str, package: HostPackage) -> Self {
    self.packages.insert(name.to_string(), package);
    self
  }
}

impl From<HostDescription> for StaticHost {
  fn from(description: HostDescription) -> Self {
    Self {
      packages: description.packages,
    }
  }
}

impl PackageHost for StaticHost {
  fn resolve(&self, requirement: &Requirement) -> Result<ResolvedPackage, HostError> {
    let package = self
      .packages
      .get(&requirement.name)
      .ok_or_else(|| HostError::UnknownPackage(requirement.name.clone()))?;

    if package.version != requirement.constraint {
      debug!(
        name = %requirement.name,
        constraint = %requirement.constraint,
        version = %package.version,
        "host resolved a different version than requested"
      );
    }

    let folder = &package.package_folder;
    Ok(ResolvedPackage {
      name: requirement.name.clone(),
      version: package.version.clone(),
      package_folder: folder.clone(),
      include_dirs: package.include_dirs.iter().map(|d| folder.join(d)).collect(),
      lib_dirs: package.lib_dirs.iter().map(|d| folder.join(d)).collect(),
      libs: package.libs.clone(),
    })
  }

  fn option_schema(&self, package: &str) -> Result<OptionSchema, HostError> {
    let entry = self
      .packages
      .get(package)
      .ok_or_else(|| HostError::UnknownPackage(package.to_string()))?;
    entry
      .options
      .clone()
      .ok_or_else(|| HostError::SchemaUnavailable(package.to_string()))
  }
}
