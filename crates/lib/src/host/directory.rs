use std::path::PathBuf;

use super::{HostError, OptionSchema, PackageHost, ResolvedPackage};
use crate::requirements::Requirement;

/// A host that lays packages out as `<root>/<name>/<version>`.
///
/// It knows nothing about package options, so every schema lookup fails and
/// every dependency override is dropped by the capability probe.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
  root: PathBuf,
}

impl DirectoryHost {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl PackageHost for DirectoryHost {
  fn resolve(&self, requirement: &Requirement) -> Result<ResolvedPackage, HostError> {
    let folder = self.root.join(&requirement.name).join(&requirement.constraint);
    Ok(ResolvedPackage {
      name: requirement.name.clone(),
      version: requirement.constraint.clone(),
      include_dirs: vec![folder.join("include")],
      lib_dirs: vec![folder.join("lib")],
      libs: vec![requirement.name.clone()],
      package_folder: folder,
    })
  }

  fn option_schema(&self, package: &str) -> Result<OptionSchema, HostError> {
    Err(HostError::SchemaUnavailable(package.to_string()))
  }
}
