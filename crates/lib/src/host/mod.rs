//! The package-resolution host seen from inside a recipe evaluation.
//!
//! The host owns fetching, building and caching packages. The core only asks it
//! two things: where a required package lives, and which options a package
//! exposes. Two implementations are provided:
//!
//! - [`StaticHost`] - a fixed package table, loadable from a JSON description
//! - [`DirectoryHost`] - `<root>/<name>/<version>` folders with no option schemas

mod directory;
mod static_host;

pub use directory::DirectoryHost;
pub use static_host::{HostDescription, HostPackage, StaticHost};

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::OptionValue;
use crate::requirements::Requirement;

/// Errors reported by a host.
#[derive(Debug, Error)]
pub enum HostError {
  #[error("package '{0}' is not known to the host")]
  UnknownPackage(String),

  #[error("host has no option schema for package '{0}'")]
  SchemaUnavailable(String),

  #[error("failed to read host description {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse host description {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// The options a package exposes, with their allowed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSchema {
  pub options: BTreeMap<String, Vec<OptionValue>>,
}

impl OptionSchema {
  pub fn exposes(&self, key: &str) -> bool {
    self.options.contains_key(key)
  }

  /// Allowed values for `key`, if the package exposes it. Empty means unrestricted.
  pub fn allowed(&self, key: &str) -> Option<&[OptionValue]> {
    self.options.get(key).map(Vec::as_slice)
  }
}

/// Where a resolved package's build artifacts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
  pub name: String,
  pub version: String,
  pub package_folder: PathBuf,
  pub include_dirs: Vec<PathBuf>,
  pub lib_dirs: Vec<PathBuf>,
  pub libs: Vec<String>,
}

/// Interface a package-resolution host offers to an evaluation.
///
/// Hosts are shared read-only between concurrent evaluations.
pub trait PackageHost: Send + Sync {
  /// Locate the package satisfying `requirement`.
  fn resolve(&self, requirement: &Requirement) -> Result<ResolvedPackage, HostError>;

  /// The option schema declared by `package`.
  fn option_schema(&self, package: &str) -> Result<OptionSchema, HostError>;
}
