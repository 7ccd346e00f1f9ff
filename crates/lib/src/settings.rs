//! Binary-configuration settings: `os`, `arch`, `compiler`, `build_type`.
//!
//! Settings describe the configuration being generated for. `os` and `arch`
//! default to the running platform; callers may override any of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{Arch, Os, Platform, PlatformError};

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("unknown setting '{0}', expected one of os, arch, compiler, build_type")]
  Unknown(String),

  #[error("invalid value for setting '{name}': {reason}")]
  InvalidValue { name: String, reason: String },

  #[error("malformed setting assignment '{0}', expected name=value")]
  Malformed(String),

  #[error(transparent)]
  Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildType {
  Debug,
  #[default]
  Release,
  RelWithDebInfo,
  MinSizeRel,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
      Self::RelWithDebInfo => "RelWithDebInfo",
      Self::MinSizeRel => "MinSizeRel",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      "relwithdebinfo" => Ok(Self::RelWithDebInfo),
      "minsizerel" => Ok(Self::MinSizeRel),
      _ => Err(format!("unknown build type '{}'", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub compiler: Option<String>,
  pub build_type: BuildType,
}

impl Settings {
  pub fn new(platform: Platform) -> Self {
    Self {
      os: platform.os,
      arch: platform.arch,
      compiler: None,
      build_type: BuildType::default(),
    }
  }

  /// Settings for the running platform, `Release` build, no explicit compiler.
  pub fn detect() -> Result<Self, SettingsError> {
    Ok(Self::new(Platform::detect()?))
  }

  pub fn set(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidValue {
      name: name.to_string(),
      reason,
    };

    match name {
      "os" => self.os = value.parse().map_err(invalid)?,
      "arch" => self.arch = value.parse().map_err(invalid)?,
      "build_type" => self.build_type = value.parse().map_err(invalid)?,
      "compiler" => {
        if value.is_empty() {
          return Err(invalid("compiler cannot be empty".to_string()));
        }
        self.compiler = Some(value.to_string());
      }
      _ => return Err(SettingsError::Unknown(name.to_string())),
    }
    Ok(())
  }

  /// Apply a `name=value` assignment.
  pub fn assign(&mut self, assignment: &str) -> Result<(), SettingsError> {
    let (name, value) = assignment
      .split_once('=')
      .ok_or_else(|| SettingsError::Malformed(assignment.to_string()))?;
    self.set(name.trim(), value.trim())
  }

  pub fn get(&self, name: &str) -> Option<String> {
    match name {
      "os" => Some(self.os.to_string()),
      "arch" => Some(self.arch.to_string()),
      "build_type" => Some(self.build_type.to_string()),
      "compiler" => self.compiler.clone(),
      _ => None,
    }
  }
}
