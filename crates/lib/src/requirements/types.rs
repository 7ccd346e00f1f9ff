use std::fmt;

use serde::{Deserialize, Serialize};

use super::RequirementError;

/// Why a requirement is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
  /// Always needed.
  Regular,
  /// Build tooling, declared only when its guarding option is set.
  Test,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
  pub name: String,
  pub constraint: String,
  pub kind: RequirementKind,
}

impl Requirement {
  pub fn new(name: &str, constraint: &str, kind: RequirementKind) -> Self {
    Self {
      name: name.to_string(),
      constraint: constraint.to_string(),
      kind,
    }
  }

  /// Parse a `name/version` reference such as `raylib/5.5`.
  pub fn parse(reference: &str, kind: RequirementKind) -> Result<Self, RequirementError> {
    let invalid = || RequirementError::InvalidReference(reference.to_string());

    let (name, constraint) = reference.split_once('/').ok_or_else(invalid)?;
    let (name, constraint) = (name.trim(), constraint.trim());
    if name.is_empty() || constraint.is_empty() || constraint.contains('/') {
      return Err(invalid());
    }

    Ok(Self::new(name, constraint, kind))
  }

  pub fn is_regular(&self) -> bool {
    self.kind == RequirementKind::Regular
  }

  /// The `name/constraint` reference for this requirement.
  pub fn reference(&self) -> String {
    format!("{}/{}", self.name, self.constraint)
  }
}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.name, self.constraint)
  }
}
