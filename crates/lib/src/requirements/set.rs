use serde::Serialize;
use tracing::debug;

use super::{Requirement, RequirementError, RequirementKind};

/// The ordered requirements of one evaluation.
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequirementSet {
  entries: Vec<Requirement>,
}

impl RequirementSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare a requirement on `name` with `constraint`.
  ///
  /// `regular = false` marks a build-tooling requirement. A name already present
  /// with the same constraint is left as it is.
  pub fn add_requirement(&mut self, name: &str, constraint: &str, regular: bool) -> Result<(), RequirementError> {
    let kind = if regular {
      RequirementKind::Regular
    } else {
      RequirementKind::Test
    };
    self.insert(Requirement::new(name, constraint, kind))
  }

  /// Declare a test requirement only if `predicate` holds.
  ///
  /// The predicate is evaluated by the caller, once, at declaration time.
  /// Returns whether the requirement was declared.
  pub fn add_conditional(&mut self, predicate: bool, name: &str, constraint: &str) -> Result<bool, RequirementError> {
    if !predicate {
      debug!(name, constraint, "conditional requirement skipped");
      return Ok(false);
    }
    self.add_requirement(name, constraint, false)?;
    Ok(true)
  }

  /// Declare a regular requirement from a `name/version` reference.
  pub fn requires(&mut self, reference: &str) -> Result<(), RequirementError> {
    self.insert(Requirement::parse(reference, RequirementKind::Regular)?)
  }

  /// Declare a test requirement from a `name/version` reference.
  pub fn test_requires(&mut self, reference: &str) -> Result<(), RequirementError> {
    self.insert(Requirement::parse(reference, RequirementKind::Test)?)
  }

  fn insert(&mut self, requirement: Requirement) -> Result<(), RequirementError> {
    if requirement.name.is_empty() || requirement.constraint.is_empty() {
      return Err(RequirementError::InvalidReference(requirement.reference()));
    }

    if let Some(existing) = self.get(&requirement.name) {
      if existing.constraint != requirement.constraint {
        return Err(RequirementError::Conflict {
          name: requirement.name,
          existing: existing.constraint.clone(),
          requested: requirement.constraint,
        });
      }
      debug!(requirement = %requirement, "duplicate requirement ignored");
      return Ok(());
    }

    debug!(requirement = %requirement, kind = ?requirement.kind, "declared requirement");
    self.entries.push(requirement);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Requirement> {
    self.entries.iter().find(|r| r.name == name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
    self.entries.iter()
  }

  pub fn regular(&self) -> impl Iterator<Item = &Requirement> {
    self.entries.iter().filter(|r| r.is_regular())
  }

  pub fn conditional(&self) -> impl Iterator<Item = &Requirement> {
    self.entries.iter().filter(|r| !r.is_regular())
  }

  pub fn names(&self) -> Vec<&str> {
    self.entries.iter().map(|r| r.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<'a> IntoIterator for &'a RequirementSet {
  type Item = &'a Requirement;
  type IntoIter = std::slice::Iter<'a, Requirement>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}
