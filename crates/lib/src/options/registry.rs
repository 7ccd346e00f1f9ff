use std::collections::BTreeMap;

use tracing::debug;

use super::probe::CapabilityProbe;
use super::types::{OptionDecl, OptionEntry, OptionOwner, OptionSet, OptionValue, Provenance, StagedOverride};
use super::OptionError;
use crate::requirements::RequirementSet;

/// Holds the recipe's declared options, their current values and the staged
/// dependency overrides for one evaluation.
#[derive(Debug, Default)]
pub struct OptionRegistry {
  decls: BTreeMap<String, OptionDecl>,
  values: BTreeMap<String, OptionEntry>,
  staged: Vec<StagedOverride>,
}

impl OptionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare one of the recipe's own options.
  ///
  /// Fails if `default` is not among `allowed`, if `allowed` is empty, or if the
  /// key was already declared.
  pub fn declare_default<I, V>(
    &mut self,
    key: &str,
    allowed: I,
    default: impl Into<OptionValue>,
  ) -> Result<(), OptionError>
  where
    I: IntoIterator<Item = V>,
    V: Into<OptionValue>,
  {
    if self.decls.contains_key(key) {
      return Err(OptionError::DuplicateDeclaration { key: key.to_string() });
    }

    let decl = OptionDecl {
      key: key.to_string(),
      allowed: allowed.into_iter().map(Into::into).collect(),
      default: default.into(),
    };

    if decl.allowed.is_empty() {
      return Err(OptionError::EmptyAllowed { key: key.to_string() });
    }
    if !decl.allows(&decl.default) {
      return Err(OptionError::InvalidDefault {
        key: key.to_string(),
        default: decl.default.to_string(),
        allowed: decl.allowed_list(),
      });
    }

    debug!(key, default = %decl.default, "declared option");
    self.values.insert(
      key.to_string(),
      OptionEntry {
        owner: OptionOwner::Recipe,
        key: key.to_string(),
        value: decl.default.clone(),
        provenance: Provenance::Default,
      },
    );
    self.decls.insert(key.to_string(), decl);
    Ok(())
  }

  /// Override a recipe option with a caller-supplied value.
  pub fn set_value(&mut self, key: &str, value: impl Into<OptionValue>) -> Result<(), OptionError> {
    let decl = self
      .decls
      .get(key)
      .ok_or_else(|| OptionError::UnknownOption { key: key.to_string() })?;

    let value = value.into();
    if !decl.allows(&value) {
      return Err(OptionError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        allowed: decl.allowed_list(),
      });
    }

    debug!(key, value = %value, "recipe option overridden");
    self.values.insert(
      key.to_string(),
      OptionEntry {
        owner: OptionOwner::Recipe,
        key: key.to_string(),
        value,
        provenance: Provenance::Override,
      },
    );
    Ok(())
  }

  /// Stage an override for an option owned by `target`.
  pub fn set_override(&mut self, target: &str, key: &str, value: impl Into<OptionValue>) {
    let value = value.into();
    debug!(target, key, value = %value, "staged dependency option override");
    self.staged.push(StagedOverride {
      target: target.to_string(),
      key: key.to_string(),
      value,
    });
  }

  /// Current value of a recipe option.
  pub fn value(&self, key: &str) -> Option<&OptionValue> {
    self.values.get(key).map(|e| &e.value)
  }

  /// Current value of a boolean recipe option, for requirement predicates.
  pub fn flag(&self, key: &str) -> Result<bool, OptionError> {
    let value = self
      .value(key)
      .ok_or_else(|| OptionError::UnknownOption { key: key.to_string() })?;
    value.as_bool().ok_or_else(|| OptionError::NotBoolean {
      key: key.to_string(),
      value: value.to_string(),
    })
  }

  pub fn staged(&self) -> &[StagedOverride] {
    &self.staged
  }

  /// Produce the final option set.
  ///
  /// Each staged override must target a declared requirement; an override on
  /// an unknown owner is a configuration error, as is a value outside the
  /// allowed set the owner declares. Overrides the owner does not expose,
  /// including ones whose capability cannot be determined, are dropped.
  pub fn apply(&self, requirements: &RequirementSet, probe: &CapabilityProbe<'_>) -> Result<OptionSet, OptionError> {
    let mut set = OptionSet::new(self.values.clone());

    for staged in &self.staged {
      if !requirements.contains(&staged.target) {
        return Err(OptionError::UnknownOwner {
          target: staged.target.clone(),
          key: staged.key.clone(),
        });
      }

      let Some(allowed) = probe.allowed(&staged.target, &staged.key) else {
        debug!(
          target = %staged.target,
          key = %staged.key,
          "dependency does not expose option, override dropped"
        );
        continue;
      };

      if !allowed.is_empty() && !allowed.contains(&staged.value) {
        return Err(OptionError::InvalidValue {
          key: format!("{}:{}", staged.target, staged.key),
          value: staged.value.to_string(),
          allowed: allowed.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
        });
      }

      debug!(target = %staged.target, key = %staged.key, value = %staged.value, "applied dependency option");
      set.insert_dependency(OptionEntry {
        owner: OptionOwner::Dependency(staged.target.clone()),
        key: staged.key.clone(),
        value: staged.value.clone(),
        provenance: Provenance::Override,
      });
    }

    Ok(set)
  }
}
