use std::collections::BTreeMap;

use super::GenerateError;
use crate::options::OptionSet;
use crate::placeholder::{self, PlaceholderError, Resolver};
use crate::settings::Settings;

/// Build variables as configured by a recipe, before resolution.
///
/// Values may contain `$${option:..}` and `$${setting:..}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
  raw: BTreeMap<String, String>,
}

/// Build variables after placeholder resolution. Written verbatim by generators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVariables {
  values: BTreeMap<String, String>,
}

impl Variables {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, key: &str, value: impl Into<String>) {
    self.raw.insert(key.to_string(), value.into());
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.raw.get(key).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.raw.len()
  }

  pub fn is_empty(&self) -> bool {
    self.raw.is_empty()
  }

  /// Resolve every value against the final options and settings.
  pub fn resolve(&self, options: &OptionSet, settings: &Settings) -> Result<ResolvedVariables, GenerateError> {
    let resolver = EvaluationResolver { options, settings };
    let mut values = BTreeMap::new();

    for (key, raw) in &self.raw {
      if !is_valid_name(key) {
        return Err(GenerateError::InvalidVariable(key.clone()));
      }
      let value = placeholder::substitute(raw, &resolver).map_err(|source| GenerateError::Variable {
        key: key.clone(),
        source,
      })?;
      values.insert(key.clone(), value);
    }

    Ok(ResolvedVariables { values })
  }
}

impl ResolvedVariables {
  pub fn get(&self, key: &str) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// CMake-compatible variable name: ASCII letters, digits and `_`, not starting with a digit.
fn is_valid_name(key: &str) -> bool {
  let mut chars = key.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
    _ => false,
  }
}

struct EvaluationResolver<'a> {
  options: &'a OptionSet,
  settings: &'a Settings,
}

impl Resolver for EvaluationResolver<'_> {
  fn resolve_option(&self, owner: Option<&str>, key: &str) -> Result<String, PlaceholderError> {
    let value = match owner {
      None => self.options.recipe_value(key),
      Some(owner) => self.options.dependency_value(owner, key),
    };
    value.map(|v| v.to_string()).ok_or_else(|| {
      PlaceholderError::UnresolvedOption(match owner {
        Some(owner) => format!("{owner}:{key}"),
        None => key.to_string(),
      })
    })
  }

  fn resolve_setting(&self, name: &str) -> Result<String, PlaceholderError> {
    self
      .settings
      .get(name)
      .ok_or_else(|| PlaceholderError::UnresolvedSetting(name.to_string()))
  }
}
