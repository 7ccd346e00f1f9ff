use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OptionError;

/// A typed option value.
///
/// Booleans are kept distinct from text so `true` declared as a default and
/// `"True"` given on a command line compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Text(String),
}

impl OptionValue {
  /// Parse a raw value from a caller. `true`/`false` in any case become booleans.
  pub fn parse(raw: &str) -> Self {
    match raw.to_ascii_lowercase().as_str() {
      "true" => Self::Bool(true),
      "false" => Self::Bool(false),
      _ => Self::Text(raw.to_string()),
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      Self::Text(_) => None,
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Bool(b) => write!(f, "{}", b),
      Self::Text(s) => write!(f, "{}", s),
    }
  }
}

impl From<bool> for OptionValue {
  fn from(value: bool) -> Self {
    Self::Bool(value)
  }
}

impl From<&str> for OptionValue {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

/// Who an option belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionOwner {
  Recipe,
  Dependency(String),
}

impl fmt::Display for OptionOwner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Recipe => write!(f, "recipe"),
      Self::Dependency(name) => write!(f, "{}", name),
    }
  }
}

/// Whether a value came from a declared default or an explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
  Default,
  Override,
}

/// A single applied option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
  pub owner: OptionOwner,
  pub key: String,
  pub value: OptionValue,
  pub provenance: Provenance,
}

/// A recipe option declaration: its allowed values and default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
  pub key: String,
  pub allowed: Vec<OptionValue>,
  pub default: OptionValue,
}

impl OptionDecl {
  pub fn allows(&self, value: &OptionValue) -> bool {
    self.allowed.contains(value)
  }

  pub(crate) fn allowed_list(&self) -> String {
    self.allowed.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
  }
}

/// An override staged for a dependency-owned option.
///
/// Staging never fails; whether it takes effect is decided when options are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedOverride {
  pub target: String,
  pub key: String,
  pub value: OptionValue,
}

/// A caller-supplied assignment, `key=value` or `owner:key=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionAssignment {
  Recipe { key: String, value: OptionValue },
  Dependency { target: String, key: String, value: OptionValue },
}

impl FromStr for OptionAssignment {
  type Err = OptionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || OptionError::Malformed(s.to_string());

    let (lhs, raw_value) = s.split_once('=').ok_or_else(malformed)?;
    let value = OptionValue::parse(raw_value.trim());

    match lhs.trim().split_once(':') {
      Some((target, key)) => {
        let (target, key) = (target.trim(), key.trim());
        if target.is_empty() || key.is_empty() {
          return Err(malformed());
        }
        Ok(Self::Dependency {
          target: target.to_string(),
          key: key.to_string(),
          value,
        })
      }
      None => {
        let key = lhs.trim();
        if key.is_empty() {
          return Err(malformed());
        }
        Ok(Self::Recipe {
          key: key.to_string(),
          value,
        })
      }
    }
  }
}

/// The final, applied option set handed to generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSet {
  recipe: BTreeMap<String, OptionEntry>,
  dependencies: BTreeMap<String, BTreeMap<String, OptionEntry>>,
}

impl OptionSet {
  pub(crate) fn new(recipe: BTreeMap<String, OptionEntry>) -> Self {
    Self {
      recipe,
      dependencies: BTreeMap::new(),
    }
  }

  pub(crate) fn insert_dependency(&mut self, entry: OptionEntry) {
    if let OptionOwner::Dependency(name) = &entry.owner {
      self
        .dependencies
        .entry(name.clone())
        .or_default()
        .insert(entry.key.clone(), entry);
    }
  }

  /// Value of one of the recipe's own options.
  pub fn recipe_value(&self, key: &str) -> Option<&OptionValue> {
    self.recipe.get(key).map(|e| &e.value)
  }

  /// Value of an applied dependency override.
  pub fn dependency_value(&self, target: &str, key: &str) -> Option<&OptionValue> {
    self.dependencies.get(target)?.get(key).map(|e| &e.value)
  }

  /// Applied options for one dependency, keyed by option name.
  pub fn dependency_options(&self, target: &str) -> BTreeMap<String, OptionValue> {
    self
      .dependencies
      .get(target)
      .map(|opts| opts.iter().map(|(k, e)| (k.clone(), e.value.clone())).collect())
      .unwrap_or_default()
  }

  pub fn get(&self, owner: &OptionOwner, key: &str) -> Option<&OptionValue> {
    match owner {
      OptionOwner::Recipe => self.recipe_value(key),
      OptionOwner::Dependency(name) => self.dependency_value(name, key),
    }
  }

  /// All entries, recipe options first, then dependencies by name.
  pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
    self
      .recipe
      .values()
      .chain(self.dependencies.values().flat_map(|opts| opts.values()))
  }

  pub fn len(&self) -> usize {
    self.recipe.len() + self.dependencies.values().map(|opts| opts.len()).sum::<usize>()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod option_value {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_for_booleans() {
      assert_eq!(OptionValue::parse("True"), OptionValue::Bool(true));
      assert_eq!(OptionValue::parse("FALSE"), OptionValue::Bool(false));
      assert_eq!(OptionValue::parse("opengl3"), OptionValue::from("opengl3"));
    }

    #[test]
    fn displays_booleans_lowercase() {
      assert_eq!(OptionValue::Bool(true).to_string(), "true");
      assert_eq!(OptionValue::Bool(false).to_string(), "false");
    }
  }

  mod assignment {
    use super::*;

    #[test]
    fn parses_recipe_assignment() {
      let a: OptionAssignment = "build_tests=true".parse().unwrap();
      assert_eq!(
        a,
        OptionAssignment::Recipe {
          key: "build_tests".to_string(),
          value: OptionValue::Bool(true),
        }
      );
    }

    #[test]
    fn parses_dependency_assignment() {
      let a: OptionAssignment = "imgui:backend_glfw=True".parse().unwrap();
      assert_eq!(
        a,
        OptionAssignment::Dependency {
          target: "imgui".to_string(),
          key: "backend_glfw".to_string(),
          value: OptionValue::Bool(true),
        }
      );
    }

    #[test]
    fn rejects_missing_equals() {
      let result = "build_tests".parse::<OptionAssignment>();
      assert!(matches!(result, Err(OptionError::Malformed(_))));
    }

    #[test]
    fn rejects_empty_owner() {
      let result = ":backend_glfw=true".parse::<OptionAssignment>();
      assert!(matches!(result, Err(OptionError::Malformed(_))));
    }
  }

  mod option_set {
    use super::*;

    fn entry(owner: OptionOwner, key: &str, value: bool) -> OptionEntry {
      OptionEntry {
        owner,
        key: key.to_string(),
        value: value.into(),
        provenance: Provenance::Override,
      }
    }

    #[test]
    fn lookups_by_owner() {
      let mut recipe = BTreeMap::new();
      recipe.insert("build_tests".to_string(), entry(OptionOwner::Recipe, "build_tests", false));
      let mut set = OptionSet::new(recipe);
      set.insert_dependency(entry(OptionOwner::Dependency("imgui".to_string()), "backend_glfw", true));

      assert_eq!(set.recipe_value("build_tests"), Some(&OptionValue::Bool(false)));
      assert_eq!(
        set.get(&OptionOwner::Dependency("imgui".to_string()), "backend_glfw"),
        Some(&OptionValue::Bool(true))
      );
      assert_eq!(set.dependency_options("glfw").len(), 0);
      assert_eq!(set.len(), 2);
    }
  }
}
