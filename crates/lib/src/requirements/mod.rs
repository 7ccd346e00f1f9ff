//! Requirement declaration.
//!
//! Requirements are `(name, constraint)` pairs. Regular requirements are always
//! emitted; test requirements are declared only when the predicate guarding
//! them holds at declaration time. Names are unique within one evaluation:
//! re-declaring with the same constraint is a no-op, with a different one a
//! conflict.

mod set;
mod types;

pub use set::RequirementSet;
pub use types::{Requirement, RequirementKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequirementError {
  #[error("conflicting requirements for '{name}': '{existing}' vs '{requested}'")]
  Conflict {
    name: String,
    existing: String,
    requested: String,
  },

  #[error("invalid requirement reference '{0}', expected name/version")]
  InvalidReference(String),
}
