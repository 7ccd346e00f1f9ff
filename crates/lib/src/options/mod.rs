//! Recipe options and dependency option overrides.
//!
//! The recipe declares its own options with an allowed-value set and a default.
//! Overrides for options owned by dependencies are only staged here; they are
//! applied through the [`CapabilityProbe`] once requirements are known, and an
//! override the dependency does not expose is dropped without error.

mod probe;
mod registry;
mod types;

pub use probe::CapabilityProbe;
pub use registry::OptionRegistry;
pub use types::*;

use thiserror::Error;

/// Configuration errors raised while declaring or applying options.
#[derive(Debug, Error)]
pub enum OptionError {
  #[error("default '{default}' for option '{key}' is not one of the allowed values [{allowed}]")]
  InvalidDefault {
    key: String,
    default: String,
    allowed: String,
  },

  #[error("option '{key}' declares no allowed values")]
  EmptyAllowed { key: String },

  #[error("option '{key}' is declared more than once")]
  DuplicateDeclaration { key: String },

  #[error("unknown option '{key}'")]
  UnknownOption { key: String },

  #[error("value '{value}' for option '{key}' is not one of the allowed values [{allowed}]")]
  InvalidValue {
    key: String,
    value: String,
    allowed: String,
  },

  #[error("option '{key}' is not a boolean (value '{value}')")]
  NotBoolean { key: String, value: String },

  #[error("override '{target}:{key}' targets '{target}', which is not a declared requirement")]
  UnknownOwner { target: String, key: String },

  #[error("malformed option assignment '{0}', expected key=value or owner:key=value")]
  Malformed(String),
}
