//! recipe-lib: lifecycle core for build-configuration recipes
//!
//! A recipe declares what a project needs before its native build tool can run:
//! - `Requirement`s on external packages, regular or gated on a recipe option
//! - `Option`s of its own, plus overrides for options its dependencies expose
//! - a `Layout` saying where generated files land
//! - the `Generator`s that turn the resolved state into build inputs
//!
//! A package-resolution host drives one [`evaluation::Evaluation`] per
//! configuration through a fixed sequence of phases.

pub mod doodle;
pub mod evaluation;
pub mod generate;
pub mod host;
pub mod layout;
pub mod options;
pub mod placeholder;
pub mod platform;
pub mod recipe;
pub mod requirements;
pub mod settings;
pub mod util;
