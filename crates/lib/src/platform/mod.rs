//! Host platform detection used to seed the `os` and `arch` settings.

pub mod arch;
pub mod os;

pub use arch::Arch;
pub use os::Os;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("unsupported platform: os '{os}', arch '{arch}'")]
  Unsupported { os: &'static str, arch: &'static str },
}

/// An `arch-os` pair such as `x86_64-linux`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// The platform this process runs on.
  pub fn detect() -> Result<Self, PlatformError> {
    match (Arch::current(), Os::current()) {
      (Some(arch), Some(os)) => Ok(Self { arch, os }),
      _ => Err(PlatformError::Unsupported {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
      }),
    }
  }

  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn triple_is_arch_then_os() {
    assert_eq!(Platform::new(Arch::Aarch64, Os::MacOs).triple(), "aarch64-darwin");
    assert_eq!(Platform::new(Arch::X86_64, Os::Linux).to_string(), "x86_64-linux");
  }

  #[test]
  fn detect_matches_per_component_detection() {
    if let Ok(platform) = Platform::detect() {
      assert_eq!(Some(platform.arch), Arch::current());
      assert_eq!(Some(platform.os), Os::current());
    }
  }
}
