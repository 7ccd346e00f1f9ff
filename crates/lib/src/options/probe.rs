use tracing::warn;

use super::OptionValue;
use crate::host::PackageHost;

/// Answers whether a dependency exposes a given option.
///
/// The answer comes from the option schema the host reports for the
/// dependency. When the host cannot produce a schema the option counts as
/// unsupported.
pub struct CapabilityProbe<'h> {
  host: &'h dyn PackageHost,
}

impl<'h> CapabilityProbe<'h> {
  pub fn new(host: &'h dyn PackageHost) -> Self {
    Self { host }
  }

  pub fn supports(&self, target: &str, key: &str) -> bool {
    self.allowed(target, key).is_some()
  }

  /// The values `target` accepts for `key`, or `None` when the option is
  /// unsupported or the host cannot tell. An empty list places no restriction.
  pub fn allowed(&self, target: &str, key: &str) -> Option<Vec<OptionValue>> {
    match self.host.option_schema(target) {
      Ok(schema) => schema.allowed(key).map(<[OptionValue]>::to_vec),
      Err(e) => {
        warn!(target, key, error = %e, "capability probe failed, treating option as unsupported");
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::{DirectoryHost, StaticHost};
  use crate::util::testutil::doodle_host;
  use tracing_test::traced_test;

  #[test]
  fn exposed_option_is_supported() {
    let host = doodle_host(true);
    let probe = CapabilityProbe::new(&host);
    assert!(probe.supports("imgui", "backend_glfw"));
    assert!(probe.supports("imgui", "backend_opengl3"));
  }

  #[test]
  fn allowed_values_come_from_schema() {
    let host = doodle_host(true);
    let probe = CapabilityProbe::new(&host);

    assert_eq!(
      probe.allowed("imgui", "backend_glfw"),
      Some(vec![OptionValue::Bool(true), OptionValue::Bool(false)])
    );
    assert_eq!(probe.allowed("imgui", "backend_vulkan"), None);
  }

  #[test]
  fn missing_option_is_unsupported() {
    let host = doodle_host(false);
    let probe = CapabilityProbe::new(&host);
    assert!(!probe.supports("imgui", "backend_glfw"));
  }

  #[test]
  #[traced_test]
  fn unknown_package_is_unsupported_and_logged() {
    let host = StaticHost::new();
    let probe = CapabilityProbe::new(&host);

    assert!(!probe.supports("imgui", "backend_glfw"));
    assert!(logs_contain("capability probe failed"));
  }

  #[test]
  #[traced_test]
  fn unavailable_schema_is_unsupported() {
    let host = DirectoryHost::new("/nonexistent/packages");
    let probe = CapabilityProbe::new(&host);

    assert!(!probe.supports("imgui", "backend_glfw"));
    assert!(logs_contain("no option schema"));
  }
}
