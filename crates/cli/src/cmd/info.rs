use anyhow::Result;

use recipe_lib::platform::Platform;
use recipe_lib::settings::Settings;

use crate::output::{OutputFormat, print_error, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let platform = match Platform::detect() {
    Ok(platform) => platform,
    Err(e) => {
      print_error(&format!("Could not detect platform: {}", e));
      return Err(e.into());
    }
  };
  let settings = Settings::new(platform);

  if output.is_json() {
    return print_json(&serde_json::json!({
      "platform": platform.triple(),
      "settings": settings,
    }));
  }

  println!("System:");
  print_stat("Platform", &platform.triple());
  print_stat("CMake system", platform.os.cmake_system_name());
  println!();
  println!("Default settings:");
  print_stat("os", settings.os.as_str());
  print_stat("arch", settings.arch.as_str());
  print_stat("build_type", settings.build_type.as_str());
  print_stat("compiler", settings.compiler.as_deref().unwrap_or("(unset)"));

  Ok(())
}
