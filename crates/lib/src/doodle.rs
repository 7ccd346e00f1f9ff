//! The doodle-duel game recipe.
//!
//! A raylib/imgui application: five regular requirements, a `build_tests`
//! switch pulling in Catch2, imgui's GLFW and OpenGL3 backends requested when
//! the imgui package offers them, and a flat layout so the CMake project finds
//! the generated files next to its `CMakeLists.txt`.

use crate::generate::{DependencyManifestGenerator, Dispatcher, ToolchainGenerator};
use crate::options::{OptionRegistry, OptionSet};
use crate::recipe::{PackageType, Recipe, RecipeError, RecipeInfo};
use crate::requirements::RequirementSet;

pub const BUILD_TESTS: &str = "build_tests";

const REQUIRES: &[&str] = &["raylib/5.5", "fmt/10.2.1", "entt/3.15.0", "imgui/1.89.9", "glfw/3.4"];

const TEST_FRAMEWORK: (&str, &str) = ("catch2", "3.5.2");

#[derive(Debug, Clone, Copy, Default)]
pub struct DoodleDuel;

impl Recipe for DoodleDuel {
  fn info(&self) -> RecipeInfo {
    RecipeInfo::new("doodle-duel", "1.0.0", PackageType::Application)
  }

  fn options(&self, options: &mut OptionRegistry) -> Result<(), RecipeError> {
    options.declare_default(BUILD_TESTS, [true, false], false)?;
    Ok(())
  }

  fn requirements(&self, requirements: &mut RequirementSet, _options: &OptionRegistry) -> Result<(), RecipeError> {
    for reference in REQUIRES {
      requirements.requires(reference)?;
    }
    Ok(())
  }

  fn build_requirements(&self, requirements: &mut RequirementSet, options: &OptionRegistry) -> Result<(), RecipeError> {
    let (name, version) = TEST_FRAMEWORK;
    requirements.add_conditional(options.flag(BUILD_TESTS)?, name, version)?;
    Ok(())
  }

  fn configure(&self, options: &mut OptionRegistry) -> Result<(), RecipeError> {
    // Older imgui packages build the backends unconditionally and expose no flags.
    options.set_override("imgui", "backend_glfw", true);
    options.set_override("imgui", "backend_opengl3", true);
    Ok(())
  }

  fn generate(&self, _options: &OptionSet, dispatcher: &mut Dispatcher) -> Result<(), RecipeError> {
    dispatcher.add(DependencyManifestGenerator::new());
    dispatcher.add(ToolchainGenerator::new().with_user_presets(false));
    dispatcher
      .variables_mut()
      .set("DOODLEDUEL_BUILD_TESTS", format!("$${{option:{BUILD_TESTS}}}"));
    Ok(())
  }
}
