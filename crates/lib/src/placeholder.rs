//! Placeholder parsing and substitution for build variable values.
//!
//! A build variable may refer to the final option set or to the settings of the
//! evaluation. References are resolved once, when generators run.
//!
//! # Placeholder Formats
//!
//! - `$${option:KEY}` - a recipe option
//! - `$${option:OWNER:KEY}` - an applied dependency option
//! - `$${setting:NAME}` - a setting (`os`, `arch`, `compiler`, `build_type`)
//!
//! # CMake Variables
//!
//! Single `$` characters pass through unchanged, so CMake references such as
//! `${CMAKE_SOURCE_DIR}` reach the generated file untouched.
//!
//! # Escaping
//!
//! `$$$` before `{` produces a literal `$${`.
//!
//! # Example
//!
//! ```
//! use recipe_lib::placeholder::{parse, Placeholder, Segment};
//!
//! let segments = parse("$${option:build_tests}-${CMAKE_BUILD_TYPE}").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Option { owner: None, key: "build_tests".to_string() }),
//!     Segment::Literal("-${CMAKE_BUILD_TYPE}".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `$${option:KEY}` or `$${option:OWNER:KEY}`
  Option { owner: Option<String>, key: String },

  /// `$${setting:NAME}`
  Setting(String),
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder type: {0}")]
  UnknownType(String),

  #[error("malformed placeholder: {0}")]
  Malformed(String),

  #[error("unresolved option '{0}'")]
  UnresolvedOption(String),

  #[error("unresolved setting '{0}'")]
  UnresolvedSetting(String),
}

/// Supplies values for placeholders.
pub trait Resolver {
  fn resolve_option(&self, owner: Option<&str>, key: &str) -> Result<String, PlaceholderError>;

  fn resolve_setting(&self, name: &str) -> Result<String, PlaceholderError>;
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a placeholder is unclosed, empty, or of an unknown type.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;
  let mut offset = 0;

  while let Some(idx) = rest.find("$$") {
    literal.push_str(&rest[..idx]);
    let after = &rest[idx + 2..];
    let pos = offset + idx;

    if let Some(tail) = after.strip_prefix("${") {
      // Escaped: $$${ -> literal $${
      literal.push_str("$${");
      offset = pos + 4;
      rest = tail;
    } else if let Some(tail) = after.strip_prefix('{') {
      let close = tail.find('}').ok_or(PlaceholderError::Unclosed(pos))?;
      if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(&mut literal)));
      }
      segments.push(Segment::Placeholder(parse_content(&tail[..close])?));
      offset = pos + 3 + close + 1;
      rest = &tail[close + 1..];
    } else {
      literal.push_str("$$");
      offset = pos + 2;
      rest = after;
    }
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse the text between `$${` and `}`.
fn parse_content(content: &str) -> Result<Placeholder, PlaceholderError> {
  let (kind, rest) = content
    .split_once(':')
    .ok_or_else(|| PlaceholderError::Malformed(format!("missing colon in '{content}'")))?;

  if rest.is_empty() {
    return Err(PlaceholderError::Malformed(format!("empty reference in '{content}'")));
  }

  match kind {
    "option" => match rest.split_once(':') {
      Some((owner, key)) if !owner.is_empty() && !key.is_empty() => Ok(Placeholder::Option {
        owner: Some(owner.to_string()),
        key: key.to_string(),
      }),
      Some(_) => Err(PlaceholderError::Malformed(format!(
        "option placeholder needs OWNER:KEY: '{content}'"
      ))),
      None => Ok(Placeholder::Option {
        owner: None,
        key: rest.to_string(),
      }),
    },
    "setting" => Ok(Placeholder::Setting(rest.to_string())),
    _ => Err(PlaceholderError::UnknownType(kind.to_string())),
  }
}

/// Parse and substitute in one step.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(Placeholder::Option { owner, key }) => {
        result.push_str(&resolver.resolve_option(owner.as_deref(), key)?);
      }
      Segment::Placeholder(Placeholder::Setting(name)) => {
        result.push_str(&resolver.resolve_setting(name)?);
      }
    }
  }

  Ok(result)
}
