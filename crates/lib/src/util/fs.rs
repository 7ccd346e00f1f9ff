//! Filesystem helpers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path` so that readers only ever see the old or the new file.
///
/// The data goes to a uniquely named temp file in the destination directory, which
/// is then renamed over `path`. Concurrent writers to the same path each rename a
/// complete file; the last rename wins.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir)?;

  let mut temp = NamedTempFile::new_in(dir)?;
  temp.write_all(contents)?;
  temp.as_file().sync_all()?;
  temp.persist(path).map_err(|e| e.error)?;
  Ok(())
}
