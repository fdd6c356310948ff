//! Locked, atomic file replacement for exports.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use tempfile::NamedTempFile;

/// Writes `contents` to `path` atomically: the data goes to a temp file in
/// the same directory, is synced, and then renamed over the target while an
/// exclusive lock is held on it. A crash mid-write leaves the previous
/// file intact.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let target = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    target.lock_exclusive()?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    FileExt::unlock(&target)
}
