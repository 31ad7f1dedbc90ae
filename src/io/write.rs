//! Write-then-rename output files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Error unless `target` is a real path that may be (over)written.
pub(crate) fn ensure_writable(target: &Path, force: bool) -> Result<()> {
    if target == Path::new("-") {
        bail!("[io::write] stdout is not supported; provide a real file path.");
    }
    if target.is_dir() {
        bail!("[io::write] Output path is a directory: {}", target.display());
    }
    if !force && target.exists() {
        bail!("[io::write] Refusing to overwrite existing file: {} (use --force)", target.display());
    }
    Ok(())
}

/// Output file that only appears at `target` once [`PendingWrite::commit`] succeeds.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: BufWriter<NamedTempFile>,
}

impl PendingWrite {
    /// Create a temp file next to `target`, creating parent directories as needed.
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("[io::write] create dir {}", parent.display()))?;
        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("[io::write] create temp file in {}", parent.display()))?;
        Ok(Self { target: target.to_path_buf(), tmp: BufWriter::new(tmp) })
    }

    /// Flush and atomically move the temp file to the target path.
    pub(crate) fn commit(self) -> Result<()> {
        let tmp = self.tmp.into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("[io::write] flush {}", self.target.display()))?;
        tmp.as_file().sync_all().ok(); // best-effort fsync file
        tmp.persist(&self.target)
            .with_context(|| format!("[io::write] rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Output files that only appear once every one of them has been written.
#[derive(Default)]
pub(crate) struct StagedWrites {
    pending: Vec<PendingWrite>,
}

impl StagedWrites {
    pub(crate) fn new() -> Self { Self::default() }

    /// Write `target` through `f` into a temp file. Nothing is renamed until [`StagedWrites::commit`].
    pub(crate) fn stage<F>(&mut self, target: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut PendingWrite) -> Result<()>,
    {
        let mut pending = PendingWrite::open(target)?;
        f(&mut pending)?;
        pending.flush()
            .with_context(|| format!("[io::write] flush {}", target.display()))?;
        self.pending.push(pending);
        Ok(())
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.pending.len() }

    /// Move every staged file to its target. Dropping instead discards them all.
    pub(crate) fn commit(self) -> Result<()> {
        self.pending.into_iter().try_for_each(PendingWrite::commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_files_appear() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("nested").join("out.csv");
        let chart = dir.path().join("out.svg");

        let mut staged = StagedWrites::new();
        staged.stage(&table, |w| Ok(w.write_all(b"a,b\n")?)).unwrap();
        staged.stage(&chart, |w| Ok(w.write_all(b"<svg/>")?)).unwrap();
        assert_eq!(staged.len(), 2);
        assert!(!table.exists());

        staged.commit().unwrap();
        assert_eq!(fs::read_to_string(&table).unwrap(), "a,b\n");
        assert_eq!(fs::read_to_string(&chart).unwrap(), "<svg/>");
    }

    #[test]
    fn failed_write_discards_every_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("out.csv");

        let mut staged = StagedWrites::new();
        staged.stage(&table, |w| Ok(w.write_all(b"a,b\n")?)).unwrap();
        let result = staged.stage(&dir.path().join("out.svg"), |w| {
            w.write_all(b"partial")?;
            bail!("render failed")
        });
        assert!(result.is_err());
        drop(staged);

        assert!(!table.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn existing_file_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        fs::write(&target, "old").unwrap();

        assert!(ensure_writable(&target, false).is_err());
        assert!(ensure_writable(&target, true).is_ok());
        assert!(ensure_writable(Path::new("-"), true).is_err());
    }
}
