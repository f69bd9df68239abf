//! Locked results file the search streams its records into.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Exclusively locked results file
#[derive(Debug)]
pub struct OutputFile {
    /// File handle (owns the file lock)
    file: File,
}

impl OutputFile {
    /// Creates (or truncates) the results file at `path`.
    ///
    /// The file is locked before it is truncated, so a second search pointed
    /// at the same path fails instead of clobbering the first one's output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or created
    /// - The file is already locked by another process
    /// - The existing contents cannot be truncated
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Could not open output file: {}", path.display()))?;

        file.try_lock_exclusive()
            .with_context(|| format!("Output file is in use by another search: {}", path.display()))?;

        file.set_len(0)
            .with_context(|| format!("Could not truncate output file: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Forces written records to the storage device.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn commit(&mut self) -> Result<()> {
        self.file.sync_all().context("Failed to sync output file")?;
        Ok(())
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
