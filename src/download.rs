//! Saving downloaded files to disk.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

/// Folder that downloaded files are saved into.
#[derive(Debug, Clone)]
pub struct DownloadFolder {
    dir: PathBuf,
}

impl DownloadFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `bytes` as `file_name`, replacing any previous file.
    ///
    /// The data goes to a temporary file in the same folder which is then
    /// renamed into place, so a failed save never leaves a partial file
    /// under the final name.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;

        let target = self.dir.join(file_name);
        tmp.persist(&target).map_err(|e| e.error)?;
        log::info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}
