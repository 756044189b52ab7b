//! Sequential card output.
//!
//! Cards are named `{prefix}{NNN}.png`. The next number is always derivable
//! from the directory contents, so a counter that drifted from disk (files
//! added or removed behind our back) heals on the next folder selection.

use std::io::Write;
use std::path::{Path, PathBuf};

use subcard_model::parse_sequence_number;

/// Errors raised while writing a card.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Output directory does not exist: {path}")]
    MissingDirectory { path: PathBuf },

    #[error("Refusing to overwrite existing file: {path}")]
    Collision { path: PathBuf },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<OutputError> for subcard_common::SubcardError {
    fn from(err: OutputError) -> Self {
        subcard_common::SubcardError::output(err.to_string())
    }
}

/// One greater than the highest sequence number among `{prefix}N.png` files
/// in `dir`, or 1 when there are none.
///
/// A missing or unreadable directory counts as empty. Entries whose
/// remainder is not purely numeric are skipped.
pub fn next_sequence_number(dir: &Path, prefix: &str) -> u32 {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(
                dir = %dir.display(),
                error = %e,
                "Cannot list output directory; numbering from 1"
            );
            return 1;
        }
    };

    let max = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            parse_sequence_number(name.to_str()?, prefix)
        })
        .max();

    match max {
        Some(n) => n.saturating_add(1),
        None => 1,
    }
}

/// Writes finished cards into an output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialWriter;

impl SequentialWriter {
    /// Write `bytes` to `dir/file_name` all-or-nothing.
    ///
    /// The data goes to a temporary file in `dir` first and is then linked
    /// into place without replacing anything. On any error the target is
    /// left as it was.
    pub fn write(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, OutputError> {
        if !dir.is_dir() {
            return Err(OutputError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        let target = dir.join(file_name);
        let io_err = |source| OutputError::Io {
            path: target.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        match tmp.persist_noclobber(&target) {
            Ok(_) => {
                tracing::debug!(path = %target.display(), bytes = bytes.len(), "Card written");
                Ok(target)
            }
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(OutputError::Collision { path: target })
            }
            Err(e) => Err(io_err(e.error)),
        }
    }

    /// Delete a card written by [`write`](Self::write). A file that is already
    /// gone is not an error.
    pub fn remove(path: &Path) -> Result<(), OutputError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OutputError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}
