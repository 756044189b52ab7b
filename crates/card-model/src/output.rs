//! Output directory, file naming, and sequence numbering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of every generated card.
pub const CARD_EXTENSION: &str = ".png";

/// Minimum number of digits in a sequence suffix.
pub const SEQUENCE_WIDTH: usize = 3;

/// Where generated cards are written and what they are called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSettings {
    /// Target directory. Empty means no directory has been chosen yet.
    pub save_path: PathBuf,

    /// File name prefix placed before the sequence number.
    pub file_prefix: String,

    /// Sequence number used by the next generated card.
    pub current_number: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            save_path: PathBuf::new(),
            file_prefix: "sub_".to_string(),
            current_number: 1,
        }
    }
}

impl OutputSettings {
    /// The chosen directory, if any.
    pub fn save_dir(&self) -> Option<&Path> {
        if self.save_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.save_path)
        }
    }

    /// File name for the given sequence number, e.g. `sub_007.png`.
    pub fn file_name(&self, number: u32) -> String {
        card_file_name(&self.file_prefix, number)
    }

    /// File name the next generation will write.
    pub fn next_file_name(&self) -> String {
        self.file_name(self.current_number)
    }

    /// Return a copy that satisfies the output invariants (number >= 1).
    pub fn sanitized(mut self) -> Self {
        self.current_number = self.current_number.max(1);
        self
    }
}

/// `{prefix}{number zero-padded to 3}.png`. Numbers wider than three digits are kept whole.
pub fn card_file_name(prefix: &str, number: u32) -> String {
    format!("{prefix}{number:0width$}{CARD_EXTENSION}", width = SEQUENCE_WIDTH)
}

/// Extract the sequence number from a card file name.
///
/// Returns `None` unless the name is exactly prefix, ASCII digits, extension.
pub fn parse_sequence_number(file_name: &str, prefix: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(prefix)?
        .strip_suffix(CARD_EXTENSION)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
