use std::{fs, ops::Range, path::Path};

use common::error::AppError;
use memchr::memmem;
use tracing::{info, warn};

/// The full text being searched.
///
/// Every offset produced by the title and paragraph indexes is a byte offset
/// into [`Corpus::as_str`], so the buffer is loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    text: String,
}

impl Corpus {
    /// Reads the corpus file into memory.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; offsets then refer to
    /// the decoded buffer, which is the one every other component sees.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let byte_len = bytes.len();

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    valid_up_to = err.utf8_error().valid_up_to(),
                    "Corpus is not valid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        info!(path = %path.display(), bytes = byte_len, "Corpus loaded");
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Offsets of the first `limit` exact occurrences of `needle`, ascending.
    pub fn find_literal(&self, needle: &str, limit: usize) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }
        memmem::find_iter(self.text.as_bytes(), needle.as_bytes())
            .take(limit)
            .collect()
    }

    /// The text in `range`, or `None` if it is out of bounds or splits a char.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    /// Text within `radius` bytes either side of `center`.
    ///
    /// The window is clamped to the corpus and widened to the nearest char
    /// boundaries, so it is always a valid slice.
    pub fn window(&self, center: usize, radius: usize) -> &str {
        let len = self.text.len();
        let center = center.min(len);
        let start = floor_char_boundary(&self.text, center.saturating_sub(radius));
        let end = ceil_char_boundary(&self.text, center.saturating_add(radius).min(len));
        self.text.get(start..end).unwrap_or_default()
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index = index.saturating_sub(1);
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index = index.saturating_add(1);
    }
    index
}
