use serde::Serialize;
use tracing::{debug, info, warn};

use crate::corpus::Corpus;

/// A work in the corpus and the byte offset where its section begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub label: String,
    pub start_offset: usize,
}

/// Titles ordered by section start.
///
/// Section `i` covers `[titles[i].start_offset, titles[i + 1].start_offset)`;
/// the last section runs to the end of the corpus.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    titles: Vec<Title>,
    corpus_len: usize,
}

impl TitleIndex {
    /// Locates each title's section heading in `corpus`.
    ///
    /// The first occurrence of a title is its table of contents entry and the
    /// second is the heading, so titles found fewer than twice are dropped.
    /// Entries are sorted by offset; if two titles resolve to the same
    /// offset the one listed first keeps it.
    pub fn build(corpus: &Corpus, titles: &[String]) -> Self {
        let mut located = Vec::with_capacity(titles.len());

        for label in titles {
            let occurrences = corpus.find_literal(label, 2);
            match occurrences.iter().max() {
                Some(&start_offset) if occurrences.len() == 2 => {
                    debug!(title = %label, start_offset, "Title located");
                    located.push(Title {
                        label: label.clone(),
                        start_offset,
                    });
                }
                _ => debug!(
                    title = %label,
                    occurrences = occurrences.len(),
                    "Title has no section heading, skipping"
                ),
            }
        }

        // Stable, so ties keep table of contents order.
        located.sort_by_key(|title| title.start_offset);
        let before_dedup = located.len();
        located.dedup_by_key(|title| title.start_offset);
        if located.len() != before_dedup {
            warn!(
                dropped = before_dedup.saturating_sub(located.len()),
                "Titles shared a section offset"
            );
        }

        info!(
            titles = located.len(),
            listed = titles.len(),
            "Title index built"
        );

        Self {
            titles: located,
            corpus_len: corpus.len(),
        }
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// The title whose section contains `pos`.
    ///
    /// `None` before the first section and at or past the end of the corpus.
    pub fn resolve(&self, pos: usize) -> Option<&Title> {
        if pos >= self.corpus_len {
            return None;
        }
        let idx = self.titles.partition_point(|title| title.start_offset <= pos);
        self.titles.get(idx.checked_sub(1)?)
    }
}
