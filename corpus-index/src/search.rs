use common::{error::AppError, utils::config::SnippetMode};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::CorpusSearcher;

/// One match, annotated with the work it falls in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Empty when the match precedes every section.
    #[serde(rename = "bookTitle")]
    pub title: String,
    #[serde(rename = "isBookSection")]
    pub is_book: bool,
    #[serde(rename = "matchedText")]
    pub matched_text: String,
}

impl SearchResult {
    pub fn new(title: Option<&str>, matched_text: impl Into<String>) -> Self {
        Self {
            title: title.unwrap_or_default().to_string(),
            is_book: title.is_some(),
            matched_text: matched_text.into(),
        }
    }
}

/// Results in match order and the offset of the first match.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub first_match_offset: Option<usize>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl CorpusSearcher {
    /// Runs `query` against the corpus.
    ///
    /// The pattern is compiled exactly as given, surrounding whitespace
    /// included; only an empty query is rejected.
    ///
    /// At most `max_results` matches are annotated. Each result carries the
    /// title whose section contains the match and either the enclosing
    /// paragraph or a clamped window around the match.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub fn search(&self, query: &str) -> Result<SearchOutcome, AppError> {
        if query.is_empty() {
            return Err(AppError::Validation("search query is empty".to_string()));
        }

        let offsets = self.matcher.find_all(
            self.corpus.as_str(),
            query,
            Some(self.settings.max_results),
        )?;

        let results: Vec<SearchResult> = offsets
            .iter()
            .map(|&offset| self.annotate(offset))
            .collect();

        debug!(matches = results.len(), "Search finished");
        Ok(SearchOutcome {
            results,
            first_match_offset: offsets.first().copied(),
        })
    }

    fn annotate(&self, offset: usize) -> SearchResult {
        let title = self.titles.resolve(offset).map(|t| t.label.as_str());
        SearchResult::new(title, self.snippet(offset))
    }

    fn snippet(&self, offset: usize) -> &str {
        let radius = self.settings.snippet_radius;
        match self.settings.snippet_mode {
            SnippetMode::Paragraph => self
                .paragraphs
                .resolve(offset)
                .and_then(|p| self.corpus.slice(p.start..p.end))
                .unwrap_or_else(|| self.corpus.window(offset, radius)),
            SnippetMode::Window => self.corpus.window(offset, radius),
        }
    }
}
