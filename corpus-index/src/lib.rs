pub mod corpus;
pub mod matcher;
pub mod paragraphs;
pub mod search;
pub mod title_index;
pub mod titles;

use std::{fmt, path::Path};

use common::{
    error::AppError,
    utils::config::{AppConfig, ParagraphScan, SnippetMode},
};
use tracing::{info, instrument};

pub use corpus::Corpus;
pub use matcher::{PatternMatcher, RegexMatcher};
pub use paragraphs::{ParagraphBoundary, ParagraphIndex};
pub use search::{SearchOutcome, SearchResult};
pub use title_index::{Title, TitleIndex};

/// Per-query knobs taken from [`AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub max_results: usize,
    pub snippet_mode: SnippetMode,
    pub snippet_radius: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl SearchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_results: config.max_search_results,
            snippet_mode: config.snippet_mode,
            snippet_radius: config.snippet_radius,
        }
    }
}

/// The corpus together with its title and paragraph indexes.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// across request handlers behind an `Arc`.
pub struct CorpusSearcher {
    corpus: Corpus,
    titles: TitleIndex,
    paragraphs: ParagraphIndex,
    matcher: Box<dyn PatternMatcher>,
    settings: SearchSettings,
}

impl fmt::Debug for CorpusSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpusSearcher")
            .field("corpus_bytes", &self.corpus.len())
            .field("titles", &self.titles.len())
            .field("paragraphs", &self.paragraphs.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CorpusSearcher {
    /// Loads the configured corpus and builds every index.
    #[instrument(skip_all, fields(corpus_path = %config.corpus_path))]
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        SearcherBuilder::new(SearchSettings::from_config(config))
            .load(&config.corpus_path)?
            .extract_titles(&config.toc_marker)?
            .build_title_index()?
            .build_paragraph_index(config.paragraph_scan)?
            .build()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn title_index(&self) -> &TitleIndex {
        &self.titles
    }

    pub fn paragraph_index(&self) -> &ParagraphIndex {
        &self.paragraphs
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Title of the section containing `pos`.
    pub fn resolve_title(&self, pos: usize) -> Option<&str> {
        self.titles.resolve(pos).map(|title| title.label.as_str())
    }

    /// Bounds of the paragraph containing `pos`.
    pub fn resolve_paragraph(&self, pos: usize) -> Option<ParagraphBoundary> {
        self.paragraphs.resolve(pos)
    }
}

/// Staged construction of a [`CorpusSearcher`].
///
/// Stages must run in order: load, extract titles, build the title index,
/// build the paragraph index. Running a stage before its input exists is an
/// [`AppError::Precondition`].
pub struct SearcherBuilder {
    settings: SearchSettings,
    matcher: Box<dyn PatternMatcher>,
    corpus: Option<Corpus>,
    titles: Option<Vec<String>>,
    title_index: Option<TitleIndex>,
    paragraphs: Option<ParagraphIndex>,
}

impl SearcherBuilder {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            matcher: Box::new(RegexMatcher::new()),
            corpus: None,
            titles: None,
            title_index: None,
            paragraphs: None,
        }
    }

    /// Replaces the default regex matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: impl PatternMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Uses in-memory text as the corpus.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.corpus = Some(Corpus::from_text(text));
        self
    }

    pub fn load(mut self, path: impl AsRef<Path>) -> Result<Self, AppError> {
        self.corpus = Some(Corpus::load(path)?);
        Ok(self)
    }

    pub fn extract_titles(mut self, marker: &str) -> Result<Self, AppError> {
        let corpus = self.require_corpus("extract_titles")?;
        self.titles = Some(titles::extract_titles(corpus.as_str(), marker));
        Ok(self)
    }

    pub fn build_title_index(mut self) -> Result<Self, AppError> {
        let corpus = self.require_corpus("build_title_index")?;
        let titles = self.titles.as_deref().ok_or_else(|| {
            AppError::Precondition("extract_titles must run before build_title_index".into())
        })?;
        self.title_index = Some(TitleIndex::build(corpus, titles));
        Ok(self)
    }

    pub fn build_paragraph_index(mut self, scan: ParagraphScan) -> Result<Self, AppError> {
        let corpus = self.require_corpus("build_paragraph_index")?;
        self.paragraphs = Some(ParagraphIndex::build(corpus.as_str(), scan));
        Ok(self)
    }

    pub fn build(self) -> Result<CorpusSearcher, AppError> {
        let corpus = self
            .corpus
            .ok_or_else(|| AppError::Precondition("corpus was never loaded".into()))?;
        let titles = self.title_index.ok_or_else(|| {
            AppError::Precondition("build_title_index must run before build".into())
        })?;
        let paragraphs = self.paragraphs.ok_or_else(|| {
            AppError::Precondition("build_paragraph_index must run before build".into())
        })?;

        info!(
            bytes = corpus.len(),
            titles = titles.len(),
            paragraphs = paragraphs.len(),
            "Corpus searcher ready"
        );

        Ok(CorpusSearcher {
            corpus,
            titles,
            paragraphs,
            matcher: self.matcher,
            settings: self.settings,
        })
    }

    fn require_corpus(&self, stage: &str) -> Result<&Corpus, AppError> {
        self.corpus
            .as_ref()
            .ok_or_else(|| AppError::Precondition(format!("load must run before {stage}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WORKS: &str = "Contents\r\n\r\nTHE SONNETS\r\nTHE TEMPEST\r\n\r\n\
        THE SONNETS\r\n\r\nShall I compare thee to a summer's day?\r\n\r\n\
        THE TEMPEST\r\n\r\nWhat cares these roarers for the name of king?\r\n";

    #[test]
    fn title_index_before_load_is_precondition_error() {
        let result = SearcherBuilder::new(SearchSettings::default()).build_title_index();
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[test]
    fn title_index_before_extraction_is_precondition_error() {
        let result = SearcherBuilder::new(SearchSettings::default())
            .with_text(WORKS)
            .build_title_index();
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[test]
    fn build_without_paragraphs_is_precondition_error() {
        let result = SearcherBuilder::new(SearchSettings::default())
            .with_text(WORKS)
            .extract_titles("Contents")
            .and_then(SearcherBuilder::build_title_index)
            .and_then(SearcherBuilder::build);
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[test]
    fn from_config_builds_all_indexes() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(WORKS.as_bytes()).expect("write corpus");

        let config = AppConfig {
            corpus_path: file.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let searcher = CorpusSearcher::from_config(&config).expect("searcher");

        assert_eq!(searcher.corpus().len(), WORKS.len());
        assert_eq!(searcher.title_index().len(), 2);
        assert_eq!(searcher.paragraph_index().len(), 6);

        let king = WORKS.find("king").expect("offset");
        assert_eq!(searcher.resolve_title(king), Some("THE TEMPEST"));
        let paragraph = searcher.resolve_paragraph(king).expect("paragraph");
        assert!(WORKS[paragraph.start..paragraph.end].starts_with("What cares"));
    }

    #[test]
    fn from_config_with_missing_corpus_fails() {
        let config = AppConfig {
            corpus_path: "/definitely/not/here.txt".to_string(),
            ..AppConfig::default()
        };
        let result = CorpusSearcher::from_config(&config);
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn every_title_resolves_to_itself_at_its_start() {
        let searcher = SearcherBuilder::new(SearchSettings::default())
            .with_text(WORKS)
            .extract_titles("Contents")
            .and_then(SearcherBuilder::build_title_index)
            .and_then(|b| b.build_paragraph_index(ParagraphScan::Bytes))
            .and_then(SearcherBuilder::build)
            .expect("searcher");

        let titles = searcher.title_index().titles().to_vec();
        for (i, title) in titles.iter().enumerate() {
            assert_eq!(searcher.resolve_title(title.start_offset), Some(title.label.as_str()));
            let previous = i.checked_sub(1).map(|p| titles[p].label.as_str());
            assert_eq!(searcher.resolve_title(title.start_offset - 1), previous);
        }
    }
}
