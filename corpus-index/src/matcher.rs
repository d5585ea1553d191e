use common::error::AppError;
use regex::RegexBuilder;

/// Finds where a query pattern matches in the corpus.
pub trait PatternMatcher: Send + Sync {
    /// Start offsets of case-insensitive matches of `pattern`, ascending.
    ///
    /// `limit` caps the number of offsets; `None` is unbounded. A pattern
    /// that cannot be compiled is an [`AppError::InvalidQuery`], never an
    /// empty result.
    fn find_all(
        &self,
        haystack: &str,
        pattern: &str,
        limit: Option<usize>,
    ) -> Result<Vec<usize>, AppError>;
}

/// Treats the query as a regular expression, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    size_limit: usize,
}

impl RegexMatcher {
    pub const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

    pub fn new() -> Self {
        Self {
            size_limit: Self::DEFAULT_SIZE_LIMIT,
        }
    }

    /// Caps the compiled program size so pathological queries fail fast.
    #[must_use]
    pub const fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }
}

impl Default for RegexMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for RegexMatcher {
    fn find_all(
        &self,
        haystack: &str,
        pattern: &str,
        limit: Option<usize>,
    ) -> Result<Vec<usize>, AppError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(self.size_limit)
            .build()
            .map_err(|e| AppError::InvalidQuery(e.to_string()))?;

        let starts = regex.find_iter(haystack).map(|m| m.start());
        Ok(match limit {
            Some(limit) => starts.take(limit).collect(),
            None => starts.collect(),
        })
    }
}
