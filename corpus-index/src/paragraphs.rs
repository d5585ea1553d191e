use common::utils::config::ParagraphScan;
use tracing::info;

/// Half-open byte interval `[start, end)` covering one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphBoundary {
    pub start: usize,
    pub end: usize,
}

impl ParagraphBoundary {
    pub const fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Paragraph boundaries of a corpus, ascending and non-overlapping.
#[derive(Debug, Clone, Default)]
pub struct ParagraphIndex {
    boundaries: Vec<ParagraphBoundary>,
}

impl ParagraphIndex {
    pub fn build(text: &str, scan: ParagraphScan) -> Self {
        let boundaries = match scan {
            ParagraphScan::Lines => scan_lines(text),
            ParagraphScan::Bytes => scan_bytes(text.as_bytes()),
        };
        info!(paragraphs = boundaries.len(), scan = ?scan, "Paragraph index built");
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &[ParagraphBoundary] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// The paragraph containing `pos`, if any.
    ///
    /// Containment is half-open, `start <= pos < end`, so `end` itself (the
    /// first byte of the separator) is not found. Positions inside separators
    /// (blank lines, newline runs) belong to no paragraph.
    pub fn resolve(&self, pos: usize) -> Option<ParagraphBoundary> {
        let idx = self.boundaries.partition_point(|b| b.start <= pos);
        let candidate = self.boundaries.get(idx.checked_sub(1)?)?;
        candidate.contains(pos).then_some(*candidate)
    }
}

/// Line-based scan: a paragraph runs from the first non-blank line after a
/// blank line (or the start of input) up to the next blank line.
///
/// Offsets include line terminators, so `\r\n` input is measured exactly. A
/// paragraph still open at end of input ends at `text.len()`.
fn scan_lines(text: &str) -> Vec<ParagraphBoundary> {
    let mut boundaries = Vec::new();
    let mut offset = 0usize;
    let mut open: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(start) = open.take() {
                boundaries.push(ParagraphBoundary { start, end: offset });
            }
        } else if open.is_none() {
            open = Some(offset);
        }
        offset = offset.saturating_add(line.len());
    }

    if let Some(start) = open {
        boundaries.push(ParagraphBoundary {
            start,
            end: text.len(),
        });
    }
    boundaries
}

/// Byte-based scan: paragraphs are separated by two consecutive `\n` bytes,
/// with `\r` ignored. The boundary ends just past the first newline of the
/// separating run, matching the line-based scan on the same input.
fn scan_bytes(bytes: &[u8]) -> Vec<ParagraphBoundary> {
    let mut boundaries = Vec::new();
    let mut open: Option<usize> = None;
    // The start of input behaves like a separator.
    let mut newline_run = 2usize;
    let mut run_start = 0usize;

    for (i, &byte) in bytes.iter().enumerate() {
        match byte {
            b'\n' => {
                if newline_run == 0 {
                    run_start = i.saturating_add(1);
                }
                newline_run = newline_run.saturating_add(1);
                if newline_run == 2 {
                    if let Some(start) = open.take() {
                        boundaries.push(ParagraphBoundary {
                            start,
                            end: run_start,
                        });
                    }
                }
            }
            b'\r' => {}
            _ => {
                if newline_run >= 2 && open.is_none() {
                    open = Some(i);
                }
                newline_run = 0;
            }
        }
    }

    if let Some(start) = open {
        boundaries.push(ParagraphBoundary {
            start,
            end: bytes.len(),
        });
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'a>(text: &'a str, index: &ParagraphIndex) -> Vec<&'a str> {
        index
            .boundaries()
            .iter()
            .map(|b| &text[b.start..b.end])
            .collect()
    }

    fn assert_ascending(index: &ParagraphIndex) {
        for pair in index.boundaries().windows(2) {
            assert!(pair[0].start < pair[0].end);
            assert!(pair[0].end <= pair[1].start, "overlap: {pair:?}");
        }
    }

    #[test]
    fn line_scan_splits_on_blank_lines() {
        let text = "first line\nstill first\n\nsecond\n\n\nthird\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);

        assert_eq!(
            spans(text, &index),
            vec!["first line\nstill first\n", "second\n", "third\n"]
        );
        assert_ascending(&index);
    }

    #[test]
    fn line_scan_counts_crlf_width() {
        let text = "ab\r\n\r\ncd\r\n\r\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);

        assert_eq!(
            index.boundaries(),
            &[
                ParagraphBoundary { start: 0, end: 4 },
                ParagraphBoundary { start: 6, end: 10 },
            ]
        );
    }

    #[test]
    fn whitespace_only_lines_separate_paragraphs() {
        let text = "one\n   \t\ntwo\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);
        assert_eq!(spans(text, &index), vec!["one\n", "two\n"]);
    }

    #[test]
    fn trailing_paragraph_is_emitted_at_end_of_input() {
        let text = "one\n\ntwo without newline";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);

        let last = index.boundaries().last().copied().expect("paragraph");
        assert_eq!(last.end, text.len());
        assert_eq!(&text[last.start..last.end], "two without newline");
    }

    #[test]
    fn leading_blank_lines_are_not_paragraphs() {
        let text = "\n\n\nbody\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);
        assert_eq!(index.boundaries(), &[ParagraphBoundary { start: 3, end: 8 }]);
    }

    #[test]
    fn empty_text_has_no_paragraphs() {
        assert!(ParagraphIndex::build("", ParagraphScan::Lines).is_empty());
        assert!(ParagraphIndex::build("", ParagraphScan::Bytes).is_empty());
        assert!(ParagraphIndex::build("\n\n\n", ParagraphScan::Lines).is_empty());
    }

    #[test]
    fn byte_scan_matches_line_scan_on_plain_text() {
        let texts = [
            "first line\nstill first\n\nsecond\n\n\nthird\n",
            "ab\r\n\r\ncd\r\n\r\n",
            "one\n\ntwo without newline",
            "\n\n\nbody\n",
        ];
        for text in texts {
            let lines = ParagraphIndex::build(text, ParagraphScan::Lines);
            let bytes = ParagraphIndex::build(text, ParagraphScan::Bytes);
            assert_eq!(lines.boundaries(), bytes.boundaries(), "input: {text:?}");
        }
    }

    #[test]
    fn byte_scan_keeps_single_newlines_inside_paragraph() {
        let text = "a\nb\nc\n\nd";
        let index = ParagraphIndex::build(text, ParagraphScan::Bytes);
        assert_eq!(spans(text, &index), vec!["a\nb\nc\n", "d"]);
    }

    #[test]
    fn resolve_inside_paragraph_returns_exact_bounds() {
        let text = "alpha\nbeta\n\ngamma\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);
        let first = ParagraphBoundary { start: 0, end: 11 };
        let second = ParagraphBoundary { start: 12, end: 18 };

        assert_eq!(index.resolve(0), Some(first));
        assert_eq!(index.resolve(7), Some(first));
        assert_eq!(index.resolve(10), Some(first));
        assert_eq!(index.resolve(first.end), None);
        assert_eq!(index.resolve(12), Some(second));
        assert_eq!(index.resolve(17), Some(second));
    }

    #[test]
    fn resolve_in_separator_gap_is_none() {
        let text = "alpha\n\n\ngamma\n";
        let index = ParagraphIndex::build(text, ParagraphScan::Lines);

        assert_eq!(index.resolve(6), None);
        assert_eq!(index.resolve(7), None);
        assert_eq!(index.resolve(1_000), None);
    }

    #[test]
    fn resolve_on_tiny_indexes_never_panics() {
        let empty = ParagraphIndex::default();
        assert_eq!(empty.resolve(0), None);
        assert_eq!(empty.resolve(usize::MAX), None);

        let single = ParagraphIndex::build("\nonly\n", ParagraphScan::Lines);
        assert_eq!(single.len(), 1);
        assert_eq!(single.resolve(0), None);
        assert_eq!(single.resolve(1), Some(ParagraphBoundary { start: 1, end: 6 }));
        assert_eq!(single.resolve(6), None);
        assert_eq!(single.resolve(usize::MAX), None);
    }
}
