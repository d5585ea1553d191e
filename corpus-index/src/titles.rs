use std::collections::HashSet;

use tracing::{debug, info};

/// Recovers the ordered list of work titles from the table of contents.
///
/// Lines are compared after trimming. Once a line equal to `marker` is seen,
/// every following non-blank line is a title until the first line that was
/// already recorded, which ends the block without being added again. A corpus
/// without the marker has no titles.
pub fn extract_titles(text: &str, marker: &str) -> Vec<String> {
    let mut titles = Vec::new();
    let mut seen = HashSet::new();
    let mut in_contents = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if in_contents {
            if !seen.insert(line) {
                debug!(repeated = line, "Table of contents ended");
                break;
            }
            titles.push(line.to_string());
        } else if line == marker {
            debug!(marker, "Table of contents found");
            in_contents = true;
        }
    }

    info!(titles = titles.len(), "Titles extracted");
    titles
}
