use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// How the text attached to each search hit is chosen.
#[derive(Clone, Copy, Deserialize, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnippetMode {
    /// The enclosing paragraph, falling back to a window when there is none.
    #[default]
    Paragraph,
    /// A fixed-width window around the match.
    Window,
}

/// Which paragraph boundary scanner runs at startup.
#[derive(Clone, Copy, Deserialize, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphScan {
    /// Blank (whitespace-only) lines separate paragraphs.
    #[default]
    Lines,
    /// Two consecutive newline bytes separate paragraphs.
    Bytes,
}

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    #[serde(default = "default_http_port", alias = "port")]
    pub http_port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
    #[serde(default = "default_toc_marker")]
    pub toc_marker: String,
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    #[serde(default)]
    pub snippet_mode: SnippetMode,
    #[serde(default = "default_snippet_radius")]
    pub snippet_radius: usize,
    #[serde(default)]
    pub paragraph_scan: ParagraphScan,
}

fn default_corpus_path() -> String {
    "completeworks.txt".to_string()
}

fn default_http_port() -> u16 {
    3001
}

#[allow(clippy::unnecessary_wraps)]
fn default_static_dir() -> Option<String> {
    Some("./static".to_string())
}

fn default_toc_marker() -> String {
    "Contents".to_string()
}

fn default_max_search_results() -> usize {
    100
}

fn default_snippet_radius() -> usize {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            http_port: default_http_port(),
            static_dir: default_static_dir(),
            toc_marker: default_toc_marker(),
            max_search_results: default_max_search_results(),
            snippet_mode: SnippetMode::default(),
            snippet_radius: default_snippet_radius(),
            paragraph_scan: ParagraphScan::default(),
        }
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
